//! Option and argument validation.
//!
//! Validators are attached to definitions and run only by
//! [`populate_object`](crate::CommandLineParser::populate_object) when
//! validation is requested. Unlike the required-option check, which
//! reports every missing option at once, validation stops at the first
//! failure.

use crate::command_line::CommandLine;
use crate::context::InvocationContext;
use crate::error::ValidationError;
use crate::option::OptionValue;

/// Checks one resolved value.
///
/// Closures of the form `Fn(&OptionValue, &InvocationContext) -> Result<(), String>`
/// implement this trait.
pub trait OptionValidator: Send + Sync {
    /// Validates a value, returning a message on failure.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason if the value is rejected.
    fn validate(&self, value: &OptionValue, ctx: &InvocationContext) -> Result<(), String>;
}

impl<F> OptionValidator for F
where
    F: Fn(&OptionValue, &InvocationContext) -> Result<(), String> + Send + Sync,
{
    fn validate(&self, value: &OptionValue, ctx: &InvocationContext) -> Result<(), String> {
        self(value, ctx)
    }
}

/// Runs validators over a resolved command line.
pub struct CommandValidator;

impl CommandValidator {
    /// Runs every option validator in declaration order, then the argument
    /// validator. Returns the first failure.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for the first value that is rejected.
    pub fn validate(line: &CommandLine, ctx: &InvocationContext) -> Result<(), ValidationError> {
        let command = line.command_name();

        for parsed in line.options() {
            let Some(validator) = parsed.definition().option_validator() else {
                continue;
            };
            validator
                .validate(parsed.value(), ctx)
                .map_err(|message| {
                    tracing::debug!(command, option = parsed.name(), %message, "validation failed");
                    ValidationError {
                        command: command.to_string(),
                        target: parsed.definition().long_form(),
                        message,
                    }
                })?;
        }

        if let Some(argument) = line.definition().argument() {
            if let Some(validator) = argument.argument_validator() {
                if !line.arguments().is_empty() {
                    let value = if argument.is_multiple() {
                        OptionValue::List(line.arguments().to_vec())
                    } else {
                        OptionValue::Single(line.arguments()[0].clone())
                    };
                    validator.validate(&value, ctx).map_err(|message| {
                        let target = argument.display_name();
                        tracing::debug!(command, argument = %target, %message, "validation failed");
                        ValidationError {
                            command: command.to_string(),
                            target,
                            message,
                        }
                    })?;
                }
            }
        }

        Ok(())
    }
}
