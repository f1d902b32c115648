//! The resolved result of a parse.

use std::str::FromStr;
use std::sync::Arc;

use crate::command::CommandDefinition;
use crate::error::PopulateError;
use crate::option::{OptionValue, ParsedOption, ValueSource};

/// A successfully resolved command line.
///
/// Created fresh by every parse. Holds the leaf command's definition, the
/// path of command names walked from the root, the options in declaration
/// order, and the positional values.
#[derive(Clone, Debug)]
pub struct CommandLine {
    definition: Arc<CommandDefinition>,
    path: Vec<String>,
    options: Vec<ParsedOption>,
    arguments: Vec<String>,
    argument_source: ValueSource,
}

impl CommandLine {
    pub(crate) const fn new(
        definition: Arc<CommandDefinition>,
        path: Vec<String>,
        options: Vec<ParsedOption>,
        arguments: Vec<String>,
        argument_source: ValueSource,
    ) -> Self {
        Self {
            definition,
            path,
            options,
            arguments,
            argument_source,
        }
    }

    /// The definition of the command that was resolved.
    #[must_use]
    pub fn definition(&self) -> &CommandDefinition {
        &self.definition
    }

    /// The resolved command's name.
    #[must_use]
    pub fn command_name(&self) -> &str {
        self.definition.name()
    }

    /// Canonical command names from the root to the resolved command.
    ///
    /// Aliases typed by the user are reported by their canonical name.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Every resolved option, in declaration order.
    #[must_use]
    pub fn options(&self) -> &[ParsedOption] {
        &self.options
    }

    /// Looks up a resolved option by canonical name.
    #[must_use]
    pub fn option(&self, name: &str) -> Option<&ParsedOption> {
        self.options.iter().find(|o| o.name() == name)
    }

    /// Returns true if the option was given on the line.
    #[must_use]
    pub fn has_option(&self, name: &str) -> bool {
        self.option(name).is_some_and(ParsedOption::is_explicit)
    }

    /// The value of a flag or single-valued option.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.option(name).and_then(|o| o.value().as_str())
    }

    /// The values of a list option; empty if unresolved.
    #[must_use]
    pub fn values(&self, name: &str) -> &[String] {
        match self.option(name).map(ParsedOption::value) {
            Some(OptionValue::List(values)) => values,
            _ => &[],
        }
    }

    /// A single property of a property option.
    #[must_use]
    pub fn property(&self, name: &str, key: &str) -> Option<&str> {
        match self.option(name).map(ParsedOption::value) {
            Some(OptionValue::Properties(map)) => map.get(key).map(String::as_str),
            _ => None,
        }
    }

    /// The state of a flag; false if unknown.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.option(name).is_some_and(|o| o.value().is_true())
    }

    /// Positional values, in order.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// The first positional value.
    #[must_use]
    pub fn argument(&self) -> Option<&str> {
        self.arguments.first().map(String::as_str)
    }

    /// Where the positional values came from.
    #[must_use]
    pub const fn argument_source(&self) -> ValueSource {
        self.argument_source
    }

    /// Converts a single value with [`FromStr`].
    ///
    /// Returns `Ok(None)` when the option has no value.
    ///
    /// # Errors
    ///
    /// Returns a [`PopulateError`] naming the option if conversion fails.
    pub fn parse_value<T>(&self, name: &str) -> Result<Option<T>, PopulateError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let Some(raw) = self.value(name) else {
            return Ok(None);
        };
        raw.parse::<T>()
            .map(Some)
            .map_err(|e| PopulateError::invalid_value(&format!("--{name}"), raw, e))
    }
}
