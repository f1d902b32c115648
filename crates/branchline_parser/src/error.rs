//! Error types for definitions, parsing, validation, and population.
//!
//! Uses `thiserror` for ergonomic error definition. Structural parse errors
//! and validation errors are deliberately separate types: the former are
//! raised by [`parse`](crate::CommandLineParser::parse), the latter only by
//! [`populate_object`](crate::CommandLineParser::populate_object).

use thiserror::Error;

use crate::help::list_names;

/// An invalid command or option declaration, or an invalid parser tree.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DefinitionError {
    /// A command, option, or argument name is empty or malformed.
    #[error("invalid name '{name}': {reason}")]
    InvalidName {
        /// The offending name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Two options of one command share a long or short name.
    #[error("command '{command}' declares option '{option}' more than once")]
    DuplicateOption {
        /// The command being defined.
        command: String,
        /// The repeated option name (`--name` or `-x`).
        option: String,
    },

    /// An alias repeats the command name or another alias.
    #[error("command '{command}' declares alias '{alias}' more than once")]
    DuplicateAlias {
        /// The command being defined.
        command: String,
        /// The repeated alias.
        alias: String,
    },

    /// Two siblings in a parser tree share a name or alias.
    #[error("'{parent}' already has a sub-command named '{name}'")]
    DuplicateChild {
        /// The parent command.
        parent: String,
        /// The clashing name or alias.
        name: String,
    },

    /// A child parser was added to a command that is not a group.
    #[error("'{parent}' is not a group command and cannot have sub-commands")]
    NotAGroup {
        /// The non-group command.
        parent: String,
    },
}

/// A structural error raised while walking a line through the parser tree.
///
/// Every variant aborts the walk; no partial result is retained.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The line contained no tokens.
    #[error("no command given")]
    EmptyLine,

    /// A quote was opened but never closed.
    #[error("unterminated quote starting at byte {position}")]
    UnterminatedQuote {
        /// Byte offset of the opening quote.
        position: usize,
    },

    /// The first token does not name the root command.
    #[error("unknown command '{name}', expected '{expected}'")]
    UnknownCommand {
        /// The token that was given.
        name: String,
        /// The root command's name.
        expected: String,
    },

    /// A token at a group node matched none of its sub-commands.
    #[error("'{token}' is not a sub-command of '{command}'; available commands: {}", list_names(.available))]
    UnknownSubcommand {
        /// The group command.
        command: String,
        /// The unmatched token.
        token: String,
        /// Every child name, in registration order.
        available: Vec<String>,
    },

    /// The line ended at a group node that cannot be invoked directly.
    #[error("'{command}' requires a sub-command; available commands: {}", list_names(.available))]
    MissingSubcommand {
        /// The group command.
        command: String,
        /// Every child name, in registration order.
        available: Vec<String>,
    },

    /// An option-shaped token matched none of the command's options.
    #[error("unknown option '{option}' for '{command}'; valid options: {}", list_names(.available))]
    UnknownOption {
        /// The command being resolved.
        command: String,
        /// The unmatched option as written.
        option: String,
        /// Every valid option of the command, in declaration order.
        available: Vec<String>,
    },

    /// An option token does not follow the option grammar.
    #[error("malformed option '{token}': {reason}")]
    MalformedOption {
        /// The token as written.
        token: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A valued option was followed by nothing or by another option.
    #[error("option '{option}' of '{command}' requires a value")]
    MissingValue {
        /// The command being resolved.
        command: String,
        /// The option display name.
        option: String,
    },

    /// A flag or single-valued option was given more than once.
    #[error("option '{option}' of '{command}' was given more than once")]
    DuplicateOption {
        /// The command being resolved.
        command: String,
        /// The option display name.
        option: String,
    },

    /// A positional token had nowhere to bind.
    #[error("unexpected argument '{token}' for '{command}'")]
    UnexpectedArgument {
        /// The command being resolved.
        command: String,
        /// The extra token.
        token: String,
    },

    /// Required options (and possibly the required argument) were absent.
    ///
    /// Lists every missing item at once, options in declaration order
    /// followed by the argument as `<name>`.
    #[error("missing required options for '{command}': {}", list_names(.missing))]
    MissingRequired {
        /// The command being resolved.
        command: String,
        /// Display names of everything missing.
        missing: Vec<String>,
    },
}

impl ParseError {
    /// Returns true if this error only reports absent required values.
    #[must_use]
    pub fn is_missing_required(&self) -> bool {
        matches!(self, Self::MissingRequired { .. })
    }
}

/// A resolved value failed its validator.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid value for '{target}' of '{command}': {message}")]
pub struct ValidationError {
    /// The command whose value failed.
    pub command: String,
    /// The option (`--name`) or argument (`<name>`) that failed.
    pub target: String,
    /// The validator's message.
    pub message: String,
}

/// Writing a resolved result onto a command instance failed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct PopulateError {
    /// Description of the failure.
    pub message: String,
}

impl PopulateError {
    /// Creates a populate error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Creates an error for a value that could not be converted.
    #[must_use]
    pub fn invalid_value(target: &str, value: &str, reason: impl std::fmt::Display) -> Self {
        Self::new(format!("cannot convert '{value}' for '{target}': {reason}"))
    }
}

/// Any failure of [`populate_object`](crate::CommandLineParser::populate_object).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// The line did not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A validator rejected a value.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The populator failed.
    #[error(transparent)]
    Populate(#[from] PopulateError),
}
