//! Error types for the shell runtime.

use std::io;
use std::path::PathBuf;

use branchline_parser::help::list_names;
use branchline_parser::{CommandError, DefinitionError};
use thiserror::Error;

/// Result alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while assembling or running a shell.
#[derive(Debug, Error)]
pub enum Error {
    /// A line failed to parse, validate, or populate.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// A command tree was declared incorrectly.
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// The first word of a line names no registered command.
    #[error("unknown command '{name}'; available commands: {}", list_names(.available))]
    UnknownCommand {
        /// The word that was typed.
        name: String,
        /// Registered command names.
        available: Vec<String>,
    },

    /// Two registered commands share a name or alias.
    #[error("command name '{0}' is already registered")]
    DuplicateCommand(String),

    /// A populator ran but left nothing to execute.
    #[error("'{0}' did not produce a command to run")]
    NothingToRun(String),

    /// A command failed while executing.
    #[error("{0}")]
    Execution(String),

    /// A script file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Script {
        /// The script path.
        path: PathBuf,
        /// The underlying I/O failure.
        source: io::Error,
    },

    /// A script line failed.
    #[error("{}:{line}: {source}", path.display())]
    ScriptLine {
        /// The script path.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// What went wrong on that line.
        source: Box<Error>,
    },

    /// The line editor failed.
    #[error("line editor error: {0}")]
    Editor(String),

    /// A log filter could not be parsed or installed.
    #[error("invalid log filter '{filter}': {reason}")]
    LogFilter {
        /// The filter directives as given.
        filter: String,
        /// Why they were rejected.
        reason: String,
    },

    /// Writing output failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Creates an execution error.
    #[must_use]
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }
}

impl From<rustyline::error::ReadlineError> for Error {
    fn from(error: rustyline::error::ReadlineError) -> Self {
        Self::Editor(error.to_string())
    }
}
