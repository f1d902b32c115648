//! Interactive shell runtime for Branchline.
//!
//! This crate provides:
//! - [`Shell`] - read, resolve and execute loop over a [`CommandRegistry`]
//! - [`LineEditor`] with a rustyline implementation that completes and
//!   highlights against the registry
//! - [`TerminalString`] - ANSI-styled text for help and error output
//! - Built-in `help`, `echo` and `exit` commands
//! - Logging setup for the `branchline` binary

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod builtins;
pub mod command;
pub mod config;
pub mod editor;
pub mod error;
pub mod highlight;
pub mod logging;
pub mod registry;
pub mod shell;
pub mod terminal;

pub use command::{Command, CommandInvocation, CommandResult, Invocable};
pub use config::ShellConfig;
pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use error::{Error, Result};
pub use highlight::CommandHighlighter;
pub use registry::{CommandRegistry, CommandTree};
pub use shell::Shell;
pub use terminal::{Color, TerminalString, TextStyle, render_line};
