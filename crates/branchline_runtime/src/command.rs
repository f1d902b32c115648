//! Executable commands.
//!
//! Populators build a [`Command`] from a resolved command line; the shell
//! then executes it with a [`CommandInvocation`] giving access to the
//! output stream, the registry and the configuration.

use std::io::Write;

use branchline_parser::CommandLine;

use crate::config::ShellConfig;
use crate::error::Result;
use crate::registry::CommandRegistry;
use crate::terminal::TerminalString;

/// Outcome of executing a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandResult {
    /// The command completed.
    Success,
    /// The command ran but reported failure.
    Failure,
    /// The shell should stop reading input.
    Exit,
}

/// Everything a command can reach while executing.
pub struct CommandInvocation<'a> {
    command_line: &'a CommandLine,
    registry: &'a CommandRegistry,
    config: &'a ShellConfig,
    out: &'a mut dyn Write,
}

impl<'a> CommandInvocation<'a> {
    /// Creates an invocation.
    pub fn new(
        command_line: &'a CommandLine,
        registry: &'a CommandRegistry,
        config: &'a ShellConfig,
        out: &'a mut dyn Write,
    ) -> Self {
        Self {
            command_line,
            registry,
            config,
            out,
        }
    }

    /// The line that produced this command.
    #[must_use]
    pub const fn command_line(&self) -> &'a CommandLine {
        self.command_line
    }

    /// The registry the command was found in.
    #[must_use]
    pub const fn registry(&self) -> &'a CommandRegistry {
        self.registry
    }

    /// The running shell's configuration.
    #[must_use]
    pub const fn config(&self) -> &'a ShellConfig {
        self.config
    }

    /// The output stream.
    pub fn out(&mut self) -> &mut dyn Write {
        &mut *self.out
    }

    /// Writes `text` followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the output stream fails.
    pub fn write_line(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}")?;
        Ok(())
    }

    /// Renders styled text honoring the color setting.
    #[must_use]
    pub fn render(&self, text: &TerminalString) -> String {
        text.render(self.config.color)
    }
}

/// A populated command, ready to run.
///
/// Closures taking a [`CommandInvocation`] implement this trait.
pub trait Command {
    /// Runs the command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot complete.
    fn execute(&mut self, invocation: &mut CommandInvocation<'_>) -> Result<CommandResult>;
}

impl<F> Command for F
where
    F: FnMut(&mut CommandInvocation<'_>) -> Result<CommandResult>,
{
    fn execute(&mut self, invocation: &mut CommandInvocation<'_>) -> Result<CommandResult> {
        self(invocation)
    }
}

/// The target type populators write into.
pub type Invocable = Option<Box<dyn Command>>;
