//! The interactive shell loop.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use branchline_parser::InvocationContext;

use crate::command::{CommandInvocation, CommandResult, Invocable};
use crate::config::ShellConfig;
use crate::editor::{LineEditor, ReadResult, RustylineEditor};
use crate::error::{Error, Result};
use crate::registry::CommandRegistry;
use crate::terminal::{Color, TerminalString, TextStyle};

/// Reads lines, resolves them against a registry, and runs the commands.
pub struct Shell<E: LineEditor = RustylineEditor> {
    /// The line editor for input.
    editor: E,

    /// Commands this shell can run.
    registry: Arc<CommandRegistry>,

    /// Prompt, styling and validation settings.
    config: ShellConfig,

    /// Providers handed to validators and populators.
    context: InvocationContext,

    /// Where command output goes.
    output: Box<dyn Write>,

    /// Where errors go.
    errors: Box<dyn Write>,
}

impl Shell<RustylineEditor> {
    /// Creates a shell with the default rustyline editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new(registry: CommandRegistry, config: ShellConfig) -> Result<Self> {
        let registry = Arc::new(registry);
        let editor = RustylineEditor::new(Arc::clone(&registry), &config)?;
        Ok(Self::from_parts(editor, registry, config))
    }
}

impl<E: LineEditor> Shell<E> {
    /// Creates a shell with the given editor.
    pub fn with_editor(editor: E, registry: CommandRegistry, config: ShellConfig) -> Self {
        Self::from_parts(editor, Arc::new(registry), config)
    }

    fn from_parts(editor: E, registry: Arc<CommandRegistry>, config: ShellConfig) -> Self {
        let context = InvocationContext::new().with(config.clone());
        Self {
            editor,
            registry,
            config,
            context,
            output: Box::new(io::stdout()),
            errors: Box::new(io::stderr()),
        }
    }

    /// Redirects command output.
    #[must_use]
    pub fn with_output(mut self, output: impl Write + 'static) -> Self {
        self.output = Box::new(output);
        self
    }

    /// Redirects error output.
    #[must_use]
    pub fn with_errors(mut self, errors: impl Write + 'static) -> Self {
        self.errors = Box::new(errors);
        self
    }

    /// Adds a provider for validators and populators.
    #[must_use]
    pub fn with_provider<T: std::any::Any + Send + Sync>(mut self, provider: T) -> Self {
        self.context.insert(provider);
        self
    }

    /// The commands this shell runs.
    #[must_use]
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Runs the shell loop until `exit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails. Command
    /// errors are printed and the loop continues.
    pub fn run(&mut self) -> Result<()> {
        if self.config.show_banner {
            self.print_banner()?;
        }

        loop {
            let line = match self.editor.read_line(&self.config.prompt)? {
                ReadResult::Line(line) => line,
                ReadResult::Interrupted => continue,
                ReadResult::Eof => break,
            };

            if !line.trim().is_empty() {
                self.editor.add_history(&line);
            }

            match self.run_line(&line) {
                Ok(CommandResult::Exit) => break,
                Ok(_) => {}
                Err(e) => self.print_error(&e)?,
            }
        }

        self.output.flush()?;
        Ok(())
    }

    /// Parses, validates, populates and executes one line.
    ///
    /// Blank lines and lines starting with `#` succeed without doing
    /// anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the line does not resolve to a command or the
    /// command fails.
    pub fn run_line(&mut self, line: &str) -> Result<CommandResult> {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(CommandResult::Success);
        }

        let registry = Arc::clone(&self.registry);
        let tree = registry.lookup(line)?;

        let mut target: Invocable = None;
        let command_line =
            tree.populate_object(line, &mut target, &self.context, self.config.validate)?;
        let mut command = target.ok_or_else(|| Error::NothingToRun(command_line.path().join(" ")))?;

        tracing::debug!(command = %command_line.path().join(" "), "executing");
        let mut invocation =
            CommandInvocation::new(&command_line, &registry, &self.config, &mut *self.output);
        command.execute(&mut invocation)
    }

    /// Runs every line of a script file.
    ///
    /// Stops at `exit` or at the first failing line. Returns
    /// [`CommandResult::Failure`] if any command reported failure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Script`] if the file cannot be read, and
    /// [`Error::ScriptLine`] naming the line that failed.
    pub fn run_script(&mut self, path: &Path) -> Result<CommandResult> {
        let source = fs::read_to_string(path).map_err(|source| Error::Script {
            path: path.to_path_buf(),
            source,
        })?;

        let mut outcome = CommandResult::Success;
        for (index, line) in source.lines().enumerate() {
            match self.run_line(line) {
                Ok(CommandResult::Exit) => return Ok(CommandResult::Exit),
                Ok(CommandResult::Failure) => outcome = CommandResult::Failure,
                Ok(CommandResult::Success) => {}
                Err(e) => {
                    return Err(Error::ScriptLine {
                        path: path.to_path_buf(),
                        line: index + 1,
                        source: Box::new(e),
                    });
                }
            }
        }

        self.output.flush()?;
        Ok(outcome)
    }

    /// Prints an error to the error stream.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the error stream fails.
    pub fn print_error(&mut self, error: &Error) -> Result<()> {
        let text = TerminalString::colored(format!("Error: {error}"), Color::Red);
        writeln!(self.errors, "{}", text.render(self.config.color))?;
        Ok(())
    }

    /// Prints the welcome banner.
    fn print_banner(&mut self) -> Result<()> {
        let title = TerminalString::colored(
            format!("branchline {}", env!("CARGO_PKG_VERSION")),
            Color::Cyan,
        )
        .with_style(TextStyle::new().bold());
        writeln!(self.output, "{}", title.render(self.config.color))?;
        writeln!(
            self.output,
            "Type 'help' for a list of commands. Use Ctrl+D to exit.\n"
        )?;
        self.output.flush()?;
        Ok(())
    }
}
