//! Commands every shell starts with: `help`, `echo` and `exit`.

use std::io::Write;

use branchline_parser::{
    ArgumentDefinition, CommandDefinition, CommandLine, CommandLineParser, InvocationContext,
    OptionDefinition, PopulateError,
};

use crate::command::{CommandInvocation, CommandResult, Invocable};
use crate::error::{Error, Result};
use crate::registry::{CommandRegistry, CommandTree};
use crate::terminal::{Color, TerminalString, TextStyle};

/// Registers every built-in command.
///
/// # Errors
///
/// Returns an error if a built-in clashes with an existing command.
pub fn register(registry: &mut CommandRegistry) -> Result<()> {
    registry.register(help()?)?;
    registry.register(echo()?)?;
    registry.register(exit()?)?;
    Ok(())
}

// =============================================================================
// help
// =============================================================================

/// Prints the command list, or help for one command path.
#[derive(Debug)]
pub struct HelpCommand {
    path: Vec<String>,
}

impl HelpCommand {
    fn execute(&mut self, invocation: &mut CommandInvocation<'_>) -> Result<CommandResult> {
        let registry = invocation.registry();

        if self.path.is_empty() {
            let heading = TerminalString::new("Available commands:")
                .with_style(TextStyle::new().bold());
            let heading = invocation.render(&heading);
            invocation.write_line(&heading)?;

            let width = registry
                .commands()
                .iter()
                .map(|c| c.name().len())
                .max()
                .unwrap_or(0);
            for tree in registry.commands() {
                let name = format!("{:<width$}", tree.name());
                let name = invocation.render(&TerminalString::colored(name, Color::Cyan));
                let line = format!("  {name}  {}", tree.definition().description());
                invocation.write_line(line.trim_end())?;
            }
            return Ok(CommandResult::Success);
        }

        let Some(tree) = registry.resolve_path(&self.path) else {
            let available = match self.path.split_last() {
                Some((_, [])) | None => registry.command_names(),
                Some((_, parent)) => registry
                    .resolve_path(parent)
                    .map(CommandTree::child_names)
                    .unwrap_or_default(),
            };
            return Err(Error::UnknownCommand {
                name: self.path.join(" "),
                available,
            });
        };

        write!(invocation.out(), "{}", tree.print_help())?;
        Ok(CommandResult::Success)
    }
}

fn help() -> Result<CommandTree> {
    let definition = CommandDefinition::builder("help")
        .description("Show available commands, or help for one command")
        .argument(
            ArgumentDefinition::multiple("command")
                .description("Command path, for example: help deploy start"),
        )
        .build()?;

    Ok(CommandLineParser::new(definition).with_populator(
        |target: &mut Invocable, line: &CommandLine, _: &InvocationContext| {
            let mut command = HelpCommand {
                path: line.arguments().to_vec(),
            };
            *target = Some(Box::new(move |inv: &mut CommandInvocation<'_>| {
                command.execute(inv)
            }));
            Ok::<(), PopulateError>(())
        },
    ))
}

// =============================================================================
// echo
// =============================================================================

/// Writes its arguments separated by spaces.
#[derive(Debug)]
pub struct EchoCommand {
    words: Vec<String>,
    newline: bool,
}

impl EchoCommand {
    fn execute(&self, invocation: &mut CommandInvocation<'_>) -> Result<CommandResult> {
        let text = self.words.join(" ");
        if self.newline {
            invocation.write_line(&text)?;
        } else {
            write!(invocation.out(), "{text}")?;
            invocation.out().flush()?;
        }
        Ok(CommandResult::Success)
    }
}

fn echo() -> Result<CommandTree> {
    let definition = CommandDefinition::builder("echo")
        .description("Print the arguments")
        .option(
            OptionDefinition::flag("no-newline")
                .short('n')
                .description("Do not print the trailing newline"),
        )
        .argument(ArgumentDefinition::multiple("words"))
        .build()?;

    Ok(CommandLineParser::new(definition).with_populator(
        |target: &mut Invocable, line: &CommandLine, _: &InvocationContext| {
            let command = EchoCommand {
                words: line.arguments().to_vec(),
                newline: !line.flag("no-newline"),
            };
            *target = Some(Box::new(move |inv: &mut CommandInvocation<'_>| {
                command.execute(inv)
            }));
            Ok::<(), PopulateError>(())
        },
    ))
}

// =============================================================================
// exit
// =============================================================================

fn exit() -> Result<CommandTree> {
    let definition = CommandDefinition::builder("exit")
        .alias("quit")
        .description("Leave the shell")
        .build()?;

    Ok(CommandLineParser::new(definition).with_populator(
        |target: &mut Invocable, _: &CommandLine, _: &InvocationContext| {
            *target = Some(Box::new(|_: &mut CommandInvocation<'_>| {
                Ok::<_, Error>(CommandResult::Exit)
            }));
            Ok::<(), PopulateError>(())
        },
    ))
}
