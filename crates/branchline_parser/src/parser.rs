//! The command line parser tree.
//!
//! A [`CommandLineParser`] wraps one [`CommandDefinition`] and owns its
//! sub-command parsers. Parsing is a depth-first walk driven by token
//! lookahead:
//!
//! ```text
//! "deploy start --env prod"
//!     │
//!     ▼
//! ┌──────────────┐
//! │ TOKENIZER    │  → ["deploy", "start", "--env", "prod"]
//! └──────────────┘
//!     │
//!     ▼
//! ┌──────────────┐
//! │ ROUTING      │  deploy (group) → start (leaf)
//! └──────────────┘
//!     │
//!     ▼
//! ┌──────────────┐
//! │ OPTIONS      │  --env = "prod", --force = false (implicit)
//! └──────────────┘
//!     │
//!     ▼
//! CommandLine { path: [deploy, start], ... }
//! ```
//!
//! The walk keeps all of its state on the stack, so a tree can be shared
//! between threads and parsed concurrently through `&self`.

use std::fmt;
use std::sync::Arc;

use crate::command::CommandDefinition;
use crate::command_line::CommandLine;
use crate::completion::CompletionView;
use crate::context::InvocationContext;
use crate::error::{CommandError, DefinitionError, ParseError, PopulateError};
use crate::help::HelpFormatter;
use crate::populator::CommandPopulator;
use crate::resolve::{OptionResolver, looks_like_option};
use crate::tokenizer::{LineTokenizer, TokenIterator};
use crate::validator::CommandValidator;

/// A node of the parser tree.
///
/// `C` is the type of command instance the tree's populators write into.
pub struct CommandLineParser<C> {
    definition: Arc<CommandDefinition>,
    children: Vec<CommandLineParser<C>>,
    populator: Option<Box<dyn CommandPopulator<C>>>,
}

impl<C> CommandLineParser<C> {
    /// Creates a parser with no children and no populator.
    #[must_use]
    pub fn new(definition: CommandDefinition) -> Self {
        Self {
            definition: Arc::new(definition),
            children: Vec::new(),
            populator: None,
        }
    }

    /// Sets the populator used when this node is the resolved leaf.
    #[must_use]
    pub fn with_populator(mut self, populator: impl CommandPopulator<C> + 'static) -> Self {
        self.populator = Some(Box::new(populator));
        self
    }

    /// Adds a sub-command parser, returning the tree.
    ///
    /// # Errors
    ///
    /// See [`add_child`](Self::add_child).
    pub fn with_child(mut self, child: Self) -> Result<Self, DefinitionError> {
        self.add_child(child)?;
        Ok(self)
    }

    /// Adds a sub-command parser.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::NotAGroup`] if this command is not a group,
    /// or [`DefinitionError::DuplicateChild`] if any of the child's names or
    /// aliases is already used by a sibling.
    pub fn add_child(&mut self, child: Self) -> Result<(), DefinitionError> {
        if !self.definition.is_group() {
            return Err(DefinitionError::NotAGroup {
                parent: self.definition.name().to_string(),
            });
        }
        for name in child.definition.all_names() {
            if self.children.iter().any(|c| c.definition.matches(&name)) {
                return Err(DefinitionError::DuplicateChild {
                    parent: self.definition.name().to_string(),
                    name,
                });
            }
        }
        self.children.push(child);
        Ok(())
    }

    /// The definition this parser is built from.
    #[must_use]
    pub fn definition(&self) -> &CommandDefinition {
        &self.definition
    }

    /// The command name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.definition.name()
    }

    /// The command name followed by its aliases.
    #[must_use]
    pub fn all_names(&self) -> Vec<String> {
        self.definition.all_names()
    }

    /// Whether this node routes to sub-commands.
    #[must_use]
    pub fn is_group_command(&self) -> bool {
        self.definition.is_group()
    }

    /// Whether a populator is attached.
    #[must_use]
    pub fn has_populator(&self) -> bool {
        self.populator.is_some()
    }

    /// Sub-command parsers in registration order.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Sub-command names in registration order.
    #[must_use]
    pub fn child_names(&self) -> Vec<String> {
        self.children.iter().map(|c| c.name().to_string()).collect()
    }

    /// Finds a sub-command by exact name, then by alias.
    #[must_use]
    pub fn child_parser(&self, name: &str) -> Option<&Self> {
        self.children
            .iter()
            .find(|c| c.definition.name() == name)
            .or_else(|| {
                self.children
                    .iter()
                    .find(|c| c.definition.aliases().iter().any(|a| a == name))
            })
    }

    /// Follows a path of canonical names starting with this node's name.
    #[must_use]
    pub fn child_at_path(&self, path: &[String]) -> Option<&Self> {
        let (first, rest) = path.split_first()?;
        if first != self.name() {
            return None;
        }
        rest.iter()
            .try_fold(self, |node, name| node.child_parser(name))
    }

    /// The most specific node reached by a parse of this tree.
    #[must_use]
    pub fn resolved_leaf(&self, line: &CommandLine) -> Option<&Self> {
        self.child_at_path(line.path())
    }

    /// Parses a line, enforcing required options.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for any structural problem, including
    /// missing required options.
    pub fn parse(&self, line: &str) -> Result<CommandLine, ParseError> {
        self.parse_with(line, false)
    }

    /// Parses a line, optionally skipping only the required-option check.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for any structural problem. With
    /// `ignore_requirements` set, missing required values are not an error.
    pub fn parse_with(
        &self,
        line: &str,
        ignore_requirements: bool,
    ) -> Result<CommandLine, ParseError> {
        let parsed = LineTokenizer::tokenize(line)?;
        let mut iter = parsed.iter();
        self.parse_tokens(&mut iter, ignore_requirements)
    }

    /// Parses from an iterator whose next token names this command.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for any structural problem.
    pub fn parse_tokens(
        &self,
        iter: &mut TokenIterator<'_>,
        ignore_requirements: bool,
    ) -> Result<CommandLine, ParseError> {
        let first = iter.next().ok_or(ParseError::EmptyLine)?;
        if !self.definition.matches(first.value()) {
            return Err(ParseError::UnknownCommand {
                name: first.value().to_string(),
                expected: self.name().to_string(),
            });
        }
        self.walk(iter, ignore_requirements, Vec::new())
    }

    fn walk(
        &self,
        iter: &mut TokenIterator<'_>,
        ignore_requirements: bool,
        mut path: Vec<String>,
    ) -> Result<CommandLine, ParseError> {
        path.push(self.name().to_string());

        if self.is_group_command() && !self.children.is_empty() {
            match iter.peek() {
                Some(token) if !looks_like_option(token) => {
                    let Some(child) = self.child_parser(token.value()) else {
                        tracing::debug!(command = self.name(), token = token.value(), "unknown sub-command");
                        return Err(ParseError::UnknownSubcommand {
                            command: self.name().to_string(),
                            token: token.value().to_string(),
                            available: self.child_names(),
                        });
                    };
                    tracing::debug!(from = self.name(), to = child.name(), "routing to sub-command");
                    iter.next();
                    return child.walk(iter, ignore_requirements, path);
                }
                None if !self.definition.is_invocable() => {
                    return Err(ParseError::MissingSubcommand {
                        command: self.name().to_string(),
                        available: self.child_names(),
                    });
                }
                _ => {}
            }
        }

        OptionResolver::new(&self.definition, self.child_names()).resolve(
            iter,
            ignore_requirements,
            path,
        )
    }

    /// Parses with requirements enforced, optionally validates, then
    /// populates `target` through the resolved leaf's populator.
    ///
    /// Required options are checked all at once, but validators stop at
    /// the first failure, and nothing is populated after a failure.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Parse`] for structural problems,
    /// [`CommandError::Validation`] for the first rejected value, and
    /// [`CommandError::Populate`] if population fails or the resolved
    /// command has no populator.
    pub fn populate_object(
        &self,
        line: &str,
        target: &mut C,
        ctx: &InvocationContext,
        validate: bool,
    ) -> Result<CommandLine, CommandError> {
        let command_line = self.parse(line)?;

        if validate {
            CommandValidator::validate(&command_line, ctx)?;
        }

        let populator = self
            .resolved_leaf(&command_line)
            .and_then(|leaf| leaf.populator.as_deref())
            .ok_or_else(|| {
                PopulateError::new(format!(
                    "no populator registered for '{}'",
                    command_line.path().join(" ")
                ))
            })?;
        populator.populate(target, &command_line, ctx)?;

        Ok(command_line)
    }

    /// Usage text for this node.
    #[must_use]
    pub fn print_help(&self) -> String {
        HelpFormatter::render(&self.definition, &self.child_names())
    }

    /// A read-only completion view rooted at this node.
    #[must_use]
    pub fn completion(&self) -> CompletionView<'_, C> {
        CompletionView::new(self)
    }
}

impl<C> fmt::Debug for CommandLineParser<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandLineParser")
            .field("name", &self.definition.name())
            .field("children", &self.children)
            .field("populator", &self.populator.is_some())
            .finish()
    }
}
