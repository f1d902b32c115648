//! The set of top-level commands a shell knows.

use branchline_parser::{
    CommandError, CommandLineParser, Completion, LineTokenizer, ParseError,
};

use crate::builtins;
use crate::command::Invocable;
use crate::error::{Error, Result};

/// A parser tree whose populators produce executable commands.
pub type CommandTree = CommandLineParser<Invocable>;

/// Top-level command trees, keyed by name and alias.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<CommandTree>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in commands.
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in definition is invalid.
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new();
        builtins::register(&mut registry)?;
        Ok(registry)
    }

    /// Adds a command tree, returning the registry.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    pub fn with(mut self, tree: CommandTree) -> Result<Self> {
        self.register(tree)?;
        Ok(self)
    }

    /// Adds a command tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateCommand`] if the tree's name or any alias
    /// is already taken.
    pub fn register(&mut self, tree: CommandTree) -> Result<()> {
        for name in tree.all_names() {
            if self.commands.iter().any(|c| c.definition().matches(&name)) {
                return Err(Error::DuplicateCommand(name));
            }
        }
        tracing::debug!(command = tree.name(), "registered command");
        self.commands.push(tree);
        Ok(())
    }

    /// Finds a command by exact name, then by alias.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CommandTree> {
        self.commands
            .iter()
            .find(|c| c.name() == name)
            .or_else(|| {
                self.commands
                    .iter()
                    .find(|c| c.definition().aliases().iter().any(|a| a == name))
            })
    }

    /// Follows a path of names or aliases from a top-level command.
    #[must_use]
    pub fn resolve_path(&self, path: &[String]) -> Option<&CommandTree> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.get(first)?, |node, name| node.child_parser(name))
    }

    /// Finds the tree that should parse `line`.
    ///
    /// # Errors
    ///
    /// Returns a parse error for an empty line or unterminated quote, and
    /// [`Error::UnknownCommand`] if the first word names no command.
    pub fn lookup(&self, line: &str) -> Result<&CommandTree> {
        let parsed = LineTokenizer::tokenize(line).map_err(CommandError::from)?;
        let first = parsed
            .tokens()
            .first()
            .ok_or(CommandError::Parse(ParseError::EmptyLine))?;
        self.get(first.value()).ok_or_else(|| Error::UnknownCommand {
            name: first.value().to_string(),
            available: self.command_names(),
        })
    }

    /// Canonical command names in registration order.
    #[must_use]
    pub fn command_names(&self) -> Vec<String> {
        self.commands.iter().map(|c| c.name().to_string()).collect()
    }

    /// Every name and alias in registration order.
    #[must_use]
    pub fn all_names(&self) -> Vec<String> {
        self.commands.iter().flat_map(CommandTree::all_names).collect()
    }

    /// The registered trees.
    #[must_use]
    pub fn commands(&self) -> &[CommandTree] {
        &self.commands
    }

    /// Number of registered commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Completion candidates for the word under `cursor`.
    ///
    /// The first word completes against every registered name; later
    /// words are delegated to the matching tree's completion view.
    #[must_use]
    pub fn complete(&self, line: &str, cursor: usize) -> Completion {
        let mut cursor = cursor.min(line.len());
        while !line.is_char_boundary(cursor) {
            cursor -= 1;
        }

        let parsed = LineTokenizer::tokenize_lenient(&line[..cursor]);
        match parsed.tokens() {
            [] => Completion {
                start: cursor,
                candidates: self.all_names(),
            },
            [word] if !parsed.ends_with_space() => Completion {
                start: word.offset(),
                candidates: self
                    .all_names()
                    .into_iter()
                    .filter(|name| name.starts_with(word.value()))
                    .collect(),
            },
            [first, ..] => match self.get(first.value()) {
                Some(tree) => tree.completion().complete(line, cursor),
                None => Completion {
                    start: cursor,
                    candidates: Vec::new(),
                },
            },
        }
    }
}
