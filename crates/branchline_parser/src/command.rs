//! Command and argument definitions.
//!
//! Definitions are built once from static metadata and never mutated.
//! [`CommandBuilder::build`] rejects malformed names and repeated options,
//! so every definition a parser sees is internally consistent.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::error::DefinitionError;
use crate::option::{OptionArity, OptionDefinition};
use crate::validator::OptionValidator;

/// The positional-argument slot of a command.
#[derive(Clone)]
pub struct ArgumentDefinition {
    name: String,
    description: String,
    multiple: bool,
    required: bool,
    defaults: Vec<String>,
    validator: Option<Arc<dyn OptionValidator>>,
}

impl ArgumentDefinition {
    fn new(name: impl Into<String>, multiple: bool) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            multiple,
            required: false,
            defaults: Vec::new(),
            validator: None,
        }
    }

    /// A slot accepting exactly one positional value.
    #[must_use]
    pub fn single(name: impl Into<String>) -> Self {
        Self::new(name, false)
    }

    /// A slot accepting any number of positional values.
    #[must_use]
    pub fn multiple(name: impl Into<String>) -> Self {
        Self::new(name, true)
    }

    /// Sets the description shown in help.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Marks the argument as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the values used when no positional token is given.
    #[must_use]
    pub fn default_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.defaults = values.into_iter().map(Into::into).collect();
        self
    }

    /// Attaches a validator.
    #[must_use]
    pub fn validator(mut self, validator: impl OptionValidator + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// The argument name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The description.
    #[must_use]
    pub fn description_text(&self) -> &str {
        &self.description
    }

    /// Whether more than one value is accepted.
    #[must_use]
    pub const fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// Whether at least one value is required.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// The declared defaults.
    #[must_use]
    pub fn defaults(&self) -> &[String] {
        &self.defaults
    }

    /// The attached validator, if any.
    #[must_use]
    pub fn argument_validator(&self) -> Option<&dyn OptionValidator> {
        self.validator.as_deref()
    }

    /// `<name>`, or `<name>...` for multiple values.
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.multiple {
            format!("<{}>...", self.name)
        } else {
            format!("<{}>", self.name)
        }
    }
}

impl fmt::Debug for ArgumentDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentDefinition")
            .field("name", &self.name)
            .field("multiple", &self.multiple)
            .field("required", &self.required)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

/// The immutable declaration of one command.
#[derive(Clone, Debug)]
pub struct CommandDefinition {
    name: String,
    aliases: Vec<String>,
    description: String,
    options: Vec<Arc<OptionDefinition>>,
    argument: Option<Arc<ArgumentDefinition>>,
    group: bool,
    invocable: bool,
}

impl CommandDefinition {
    /// Starts building a command definition.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> CommandBuilder {
        CommandBuilder::new(name)
    }

    /// The command name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Alternative names.
    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// The description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Options in declaration order.
    #[must_use]
    pub fn options(&self) -> &[Arc<OptionDefinition>] {
        &self.options
    }

    /// The positional slot, if declared.
    #[must_use]
    pub fn argument(&self) -> Option<&ArgumentDefinition> {
        self.argument.as_deref()
    }

    /// Whether this command routes to sub-commands.
    #[must_use]
    pub const fn is_group(&self) -> bool {
        self.group
    }

    /// Whether a group may run without a sub-command.
    #[must_use]
    pub const fn is_invocable(&self) -> bool {
        self.invocable
    }

    /// Returns true if `word` is the name or an alias.
    #[must_use]
    pub fn matches(&self, word: &str) -> bool {
        self.name == word || self.aliases.iter().any(|a| a == word)
    }

    /// The name followed by every alias.
    #[must_use]
    pub fn all_names(&self) -> Vec<String> {
        std::iter::once(self.name.clone())
            .chain(self.aliases.iter().cloned())
            .collect()
    }

    /// Finds an option by its long name (without dashes).
    #[must_use]
    pub fn find_long(&self, name: &str) -> Option<&Arc<OptionDefinition>> {
        self.position_long(name).map(|i| &self.options[i])
    }

    /// Finds an option by its short name.
    #[must_use]
    pub fn find_short(&self, short: char) -> Option<&Arc<OptionDefinition>> {
        self.position_short(short).map(|i| &self.options[i])
    }

    /// Declaration index of the option with this long name.
    #[must_use]
    pub fn position_long(&self, name: &str) -> Option<usize> {
        self.options.iter().position(|o| o.name() == name)
    }

    /// Declaration index of the option with this short name.
    #[must_use]
    pub fn position_short(&self, short: char) -> Option<usize> {
        self.options.iter().position(|o| o.short_name() == Some(short))
    }

    /// Every option's long form, in declaration order.
    #[must_use]
    pub fn option_names(&self) -> Vec<String> {
        self.options.iter().map(|o| o.long_form()).collect()
    }
}

/// Builder for [`CommandDefinition`].
#[derive(Debug)]
pub struct CommandBuilder {
    name: String,
    aliases: Vec<String>,
    description: String,
    options: Vec<OptionDefinition>,
    argument: Option<ArgumentDefinition>,
    group: bool,
    invocable: bool,
}

impl CommandBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: String::new(),
            options: Vec::new(),
            argument: None,
            group: false,
            invocable: false,
        }
    }

    /// Adds an alias.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends an option; declaration order is preserved.
    #[must_use]
    pub fn option(mut self, option: OptionDefinition) -> Self {
        self.options.push(option);
        self
    }

    /// Declares the positional slot.
    #[must_use]
    pub fn argument(mut self, argument: ArgumentDefinition) -> Self {
        self.argument = Some(argument);
        self
    }

    /// Marks the command as a group of sub-commands.
    #[must_use]
    pub fn group(mut self) -> Self {
        self.group = true;
        self
    }

    /// Lets a group run without a sub-command.
    #[must_use]
    pub fn invocable(mut self) -> Self {
        self.invocable = true;
        self
    }

    /// Validates and builds the definition.
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] for malformed names, repeated
    /// aliases, or options sharing a long or short name.
    pub fn build(self) -> Result<CommandDefinition, DefinitionError> {
        check_word(&self.name)?;

        let mut seen_names = HashSet::from([self.name.as_str()]);
        for alias in &self.aliases {
            check_word(alias)?;
            if !seen_names.insert(alias.as_str()) {
                return Err(DefinitionError::DuplicateAlias {
                    command: self.name.clone(),
                    alias: alias.clone(),
                });
            }
        }

        let mut longs = HashSet::new();
        let mut shorts = HashSet::new();
        for option in &self.options {
            check_option_name(option)?;
            if !longs.insert(option.name()) {
                return Err(DefinitionError::DuplicateOption {
                    command: self.name.clone(),
                    option: option.long_form(),
                });
            }
            if let Some(short) = option.short_name() {
                if !shorts.insert(short) {
                    return Err(DefinitionError::DuplicateOption {
                        command: self.name.clone(),
                        option: format!("-{short}"),
                    });
                }
            }
        }

        if let Some(argument) = &self.argument {
            check_word(argument.name())?;
        }

        Ok(CommandDefinition {
            name: self.name,
            aliases: self.aliases,
            description: self.description,
            options: self.options.into_iter().map(Arc::new).collect(),
            argument: self.argument.map(Arc::new),
            group: self.group,
            invocable: self.invocable,
        })
    }
}

fn check_word(name: &str) -> Result<(), DefinitionError> {
    let reason = if name.is_empty() {
        "must not be empty"
    } else if name.chars().any(char::is_whitespace) {
        "must not contain whitespace"
    } else if name.starts_with('-') {
        "must not start with '-'"
    } else {
        return Ok(());
    };
    Err(DefinitionError::InvalidName {
        name: name.to_string(),
        reason,
    })
}

fn check_option_name(option: &OptionDefinition) -> Result<(), DefinitionError> {
    check_word(option.name())?;
    if option.name().contains('=') {
        return Err(DefinitionError::InvalidName {
            name: option.name().to_string(),
            reason: "must not contain '='",
        });
    }
    if let Some(short) = option.short_name() {
        if !short.is_alphanumeric() {
            return Err(DefinitionError::InvalidName {
                name: short.to_string(),
                reason: "short names must be alphanumeric",
            });
        }
        // `-1` reads as a negative number
        if short.is_ascii_digit() {
            return Err(DefinitionError::InvalidName {
                name: short.to_string(),
                reason: "short names must not be digits",
            });
        }
    }
    if option.arity() == OptionArity::Flag && option.defaults().len() > 1 {
        return Err(DefinitionError::InvalidName {
            name: option.name().to_string(),
            reason: "a flag takes at most one default",
        });
    }
    Ok(())
}
