//! Option definitions and resolved option values.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::validator::OptionValidator;

/// How many values an option takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionArity {
    /// No value; present means `true`.
    Flag,
    /// Exactly one value.
    Single,
    /// One or more values.
    List,
    /// `key=value` pairs, as in `-Dkey=value`.
    Properties,
}

impl OptionArity {
    /// Returns true if the option consumes a value.
    #[must_use]
    pub const fn takes_value(self) -> bool {
        !matches!(self, Self::Flag)
    }
}

/// The immutable declaration of one option.
#[derive(Clone)]
pub struct OptionDefinition {
    name: String,
    short: Option<char>,
    description: String,
    arity: OptionArity,
    required: bool,
    overrides_required: bool,
    defaults: Vec<String>,
    separator: char,
    value_name: Option<String>,
    validator: Option<Arc<dyn OptionValidator>>,
}

impl OptionDefinition {
    fn new(name: impl Into<String>, arity: OptionArity) -> Self {
        Self {
            name: name.into(),
            short: None,
            description: String::new(),
            arity,
            required: false,
            overrides_required: false,
            defaults: Vec::new(),
            separator: ',',
            value_name: None,
            validator: None,
        }
    }

    /// Declares a flag, e.g. `--force`.
    #[must_use]
    pub fn flag(name: impl Into<String>) -> Self {
        Self::new(name, OptionArity::Flag)
    }

    /// Declares a single-valued option, e.g. `--env prod`.
    #[must_use]
    pub fn single(name: impl Into<String>) -> Self {
        Self::new(name, OptionArity::Single)
    }

    /// Declares a list-valued option, e.g. `--tags a b` or `--tags a,b`.
    #[must_use]
    pub fn list(name: impl Into<String>) -> Self {
        Self::new(name, OptionArity::List)
    }

    /// Declares a property option, e.g. `-Dkey=value`.
    #[must_use]
    pub fn properties(name: impl Into<String>) -> Self {
        Self::new(name, OptionArity::Properties)
    }

    /// Sets the short name.
    #[must_use]
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Sets the description shown in help.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Marks the option as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// When given explicitly, the required check is skipped (e.g. `--help`).
    #[must_use]
    pub fn overrides_required(mut self) -> Self {
        self.overrides_required = true;
        self
    }

    /// Sets a single default value.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.defaults = vec![value.into()];
        self
    }

    /// Sets several default values (for list options).
    #[must_use]
    pub fn default_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.defaults = values.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the separator used to split list values.
    #[must_use]
    pub fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Sets the placeholder shown in help (`<value>` by default).
    #[must_use]
    pub fn value_name(mut self, value_name: impl Into<String>) -> Self {
        self.value_name = Some(value_name.into());
        self
    }

    /// Attaches a validator run during validated population.
    #[must_use]
    pub fn validator(mut self, validator: impl OptionValidator + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// The canonical (long) name, without dashes.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The short name, if any.
    #[must_use]
    pub const fn short_name(&self) -> Option<char> {
        self.short
    }

    /// The description.
    #[must_use]
    pub fn description_text(&self) -> &str {
        &self.description
    }

    /// The arity.
    #[must_use]
    pub const fn arity(&self) -> OptionArity {
        self.arity
    }

    /// Whether the option is required.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Whether the option disables the required check.
    #[must_use]
    pub const fn is_override_required(&self) -> bool {
        self.overrides_required
    }

    /// The declared default values.
    #[must_use]
    pub fn defaults(&self) -> &[String] {
        &self.defaults
    }

    /// The list separator.
    #[must_use]
    pub const fn value_separator(&self) -> char {
        self.separator
    }

    /// The help placeholder.
    #[must_use]
    pub fn value_placeholder(&self) -> &str {
        self.value_name.as_deref().unwrap_or(match self.arity {
            OptionArity::Properties => "key=value",
            _ => "value",
        })
    }

    /// The attached validator, if any.
    #[must_use]
    pub fn option_validator(&self) -> Option<&dyn OptionValidator> {
        self.validator.as_deref()
    }

    /// The name as written on a command line: `--name`.
    #[must_use]
    pub fn long_form(&self) -> String {
        format!("--{}", self.name)
    }

    /// The short name as written on a command line: `-x`.
    #[must_use]
    pub fn short_form(&self) -> Option<String> {
        self.short.map(|c| format!("-{c}"))
    }

    /// The value this option takes when absent from the line.
    ///
    /// Flags without an explicit default resolve to an implicit `false`.
    #[must_use]
    pub fn default_resolution(&self) -> Option<(OptionValue, ValueSource)> {
        if self.defaults.is_empty() {
            return match self.arity {
                OptionArity::Flag => Some((OptionValue::Flag(false), ValueSource::Implicit)),
                _ => None,
            };
        }

        let value = match self.arity {
            OptionArity::Flag => OptionValue::Flag(self.defaults[0] == "true"),
            OptionArity::Single => OptionValue::Single(self.defaults[0].clone()),
            OptionArity::List => OptionValue::List(self.defaults.clone()),
            OptionArity::Properties => OptionValue::Properties(
                self.defaults
                    .iter()
                    .filter_map(|pair| pair.split_once('='))
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
        };
        Some((value, ValueSource::Default))
    }
}

impl fmt::Debug for OptionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionDefinition")
            .field("name", &self.name)
            .field("short", &self.short)
            .field("arity", &self.arity)
            .field("required", &self.required)
            .field("overrides_required", &self.overrides_required)
            .field("defaults", &self.defaults)
            .field("validator", &self.validator.is_some())
            .finish_non_exhaustive()
    }
}

/// A resolved option value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionValue {
    /// Flag state.
    Flag(bool),
    /// A single value.
    Single(String),
    /// Values in the order given.
    List(Vec<String>),
    /// Key/value pairs; later keys replace earlier ones.
    Properties(BTreeMap<String, String>),
}

impl OptionValue {
    /// The value as a string, for flags and single values.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::Flag(true) => Some("true"),
            Self::Flag(false) => Some("false"),
            Self::List(_) | Self::Properties(_) => None,
        }
    }

    /// Every value as a string slice.
    ///
    /// Properties are rendered as `key=value`.
    #[must_use]
    pub fn to_strings(&self) -> Vec<String> {
        match self {
            Self::Flag(b) => vec![b.to_string()],
            Self::Single(value) => vec![value.clone()],
            Self::List(values) => values.clone(),
            Self::Properties(map) => map.iter().map(|(k, v)| format!("{k}={v}")).collect(),
        }
    }

    /// Returns true for `Flag(true)`.
    #[must_use]
    pub const fn is_true(&self) -> bool {
        matches!(self, Self::Flag(true))
    }
}

/// Where a resolved value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueSource {
    /// Given on the command line.
    Explicit,
    /// Taken from the declared default.
    Default,
    /// The implicit `false` of an absent flag.
    Implicit,
}

/// An option definition paired with its resolved value.
#[derive(Clone, Debug)]
pub struct ParsedOption {
    definition: Arc<OptionDefinition>,
    value: OptionValue,
    source: ValueSource,
}

impl ParsedOption {
    pub(crate) const fn new(
        definition: Arc<OptionDefinition>,
        value: OptionValue,
        source: ValueSource,
    ) -> Self {
        Self {
            definition,
            value,
            source,
        }
    }

    /// The option's definition.
    #[must_use]
    pub fn definition(&self) -> &OptionDefinition {
        &self.definition
    }

    /// The canonical name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.definition.name()
    }

    /// The resolved value.
    #[must_use]
    pub const fn value(&self) -> &OptionValue {
        &self.value
    }

    /// Where the value came from.
    #[must_use]
    pub const fn source(&self) -> ValueSource {
        self.source
    }

    /// Returns true if the option appeared on the line.
    #[must_use]
    pub fn is_explicit(&self) -> bool {
        self.source == ValueSource::Explicit
    }
}
