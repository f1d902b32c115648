//! Option resolution at a single parser node.
//!
//! Consumes the rest of a token stream against one command's own options
//! and positional slot, applies defaults, and enforces required options.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::command::CommandDefinition;
use crate::command_line::CommandLine;
use crate::error::ParseError;
use crate::option::{OptionArity, OptionDefinition, OptionValue, ParsedOption, ValueSource};
use crate::tokenizer::{LineToken, TokenIterator};

/// The grammatical shape of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TokenShape<'t> {
    /// `--name` or `--name=value`
    Long {
        name: &'t str,
        inline: Option<&'t str>,
    },
    /// `-x`, `-xvalue`, `-x=value`, or a cluster of flags `-abc`
    Short { cluster: &'t str },
    /// `--`
    EndOfOptions,
    /// Anything else, including `-`, negative numbers, and tokens whose
    /// option name was quoted
    Word,
}

/// Classifies a token against the option grammar.
pub(crate) fn classify(token: &LineToken) -> Result<TokenShape<'_>, ParseError> {
    let value = token.value();
    if !looks_like_option(token) {
        return Ok(TokenShape::Word);
    }
    if value == "--" {
        return Ok(TokenShape::EndOfOptions);
    }

    let malformed = |reason| ParseError::MalformedOption {
        token: value.to_string(),
        reason,
    };

    if let Some(rest) = value.strip_prefix("--") {
        if rest.starts_with('-') {
            return Err(malformed("too many leading dashes"));
        }
        let (name, inline) = match rest.split_once('=') {
            Some((name, inline)) => (name, Some(inline)),
            None => (rest, None),
        };
        if name.is_empty() {
            return Err(malformed("missing option name"));
        }
        return Ok(TokenShape::Long { name, inline });
    }

    let cluster = &value[1..];
    if cluster.starts_with('=') {
        return Err(malformed("missing option name"));
    }
    Ok(TokenShape::Short { cluster })
}

/// Returns true if the token would be read as an option (or `--`).
pub(crate) fn looks_like_option(token: &LineToken) -> bool {
    let value = token.value();
    if !name_is_unquoted(token) || value.len() < 2 || !value.starts_with('-') {
        return false;
    }
    let rest = &value[1..];
    let numeric = rest.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && rest.parse::<f64>().is_ok();
    !numeric
}

/// Whether the dashes and option name were typed outside quotes. Only the
/// inline value may be quoted: `--msg="a b"` and `-m"a b"`.
fn name_is_unquoted(token: &LineToken) -> bool {
    if !token.is_quoted() {
        return true;
    }
    let prefix = token.unquoted_prefix();
    match prefix.strip_prefix("--") {
        Some(rest) => rest.contains('='),
        None => prefix.starts_with('-') && prefix.len() > 1,
    }
}

/// Per-node resolution state. Lives for one parse only.
pub(crate) struct OptionResolver<'p> {
    definition: &'p Arc<CommandDefinition>,
    children: Vec<String>,
    slots: Vec<Option<OptionValue>>,
    arguments: Vec<String>,
    end_of_options: bool,
}

impl<'p> OptionResolver<'p> {
    pub(crate) fn new(definition: &'p Arc<CommandDefinition>, children: Vec<String>) -> Self {
        Self {
            definition,
            children,
            slots: vec![None; definition.options().len()],
            arguments: Vec::new(),
            end_of_options: false,
        }
    }

    /// Consumes every remaining token and builds the resolved result.
    pub(crate) fn resolve(
        mut self,
        iter: &mut TokenIterator<'_>,
        ignore_requirements: bool,
        path: Vec<String>,
    ) -> Result<CommandLine, ParseError> {
        while let Some(token) = iter.next() {
            if self.end_of_options {
                self.bind_argument(token)?;
                continue;
            }

            match classify(token)? {
                TokenShape::EndOfOptions => self.end_of_options = true,
                TokenShape::Long { name, inline } => {
                    let Some(index) = self.definition.position_long(name) else {
                        return Err(self.unknown_option(format!("--{name}")));
                    };
                    self.consume(index, inline, token, iter)?;
                }
                TokenShape::Short { cluster } => self.consume_cluster(cluster, token, iter)?,
                TokenShape::Word => self.bind_argument(token)?,
            }
        }

        self.finish(ignore_requirements, path)
    }

    fn consume_cluster(
        &mut self,
        cluster: &str,
        token: &LineToken,
        iter: &mut TokenIterator<'_>,
    ) -> Result<(), ParseError> {
        let mut chars = cluster.chars();
        let Some(first) = chars.next() else {
            return Err(self.unknown_option(token.value().to_string()));
        };
        let definition = self.definition;
        let index = self.short_index(first)?;
        let rest = chars.as_str();

        if definition.options()[index].arity().takes_value() {
            let inline = if rest.is_empty() {
                None
            } else {
                Some(rest.strip_prefix('=').unwrap_or(rest))
            };
            return self.consume(index, inline, token, iter);
        }

        if rest.starts_with('=') {
            return Err(ParseError::MalformedOption {
                token: token.value().to_string(),
                reason: "a flag does not take a value",
            });
        }
        self.consume(index, None, token, iter)?;

        for short in rest.chars() {
            let index = self.short_index(short)?;
            if definition.options()[index].arity().takes_value() {
                return Err(ParseError::MalformedOption {
                    token: token.value().to_string(),
                    reason: "only flags can be combined",
                });
            }
            self.consume(index, None, token, iter)?;
        }
        Ok(())
    }

    fn consume(
        &mut self,
        index: usize,
        inline: Option<&str>,
        token: &LineToken,
        iter: &mut TokenIterator<'_>,
    ) -> Result<(), ParseError> {
        let definition = self.definition;
        let option = &definition.options()[index];
        tracing::trace!(
            command = self.definition.name(),
            option = option.name(),
            "resolving option"
        );

        match option.arity() {
            OptionArity::Flag => {
                if inline.is_some() {
                    return Err(ParseError::MalformedOption {
                        token: token.value().to_string(),
                        reason: "a flag does not take a value",
                    });
                }
                self.set_once(index, option, OptionValue::Flag(true))
            }
            OptionArity::Single => {
                let value = self.take_value(option, inline, iter)?;
                self.set_once(index, option, OptionValue::Single(value))
            }
            OptionArity::List => {
                let separator = option.value_separator();
                let mut values = Vec::new();
                if let Some(inline) = inline {
                    values.extend(split_values(inline, separator));
                } else {
                    while let Some(next) = iter.peek() {
                        if looks_like_option(next) {
                            break;
                        }
                        iter.next();
                        values.extend(split_values(next.value(), separator));
                    }
                }
                if values.is_empty() {
                    return Err(self.missing_value(option));
                }
                match &mut self.slots[index] {
                    Some(OptionValue::List(existing)) => existing.extend(values),
                    slot => *slot = Some(OptionValue::List(values)),
                }
                Ok(())
            }
            OptionArity::Properties => {
                let raw = self.take_value(option, inline, iter)?;
                let (key, value) = raw
                    .split_once('=')
                    .filter(|(key, _)| !key.is_empty())
                    .ok_or_else(|| ParseError::MalformedOption {
                        token: raw.clone(),
                        reason: "expected key=value",
                    })?;
                let (key, value) = (key.to_string(), value.to_string());
                match &mut self.slots[index] {
                    Some(OptionValue::Properties(map)) => {
                        map.insert(key, value);
                    }
                    slot => *slot = Some(OptionValue::Properties(BTreeMap::from([(key, value)]))),
                }
                Ok(())
            }
        }
    }

    fn take_value(
        &self,
        option: &OptionDefinition,
        inline: Option<&str>,
        iter: &mut TokenIterator<'_>,
    ) -> Result<String, ParseError> {
        if let Some(inline) = inline {
            return Ok(inline.to_string());
        }
        match iter.peek() {
            Some(next) if !looks_like_option(next) => {
                iter.next();
                Ok(next.value().to_string())
            }
            _ => Err(self.missing_value(option)),
        }
    }

    fn set_once(
        &mut self,
        index: usize,
        option: &OptionDefinition,
        value: OptionValue,
    ) -> Result<(), ParseError> {
        if self.slots[index].is_some() {
            return Err(ParseError::DuplicateOption {
                command: self.definition.name().to_string(),
                option: option.long_form(),
            });
        }
        self.slots[index] = Some(value);
        Ok(())
    }

    fn bind_argument(&mut self, token: &LineToken) -> Result<(), ParseError> {
        match self.definition.argument() {
            Some(argument) if argument.is_multiple() || self.arguments.is_empty() => {
                self.arguments.push(token.value().to_string());
                Ok(())
            }
            None if !self.children.is_empty()
                && !self.children.iter().any(|c| c == token.value()) =>
            {
                Err(ParseError::UnknownSubcommand {
                    command: self.definition.name().to_string(),
                    token: token.value().to_string(),
                    available: self.children.clone(),
                })
            }
            _ => Err(ParseError::UnexpectedArgument {
                command: self.definition.name().to_string(),
                token: token.value().to_string(),
            }),
        }
    }

    fn finish(
        mut self,
        ignore_requirements: bool,
        path: Vec<String>,
    ) -> Result<CommandLine, ParseError> {
        let definition = self.definition;
        let mut options = Vec::with_capacity(definition.options().len());
        let mut missing = Vec::new();
        let mut overridden = false;

        for (index, option) in definition.options().iter().enumerate() {
            if let Some(value) = self.slots[index].take() {
                overridden |= option.is_override_required();
                options.push(ParsedOption::new(
                    Arc::clone(option),
                    value,
                    ValueSource::Explicit,
                ));
                continue;
            }

            let resolution = option.default_resolution();
            let satisfied = matches!(resolution, Some((_, ValueSource::Default)));
            if option.is_required() && !satisfied {
                missing.push(option.long_form());
            }
            if let Some((value, source)) = resolution {
                options.push(ParsedOption::new(Arc::clone(option), value, source));
            }
        }

        let (arguments, argument_source) = match definition.argument() {
            _ if !self.arguments.is_empty() => (self.arguments, ValueSource::Explicit),
            Some(argument) if !argument.defaults().is_empty() => {
                (argument.defaults().to_vec(), ValueSource::Default)
            }
            _ => (Vec::new(), ValueSource::Implicit),
        };
        if let Some(argument) = definition.argument() {
            if argument.is_required() && arguments.is_empty() {
                missing.push(argument.display_name());
            }
        }

        if !ignore_requirements && !overridden && !missing.is_empty() {
            tracing::debug!(command = definition.name(), ?missing, "required values missing");
            return Err(ParseError::MissingRequired {
                command: definition.name().to_string(),
                missing,
            });
        }

        Ok(CommandLine::new(
            Arc::clone(definition),
            path,
            options,
            arguments,
            argument_source,
        ))
    }

    fn short_index(&self, short: char) -> Result<usize, ParseError> {
        self.definition
            .position_short(short)
            .ok_or_else(|| self.unknown_option(format!("-{short}")))
    }

    fn unknown_option(&self, option: String) -> ParseError {
        tracing::debug!(command = self.definition.name(), %option, "unknown option");
        ParseError::UnknownOption {
            command: self.definition.name().to_string(),
            option,
            available: self.definition.option_names(),
        }
    }

    fn missing_value(&self, option: &OptionDefinition) -> ParseError {
        ParseError::MissingValue {
            command: self.definition.name().to_string(),
            option: option.long_form(),
        }
    }
}

fn split_values(raw: &str, separator: char) -> impl Iterator<Item = String> + '_ {
    raw.split(separator)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
}
