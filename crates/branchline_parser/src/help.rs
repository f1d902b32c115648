//! Usage and help text composition.
//!
//! Output is deterministic: options appear in declaration order and
//! sub-commands in registration order.

use std::fmt::Write;

use crate::command::CommandDefinition;
use crate::option::{OptionArity, OptionDefinition};

/// Joins names for display. Shared by help output and error messages.
#[must_use]
pub fn list_names(names: &[String]) -> String {
    names.join(", ")
}

/// Composes help text for one command.
pub struct HelpFormatter;

impl HelpFormatter {
    /// Renders help for `definition`, listing `children` for groups.
    #[must_use]
    pub fn render(definition: &CommandDefinition, children: &[String]) -> String {
        let mut out = String::new();

        let _ = write!(out, "Usage: {}", definition.name());
        if definition.is_group() && !children.is_empty() {
            if definition.is_invocable() {
                out.push_str(" [<command>]");
            } else {
                out.push_str(" <command>");
            }
        }
        if !definition.options().is_empty() {
            out.push_str(" [<options>]");
        }
        if let Some(argument) = definition.argument() {
            if argument.is_required() {
                let _ = write!(out, " {}", argument.display_name());
            } else {
                let _ = write!(out, " [{}]", argument.display_name());
            }
        }
        out.push('\n');

        if !definition.description().is_empty() {
            let _ = writeln!(out, "{}", definition.description());
        }
        if !definition.aliases().is_empty() {
            let _ = writeln!(out, "Aliases: {}", list_names(definition.aliases()));
        }

        if !definition.options().is_empty() {
            out.push_str("\nOptions:\n");
            let rows: Vec<(String, String)> = definition
                .options()
                .iter()
                .map(|o| (Self::option_label(o), Self::option_details(o)))
                .collect();
            Self::write_rows(&mut out, &rows);
        }

        if let Some(argument) = definition.argument() {
            out.push_str("\nArguments:\n");
            let mut details = argument.description_text().to_string();
            if !argument.defaults().is_empty() {
                push_note(&mut details, &format!("(default: {})", list_names(argument.defaults())));
            }
            Self::write_rows(&mut out, &[(argument.display_name(), details)]);
        }

        if definition.is_group() && !children.is_empty() {
            let _ = writeln!(out, "\nAvailable commands: {}", list_names(children));
        }

        out
    }

    fn option_label(option: &OptionDefinition) -> String {
        let mut label = match option.short_form() {
            Some(short) => format!("{short}, {}", option.long_form()),
            None => format!("    {}", option.long_form()),
        };
        match option.arity() {
            OptionArity::Flag => {}
            OptionArity::Single | OptionArity::Properties => {
                let _ = write!(label, " <{}>", option.value_placeholder());
            }
            OptionArity::List => {
                let _ = write!(label, " <{}>...", option.value_placeholder());
            }
        }
        label
    }

    fn option_details(option: &OptionDefinition) -> String {
        let mut details = option.description_text().to_string();
        if option.is_required() {
            push_note(&mut details, "(required)");
        }
        if !option.defaults().is_empty() {
            push_note(
                &mut details,
                &format!("(default: {})", list_names(option.defaults())),
            );
        }
        details
    }

    fn write_rows(out: &mut String, rows: &[(String, String)]) {
        let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        for (label, details) in rows {
            if details.is_empty() {
                let _ = writeln!(out, "  {label}");
            } else {
                let _ = writeln!(out, "  {label:<width$}  {details}");
            }
        }
    }
}

fn push_note(details: &mut String, note: &str) {
    if !details.is_empty() {
        details.push(' ');
    }
    details.push_str(note);
}
