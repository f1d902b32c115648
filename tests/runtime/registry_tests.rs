//! Registry lookup and completion tests.

use std::sync::Arc;

use branchline_parser::{CommandDefinition, CommandLineParser};
use branchline_runtime::{CommandHighlighter, CommandTree, Error};

use crate::common::{deploy, registry};

#[test]
fn lookup_by_name_and_alias() {
    let registry = registry();
    assert_eq!(registry.lookup("deploy start").map(CommandTree::name).ok(), Some("deploy"));
    assert_eq!(registry.lookup("  quit").map(CommandTree::name).ok(), Some("exit"));
}

#[test]
fn lookup_unknown_lists_commands() {
    let err = registry().lookup("ship it").unwrap_err();
    assert!(matches!(
        err,
        Error::UnknownCommand { ref name, ref available }
            if name == "ship" && available == &["help", "echo", "exit", "deploy"]
    ));
}

#[test]
fn duplicate_registration_is_rejected() {
    let mut registry = registry();
    let err = registry.register(deploy()).unwrap_err();
    assert!(matches!(err, Error::DuplicateCommand(ref name) if name == "deploy"));

    let halt = CommandDefinition::builder("halt").alias("quit").build().unwrap();
    let err = registry.register(CommandLineParser::new(halt)).unwrap_err();
    assert!(matches!(err, Error::DuplicateCommand(ref name) if name == "quit"));
    assert_eq!(registry.len(), 4);
}

#[test]
fn resolve_path_through_aliases() {
    let registry = registry();
    let path = ["deploy".to_string(), "halt".to_string()];
    assert_eq!(registry.resolve_path(&path).map(CommandTree::name), Some("stop"));
    assert!(registry.resolve_path(&[]).is_none());
}

#[test]
fn complete_first_word_across_commands() {
    let registry = registry();
    let c = registry.complete("e", 1);
    assert_eq!(c.start, 0);
    assert_eq!(c.candidates, ["echo", "exit"]);

    assert_eq!(registry.complete("", 0).candidates.len(), 5);
}

#[test]
fn complete_delegates_to_tree() {
    let registry = registry();
    let line = "deploy s";
    let c = registry.complete(line, line.len());
    assert_eq!(c.start, 7);
    assert_eq!(c.candidates, ["start", "stop"]);

    let line = "deploy start -";
    assert_eq!(registry.complete(line, line.len()).candidates, ["--env", "--force"]);
}

#[test]
fn complete_unknown_command_is_empty() {
    let registry = registry();
    assert!(registry.complete("ship --", 7).candidates.is_empty());
}

#[test]
fn highlight_marks_known_and_unknown_commands() {
    let highlighter = CommandHighlighter::new(Arc::new(registry()));

    let known = highlighter.highlight("deploy");
    assert_eq!(known, "\x1b[0;1;32;49mdeploy\x1b[0m");

    let unknown = highlighter.highlight("deplyo");
    assert_eq!(unknown, "\x1b[0;1;31;49mdeplyo\x1b[0m");

    assert_eq!(highlighter.highlight("   "), "   ");
}

#[test]
fn highlight_marks_options() {
    let highlighter = CommandHighlighter::new(Arc::new(registry()));
    let line = highlighter.highlight("deploy start --env");
    assert!(line.contains("\x1b[0;36;49m--env"));
    assert!(line.ends_with("\x1b[0m"));
}
