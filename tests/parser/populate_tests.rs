//! Validation and population tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use branchline_parser::{
    ArgumentDefinition, CommandDefinition, CommandError, CommandLine, CommandLineParser,
    InvocationContext, OptionDefinition, OptionValue, ParseError, PopulateError, ValidationError,
};
use proptest::prelude::*;

/// The command instance the tests populate.
#[derive(Debug, Default, PartialEq)]
struct Commit {
    message: String,
    author: Option<String>,
    amend: bool,
    paths: Vec<String>,
}

/// Limits provided through the invocation context.
struct Limits {
    max_message: usize,
}

fn commit_tree(validated: bool) -> CommandLineParser<Commit> {
    let mut message = OptionDefinition::single("message").short('m').required();
    let mut author = OptionDefinition::single("author");
    if validated {
        message = message.validator(|value: &OptionValue, ctx: &InvocationContext| {
            let max = ctx.get::<Limits>().map_or(usize::MAX, |l| l.max_message);
            match value.as_str() {
                Some(text) if text.len() > max => Err(format!("longer than {max} bytes")),
                Some("") => Err("must not be empty".to_string()),
                _ => Ok(()),
            }
        });
        author = author.validator(|value: &OptionValue, _: &InvocationContext| {
            match value.as_str() {
                Some(name) if !name.contains('@') => Err("expected name@host".to_string()),
                _ => Ok(()),
            }
        });
    }

    let definition = CommandDefinition::builder("commit")
        .option(message)
        .option(author)
        .option(OptionDefinition::flag("amend"))
        .argument(ArgumentDefinition::multiple("paths"))
        .build()
        .unwrap();

    CommandLineParser::new(definition).with_populator(
        |target: &mut Commit, line: &CommandLine, _: &InvocationContext| {
            target.message = line.value("message").unwrap_or_default().to_string();
            target.author = line.value("author").map(str::to_string);
            target.amend = line.flag("amend");
            target.paths = line.arguments().to_vec();
            Ok::<(), PopulateError>(())
        },
    )
}

#[test]
fn populate_assigns_resolved_values() {
    let tree = commit_tree(true);
    let mut commit = Commit::default();
    tree.populate_object(
        "commit -m \"fix bug\" --amend --author me@host src lib",
        &mut commit,
        &InvocationContext::new(),
        true,
    )
    .unwrap();

    assert_eq!(
        commit,
        Commit {
            message: "fix bug".into(),
            author: Some("me@host".into()),
            amend: true,
            paths: vec!["src".into(), "lib".into()],
        }
    );
}

#[test]
fn validators_stop_at_first_failure_in_declaration_order() {
    let tree = commit_tree(true);
    let mut commit = Commit::default();
    let err = tree
        .populate_object(
            "commit --author nobody -m \"\"",
            &mut commit,
            &InvocationContext::new(),
            true,
        )
        .unwrap_err();

    // both values are invalid; --message is declared first
    assert_eq!(
        err,
        CommandError::Validation(ValidationError {
            command: "commit".into(),
            target: "--message".into(),
            message: "must not be empty".into(),
        })
    );
    assert_eq!(commit, Commit::default());
}

#[test]
fn validators_read_context_providers() {
    let tree = commit_tree(true);
    let ctx = InvocationContext::new().with(Limits { max_message: 5 });
    let err = tree
        .populate_object("commit -m toolong", &mut Commit::default(), &ctx, true)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid value for '--message' of 'commit': longer than 5 bytes"
    );
}

#[test]
fn validation_can_be_skipped() {
    let tree = commit_tree(true);
    let mut commit = Commit::default();
    tree.populate_object("commit -m \"\" --author nobody", &mut commit, &InvocationContext::new(), false)
        .unwrap();
    assert_eq!(commit.author.as_deref(), Some("nobody"));
}

#[test]
fn required_check_is_not_skipped_by_populate() {
    let tree = commit_tree(false);
    let err = tree
        .populate_object("commit", &mut Commit::default(), &InvocationContext::new(), false)
        .unwrap_err();
    assert!(matches!(err, CommandError::Parse(ParseError::MissingRequired { .. })));
}

#[test]
fn argument_validator_sees_every_value() {
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    let definition = CommandDefinition::builder("rm")
        .argument(ArgumentDefinition::multiple("paths").validator(
            move |value: &OptionValue, _: &InvocationContext| {
                let values = value.to_strings();
                counter.store(values.len(), Ordering::SeqCst);
                if values.iter().any(|v| v == "/") {
                    Err("refusing to remove /".to_string())
                } else {
                    Ok(())
                }
            },
        ))
        .build()
        .unwrap();
    let tree: CommandLineParser<Vec<String>> = CommandLineParser::new(definition).with_populator(
        |target: &mut Vec<String>, line: &CommandLine, _: &InvocationContext| {
            target.extend(line.arguments().iter().cloned());
            Ok::<(), PopulateError>(())
        },
    );

    let mut removed = Vec::new();
    let err = tree
        .populate_object("rm a / b", &mut removed, &InvocationContext::new(), true)
        .unwrap_err();
    assert_eq!(seen.load(Ordering::SeqCst), 3);
    assert!(matches!(err, CommandError::Validation(ref v) if v.target == "<paths>..."));
    assert!(removed.is_empty());
}

#[test]
fn missing_populator_is_reported() {
    let tree = crate::common::deploy::<()>();
    let err = tree
        .populate_object("deploy stop", &mut (), &InvocationContext::new(), true)
        .unwrap_err();
    assert_eq!(
        err,
        CommandError::Populate(PopulateError::new("no populator registered for 'deploy stop'"))
    );
}

#[test]
fn populator_of_resolved_leaf_is_used() {
    let start = CommandDefinition::builder("start").build().unwrap();
    let stop = CommandDefinition::builder("stop").build().unwrap();
    let group = CommandDefinition::builder("svc").group().build().unwrap();
    let tree: CommandLineParser<Vec<&'static str>> = CommandLineParser::new(group)
        .with_child(CommandLineParser::new(start).with_populator(
            |t: &mut Vec<&'static str>, _: &CommandLine, _: &InvocationContext| {
                t.push("start");
                Ok::<(), PopulateError>(())
            },
        ))
        .unwrap()
        .with_child(CommandLineParser::new(stop).with_populator(
            |t: &mut Vec<&'static str>, _: &CommandLine, _: &InvocationContext| {
                t.push("stop");
                Ok::<(), PopulateError>(())
            },
        ))
        .unwrap();

    let mut calls = Vec::new();
    let line = tree
        .populate_object("svc stop", &mut calls, &InvocationContext::new(), true)
        .unwrap();
    assert_eq!(line.path(), ["svc", "stop"]);
    assert_eq!(calls, ["stop"]);
}

#[test]
fn populator_errors_propagate() {
    let definition = CommandDefinition::builder("sleep")
        .option(OptionDefinition::single("seconds").required())
        .build()
        .unwrap();
    let tree: CommandLineParser<u64> = CommandLineParser::new(definition).with_populator(
        |t: &mut u64, line: &CommandLine, _: &InvocationContext| {
            *t = line.parse_value::<u64>("seconds")?.unwrap_or_default();
            Ok::<(), PopulateError>(())
        },
    );

    let mut seconds = 0;
    assert!(matches!(
        tree.populate_object("sleep --seconds soon", &mut seconds, &InvocationContext::new(), true),
        Err(CommandError::Populate(_))
    ));
    tree.populate_object("sleep --seconds 3", &mut seconds, &InvocationContext::new(), true)
        .unwrap();
    assert_eq!(seconds, 3);
}

/// Words drawn with characters that need escaping.
fn tricky_word() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just(' '),
            Just('\\'),
            Just('"'),
            Just('\''),
            Just('-'),
            prop::char::range('a', 'z'),
        ],
        1..16,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #[test]
    fn escapes_are_resolved_exactly_once(message in tricky_word(), author in tricky_word()) {
        let tree = commit_tree(false);
        let mut commit = Commit::default();
        let line = format!(
            "commit --message={} --author={}",
            branchline_parser::LineTokenizer::escape(&message),
            branchline_parser::LineTokenizer::escape(&author),
        );
        tree.populate_object(&line, &mut commit, &InvocationContext::new(), false).unwrap();

        prop_assert_eq!(commit.message, message);
        prop_assert_eq!(commit.author, Some(author));
    }
}
