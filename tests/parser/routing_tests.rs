//! Sub-command routing tests.

use branchline_parser::{
    CommandDefinition, CommandLineParser, OptionDefinition, ParseError, ValueSource,
};
use proptest::prelude::*;

use crate::common::deploy;

#[test]
fn deploy_start_resolves_leaf() {
    let tree = deploy::<()>();
    let line = tree.parse("deploy start --env prod").unwrap();

    assert_eq!(line.path(), ["deploy", "start"]);
    assert_eq!(line.command_name(), "start");
    assert_eq!(line.value("env"), Some("prod"));
    assert!(!line.flag("force"));
    assert_eq!(
        line.option("force").map(|o| o.source()),
        Some(ValueSource::Implicit)
    );
    assert_eq!(
        tree.resolved_leaf(&line).map(CommandLineParser::name),
        Some("start")
    );
}

#[test]
fn unknown_subcommand_names_token_and_siblings() {
    let tree = deploy::<()>();
    let err = tree.parse("deploy restart").unwrap_err();

    assert_eq!(
        err,
        ParseError::UnknownSubcommand {
            command: "deploy".into(),
            token: "restart".into(),
            available: vec!["start".into(), "stop".into()],
        }
    );
    assert_eq!(
        err.to_string(),
        "'restart' is not a sub-command of 'deploy'; available commands: start, stop"
    );
}

#[test]
fn alias_routes_to_canonical_path() {
    let tree = deploy::<()>();
    let line = tree.parse("deploy halt").unwrap();
    assert_eq!(line.path(), ["deploy", "stop"]);
}

#[test]
fn wrong_root_is_unknown_command() {
    let tree = deploy::<()>();
    assert_eq!(
        tree.parse("ship start").unwrap_err(),
        ParseError::UnknownCommand {
            name: "ship".into(),
            expected: "deploy".into(),
        }
    );
}

#[test]
fn empty_line_is_an_error() {
    let tree = deploy::<()>();
    assert_eq!(tree.parse("").unwrap_err(), ParseError::EmptyLine);
    assert_eq!(tree.parse("   ").unwrap_err(), ParseError::EmptyLine);
}

#[test]
fn group_without_subcommand_requires_one() {
    let tree = deploy::<()>();
    assert!(matches!(
        tree.parse("deploy"),
        Err(ParseError::MissingSubcommand { command, .. }) if command == "deploy"
    ));
}

#[test]
fn invocable_group_runs_without_subcommand() {
    let status = CommandDefinition::builder("status").build().unwrap();
    let remote = CommandDefinition::builder("remote")
        .group()
        .invocable()
        .option(OptionDefinition::flag("verbose").short('v'))
        .build()
        .unwrap();
    let tree: CommandLineParser<()> = CommandLineParser::new(remote)
        .with_child(CommandLineParser::new(status))
        .unwrap();

    let line = tree.parse("remote").unwrap();
    assert_eq!(line.path(), ["remote"]);

    // options at a group resolve against the group itself
    let line = tree.parse("remote -v").unwrap();
    assert_eq!(line.path(), ["remote"]);
    assert!(line.flag("verbose"));
}

#[test]
fn subcommand_after_group_option_is_rejected() {
    let status = CommandDefinition::builder("status").build().unwrap();
    let remote = CommandDefinition::builder("remote")
        .group()
        .invocable()
        .option(OptionDefinition::flag("verbose").short('v'))
        .build()
        .unwrap();
    let tree: CommandLineParser<()> = CommandLineParser::new(remote)
        .with_child(CommandLineParser::new(status))
        .unwrap();

    assert_eq!(
        tree.parse("remote -v status").unwrap_err(),
        ParseError::UnexpectedArgument {
            command: "remote".into(),
            token: "status".into(),
        }
    );
}

#[test]
fn quoted_token_still_routes() {
    let tree = deploy::<()>();
    let line = tree.parse(r#"deploy "stop""#).unwrap();
    assert_eq!(line.path(), ["deploy", "stop"]);
}

#[test]
fn child_at_path_follows_canonical_names() {
    let tree = deploy::<()>();
    let path = ["deploy".to_string(), "start".to_string()];
    assert_eq!(tree.child_at_path(&path).map(CommandLineParser::name), Some("start"));
    assert!(tree.child_at_path(&["start".to_string()]).is_none());
}

#[test]
fn tree_parses_concurrently() {
    let tree = std::sync::Arc::new(deploy::<()>());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let tree = std::sync::Arc::clone(&tree);
            std::thread::spawn(move || {
                let line = tree.parse(&format!("deploy start --env env{i}")).unwrap();
                line.value("env").map(str::to_string)
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), Some(format!("env{i}")));
    }
}

/// Builds a chain `g0 → g1 → … → leaf` with a decoy sibling at each level.
fn chain(depth: usize) -> CommandLineParser<()> {
    let leaf = CommandDefinition::builder("leaf")
        .option(OptionDefinition::single("name").required())
        .build()
        .unwrap();
    let mut node = CommandLineParser::new(leaf);

    for level in (0..depth).rev() {
        let group = CommandDefinition::builder(format!("g{level}"))
            .group()
            .build()
            .unwrap();
        let decoy = CommandDefinition::builder(format!("decoy{level}"))
            .build()
            .unwrap();
        node = CommandLineParser::new(group)
            .with_child(CommandLineParser::new(decoy))
            .unwrap()
            .with_child(node)
            .unwrap();
    }
    node
}

fn chain_line(depth: usize) -> Vec<String> {
    let mut words: Vec<String> = (0..depth).map(|l| format!("g{l}")).collect();
    words.push("leaf".into());
    words
}

proptest! {
    #[test]
    fn any_depth_reaches_leaf(depth in 0usize..12) {
        let tree = chain(depth);
        let words = chain_line(depth);
        let line = tree.parse(&format!("{} --name x", words.join(" "))).unwrap();

        prop_assert_eq!(line.path(), words.as_slice());
        prop_assert_eq!(tree.resolved_leaf(&line).map(CommandLineParser::name), Some("leaf"));
    }

    #[test]
    fn unmatched_token_lists_exact_siblings(depth in 1usize..8, at in 0usize..8) {
        let at = at % depth;
        let tree = chain(depth);
        let mut words = chain_line(depth);
        words.truncate(at + 1);
        words.push("nope".into());

        let err = tree.parse(&words.join(" ")).unwrap_err();
        let next = if at + 1 == depth { "leaf".to_string() } else { format!("g{}", at + 1) };
        prop_assert_eq!(
            err,
            ParseError::UnknownSubcommand {
                command: format!("g{at}"),
                token: "nope".into(),
                available: vec![format!("decoy{at}"), next],
            }
        );
    }
}
