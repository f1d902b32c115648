//! Shared command trees.

use branchline_parser::{
    ArgumentDefinition, CommandDefinition, CommandLineParser, OptionDefinition,
};

/// The deployment tree used across tests:
///
/// ```text
/// deploy
/// ├── start   --env (required), -f/--force
/// └── stop    alias: halt
/// ```
pub fn deploy<C>() -> CommandLineParser<C> {
    let start = CommandDefinition::builder("start")
        .description("Start a deployment")
        .option(
            OptionDefinition::single("env")
                .short('e')
                .description("Target environment")
                .required(),
        )
        .option(
            OptionDefinition::flag("force")
                .short('f')
                .description("Skip safety checks"),
        )
        .build()
        .unwrap();
    let stop = CommandDefinition::builder("stop")
        .alias("halt")
        .description("Stop a deployment")
        .build()
        .unwrap();
    let deploy = CommandDefinition::builder("deploy")
        .description("Manage deployments")
        .group()
        .build()
        .unwrap();

    CommandLineParser::new(deploy)
        .with_child(CommandLineParser::new(start))
        .unwrap()
        .with_child(CommandLineParser::new(stop))
        .unwrap()
}

/// A leaf with one option of each arity and a multi-valued argument.
pub fn build<C>() -> CommandLineParser<C> {
    let definition = CommandDefinition::builder("build")
        .option(OptionDefinition::flag("release").short('r'))
        .option(OptionDefinition::flag("verbose").short('v'))
        .option(OptionDefinition::single("target").short('t'))
        .option(OptionDefinition::list("features").short('F'))
        .option(OptionDefinition::list("packages").separator(':'))
        .option(OptionDefinition::properties("define").short('D'))
        .option(OptionDefinition::single("jobs").short('j').default_value("4"))
        .argument(ArgumentDefinition::multiple("paths"))
        .build()
        .unwrap();
    CommandLineParser::new(definition)
}
