//! Test doubles shared by the runtime tests.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use branchline_parser::{
    CommandDefinition, CommandLine, CommandLineParser, InvocationContext, OptionDefinition,
    PopulateError,
};
use branchline_runtime::{
    CommandInvocation, CommandRegistry, CommandResult, CommandTree, Invocable, LineEditor,
    ReadResult, Result,
};

/// Feeds a fixed list of lines, then reports end of input.
pub struct ScriptedEditor {
    lines: Vec<ReadResult>,
}

impl ScriptedEditor {
    pub fn new(lines: &[&str]) -> Self {
        Self::with_results(lines.iter().map(|l| ReadResult::Line((*l).to_string())).collect())
    }

    pub fn with_results(mut lines: Vec<ReadResult>) -> Self {
        lines.reverse();
        Self { lines }
    }
}

impl LineEditor for ScriptedEditor {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadResult> {
        Ok(self.lines.pop().unwrap_or(ReadResult::Eof))
    }

    fn add_history(&mut self, _line: &str) {}
}

/// A writer whose contents the test can read after the shell is done.
#[derive(Clone, Default)]
pub struct Capture(Rc<RefCell<Vec<u8>>>);

impl Capture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// `deploy start --env <env> [-f]` and `deploy stop` (alias `halt`).
///
/// `start` prints what it would deploy and fails for the `broken`
/// environment. `stop` has no populator.
pub fn deploy() -> CommandTree {
    let start = CommandDefinition::builder("start")
        .description("Start a deployment")
        .option(
            OptionDefinition::single("env")
                .short('e')
                .required(),
        )
        .option(OptionDefinition::flag("force").short('f'))
        .build()
        .unwrap();
    let stop = CommandDefinition::builder("stop")
        .alias("halt")
        .description("Stop a deployment")
        .build()
        .unwrap();
    let group = CommandDefinition::builder("deploy")
        .description("Manage deployments")
        .group()
        .build()
        .unwrap();

    let start = CommandLineParser::new(start).with_populator(
        |target: &mut Invocable, line: &CommandLine, _: &InvocationContext| {
            let env = line.value("env").unwrap_or_default().to_string();
            let force = line.flag("force");
            *target = Some(Box::new(move |inv: &mut CommandInvocation<'_>| -> Result<CommandResult> {
                inv.write_line(&format!("deploying to {env} (force: {force})"))?;
                if env == "broken" {
                    Ok(CommandResult::Failure)
                } else {
                    Ok(CommandResult::Success)
                }
            }));
            Ok::<(), PopulateError>(())
        },
    );

    CommandLineParser::new(group)
        .with_child(start)
        .unwrap()
        .with_child(CommandLineParser::new(stop))
        .unwrap()
}

pub fn registry() -> CommandRegistry {
    CommandRegistry::with_builtins().unwrap().with(deploy()).unwrap()
}
