//! Branchline shell entry point.
//!
//! The binary's own flags are declared and parsed with the same parser
//! library the shell uses for its commands.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use branchline_parser::{
    ArgumentDefinition, CommandDefinition, CommandLine, CommandLineParser, DefinitionError,
    InvocationContext, LineTokenizer, OptionDefinition, PopulateError,
};
use branchline_runtime::{CommandRegistry, CommandResult, Shell, ShellConfig, logging};

const PROGRAM: &str = "branchline";

/// CLI configuration parsed from arguments.
#[derive(Default)]
#[allow(clippy::struct_excessive_bools)]
struct CliConfig {
    files: Vec<PathBuf>,
    batch_mode: bool,
    show_help: bool,
    show_version: bool,
    no_color: bool,
    no_validate: bool,
    prompt: Option<String>,
    log: Option<String>,
}

impl CliConfig {
    fn shell_config(&self) -> ShellConfig {
        let mut config = ShellConfig::default()
            .with_color(!self.no_color)
            .with_validate(!self.no_validate)
            .with_banner(self.files.is_empty());
        if let Some(prompt) = &self.prompt {
            config = config.with_prompt(prompt.clone());
        }
        if let Some(filter) = &self.log {
            config = config.with_log_filter(filter.clone());
        }
        config
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn cli() -> Result<CommandLineParser<CliConfig>, DefinitionError> {
    let definition = CommandDefinition::builder(PROGRAM)
        .description("Interactive shell for multi-level commands")
        .option(
            OptionDefinition::flag("batch")
                .short('b')
                .description("Run the script files and exit"),
        )
        .option(OptionDefinition::flag("no-color").description("Disable styled output"))
        .option(OptionDefinition::flag("no-validate").description("Skip option validators"))
        .option(
            OptionDefinition::single("prompt")
                .short('p')
                .value_name("text")
                .description("Primary prompt"),
        )
        .option(
            OptionDefinition::single("log")
                .value_name("filter")
                .description("Log filter directives (default: $BRANCHLINE_LOG or warn)"),
        )
        .option(
            OptionDefinition::flag("help")
                .short('h')
                .overrides_required()
                .description("Print help information"),
        )
        .option(
            OptionDefinition::flag("version")
                .short('V')
                .overrides_required()
                .description("Print version information"),
        )
        .argument(
            ArgumentDefinition::multiple("files")
                .description("Script files to run before the prompt"),
        )
        .build()?;

    Ok(CommandLineParser::new(definition).with_populator(
        |cli: &mut CliConfig, line: &CommandLine, _: &InvocationContext| {
            cli.batch_mode = line.flag("batch");
            cli.no_color = line.flag("no-color");
            cli.no_validate = line.flag("no-validate");
            cli.show_help = line.flag("help");
            cli.show_version = line.flag("version");
            cli.prompt = line.value("prompt").map(str::to_string);
            cli.log = line.value("log").map(str::to_string);
            cli.files = line.arguments().iter().map(PathBuf::from).collect();
            Ok::<(), PopulateError>(())
        },
    ))
}

/// Re-joins process arguments into one line the tokenizer reads back
/// word for word.
fn command_line(args: &[String]) -> String {
    let mut line = String::from(PROGRAM);
    for arg in args {
        line.push(' ');
        if arg.is_empty() {
            line.push_str("\"\"");
        } else {
            line.push_str(&LineTokenizer::escape(arg));
        }
    }
    line
}

fn run(args: &[String]) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let parser = cli()?;
    let mut cli = CliConfig::default();
    parser.populate_object(&command_line(args), &mut cli, &InvocationContext::new(), true)?;

    if cli.show_help {
        print!("{}", parser.print_help());
        return Ok(ExitCode::SUCCESS);
    }

    if cli.show_version {
        println!("{PROGRAM} {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    let config = cli.shell_config();
    logging::init(config.log_filter.as_deref())?;

    let registry = CommandRegistry::with_builtins()?;
    let mut shell = Shell::new(registry, config)?;

    let mut failed = false;
    for file in &cli.files {
        match shell.run_script(file)? {
            CommandResult::Exit => return Ok(exit_code(failed)),
            CommandResult::Failure => failed = true,
            CommandResult::Success => {}
        }
    }

    if cli.batch_mode {
        return Ok(exit_code(failed));
    }

    shell.run()?;
    Ok(ExitCode::SUCCESS)
}

fn exit_code(failed: bool) -> ExitCode {
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
