//! Multi-level command line parser for interactive shells and CLI tools.
//!
//! This crate turns one raw input line into a validated, populated command
//! invocation, given declarative command and option definitions arranged
//! in a tree of git-style sub-commands.
//!
//! # Architecture
//!
//! ```text
//! "deploy start --env prod"
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   TOKENIZER     │  → ["deploy", "start", "--env", "prod"]
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ CHILD ROUTING   │  → deploy → start
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ OPTION          │  → --env = "prod", required check
//! │ RESOLUTION      │
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ VALIDATE &      │  → validators (fail-fast), then populator
//! │ POPULATE        │
//! └─────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`option`] - Option definitions and resolved values
//! - [`command`] - Command and positional-argument definitions
//! - [`tokenizer`] - Line tokenization and the resumable token iterator
//! - [`parser`] - The parser tree and its walk
//! - [`command_line`] - The resolved result of a parse
//! - [`validator`] - Value validation seam
//! - [`populator`] - Command population seam
//! - [`context`] - Ambient providers threaded through validation and population
//! - [`help`] - Usage text
//! - [`completion`] - Read-only completion view
//! - [`error`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod command;
pub mod command_line;
pub mod completion;
pub mod context;
pub mod error;
pub mod help;
pub mod option;
pub mod parser;
pub mod populator;
mod resolve;
pub mod tokenizer;
pub mod validator;

// Re-export main types for convenience
pub use command::{ArgumentDefinition, CommandBuilder, CommandDefinition};
pub use command_line::CommandLine;
pub use completion::{Completion, CompletionView};
pub use context::InvocationContext;
pub use error::{CommandError, DefinitionError, ParseError, PopulateError, ValidationError};
pub use option::{OptionArity, OptionDefinition, OptionValue, ParsedOption, ValueSource};
pub use parser::CommandLineParser;
pub use populator::CommandPopulator;
pub use tokenizer::{LineToken, LineTokenizer, ParsedLine, TokenIterator};
pub use validator::{CommandValidator, OptionValidator};
