//! Branchline - git-style multi-level command line parsing
//!
//! This crate re-exports both layers of the Branchline system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: branchline_runtime - Shell loop, registry, line editor, styling
//! Layer 0: branchline_parser  - Definitions, tokenizer, parser tree, completion
//! ```

pub use branchline_parser as parser;
pub use branchline_runtime as runtime;
