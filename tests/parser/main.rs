//! Integration tests for the branchline_parser crate.
//!
//! Tests for the command line parsing pipeline:
//! - Sub-command routing at any depth
//! - Option grammar and arities
//! - Required options and overrides
//! - Validation and population
//! - Help text
//! - Completion

mod common;
mod option_tests;
mod populate_tests;
mod routing_tests;
