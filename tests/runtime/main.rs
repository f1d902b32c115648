//! Shell runtime integration tests.

mod common;
mod registry_tests;
