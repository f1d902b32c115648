//! Populating command instances from resolved command lines.

use crate::command_line::CommandLine;
use crate::context::InvocationContext;
use crate::error::PopulateError;

/// Writes a resolved command line onto a target instance.
///
/// Closures of the form
/// `Fn(&mut C, &CommandLine, &InvocationContext) -> Result<(), PopulateError>`
/// implement this trait.
pub trait CommandPopulator<C>: Send + Sync {
    /// Assigns every resolved value to `target`.
    ///
    /// # Errors
    ///
    /// Returns a [`PopulateError`] if a value cannot be assigned.
    fn populate(
        &self,
        target: &mut C,
        line: &CommandLine,
        ctx: &InvocationContext,
    ) -> Result<(), PopulateError>;
}

impl<C, F> CommandPopulator<C> for F
where
    F: Fn(&mut C, &CommandLine, &InvocationContext) -> Result<(), PopulateError> + Send + Sync,
{
    fn populate(
        &self,
        target: &mut C,
        line: &CommandLine,
        ctx: &InvocationContext,
    ) -> Result<(), PopulateError> {
        self(target, line, ctx)
    }
}
