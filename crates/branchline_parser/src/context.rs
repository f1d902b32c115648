//! Ambient invocation context.
//!
//! The parser threads an [`InvocationContext`] through validation and
//! population without looking inside it. Callers register whatever
//! collaborators their validators and populators need (a working
//! directory, a connection, a clock) and fetch them back by type.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// A type-keyed map of providers.
#[derive(Default)]
pub struct InvocationContext {
    providers: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl InvocationContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a provider, returning the context.
    #[must_use]
    pub fn with<T: Any + Send + Sync>(mut self, provider: T) -> Self {
        self.insert(provider);
        self
    }

    /// Adds a provider, returning the one it replaced.
    pub fn insert<T: Any + Send + Sync>(&mut self, provider: T) -> Option<T> {
        self.providers
            .insert(TypeId::of::<T>(), Box::new(provider))
            .and_then(|old| old.downcast::<T>().ok())
            .map(|old| *old)
    }

    /// Looks up a provider by type.
    #[must_use]
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.providers
            .get(&TypeId::of::<T>())
            .and_then(|p| p.downcast_ref::<T>())
    }

    /// Looks up a provider by type, mutably.
    pub fn get_mut<T: Any + Send + Sync>(&mut self) -> Option<&mut T> {
        self.providers
            .get_mut(&TypeId::of::<T>())
            .and_then(|p| p.downcast_mut::<T>())
    }

    /// Number of registered providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if no providers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl fmt::Debug for InvocationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationContext")
            .field("providers", &self.providers.len())
            .finish()
    }
}
