use crate::types::TabungError;

/// Trait for builders that produce a configuration or calculator.
///
/// This creates a unified interface for object creation across the crate.
pub trait Builder<T> {
    /// Builds the final object, returning a Result.
    fn build(self) -> Result<T, TabungError>;
}

/// Early validation of builder state, run before `build()` assembles anything.
pub trait Validate {
    fn validate(&self) -> Result<(), TabungError>;
}
