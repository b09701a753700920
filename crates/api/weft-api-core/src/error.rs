//! Error taxonomy shared by the Weft crates.

use thiserror::Error;

/// Errors raised synchronously at the call site by scheduler operations.
///
/// Weight clamping into [0,1] is deliberately not represented here: it is
/// silent normalization, not a failure.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Non-finite numeric inputs, unknown ids, or otherwise unusable values.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The operation exists but the entity's current state forbids it
    /// (wrong parent, parent already set, capacity below child count).
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    /// The operation is not meaningful for this entity variant.
    #[error("not supported: {0}")]
    NotSupported(String),
}
