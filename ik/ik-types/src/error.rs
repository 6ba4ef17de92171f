//! Error types for IK operations.

use thiserror::Error;

/// Errors that can occur while resolving IK constraints.
///
/// Geometric constraint violation is *not* an error: it is a normal output
/// of the limit update (see the constraint layer's `error()` accessor).
/// This type only covers bookkeeping failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IkError {
    /// A constraint referenced a bone handle that is not in the set.
    #[error("invalid bone ID: {0}")]
    InvalidBoneId(u64),
}
