//! Error types for statement construction and compilation.

use crate::expr::join::JoinKind;
use crate::position::{Position, StatementKind};

/// Errors that can occur while assembling or compiling a statement.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A required argument was empty or structurally insufficient.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An expression was filed under a clause position the statement
    /// kind does not carry.
    #[error("{kind} statements have no {position} clause")]
    UnsupportedPosition {
        /// The statement kind that rejected the position.
        kind: StatementKind,
        /// The rejected clause position.
        position: Position,
    },

    /// A join that requires an ON condition was completed without one.
    #[error("{kind} requires an ON condition")]
    MissingOnCondition {
        /// The join kind missing its condition.
        kind: JoinKind,
    },
}

/// Result type for builder and compiler operations.
pub type Result<T> = std::result::Result<T, BuildError>;

impl BuildError {
    /// Shorthand for [`BuildError::InvalidArgument`] with a formatted message.
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
