//! Error types for DDL synthesis.

use crate::schema::{KindTag, Sentinel};

/// Errors that can occur while synthesizing DDL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DdlError {
    /// The dialect has no way to express the requested change.
    #[error("{operation} is not supported by the {dialect} dialect")]
    Unsupported {
        /// The operation that was requested.
        operation: &'static str,
        /// Invariant name of the dialect.
        dialect: &'static str,
    },

    /// The type mapper has no case for this kind.
    #[error("value kind {kind:?} has no type mapping in the {dialect} dialect")]
    UnmappedKind {
        /// The unmapped kind.
        kind: KindTag,
        /// Invariant name of the dialect.
        dialect: &'static str,
    },

    /// The value converter cannot render this literal.
    #[error("{literal} literals cannot be rendered by the {dialect} dialect")]
    UnmappedLiteral {
        /// Short description of the literal variant.
        literal: &'static str,
        /// Invariant name of the dialect.
        dialect: &'static str,
    },

    /// The dialect has no expression for this named default.
    #[error("default sentinel {sentinel:?} is not recognized by the {dialect} dialect")]
    UnknownSentinel {
        /// The sentinel that was requested.
        sentinel: Sentinel,
        /// Invariant name of the dialect.
        dialect: &'static str,
    },

    /// The caller invoked an operation whose precondition does not hold.
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// A label exceeded its maximum length.
    #[error("label of {length} characters exceeds the maximum length of {max}")]
    LabelTooLong {
        /// Length of the rejected label, in characters.
        length: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// A column kind is not declared in the dialect's capability table,
    /// or is declared but not for the requested size, scale or role.
    #[error("column '{column}' uses {kind:?} which the {dialect} dialect does not support: {reason}")]
    KindNotSupported {
        /// Column being validated.
        column: String,
        /// Its kind tag.
        kind: KindTag,
        /// Invariant name of the dialect.
        dialect: &'static str,
        /// Why no capability entry matched.
        reason: String,
    },

    /// No dialect is registered under this invariant name.
    #[error("unknown dialect: {0}")]
    UnknownDialect(String),
}

/// Result type for DDL synthesis.
pub type Result<T> = std::result::Result<T, DdlError>;
