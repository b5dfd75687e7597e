//! Engine errors.
//!
//! These are *configuration* failures: the engine could not decide whether an
//! instance is valid. An instance that is simply invalid is never an `Err`;
//! it is `Ok(false)` from the predicates or a non-empty
//! [`ValidationErrors`](crate::foundation::ValidationErrors) from a report.

use crate::shape::ShapeId;

/// Errors raised while resolving metadata or reading values.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The metadata source has no declarations for the shape.
    #[error("unknown shape `{shape}`")]
    UnknownShape {
        /// Shape that was looked up.
        shape: ShapeId,
    },

    /// The same shape was registered twice.
    #[error("shape `{shape}` is already registered")]
    DuplicateShape {
        /// Shape registered twice.
        shape: ShapeId,
    },

    /// A nested declaration or conformance names a shape that is not registered.
    #[error("`{shape}.{attribute}` refers to unregistered shape `{target}`")]
    UnresolvedTarget {
        /// Declaring shape.
        shape: ShapeId,
        /// Declaring attribute (empty for `conforms_to`).
        attribute: String,
        /// Missing target shape.
        target: ShapeId,
    },

    /// The metadata source itself could not answer.
    #[error("metadata source unavailable: {reason}")]
    MetadataUnavailable {
        /// Source-specific reason.
        reason: String,
    },

    /// The host refused to hand out an attribute value.
    #[error("cannot read `{shape}.{attribute}`")]
    ValueAccess {
        /// Shape of the instance.
        shape: ShapeId,
        /// Attribute being read.
        attribute: String,
        /// Host-level cause.
        #[source]
        source: AccessError,
    },

    /// A start or end attribute produced something other than a date/time.
    #[error("`{shape}.{attribute}` is declared temporal but holds {found}")]
    NotTemporal {
        /// Shape of the instance.
        shape: ShapeId,
        /// Offending attribute.
        attribute: String,
        /// Kind of value actually found.
        found: &'static str,
    },

    /// Nested delegation went deeper than the configured limit.
    #[error("nested validation exceeded maximum depth {max_depth}")]
    DepthExceeded {
        /// Configured limit.
        max_depth: usize,
    },

    /// An engine configuration document could not be parsed.
    #[error("invalid engine configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Failure reported by a [`Record`](crate::value::Record) when an attribute
/// cannot be read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum AccessError {
    /// The record does not have such an attribute.
    #[error("no attribute `{0}`")]
    Unknown(String),

    /// The attribute exists but may not be read.
    #[error("access to `{0}` denied")]
    Denied(String),
}

impl Error {
    /// Returns `true` for errors caused by the declarations rather than by
    /// the instance being validated.
    #[must_use]
    pub fn is_declaration_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownShape { .. }
                | Self::DuplicateShape { .. }
                | Self::UnresolvedTarget { .. }
                | Self::NotTemporal { .. }
        )
    }
}

/// Result type for engine operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
