//! Nested delegator.
//!
//! Runs a target shape's full rule set over a contained record, or over each
//! record of a contained collection in order, stopping at the first record
//! that fails. Records after a failure are never read.

use crate::error::{Error, Result};
use crate::foundation::ValidationErrors;
use crate::registry::MetadataSource;
use crate::shape::{NestedTarget, Shape, ShapeId};
use crate::value::{Record, Value};

/// Why a nested value failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NestedFailure {
    /// The record's runtime shape does not conform to the target.
    Incompatible {
        /// Declared target shape.
        expected: ShapeId,
        /// Runtime shape of the record.
        actual: ShapeId,
    },
    /// A single record where a collection was declared, or the reverse, or
    /// not a record at all.
    Cardinality {
        /// What the declaration expects.
        expected: &'static str,
        /// What the attribute holds.
        found: &'static str,
    },
    /// The record violates the target's rules.
    Invalid(ValidationErrors),
}

/// Result of delegating into one nested attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NestedOutcome {
    /// Every evaluated record passed (or there was nothing to evaluate).
    Satisfied,
    /// The first failure.
    Failed {
        /// Position in the collection; `None` for a single record.
        index: Option<usize>,
        /// What went wrong.
        cause: NestedFailure,
    },
}

impl NestedOutcome {
    /// Returns `true` for [`NestedOutcome::Satisfied`].
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied)
    }
}

/// Validates `value` against `target`.
///
/// `check` runs the full rule set of the resolved target shape over one
/// record and returns its violations. A null value is satisfied, as is an
/// empty collection. An unresolvable target shape is an error, not a failure.
pub fn delegate<F>(
    source: &dyn MetadataSource,
    value: &Value<'_>,
    target: &NestedTarget,
    mut check: F,
) -> Result<NestedOutcome>
where
    F: FnMut(&dyn Record, &Shape) -> Result<ValidationErrors>,
{
    let shape = source.resolve(target.shape())?;

    match (target, value) {
        (_, Value::Null) => Ok(NestedOutcome::Satisfied),
        (NestedTarget::Single(_), Value::Record(record)) => {
            element(source, &shape, *record, None, &mut check)
        }
        (NestedTarget::Collection(_), Value::Records(records)) => {
            for (index, record) in records.iter().enumerate() {
                let outcome = element(source, &shape, *record, Some(index), &mut check)?;
                if !outcome.is_satisfied() {
                    tracing::debug!(
                        shape = %shape.id(),
                        index,
                        skipped = records.len() - index - 1,
                        "Nested collection failed, remaining records skipped"
                    );
                    return Ok(outcome);
                }
            }
            Ok(NestedOutcome::Satisfied)
        }
        (target, other) => Ok(NestedOutcome::Failed {
            index: None,
            cause: NestedFailure::Cardinality {
                expected: if target.is_collection() {
                    "records"
                } else {
                    "record"
                },
                found: other.kind(),
            },
        }),
    }
}

fn element<F>(
    source: &dyn MetadataSource,
    shape: &Shape,
    record: &dyn Record,
    index: Option<usize>,
    check: &mut F,
) -> Result<NestedOutcome>
where
    F: FnMut(&dyn Record, &Shape) -> Result<ValidationErrors>,
{
    let actual = record.shape();
    let compatible = match source.conforms(&actual, shape.id()) {
        Ok(compatible) => compatible,
        // a shape nobody registered cannot conform to anything
        Err(Error::UnknownShape { .. }) => false,
        Err(other) => return Err(other),
    };
    if !compatible {
        return Ok(NestedOutcome::Failed {
            index,
            cause: NestedFailure::Incompatible {
                expected: shape.id().clone(),
                actual,
            },
        });
    }

    let errors = check(record, shape)?;
    if errors.is_empty() {
        Ok(NestedOutcome::Satisfied)
    } else {
        Ok(NestedOutcome::Failed {
            index,
            cause: NestedFailure::Invalid(errors),
        })
    }
}
