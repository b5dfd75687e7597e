//! Interval builder.
//!
//! Two phases, each producing a new value:
//!
//! 1. [`collect_starts`] reads every start declaration into a [`StartDrafts`]
//!    map keyed by correlation id.
//! 2. [`StartDrafts::pair_ends`] folds the end declarations over that map and
//!    returns the finished [`Intervals`].
//!
//! `pair_ends` can only be called on the output of `collect_starts`, so every
//! start is known before the first end is paired.
//!
//! Malformed usage never fails: an end without a start is ignored, and a
//! second start or end on one id marks the interval conflicted (satisfied).

use std::collections::BTreeMap;

use super::{Bound, Interval, Intervals};
use crate::error::Result;
use crate::reader::AttributeReader;
use crate::shape::{CorrelationId, Shape};
use crate::value::Record;

/// Phase-one output: start bounds without ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartDrafts {
    drafts: BTreeMap<CorrelationId, Interval>,
}

impl StartDrafts {
    /// Number of distinct correlation ids seen.
    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    /// Returns `true` when the shape has no start declarations.
    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    /// Phase two: pairs end declarations with the drafted starts.
    pub fn pair_ends(
        self,
        reader: &AttributeReader<'_>,
        instance: &dyn Record,
        shape: &Shape,
    ) -> Result<Intervals> {
        let intervals = shape.ends().iter().try_fold(self.drafts, |mut acc, end| -> Result<_> {
            let correlation = end.declaration.correlation;
            let Some(interval) = acc.get_mut(&correlation) else {
                tracing::debug!(
                    shape = %shape.id(),
                    attribute = %end.name,
                    correlation,
                    "End date without start, range ignored"
                );
                return Ok(acc);
            };

            if interval.end.is_some() {
                tracing::debug!(
                    shape = %shape.id(),
                    attribute = %end.name,
                    correlation,
                    "Second end date on one range, range treated as satisfied"
                );
                interval.conflict = true;
                return Ok(acc);
            }

            interval.end = Some(Bound {
                attribute: end.name.clone(),
                endpoint: reader.read_endpoint(instance, &end.name)?,
            });
            interval.policy = end.declaration.policy();
            Ok(acc)
        })?;

        Ok(Intervals {
            intervals,
            rounding: reader.config().rounding,
        })
    }
}

/// Phase one: drafts an interval for every start declaration.
pub fn collect_starts(
    reader: &AttributeReader<'_>,
    instance: &dyn Record,
    shape: &Shape,
) -> Result<StartDrafts> {
    let mut drafts: BTreeMap<CorrelationId, Interval> = BTreeMap::new();
    for start in shape.starts() {
        let correlation = start.declaration.correlation;
        if let Some(existing) = drafts.get_mut(&correlation) {
            tracing::debug!(
                shape = %shape.id(),
                attribute = %start.name,
                correlation,
                "Second start date on one range, range treated as satisfied"
            );
            existing.conflict = true;
            continue;
        }
        let endpoint = reader.read_endpoint(instance, &start.name)?;
        drafts.insert(
            correlation,
            Interval {
                correlation,
                start: Bound {
                    attribute: start.name.clone(),
                    endpoint,
                },
                end: None,
                policy: Default::default(),
                conflict: false,
            },
        );
    }
    Ok(StartDrafts { drafts })
}

/// Runs both phases for `instance`.
pub fn build_intervals(
    reader: &AttributeReader<'_>,
    instance: &dyn Record,
    shape: &Shape,
) -> Result<Intervals> {
    collect_starts(reader, instance, shape)?.pair_ends(reader, instance, shape)
}
