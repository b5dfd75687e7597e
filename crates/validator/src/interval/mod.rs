//! Correlated date ranges.
//!
//! An [`Interval`] pairs one start attribute with one end attribute that
//! share a [`CorrelationId`]. Intervals are built per call by
//! [`builder`] and judged by [`evaluator`]; they never outlive the call.

pub mod builder;
pub mod evaluator;

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::DayRounding;
use crate::reader::Endpoint;
use crate::shape::CorrelationId;

pub use builder::{StartDrafts, build_intervals, collect_starts};
pub use evaluator::{MILLIS_PER_DAY, Verdict, elapsed_days, round_days};

/// How far apart start and end must be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangePolicy {
    /// At least this many days.
    MinimumDays(u32),
    /// Exactly one of these day counts.
    AllowedDayCounts(BTreeSet<u32>),
}

impl Default for RangePolicy {
    fn default() -> Self {
        Self::MinimumDays(0)
    }
}

/// One side of an interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bound {
    /// Attribute the value came from.
    pub attribute: Cow<'static, str>,
    /// The value.
    pub endpoint: Endpoint,
}

/// A start/end pair with its policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    pub(crate) correlation: CorrelationId,
    pub(crate) start: Bound,
    pub(crate) end: Option<Bound>,
    pub(crate) policy: RangePolicy,
    pub(crate) conflict: bool,
}

impl Interval {
    /// Correlation id.
    pub fn correlation(&self) -> CorrelationId {
        self.correlation
    }

    /// Start side.
    pub fn start(&self) -> &Bound {
        &self.start
    }

    /// End side; `None` when no end was declared for this id.
    pub fn end(&self) -> Option<&Bound> {
        self.end.as_ref()
    }

    /// Policy taken from the end declaration.
    pub fn policy(&self) -> &RangePolicy {
        &self.policy
    }

    /// Set when the declarations for this id are malformed.
    pub fn is_conflicted(&self) -> bool {
        self.conflict
    }
}

/// All intervals of one instance, keyed by correlation id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intervals {
    pub(crate) intervals: BTreeMap<CorrelationId, Interval>,
    pub(crate) rounding: DayRounding,
}

impl Intervals {
    /// Interval for `correlation`, if one was built.
    pub fn get(&self, correlation: CorrelationId) -> Option<&Interval> {
        self.intervals.get(&correlation)
    }

    /// Intervals in correlation-id order.
    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.intervals.values()
    }

    /// Number of intervals.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Returns `true` when no interval was built.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Verdict for every interval, in correlation-id order.
    pub fn verdicts(&self) -> impl Iterator<Item = (&Interval, Verdict)> {
        self.iter().map(|i| (i, i.verdict(self.rounding)))
    }

    /// Failing intervals only.
    pub fn violations(&self) -> impl Iterator<Item = (&Interval, Verdict)> {
        self.verdicts().filter(|(_, v)| !v.is_satisfied())
    }

    /// `true` when every interval is satisfied (vacuously for none).
    pub fn is_satisfied(&self) -> bool {
        self.iter().all(|i| i.is_satisfied(self.rounding))
    }
}
