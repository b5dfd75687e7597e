//! Per-attribute declarations.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use super::ShapeId;
use crate::foundation::{Validate, ValidationError};
use crate::interval::RangePolicy;
use crate::validators::{AllowedIntegers, AllowedStrings, Email, FutureInstant};
use crate::value::Value;

/// Groups a start declaration with its end declaration on one shape.
pub type CorrelationId = i32;

/// Which handling path an attribute takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Start of a date range.
    Start,
    /// End of a date range.
    End,
    /// Delegates into a contained record or collection.
    Nested,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::End => "end",
            Self::Nested => "nested",
        })
    }
}

// ============================================================================
// DATE RANGE
// ============================================================================

/// Marks an attribute as the start of a date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StartDate {
    /// Correlation with the matching [`EndDate`].
    pub correlation: CorrelationId,
}

impl StartDate {
    /// Start of the range with the given correlation id.
    pub const fn new(correlation: CorrelationId) -> Self {
        Self { correlation }
    }
}

/// Marks an attribute as the end of a date range and carries its policy.
///
/// ```rust,ignore
/// // at least five days after the start
/// EndDate::default().minimum_days(5);
/// // exactly 10, 15 or 20 days after the start of range 2
/// EndDate::new(2).allowed_day_counts([10, 15, 20]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EndDate {
    /// Correlation with the matching [`StartDate`].
    pub correlation: CorrelationId,
    /// Lower bound on elapsed days.
    pub minimum_days: u32,
    /// Exact elapsed-day counts; overrides `minimum_days` when non-empty.
    pub allowed_day_counts: BTreeSet<u32>,
}

impl EndDate {
    /// End of the range with the given correlation id, no lower bound.
    pub fn new(correlation: CorrelationId) -> Self {
        Self {
            correlation,
            ..Self::default()
        }
    }

    /// Requires at least `days` elapsed days.
    #[must_use = "builder methods must be chained or built"]
    pub fn minimum_days(mut self, days: u32) -> Self {
        self.minimum_days = days;
        self
    }

    /// Requires the elapsed day count to be one of `counts`.
    #[must_use = "builder methods must be chained or built"]
    pub fn allowed_day_counts(mut self, counts: impl IntoIterator<Item = u32>) -> Self {
        self.allowed_day_counts = counts.into_iter().collect();
        self
    }

    /// The policy this declaration imposes.
    pub fn policy(&self) -> RangePolicy {
        if self.allowed_day_counts.is_empty() {
            RangePolicy::MinimumDays(self.minimum_days)
        } else {
            RangePolicy::AllowedDayCounts(self.allowed_day_counts.clone())
        }
    }
}

// ============================================================================
// NESTED
// ============================================================================

/// Target of a nested declaration, with cardinality fixed up front.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NestedTarget {
    /// The attribute holds one record.
    Single(ShapeId),
    /// The attribute holds an ordered collection of records.
    Collection(ShapeId),
}

impl NestedTarget {
    /// Shape every contained record must conform to.
    pub fn shape(&self) -> &ShapeId {
        match self {
            Self::Single(shape) | Self::Collection(shape) => shape,
        }
    }

    /// Returns `true` for [`NestedTarget::Collection`].
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_))
    }
}

// ============================================================================
// FIELD CONSTRAINTS
// ============================================================================

/// A single-field rule.
#[derive(Debug, Clone)]
pub enum Rule {
    /// The value must be present.
    Required,
    /// Text must be an email address.
    Email(Email),
    /// Integer must come from an allow-list.
    AllowedIntegers(AllowedIntegers),
    /// Text must come from an allow-list.
    AllowedStrings(AllowedStrings),
    /// Instant must lie in the future.
    Future(FutureInstant),
}

impl Rule {
    fn expects(&self) -> &'static str {
        match self {
            Self::Required => "any",
            Self::Email(_) | Self::AllowedStrings(_) => "text",
            Self::AllowedIntegers(_) => "integer",
            Self::Future(_) => "temporal",
        }
    }
}

/// A [`Rule`] plus its null handling.
///
/// Null passes unless `null_allowed` is off; [`Rule::Required`] always
/// rejects null.
#[derive(Debug, Clone)]
pub struct Constraint {
    /// The rule.
    pub rule: Rule,
    /// Whether a null value satisfies the constraint.
    pub null_allowed: bool,
}

impl Constraint {
    /// Wraps a rule with the default null handling.
    pub fn new(rule: Rule) -> Self {
        Self {
            rule,
            null_allowed: true,
        }
    }

    /// Value must be present.
    pub fn required() -> Self {
        Self::new(Rule::Required)
    }

    /// Text must be an email address.
    pub fn email(validator: Email) -> Self {
        Self::new(Rule::Email(validator))
    }

    /// Integer must be one of `values`.
    pub fn allowed_integers(values: impl IntoIterator<Item = i64>) -> Self {
        Self::new(Rule::AllowedIntegers(AllowedIntegers::new(values)))
    }

    /// Text must be one of `values`.
    pub fn allowed_strings(values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::new(Rule::AllowedStrings(AllowedStrings::new(values)))
    }

    /// Instant must lie in the future (or later today, with `today`).
    pub fn future(today: bool) -> Self {
        Self::new(Rule::Future(FutureInstant::new(today)))
    }

    /// Sets whether null satisfies the constraint.
    #[must_use = "builder methods must be chained or built"]
    pub fn null_allowed(mut self, allowed: bool) -> Self {
        self.null_allowed = allowed;
        self
    }

    /// Checks one value. The returned error carries no field path.
    pub fn check(
        &self,
        value: &Value<'_>,
        now: &DateTime<Utc>,
        zone: &Tz,
    ) -> Result<(), ValidationError> {
        if value.is_null() {
            return match self.rule {
                Rule::Required => Err(ValidationError::required("")),
                _ if self.null_allowed => Ok(()),
                _ => Err(ValidationError::required("")),
            };
        }

        match (&self.rule, value) {
            (Rule::Required, _) => Ok(()),
            (Rule::Email(v), Value::Text(text)) => v.validate(text),
            (Rule::AllowedIntegers(v), Value::Integer(n)) => v.validate(n),
            (Rule::AllowedStrings(v), Value::Text(text)) => v.validate(text),
            (Rule::Future(v), Value::Temporal(t)) => v.check_at(&t.to_utc(zone), now, zone),
            (rule, other) => Err(ValidationError::type_mismatch(
                "",
                rule.expects(),
                other.kind(),
            )),
        }
    }
}
