//! Full rule set of a shape: date ranges, field constraints, nested records.
//!
//! Used for the top-level instance and, recursively, for every nested record.
//! Violations come back as [`ValidationErrors`] with field paths relative to
//! the instance being checked; nested paths look like `rooms[5].check_out`.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::foundation::{ValidationError, ValidationErrors};
use crate::interval::{Interval, Verdict, build_intervals};
use crate::nested::{self, NestedFailure, NestedOutcome};
use crate::reader::{AttributeReader, Reading};
use crate::shape::Shape;
use crate::value::Record;

/// How far to go after the first violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Stop at the first violation.
    FailFast,
    /// Collect every violation. A failing collection still reports only its
    /// first failing record.
    Collect,
}

/// Checks records against their shapes.
#[derive(Clone, Copy)]
pub struct RuleSet<'c> {
    reader: AttributeReader<'c>,
    now: DateTime<Utc>,
    mode: Mode,
}

impl<'c> RuleSet<'c> {
    /// Rule set evaluated at the current instant.
    pub fn new(reader: AttributeReader<'c>, mode: Mode) -> Self {
        Self {
            reader,
            now: Utc::now(),
            mode,
        }
    }

    /// Evaluates time-relative constraints against `now` instead of the clock.
    #[must_use]
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Checks `instance` against its own registered shape.
    pub fn check(&self, instance: &dyn Record) -> Result<ValidationErrors> {
        let shape = self.reader.discover(instance)?;
        self.check_shape(instance, &shape, 0)
    }

    /// Checks `instance` against `shape` at nesting depth `depth`.
    pub fn check_shape(
        &self,
        instance: &dyn Record,
        shape: &Shape,
        depth: usize,
    ) -> Result<ValidationErrors> {
        let max_depth = self.reader.config().max_depth;
        if depth > max_depth {
            return Err(Error::DepthExceeded { max_depth });
        }

        let mut errors = ValidationErrors::new();

        let intervals = build_intervals(&self.reader, instance, shape)?;
        for (interval, verdict) in intervals.violations() {
            errors.add(range_error(interval, verdict));
            if self.mode == Mode::FailFast {
                return Ok(errors);
            }
        }

        let zone = self.reader.config().time_zone;
        for constraint in shape.constraints() {
            let value = match self.reader.read(instance, &constraint.name)? {
                Reading::Value(value) => value,
                Reading::Unreadable => continue,
            };
            if let Err(error) = constraint.declaration.check(&value, &self.now, &zone) {
                errors.add(error.with_field(constraint.name.clone()));
                if self.mode == Mode::FailFast {
                    return Ok(errors);
                }
            }
        }

        for attribute in shape.nesteds() {
            let value = match self.reader.read(instance, &attribute.name)? {
                Reading::Value(value) => value,
                Reading::Unreadable => continue,
            };
            let outcome = nested::delegate(
                self.reader.source(),
                &value,
                &attribute.declaration,
                |record, target| self.check_shape(record, target, depth + 1),
            )?;
            if let NestedOutcome::Failed { index, cause } = outcome {
                errors.add(nested_error(&attribute.name, index, cause));
                if self.mode == Mode::FailFast {
                    return Ok(errors);
                }
            }
        }

        Ok(errors)
    }
}

fn joined(values: &BTreeSet<u32>) -> String {
    values
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Violation for a failed date range, reported on the end attribute.
fn range_error(interval: &Interval, verdict: Verdict) -> ValidationError {
    let start = interval.start().attribute.clone();
    let field = interval
        .end()
        .map_or_else(|| start.clone(), |end| end.attribute.clone());

    let error = match &verdict {
        Verdict::TooShort { days, minimum } => ValidationError::new(
            "date_range",
            format!("End date must be at least {minimum} day(s) after the start date"),
        )
        .with_param("days", days.to_string())
        .with_param("minimum_days", minimum.to_string()),
        Verdict::NotAllowed { days, allowed } => ValidationError::new(
            "date_range",
            format!(
                "End date must be one of {} day(s) after the start date",
                joined(allowed)
            ),
        )
        .with_param("days", days.to_string())
        .with_param("allowed", joined(allowed)),
        other => ValidationError::new("date_range", other.to_string()),
    };

    error
        .with_field(field)
        .with_param("start", start)
        .with_param("correlation", interval.correlation().to_string())
}

/// Violation for a failed nested attribute.
fn nested_error(attribute: &str, index: Option<usize>, cause: NestedFailure) -> ValidationError {
    let field = match index {
        Some(index) => format!("{attribute}[{index}]"),
        None => attribute.to_owned(),
    };

    let error = match cause {
        NestedFailure::Incompatible { expected, actual } => ValidationError::new(
            "nested_type",
            format!("Expected a `{expected}` record, found `{actual}`"),
        )
        .with_param("expected", expected.to_string())
        .with_param("actual", actual.to_string()),
        NestedFailure::Cardinality { expected, found } => {
            ValidationError::type_mismatch("", expected, found)
        }
        NestedFailure::Invalid(errors) => {
            ValidationError::new("nested", "Nested record is invalid")
                .with_nested(errors.prefixed(&field).into_iter().collect())
        }
    };

    let error = error.with_field(field);
    match index {
        Some(index) => error.with_param("index", index.to_string()),
        None => error,
    }
}
