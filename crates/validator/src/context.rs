//! Validation context.
//!
//! Holds the metadata source and the engine configuration, and exposes every
//! entry point. There is no global state: build one context, clone it freely
//! (clones share the source) and use it from any number of threads.
//!
//! # Examples
//!
//! ```rust,ignore
//! use fieldspan_validator::prelude::*;
//!
//! let registry = Registry::builder()
//!     .register(
//!         Shape::builder("Stay")
//!             .start("check_in", StartDate::default())
//!             .end("check_out", EndDate::default().minimum_days(1))
//!             .build(),
//!     )
//!     .build()?;
//!
//! let ctx = ValidationContext::builder(registry)
//!     .time_zone(chrono_tz::Europe::Berlin)
//!     .build();
//!
//! assert!(ctx.validate(&stay)?);
//! ```

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::config::{AccessPolicy, DayRounding, EngineConfig};
use crate::error::Result;
use crate::foundation::ValidationErrors;
use crate::interval::{Intervals, build_intervals};
use crate::nested;
use crate::reader::AttributeReader;
use crate::registry::MetadataSource;
use crate::rules::{Mode, RuleSet};
use crate::shape::NestedTarget;
use crate::value::{Record, Value};

// ============================================================================
// VALIDATION CONTEXT
// ============================================================================

/// Entry point for every validation.
#[derive(Clone)]
pub struct ValidationContext {
    source: Arc<dyn MetadataSource>,
    config: EngineConfig,
}

impl ValidationContext {
    /// Context over `source` with the default configuration.
    pub fn new(source: impl MetadataSource + 'static) -> Self {
        Self::builder(source).build()
    }

    /// Starts building a context over `source`.
    pub fn builder(source: impl MetadataSource + 'static) -> ValidationContextBuilder {
        ValidationContextBuilder {
            source: Arc::new(source),
            config: EngineConfig::default(),
        }
    }

    /// Context over an already shared source.
    pub fn from_shared(source: Arc<dyn MetadataSource>, config: EngineConfig) -> Self {
        Self { source, config }
    }

    /// Configuration in effect.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn reader(&self) -> AttributeReader<'_> {
        AttributeReader::new(self.source.as_ref(), &self.config)
    }

    /// `true` when every correlated date range of `instance` is satisfied.
    ///
    /// Only date ranges are considered; see [`is_valid`](Self::is_valid) for
    /// the full rule set.
    pub fn validate(&self, instance: &dyn Record) -> Result<bool> {
        Ok(self.intervals(instance)?.is_satisfied())
    }

    /// The date ranges of `instance`, one per correlation id, each with its
    /// own verdict.
    pub fn intervals(&self, instance: &dyn Record) -> Result<Intervals> {
        let reader = self.reader();
        let shape = reader.discover(instance)?;
        build_intervals(&reader, instance, &shape)
    }

    /// `true` when `value` satisfies `target`: the contained record, or every
    /// record of the contained collection, passes the target's full rule set.
    pub fn validate_nested(&self, value: &Value<'_>, target: &NestedTarget) -> Result<bool> {
        let rules = RuleSet::new(self.reader(), Mode::FailFast);
        let outcome = nested::delegate(self.source.as_ref(), value, target, |record, shape| {
            rules.check_shape(record, shape, 1)
        })?;
        Ok(outcome.is_satisfied())
    }

    /// `true` when `instance` satisfies its full rule set: date ranges, field
    /// constraints and nested records. Stops at the first violation.
    pub fn is_valid(&self, instance: &dyn Record) -> Result<bool> {
        let errors = RuleSet::new(self.reader(), Mode::FailFast).check(instance)?;
        Ok(errors.is_empty())
    }

    /// Every violation of `instance`'s full rule set, with field paths.
    pub fn report(&self, instance: &dyn Record) -> Result<ValidationErrors> {
        RuleSet::new(self.reader(), Mode::Collect).check(instance)
    }

    /// [`report`](Self::report) with time-relative constraints evaluated at `now`.
    pub fn report_at(&self, instance: &dyn Record, now: DateTime<Utc>) -> Result<ValidationErrors> {
        RuleSet::new(self.reader(), Mode::Collect)
            .at(now)
            .check(instance)
    }
}

impl fmt::Debug for ValidationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder for [`ValidationContext`].
#[must_use = "builder methods must be chained or built"]
pub struct ValidationContextBuilder {
    source: Arc<dyn MetadataSource>,
    config: EngineConfig,
}

impl ValidationContextBuilder {
    /// Replaces the whole configuration.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the day-rounding tie rule.
    pub fn rounding(mut self, rounding: DayRounding) -> Self {
        self.config.rounding = rounding;
        self
    }

    /// Sets the value-access failure policy.
    pub fn access_failure(mut self, policy: AccessPolicy) -> Self {
        self.config.access_failure = policy;
        self
    }

    /// Sets the zone for naive dates and date-times.
    pub fn time_zone(mut self, zone: Tz) -> Self {
        self.config.time_zone = zone;
        self
    }

    /// Sets the nested depth limit.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Finishes the context.
    pub fn build(self) -> ValidationContext {
        ValidationContext {
            source: self.source,
            config: self.config,
        }
    }
}

impl fmt::Debug for ValidationContextBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationContextBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
