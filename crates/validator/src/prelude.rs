//! Prelude module for convenient imports.
//!
//! Provides a single `use fieldspan_validator::prelude::*;` import that brings
//! in the context, the declaration builders, host-side traits and the
//! built-in field validators.

// ============================================================================
// FOUNDATION: Core trait and errors
// ============================================================================

pub use crate::foundation::{Validate, ValidationError, ValidationErrors};

// ============================================================================
// ENGINE: Context, configuration, errors
// ============================================================================

pub use crate::config::{AccessPolicy, DayRounding, EngineConfig};
pub use crate::context::{ValidationContext, ValidationContextBuilder};
pub use crate::error::{AccessError, Error};

// ============================================================================
// DECLARATIONS
// ============================================================================

pub use crate::registry::{MetadataSource, Registry, RegistryBuilder};
pub use crate::shape::{
    Constraint, CorrelationId, EndDate, NestedTarget, Shape, ShapeBuilder, ShapeId, StartDate,
};

// ============================================================================
// HOST VALUES AND RESULTS
// ============================================================================

pub use crate::interval::{Interval, Intervals, RangePolicy, Verdict};
pub use crate::value::{Record, Temporal, Value};

// ============================================================================
// VALIDATORS: All built-in validators
// ============================================================================

pub use crate::validators::*;
