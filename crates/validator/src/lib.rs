//! # fieldspan-validator
//!
//! A declarative cross-field validation engine.
//!
//! Shapes declare, per attribute, what the engine checks:
//!
//! - **Date ranges**: a start attribute and an end attribute sharing a
//!   correlation id, with a minimum number of days or an exact set of allowed
//!   day counts. Elapsed time is rounded to whole days, so spans across a
//!   daylight-saving change measure correctly.
//! - **Nested records**: a contained record, or a collection of them, checked
//!   against another shape's full rule set. Collections stop at the first
//!   failing record.
//! - **Field constraints**: required, email, allow-lists, future instants.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fieldspan_validator::prelude::*;
//!
//! let registry = Registry::builder()
//!     .register(
//!         Shape::builder("Booking")
//!             .start("arrival", StartDate::default())
//!             .end("departure", EndDate::default().minimum_days(2))
//!             .constraint("contact", Constraint::email(email()))
//!             .build(),
//!     )
//!     .build()?;
//!
//! let ctx = ValidationContext::new(registry);
//! assert!(ctx.validate(&booking)?);            // date ranges only
//! let violations = ctx.report(&booking)?;      // everything, with field paths
//! ```
//!
//! Malformed range declarations (an end without a start, two ends on one id)
//! never reject data: the affected range counts as satisfied and the mistake
//! is logged when the registry is built.
//!
//! Configuration problems (an unregistered shape, an unreadable attribute)
//! are returned as [`Error`], never as "invalid".

// ValidationError is returned by every validator; boxing it would add an
// indirection to each call.
#![allow(clippy::result_large_err)]

pub mod config;
pub mod context;
pub mod error;
pub mod foundation;
pub mod interval;
mod macros;
pub mod nested;
pub mod prelude;
pub mod reader;
pub mod registry;
pub mod rules;
pub mod shape;
pub mod validators;
pub mod value;

pub use config::EngineConfig;
pub use context::{ValidationContext, ValidationContextBuilder};
pub use error::{AccessError, Error, Result};
