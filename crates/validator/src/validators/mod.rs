//! Built-in field validators
//!
//! Single-value predicates that shapes attach to attributes through
//! [`Constraint`](crate::shape::Constraint):
//!
//! - **Text**: [`Email`], [`AllowedStrings`]
//! - **Numeric**: [`AllowedIntegers`]
//! - **Temporal**: [`FutureInstant`]
//!
//! # Examples
//!
//! ```rust,ignore
//! use fieldspan_validator::prelude::*;
//!
//! assert!(email().validate("guest@example.com").is_ok());
//! assert!(allowed_integers([1, 2, 4]).validate(&3).is_err());
//! ```

pub mod allowed;
pub mod email;
pub mod future;

pub use allowed::{AllowedIntegers, AllowedStrings, allowed_integers, allowed_strings};
pub use email::{Email, email};
pub use future::{FutureInstant, future};
