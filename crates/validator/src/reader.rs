//! Attribute metadata reader.
//!
//! Finds the declarations for an instance and reads attribute values under
//! the configured [`AccessPolicy`]. Never mutates anything.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::{AccessPolicy, EngineConfig};
use crate::error::{Error, Result};
use crate::registry::MetadataSource;
use crate::shape::Shape;
use crate::value::{Record, Value};

/// Outcome of reading one attribute.
#[derive(Debug, Clone)]
pub enum Reading<'a> {
    /// The record handed out a value.
    Value(Value<'a>),
    /// The record refused and the policy is [`AccessPolicy::FailOpen`].
    Unreadable,
}

/// A start or end attribute, placed on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// The attribute is null.
    Absent,
    /// The attribute holds this instant.
    At(DateTime<Utc>),
    /// The attribute could not be read (fail-open only).
    Unreadable,
}

impl Endpoint {
    /// The instant, if present.
    pub fn instant(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::At(at) => Some(at),
            _ => None,
        }
    }
}

/// Reads declarations and values for one engine configuration.
#[derive(Clone, Copy)]
pub struct AttributeReader<'c> {
    source: &'c dyn MetadataSource,
    config: &'c EngineConfig,
}

impl<'c> AttributeReader<'c> {
    /// Creates a reader over `source`.
    pub fn new(source: &'c dyn MetadataSource, config: &'c EngineConfig) -> Self {
        Self { source, config }
    }

    /// Configuration in effect.
    pub fn config(&self) -> &'c EngineConfig {
        self.config
    }

    /// Metadata source in use.
    pub fn source(&self) -> &'c dyn MetadataSource {
        self.source
    }

    /// Looks up the declarations for `instance`'s runtime shape.
    pub fn discover(&self, instance: &dyn Record) -> Result<Arc<Shape>> {
        self.source.resolve(&instance.shape())
    }

    /// Reads `attribute`, applying the access policy.
    pub fn read<'a>(&self, instance: &'a dyn Record, attribute: &str) -> Result<Reading<'a>> {
        match instance.read(attribute) {
            Ok(value) => Ok(Reading::Value(value)),
            Err(source) => match self.config.access_failure {
                AccessPolicy::Fatal => Err(Error::ValueAccess {
                    shape: instance.shape(),
                    attribute: attribute.to_owned(),
                    source,
                }),
                AccessPolicy::FailOpen => {
                    tracing::warn!(
                        shape = %instance.shape(),
                        attribute,
                        error = %source,
                        "Attribute unreadable, treating its rules as satisfied"
                    );
                    Ok(Reading::Unreadable)
                }
            },
        }
    }

    /// Reads a start or end attribute and normalises it to UTC.
    pub fn read_endpoint(&self, instance: &dyn Record, attribute: &str) -> Result<Endpoint> {
        match self.read(instance, attribute)? {
            Reading::Unreadable => Ok(Endpoint::Unreadable),
            Reading::Value(Value::Null) => Ok(Endpoint::Absent),
            Reading::Value(Value::Temporal(t)) => Ok(Endpoint::At(t.to_utc(&self.config.time_zone))),
            Reading::Value(other) => Err(Error::NotTemporal {
                shape: instance.shape(),
                attribute: attribute.to_owned(),
                found: other.kind(),
            }),
        }
    }
}
