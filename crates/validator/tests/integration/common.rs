//! Shared fixtures.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta};
use chrono_tz::Tz;
use fieldspan_validator::prelude::*;

/// Owned attribute value of a [`Doc`].
#[derive(Debug)]
pub enum Field {
    Null,
    At(Temporal),
    Int(i64),
    Text(String),
    One(Box<Doc>),
    Many(Vec<Doc>),
    /// Reading this attribute fails with [`AccessError::Denied`].
    Denied,
}

impl From<Temporal> for Field {
    fn from(at: Temporal) -> Self {
        Self::At(at)
    }
}

impl From<NaiveDateTime> for Field {
    fn from(at: NaiveDateTime) -> Self {
        Self::At(at.into())
    }
}

impl From<DateTime<Tz>> for Field {
    fn from(at: DateTime<Tz>) -> Self {
        Self::At(at.into())
    }
}

impl<T: Into<Field>> From<Option<T>> for Field {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<i64> for Field {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for Field {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<Doc> for Field {
    fn from(doc: Doc) -> Self {
        Self::One(Box::new(doc))
    }
}

impl From<Vec<Doc>> for Field {
    fn from(docs: Vec<Doc>) -> Self {
        Self::Many(docs)
    }
}

/// A record with named fields that counts how often it is read.
#[derive(Debug)]
pub struct Doc {
    shape: &'static str,
    fields: Vec<(&'static str, Field)>,
    reads: AtomicUsize,
}

impl Doc {
    pub fn new(shape: &'static str) -> Self {
        Self {
            shape,
            fields: Vec::new(),
            reads: AtomicUsize::new(0),
        }
    }

    /// Sets `name`, replacing an earlier value.
    pub fn with(mut self, name: &'static str, value: impl Into<Field>) -> Self {
        let value = value.into();
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }
}

impl Record for Doc {
    fn shape(&self) -> ShapeId {
        ShapeId::from_static(self.shape)
    }

    fn read(&self, attribute: &str) -> Result<Value<'_>, AccessError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        let field = self
            .field(attribute)
            .ok_or_else(|| AccessError::Unknown(attribute.to_owned()))?;
        Ok(match field {
            Field::Null => Value::Null,
            Field::At(t) => Value::Temporal(*t),
            Field::Int(n) => Value::Integer(*n),
            Field::Text(s) => Value::Text(s),
            Field::One(doc) => Value::Record(doc.as_ref()),
            Field::Many(docs) => Value::records(docs),
            Field::Denied => return Err(AccessError::Denied(attribute.to_owned())),
        })
    }
}

/// Midnight on the given day, wall-clock time.
pub fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap()
}

/// `at` moved by whole calendar days, keeping the wall-clock time.
pub fn plus_days(at: NaiveDateTime, days: i64) -> NaiveDateTime {
    at + TimeDelta::days(days)
}

/// Registry over `shapes`, with the context placed in Europe/Berlin.
pub fn context(shapes: impl IntoIterator<Item = Shape>) -> ValidationContext {
    init_tracing();
    let registry = shapes
        .into_iter()
        .fold(Registry::builder(), RegistryBuilder::register)
        .build()
        .unwrap();
    ValidationContext::builder(registry)
        .time_zone(chrono_tz::Europe::Berlin)
        .build()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}
