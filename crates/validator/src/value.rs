//! Values handed to the engine by host records.
//!
//! The engine never introspects host types. A host implements [`Record`],
//! names its [`ShapeId`], and answers [`Record::read`] with a borrowed
//! [`Value`].

use std::fmt;

use chrono::{
    DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta,
    TimeZone, Utc,
};
use chrono_tz::Tz;

use crate::error::AccessError;
use crate::shape::ShapeId;

// ============================================================================
// RECORD
// ============================================================================

/// An instance the engine can validate.
///
/// # Examples
///
/// ```rust,ignore
/// struct Stay { check_in: Option<NaiveDate>, check_out: Option<NaiveDate> }
///
/// impl Record for Stay {
///     fn shape(&self) -> ShapeId { ShapeId::from_static("Stay") }
///
///     fn read(&self, attribute: &str) -> Result<Value<'_>, AccessError> {
///         match attribute {
///             "check_in" => Ok(self.check_in.into()),
///             "check_out" => Ok(self.check_out.into()),
///             other => Err(AccessError::Unknown(other.to_owned())),
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Runtime shape of this instance.
    fn shape(&self) -> ShapeId;

    /// Reads one attribute.
    fn read(&self, attribute: &str) -> Result<Value<'_>, AccessError>;
}

// ============================================================================
// TEMPORAL
// ============================================================================

/// A point in time as supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temporal {
    /// Date-time with an explicit offset.
    Zoned(DateTime<FixedOffset>),
    /// Wall-clock date-time, placed in the configured zone.
    Local(NaiveDateTime),
    /// Calendar date, taken as local midnight in the configured zone.
    Date(NaiveDate),
}

impl Temporal {
    /// Places this value on the timeline.
    ///
    /// Naive values are read as wall-clock time in `zone`. An ambiguous wall
    /// time (autumn fold) resolves to the earlier instant; a wall time inside a
    /// spring gap is pushed forward by the length of the gap.
    pub fn to_utc(&self, zone: &Tz) -> DateTime<Utc> {
        match self {
            Self::Zoned(at) => at.with_timezone(&Utc),
            Self::Local(naive) => place(naive, zone),
            Self::Date(date) => place(&date.and_time(NaiveTime::MIN), zone),
        }
    }
}

fn place(naive: &NaiveDateTime, zone: &Tz) -> DateTime<Utc> {
    match zone.from_local_datetime(naive) {
        LocalResult::Single(at) => at.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            // Use the offset in force before the gap.
            let before = zone
                .offset_from_utc_datetime(&(*naive - TimeDelta::days(1)))
                .fix();
            let seconds = i64::from(before.local_minus_utc());
            Utc.from_utc_datetime(&(*naive - TimeDelta::seconds(seconds)))
        }
    }
}

impl<Z: TimeZone> From<DateTime<Z>> for Temporal {
    fn from(at: DateTime<Z>) -> Self {
        Self::Zoned(at.fixed_offset())
    }
}

impl From<NaiveDateTime> for Temporal {
    fn from(at: NaiveDateTime) -> Self {
        Self::Local(at)
    }
}

impl From<NaiveDate> for Temporal {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

// ============================================================================
// VALUE
// ============================================================================

/// One attribute value, borrowed from its record.
#[derive(Clone)]
pub enum Value<'a> {
    /// Absent.
    Null,
    /// Date, date-time or zoned date-time.
    Temporal(Temporal),
    /// Whole number.
    Integer(i64),
    /// Text.
    Text(&'a str),
    /// A single contained record.
    Record(&'a dyn Record),
    /// An ordered collection of contained records.
    Records(Vec<&'a dyn Record>),
}

impl<'a> Value<'a> {
    /// Builds a [`Value::Records`] from any iterator of records.
    pub fn records<I, R>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a R>,
        R: Record + 'a,
    {
        Self::Records(items.into_iter().map(|r| r as &dyn Record).collect())
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Temporal(_) => "temporal",
            Self::Integer(_) => "integer",
            Self::Text(_) => "text",
            Self::Record(_) => "record",
            Self::Records(_) => "records",
        }
    }

    /// Returns the temporal payload, if any.
    pub fn as_temporal(&self) -> Option<&Temporal> {
        match self {
            Self::Temporal(t) => Some(t),
            _ => None,
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Temporal(t) => f.debug_tuple("Temporal").field(t).finish(),
            Self::Integer(n) => f.debug_tuple("Integer").field(n).finish(),
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::Record(r) => f.debug_tuple("Record").field(&r.shape()).finish(),
            Self::Records(rs) => f
                .debug_struct("Records")
                .field("len", &rs.len())
                .finish(),
        }
    }
}

impl From<Temporal> for Value<'_> {
    fn from(t: Temporal) -> Self {
        Self::Temporal(t)
    }
}

impl<Z: TimeZone> From<DateTime<Z>> for Value<'_> {
    fn from(at: DateTime<Z>) -> Self {
        Self::Temporal(at.into())
    }
}

impl From<NaiveDateTime> for Value<'_> {
    fn from(at: NaiveDateTime) -> Self {
        Self::Temporal(at.into())
    }
}

impl From<NaiveDate> for Value<'_> {
    fn from(date: NaiveDate) -> Self {
        Self::Temporal(date.into())
    }
}

impl From<i64> for Value<'_> {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Self::Text(s)
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(s: &'a String) -> Self {
        Self::Text(s)
    }
}

impl<'a, T: Into<Value<'a>>> From<Option<T>> for Value<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
