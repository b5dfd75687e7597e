//! Range evaluator: calendar-day distance and policy check.
//!
//! Elapsed time is the true difference between two instants, rounded to the
//! nearest whole day. Rounding absorbs the hour gained or lost across a
//! daylight-saving change, so five wall-clock days always count as five.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};

use super::{Interval, RangePolicy};
use crate::config::DayRounding;
use crate::reader::Endpoint;

/// Milliseconds in a nominal day.
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Rounds a millisecond span to whole days.
pub fn round_days(millis: i64, rounding: DayRounding) -> i64 {
    let days = millis.div_euclid(MILLIS_PER_DAY);
    let rest = millis.rem_euclid(MILLIS_PER_DAY);
    match (2 * rest).cmp(&MILLIS_PER_DAY) {
        std::cmp::Ordering::Less => days,
        std::cmp::Ordering::Greater => days + 1,
        // exact half: `days + 0.5`
        std::cmp::Ordering::Equal => match rounding {
            DayRounding::HalfAwayFromZero if days >= 0 => days + 1,
            DayRounding::HalfAwayFromZero => days,
            DayRounding::HalfEven if days % 2 == 0 => days,
            DayRounding::HalfEven => days + 1,
        },
    }
}

/// Whole days from `start` to `end`; negative when `end` comes first.
pub fn elapsed_days(start: &DateTime<Utc>, end: &DateTime<Utc>, rounding: DayRounding) -> i64 {
    round_days((*end - *start).num_milliseconds(), rounding)
}

/// Decomposed result for one interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Malformed declarations; satisfied.
    Conflicted,
    /// A side is null or no end was declared; satisfied.
    Incomplete,
    /// A side could not be read under fail-open; satisfied.
    Unreadable,
    /// The policy holds.
    Within {
        /// Rounded elapsed days.
        days: i64,
    },
    /// Fewer days than the minimum.
    TooShort {
        /// Rounded elapsed days.
        days: i64,
        /// Required minimum.
        minimum: u32,
    },
    /// Day count outside the allowed set.
    NotAllowed {
        /// Rounded elapsed days.
        days: i64,
        /// Allowed counts.
        allowed: BTreeSet<u32>,
    },
}

impl Verdict {
    /// `false` only for [`Verdict::TooShort`] and [`Verdict::NotAllowed`].
    pub fn is_satisfied(&self) -> bool {
        !matches!(self, Self::TooShort { .. } | Self::NotAllowed { .. })
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflicted => f.write_str("conflicting declarations"),
            Self::Incomplete => f.write_str("incomplete range"),
            Self::Unreadable => f.write_str("unreadable range"),
            Self::Within { days } => write!(f, "{days} day(s), within policy"),
            Self::TooShort { days, minimum } => {
                write!(f, "{days} day(s), at least {minimum} required")
            }
            Self::NotAllowed { days, allowed } => {
                let allowed: Vec<_> = allowed.iter().map(u32::to_string).collect();
                write!(f, "{days} day(s), expected one of {}", allowed.join(", "))
            }
        }
    }
}

impl Interval {
    /// Judges this interval.
    pub fn verdict(&self, rounding: DayRounding) -> Verdict {
        if self.conflict {
            return Verdict::Conflicted;
        }
        let Some(end) = &self.end else {
            return Verdict::Incomplete;
        };
        let (start, end) = match (&self.start.endpoint, &end.endpoint) {
            (Endpoint::Unreadable, _) | (_, Endpoint::Unreadable) => return Verdict::Unreadable,
            (Endpoint::At(start), Endpoint::At(end)) => (start, end),
            _ => return Verdict::Incomplete,
        };

        let days = elapsed_days(start, end, rounding);
        tracing::trace!(correlation = self.correlation, days, policy = ?self.policy, "Evaluated date range");

        match &self.policy {
            RangePolicy::AllowedDayCounts(allowed) => {
                if u32::try_from(days).is_ok_and(|d| allowed.contains(&d)) {
                    Verdict::Within { days }
                } else {
                    Verdict::NotAllowed {
                        days,
                        allowed: allowed.clone(),
                    }
                }
            }
            RangePolicy::MinimumDays(minimum) => {
                if days >= i64::from(*minimum) {
                    Verdict::Within { days }
                } else {
                    Verdict::TooShort {
                        days,
                        minimum: *minimum,
                    }
                }
            }
        }
    }

    /// Shorthand for `verdict(rounding).is_satisfied()`.
    pub fn is_satisfied(&self, rounding: DayRounding) -> bool {
        self.verdict(rounding).is_satisfied()
    }
}
