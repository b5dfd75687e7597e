//! Future-instant validator.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::foundation::ValidationError;
use crate::value::Temporal;

// ============================================================================
// FUTURE VALIDATOR
// ============================================================================

crate::validator! {
    /// Accepts instants after *now*.
    ///
    /// With `today = true` anything after the start of the current day counts,
    /// so a value from earlier today still passes.
    #[derive(Copy, PartialEq, Eq)]
    pub FutureInstant { today: bool } for DateTime<Utc>;
    rule(self, input) { self.accepts(input, &Utc::now(), &Tz::UTC) }
    error(self, input) { self.violation(input) }
    fn future(today: bool);
}

impl FutureInstant {
    /// Evaluates against an explicit clock and zone.
    ///
    /// The zone decides where "today" starts; it is ignored when `today` is off.
    pub fn check_at(
        &self,
        input: &DateTime<Utc>,
        now: &DateTime<Utc>,
        zone: &Tz,
    ) -> Result<(), ValidationError> {
        if self.accepts(input, now, zone) {
            Ok(())
        } else {
            Err(self.violation(input))
        }
    }

    fn accepts(&self, input: &DateTime<Utc>, now: &DateTime<Utc>, zone: &Tz) -> bool {
        if self.today {
            let today = now.with_timezone(zone).date_naive();
            *input > Temporal::Date(today).to_utc(zone)
        } else {
            input > now
        }
    }

    fn violation(&self, input: &DateTime<Utc>) -> ValidationError {
        ValidationError::new("future", "Must lie in the future")
            .with_param("today", self.today.to_string())
            .with_param("actual", input.to_rfc3339())
    }
}
