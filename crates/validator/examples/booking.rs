//! Hotel booking example for fieldspan-validator.
//!
//! A booking holds a stay (check-in, check-out) and a list of rooms, each
//! with its own date range. Run with `RUST_LOG=debug` to see the engine's
//! decisions.

use chrono::{NaiveDate, TimeDelta, Utc};
use fieldspan_validator::prelude::*;
use tracing_subscriber::EnvFilter;

struct Room {
    check_in: NaiveDate,
    check_out: Option<NaiveDate>,
}

impl Record for Room {
    fn shape(&self) -> ShapeId {
        ShapeId::from_static("Room")
    }

    fn read(&self, attribute: &str) -> Result<Value<'_>, AccessError> {
        match attribute {
            "check_in" => Ok(self.check_in.into()),
            "check_out" => Ok(self.check_out.into()),
            other => Err(AccessError::Unknown(other.to_owned())),
        }
    }
}

struct Booking {
    contact: String,
    check_in: NaiveDate,
    check_out: NaiveDate,
    rooms: Vec<Room>,
}

impl Record for Booking {
    fn shape(&self) -> ShapeId {
        ShapeId::from_static("Booking")
    }

    fn read(&self, attribute: &str) -> Result<Value<'_>, AccessError> {
        match attribute {
            "contact" => Ok((&self.contact).into()),
            "check_in" => Ok(self.check_in.into()),
            "check_out" => Ok(self.check_out.into()),
            "rooms" => Ok(Value::records(&self.rooms)),
            other => Err(AccessError::Unknown(other.to_owned())),
        }
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn main() -> fieldspan_validator::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let registry = Registry::builder()
        .register(
            Shape::builder("Room")
                .start("check_in", StartDate::default())
                .end("check_out", EndDate::default().minimum_days(1))
                .build(),
        )
        .register(
            Shape::builder("Booking")
                .start("check_in", StartDate::default())
                .end("check_out", EndDate::default().allowed_day_counts([3, 7, 14]))
                .constraint("contact", Constraint::email(email()).null_allowed(false))
                .constraint("check_in", Constraint::future(true))
                .nested("rooms", NestedTarget::Collection("Room".into()))
                .build(),
        )
        .build()?;

    let ctx = ValidationContext::builder(registry)
        .time_zone(chrono_tz::Europe::Berlin)
        .build();

    let today = Utc::now().date_naive();
    let arrival = today + TimeDelta::days(30);

    // Valid booking: a week, two rooms
    let good = Booking {
        contact: "guest@example.com".to_owned(),
        check_in: arrival,
        check_out: arrival + TimeDelta::days(7),
        rooms: vec![
            Room {
                check_in: arrival,
                check_out: Some(arrival + TimeDelta::days(7)),
            },
            Room {
                check_in: arrival,
                check_out: None,
            },
        ],
    };
    println!("good booking valid: {}", ctx.is_valid(&good)?);

    // Invalid booking: five nights, bad address, a room leaving before it arrives
    let bad = Booking {
        contact: "guest at example.com".to_owned(),
        check_in: date(2011, 3, 25),
        check_out: date(2011, 3, 30),
        rooms: vec![
            Room {
                check_in: date(2011, 3, 25),
                check_out: Some(date(2011, 3, 27)),
            },
            Room {
                check_in: date(2011, 3, 25),
                check_out: Some(date(2011, 3, 24)),
            },
            Room {
                check_in: date(2011, 3, 25),
                check_out: Some(date(2011, 3, 20)),
            },
        ],
    };
    let errors = ctx.report(&bad)?;
    println!("bad booking: {} error(s)", errors.len());
    for error in errors.iter().flat_map(ValidationError::flatten) {
        println!("  {error}");
    }

    let intervals = ctx.intervals(&bad)?;
    for (interval, verdict) in intervals.verdicts() {
        println!("  range {}: {verdict}", interval.correlation());
    }

    Ok(())
}
