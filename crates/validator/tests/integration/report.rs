//! Full reports: every violation with its field path.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use fieldspan_validator::prelude::*;
use pretty_assertions::assert_eq;

use crate::common::{Doc, Field, context, midnight, plus_days};

fn shapes() -> Vec<Shape> {
    vec![
        Shape::builder("Room")
            .start("check_in", StartDate::default())
            .end("check_out", EndDate::default().minimum_days(1))
            .build(),
        Shape::builder("Reservation")
            .start("arrival", StartDate::default())
            .end("departure", EndDate::default().minimum_days(2))
            .constraint("contact", Constraint::email(email()))
            .constraint("guests", Constraint::allowed_integers(1..=4))
            .constraint("board", Constraint::allowed_strings(["none", "breakfast", "half"]))
            .constraint("reference", Constraint::required())
            .constraint("arrival", Constraint::future(true))
            .nested("rooms", NestedTarget::Collection("Room".into()))
            .build(),
    ]
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2011, 1, 20, 12, 0, 0).unwrap()
}

fn room(nights: i64) -> Doc {
    let start = midnight(2011, 1, 27);
    Doc::new("Room")
        .with("check_in", start)
        .with("check_out", plus_days(start, nights))
}

fn reservation(nights: i64, rooms: Vec<Doc>) -> Doc {
    let arrival = midnight(2011, 1, 27);
    Doc::new("Reservation")
        .with("arrival", arrival)
        .with("departure", plus_days(arrival, nights))
        .with("contact", "ada@example.com")
        .with("guests", 2_i64)
        .with("board", "breakfast")
        .with("reference", "R-1001")
        .with("rooms", rooms)
}

#[test]
fn test_valid_reservation_reports_nothing() {
    let ctx = context(shapes());
    let doc = reservation(3, (0..3).map(|_| room(3)).collect());
    let errors = ctx.report_at(&doc, now()).unwrap();
    assert!(errors.is_empty(), "{errors}");
}

#[test]
fn test_collects_every_violation_in_order() {
    let ctx = context(shapes());
    let rooms: Vec<Doc> = (0..8).map(|i| room(if i == 5 { -1 } else { 2 })).collect();
    let doc = reservation(1, rooms)
        .with("contact", "not an address")
        .with("guests", 7_i64)
        .with("board", "full")
        .with("reference", Field::Null);

    let errors = ctx.report_at(&doc, now()).unwrap();

    let codes: Vec<_> = errors.iter().map(|e| &*e.code).collect();
    assert_eq!(
        codes,
        ["date_range", "invalid_format", "not_allowed", "not_allowed", "required", "nested"]
    );
    assert_eq!(
        errors.fields(),
        [
            "departure",
            "contact",
            "guests",
            "board",
            "reference",
            "rooms[5]",
            "rooms[5].check_out",
        ]
    );

    let nested = &errors.errors()[5];
    assert_eq!(nested.param("index"), Some("5"));
    assert_eq!(nested.nested[0].param("days"), Some("-1"));
}

#[test]
fn test_collection_report_stops_at_first_failure() {
    let ctx = context(shapes());
    let rooms: Vec<Doc> = (0..6).map(|i| room(if i >= 2 { 0 } else { 1 })).collect();
    let doc = reservation(3, rooms);

    let errors = ctx.report_at(&doc, now()).unwrap();
    assert_eq!(errors.fields(), ["rooms[2]", "rooms[2].check_out"]);

    let Some(Field::Many(rooms)) = doc.field("rooms") else {
        panic!("rooms missing");
    };
    assert!(rooms[3..].iter().all(|room| room.reads() == 0));
}

#[test]
fn test_future_constraint_is_relative_to_now() {
    let ctx = context(shapes());
    let doc = reservation(3, Vec::new());

    let later = Utc.with_ymd_and_hms(2011, 2, 1, 0, 0, 0).unwrap();
    let errors = ctx.report_at(&doc, later).unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.errors()[0].code, "future");
    assert_eq!(errors.errors()[0].field.as_deref(), Some("arrival"));
}

#[test]
fn test_future_today_counts_from_local_midnight() {
    let shape = Shape::builder("Event")
        .constraint("opens", Constraint::future(true))
        .constraint("closes", Constraint::future(false))
        .build();
    let ctx = context([shape]);

    // 08:00 in Berlin is 07:00 UTC, three hours before `now`
    let morning = NaiveDate::from_ymd_opt(2011, 1, 27)
        .and_then(|d| d.and_hms_opt(8, 0, 0))
        .unwrap();
    let now = Utc.with_ymd_and_hms(2011, 1, 27, 10, 0, 0).unwrap();
    let doc = Doc::new("Event").with("opens", morning).with("closes", morning);

    let errors = ctx.report_at(&doc, now).unwrap();
    assert_eq!(errors.fields(), ["closes"]);
}

#[test]
fn test_constraint_type_mismatch() {
    let shape = Shape::builder("Counter")
        .constraint("count", Constraint::allowed_integers([1, 2]))
        .build();
    let ctx = context([shape]);
    let doc = Doc::new("Counter").with("count", "two");

    let errors = ctx.report(&doc).unwrap();
    let error = &errors.errors()[0];
    assert_eq!(error.code, "type_mismatch");
    assert_eq!(error.param("expected"), Some("integer"));
    assert_eq!(error.param("actual"), Some("text"));
}

#[test]
fn test_null_allowed_flag() {
    let shape = Shape::builder("Contact")
        .constraint("primary", Constraint::email(email()).null_allowed(false))
        .constraint("secondary", Constraint::email(email()))
        .build();
    let ctx = context([shape]);
    let doc = Doc::new("Contact")
        .with("primary", Field::Null)
        .with("secondary", Field::Null);

    let errors = ctx.report(&doc).unwrap();
    assert_eq!(errors.fields(), ["primary"]);
    assert_eq!(errors.errors()[0].code, "required");
}

#[test]
fn test_error_json_shape() {
    let ctx = context(shapes());
    let rooms: Vec<Doc> = vec![room(2), room(0)];
    let doc = reservation(3, rooms);

    let errors = ctx.report_at(&doc, now()).unwrap();
    let json = errors.errors()[0].to_json_value();

    assert_eq!(json["code"], "nested");
    assert_eq!(json["field"], "rooms[1]");
    assert_eq!(json["params"]["index"], "1");
    assert_eq!(json["nested"][0]["code"], "date_range");
    assert_eq!(json["nested"][0]["field"], "rooms[1].check_out");
    assert_eq!(json["nested"][0]["params"]["minimum_days"], "1");
    assert_eq!(json["nested"][0]["params"]["start"], "check_in");
}
