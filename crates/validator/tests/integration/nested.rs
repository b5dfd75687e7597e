//! Delegation into contained records and collections.

use fieldspan_validator::prelude::*;

use crate::common::{Doc, Field, context, midnight, plus_days};

fn shapes() -> Vec<Shape> {
    vec![
        Shape::builder("Room")
            .start("check_in", StartDate::default())
            .end("check_out", EndDate::default().minimum_days(1))
            .build(),
        Shape::builder("Suite")
            .start("check_in", StartDate::default())
            .end("check_out", EndDate::default().minimum_days(2))
            .conforms_to("Room")
            .build(),
        Shape::builder("Deluxe")
            .start("check_in", StartDate::default())
            .end("check_out", EndDate::default().minimum_days(3))
            .conforms_to("Suite")
            .build(),
        Shape::builder("Guest")
            .constraint("email", Constraint::email(email()))
            .build(),
        Shape::builder("Booking")
            .nested("rooms", NestedTarget::Collection("Room".into()))
            .nested("guest", NestedTarget::Single("Guest".into()))
            .build(),
    ]
}

fn room(nights: i64) -> Doc {
    let start = midnight(2011, 3, 25);
    Doc::new("Room")
        .with("check_in", start)
        .with("check_out", plus_days(start, nights))
}

fn rooms() -> NestedTarget {
    NestedTarget::Collection("Room".into())
}

#[test]
fn test_collection_stops_at_first_invalid_element() {
    let ctx = context(shapes());
    let list: Vec<Doc> = (0..10).map(|i| room(if i == 5 { 0 } else { 3 })).collect();

    assert!(!ctx.validate_nested(&Value::records(&list), &rooms()).unwrap());

    for (index, doc) in list.iter().enumerate() {
        if index <= 5 {
            assert!(doc.reads() > 0, "room {index} should have been checked");
        } else {
            assert_eq!(doc.reads(), 0, "room {index} should have been skipped");
        }
    }
}

#[test]
fn test_all_valid_elements() {
    let ctx = context(shapes());
    let list: Vec<Doc> = (1..=4).map(room).collect();
    assert!(ctx.validate_nested(&Value::records(&list), &rooms()).unwrap());

    let empty: Vec<Doc> = Vec::new();
    assert!(ctx.validate_nested(&Value::records(&empty), &rooms()).unwrap());
}

#[test]
fn test_null_is_valid() {
    let ctx = context(shapes());
    assert!(ctx.validate_nested(&Value::Null, &rooms()).unwrap());
    assert!(
        ctx.validate_nested(&Value::Null, &NestedTarget::Single("Guest".into()))
            .unwrap()
    );
}

#[test]
fn test_incompatible_element_fails_without_reading_it() {
    let ctx = context(shapes());
    let guest = Doc::new("Guest").with("email", "ada@example.com");

    assert!(
        !ctx.validate_nested(&Value::Record(&guest), &NestedTarget::Single("Room".into()))
            .unwrap()
    );
    assert_eq!(guest.reads(), 0);
}

#[test]
fn test_conforming_element_uses_target_rules() {
    let ctx = context(shapes());
    // one night breaks a Suite's own two-night minimum, but the Room minimum is 1
    let suite = Doc::new("Suite")
        .with("check_in", midnight(2011, 1, 27))
        .with("check_out", midnight(2011, 1, 28));

    assert!(
        ctx.validate_nested(&Value::Record(&suite), &NestedTarget::Single("Room".into()))
            .unwrap()
    );
    assert!(!ctx.is_valid(&suite).unwrap());
}

#[test]
fn test_conformance_follows_the_chain() {
    let ctx = context(shapes());
    let deluxe = Doc::new("Deluxe")
        .with("check_in", midnight(2011, 1, 27))
        .with("check_out", midnight(2011, 1, 28));
    let list = vec![room(2), deluxe];

    assert!(ctx.validate_nested(&Value::records(&list), &rooms()).unwrap());
    assert!(list[1].reads() > 0);

    let short = vec![Doc::new("Deluxe")
        .with("check_in", midnight(2011, 1, 27))
        .with("check_out", midnight(2011, 1, 27))];
    assert!(!ctx.validate_nested(&Value::records(&short), &rooms()).unwrap());
}

#[test]
fn test_cardinality_mismatch() {
    let ctx = context(shapes());
    let single = room(3);
    let list = vec![room(3)];

    assert!(!ctx.validate_nested(&Value::Record(&single), &rooms()).unwrap());
    assert!(
        !ctx.validate_nested(&Value::records(&list), &NestedTarget::Single("Room".into()))
            .unwrap()
    );
    assert!(!ctx.validate_nested(&Value::Integer(3), &rooms()).unwrap());
}

#[test]
fn test_unknown_target_is_an_error() {
    let ctx = context(shapes());
    let err = ctx
        .validate_nested(&Value::Null, &NestedTarget::Single("Ghost".into()))
        .unwrap_err();
    assert!(matches!(err, Error::UnknownShape { .. }));
}

#[test]
fn test_unregistered_target_rejected_at_registration() {
    let err = Registry::builder()
        .register(
            Shape::builder("Booking")
                .nested("rooms", NestedTarget::Collection("Room".into()))
                .build(),
        )
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        Error::UnresolvedTarget { ref attribute, .. } if attribute == "rooms"
    ));
}

#[test]
fn test_booking_walks_every_level() {
    let ctx = context(shapes());
    let valid = Doc::new("Booking")
        .with("rooms", (1..=3).map(room).collect::<Vec<_>>())
        .with("guest", Doc::new("Guest").with("email", "ada@example.com"));
    assert!(ctx.is_valid(&valid).unwrap());

    let bad_guest = Doc::new("Booking")
        .with("rooms", Vec::<Doc>::new())
        .with("guest", Doc::new("Guest").with("email", "not an address"));
    assert!(!ctx.is_valid(&bad_guest).unwrap());

    let no_guest = Doc::new("Booking")
        .with("rooms", vec![room(2)])
        .with("guest", Field::Null);
    assert!(ctx.is_valid(&no_guest).unwrap());
}
