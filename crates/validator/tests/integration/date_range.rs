//! Correlated date ranges on flat records.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};
use fieldspan_validator::prelude::*;
use rstest::rstest;

use crate::common::{Doc, context, midnight, plus_days};

fn range(minimum_days: u32) -> Shape {
    Shape::builder("Range")
        .start("from", StartDate::default())
        .end("to", EndDate::default().minimum_days(minimum_days))
        .build()
}

fn stay(from: Option<NaiveDateTime>, to: Option<NaiveDateTime>) -> Doc {
    Doc::new("Range").with("from", from).with("to", to)
}

// January (no transition), March (spring forward on the 27th), October
// (fall back on the 30th) and the week after the spring change, all in
// Europe/Berlin.
#[rstest]
#[case(midnight(2011, 1, 27))]
#[case(midnight(2011, 3, 25))]
#[case(midnight(2011, 10, 28))]
#[case(midnight(2011, 3, 30))]
fn test_minimum_days_across_dst(#[case] start: NaiveDateTime) {
    let ctx = context([range(5)]);

    assert!(ctx.validate(&stay(Some(start), Some(plus_days(start, 5)))).unwrap());
    assert!(ctx.validate(&stay(Some(start), Some(plus_days(start, 6)))).unwrap());
    assert!(!ctx.validate(&stay(Some(start), Some(plus_days(start, 3)))).unwrap());
}

#[rstest]
#[case(None, Some(midnight(2011, 2, 1)))]
#[case(Some(midnight(2011, 1, 27)), None)]
#[case(None, None)]
fn test_null_side_is_valid(#[case] from: Option<NaiveDateTime>, #[case] to: Option<NaiveDateTime>) {
    let ctx = context([range(5)]);
    assert!(ctx.validate(&stay(from, to)).unwrap());
}

#[test]
fn test_orphan_declarations_are_ignored() {
    let only_start = Shape::builder("OnlyStart")
        .start("from", StartDate::default())
        .build();
    let only_end = Shape::builder("OnlyEnd")
        .end("to", EndDate::default().minimum_days(100))
        .build();
    let ctx = context([only_start, only_end]);

    let start = midnight(2011, 1, 27);
    let doc = Doc::new("OnlyStart").with("from", start);
    assert!(ctx.validate(&doc).unwrap());

    let doc = Doc::new("OnlyEnd").with("to", start);
    assert!(ctx.validate(&doc).unwrap());
    assert!(ctx.intervals(&doc).unwrap().is_empty());
}

#[test]
fn test_almost_full_day_rounds_up() {
    let ctx = context([range(10)]);
    let from = midnight(2012, 11, 18);
    let to = NaiveDate::from_ymd_opt(2012, 11, 27)
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .unwrap();
    assert!(ctx.validate(&stay(Some(from), Some(to))).unwrap());
}

#[test]
fn test_two_independent_ranges() {
    let shape = Shape::builder("Twin")
        .start("a", StartDate::new(0))
        .end("b", EndDate::new(0).minimum_days(3))
        .start("c", StartDate::new(1))
        .end("d", EndDate::new(1).minimum_days(2))
        .build();
    let ctx = context([shape]);
    let start = midnight(2011, 1, 27);

    let twin = |d: i64| {
        Doc::new("Twin")
            .with("a", start)
            .with("b", plus_days(start, 3))
            .with("c", plus_days(start, 3))
            .with("d", plus_days(start, d))
    };

    assert!(ctx.validate(&twin(6)).unwrap());
    assert!(ctx.validate(&twin(5)).unwrap());

    let doc = twin(-6);
    assert!(!ctx.validate(&doc).unwrap());
    let intervals = ctx.intervals(&doc).unwrap();
    assert!(intervals.get(0).unwrap().is_satisfied(DayRounding::default()));
    assert_eq!(
        intervals.violations().map(|(i, _)| i.correlation()).collect::<Vec<_>>(),
        [1]
    );
}

#[test]
fn test_shared_middle_attribute() {
    let shape = Shape::builder("Chain")
        .start("first", StartDate::new(0))
        .end("middle", EndDate::new(0).minimum_days(2))
        .start("middle", StartDate::new(2))
        .end("last", EndDate::new(2).minimum_days(1))
        .build();
    let ctx = context([shape]);
    let start = midnight(2011, 1, 27);

    let chain = |last: i64| {
        Doc::new("Chain")
            .with("first", start)
            .with("middle", plus_days(start, 3))
            .with("last", plus_days(start, last))
    };

    assert!(ctx.validate(&chain(5)).unwrap());
    assert!(!ctx.validate(&chain(2)).unwrap());
}

#[test]
fn test_second_end_on_one_id_is_not_evaluated() {
    let shape = Shape::builder("Wrong")
        .start("first", StartDate::new(0))
        .end("middle", EndDate::new(0).minimum_days(2))
        .end("last", EndDate::new(0).minimum_days(1))
        .build();
    let ctx = context([shape]);
    let start = midnight(2011, 1, 27);

    let doc = Doc::new("Wrong")
        .with("first", start)
        .with("middle", plus_days(start, 3))
        .with("last", plus_days(start, -3));

    assert!(ctx.validate(&doc).unwrap());
    assert!(ctx.intervals(&doc).unwrap().get(0).unwrap().is_conflicted());
}

#[rstest]
#[case(10, true)]
#[case(15, true)]
#[case(20, true)]
#[case(25, false)]
#[case(-5, false)]
#[case(12, false)]
fn test_allowed_day_counts(#[case] days: i64, #[case] valid: bool) {
    let plain = Shape::builder("Allowed")
        .start("from", StartDate::default())
        .end("to", EndDate::default().allowed_day_counts([10, 15, 20]))
        .build();
    // the allowed set wins over a minimum that would reject every entry
    let with_minimum = Shape::builder("AllowedWithMinimum")
        .start("from", StartDate::default())
        .end(
            "to",
            EndDate::default()
                .minimum_days(25)
                .allowed_day_counts([10, 15, 20]),
        )
        .build();
    let ctx = context([plain, with_minimum]);
    let start = midnight(2011, 1, 27);

    for shape in ["Allowed", "AllowedWithMinimum"] {
        let doc = Doc::new(shape)
            .with("from", start)
            .with("to", plus_days(start, days));
        assert_eq!(ctx.validate(&doc).unwrap(), valid, "{shape} with {days} days");
    }
}

#[test]
fn test_zero_minimum() {
    let ctx = context([range(0)]);
    let start = midnight(2011, 1, 27);

    assert!(ctx.validate(&stay(Some(start), Some(start))).unwrap());
    assert!(
        ctx.validate(&stay(Some(start), Some(start + TimeDelta::minutes(30))))
            .unwrap()
    );
    // an hour early still rounds to zero days
    assert!(
        ctx.validate(&stay(Some(start), Some(start - TimeDelta::hours(1))))
            .unwrap()
    );
    assert!(!ctx.validate(&stay(Some(start), Some(plus_days(start, -1)))).unwrap());
}

#[test]
fn test_wall_time_inside_spring_gap() {
    let ctx = context([range(5)]);
    let from = NaiveDate::from_ymd_opt(2011, 3, 22)
        .and_then(|d| d.and_hms_opt(2, 30, 0))
        .unwrap();
    // 02:30 on 2011-03-27 does not exist in Berlin
    let to = NaiveDate::from_ymd_opt(2011, 3, 27)
        .and_then(|d| d.and_hms_opt(2, 30, 0))
        .unwrap();

    let intervals = ctx.intervals(&stay(Some(from), Some(to))).unwrap();
    let (_, verdict) = intervals.verdicts().next().unwrap();
    assert_eq!(verdict, Verdict::Within { days: 5 });
}

#[test]
fn test_mixed_temporal_kinds() {
    let ctx = context([range(2)]);
    let from = chrono_tz::Europe::Berlin
        .with_ymd_and_hms(2011, 1, 27, 0, 0, 0)
        .unwrap();
    let to = Temporal::Date(NaiveDate::from_ymd_opt(2011, 1, 29).unwrap());

    let doc = Doc::new("Range")
        .with("from", from)
        .with("to", to);
    assert!(ctx.validate(&doc).unwrap());
}

#[rstest]
#[case(DayRounding::HalfAwayFromZero, true)]
#[case(DayRounding::HalfEven, false)]
fn test_rounding_tie_follows_config(#[case] rounding: DayRounding, #[case] valid: bool) {
    crate::common::init_tracing();
    let registry = Registry::builder().register(range(3)).build().unwrap();
    let ctx = ValidationContext::builder(registry).rounding(rounding).build();

    // exactly two and a half days
    let from = Utc.with_ymd_and_hms(2011, 1, 1, 0, 0, 0).unwrap();
    let to = from + TimeDelta::hours(60);
    let doc = Doc::new("Range")
        .with("from", Temporal::from(from))
        .with("to", Temporal::from(to));

    assert_eq!(ctx.validate(&doc).unwrap(), valid);
}

#[test]
fn test_non_temporal_endpoint_is_a_configuration_error() {
    let ctx = context([range(1)]);
    let doc = Doc::new("Range")
        .with("from", "yesterday")
        .with("to", midnight(2011, 1, 27));

    let err = ctx.validate(&doc).unwrap_err();
    assert!(err.is_declaration_error());
    assert!(matches!(err, Error::NotTemporal { found: "text", .. }));
}
