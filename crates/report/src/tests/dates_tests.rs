use super::*;

use serde_json::json;

fn day(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("valid date")
}

#[test]
fn parses_iso_and_brazilian_dates() {
    assert_eq!(
        parse_due_date(Some(&json!("2024-03-05"))),
        Some(day(2024, 3, 5))
    );
    assert_eq!(
        parse_due_date(Some(&json!("05/03/2024"))),
        Some(day(2024, 3, 5))
    );
    assert_eq!(
        parse_due_date(Some(&json!("2024-03-05T00:00:00"))),
        Some(day(2024, 3, 5))
    );
    assert_eq!(
        parse_due_date(Some(&json!("2024-03-05T00:00:00.000Z"))),
        Some(day(2024, 3, 5))
    );
}

#[test]
fn keeps_time_of_day() {
    let parsed = parse_due_date(Some(&json!("2024-03-05 14:30:00"))).expect("parsed");
    assert_eq!(parsed.format("%H:%M").to_string(), "14:30");
}

#[test]
fn reads_integers_as_epoch_millis() {
    // 2024-03-05T00:00:00Z
    assert_eq!(
        parse_due_date(Some(&json!(1_709_596_800_000_i64))),
        Some(day(2024, 3, 5))
    );
}

#[test]
fn unparseable_values_become_none() {
    assert_eq!(parse_due_date(None), None);
    assert_eq!(parse_due_date(Some(&Value::Null)), None);
    assert_eq!(parse_due_date(Some(&json!(""))), None);
    assert_eq!(parse_due_date(Some(&json!("sem prazo"))), None);
    assert_eq!(parse_due_date(Some(&json!("31/02/2024"))), None);
    assert_eq!(parse_due_date(Some(&json!(true))), None);
}

#[test]
fn newest_first_puts_missing_dates_last() {
    let mut dates = vec![
        None,
        Some(day(2023, 1, 1)),
        None,
        Some(day(2024, 6, 1)),
        Some(day(2023, 12, 31)),
    ];
    dates.sort_by(|a, b| newest_first(*a, *b));
    assert_eq!(
        dates,
        vec![
            Some(day(2024, 6, 1)),
            Some(day(2023, 12, 31)),
            Some(day(2023, 1, 1)),
            None,
            None,
        ]
    );
}
