use attendance_register::analytics::aggregate;
use attendance_register::analytics::result::HourCount;
use attendance_register::model::attendance::{AttendanceRecord, UserCategory};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::json;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 7).unwrap()
}

fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.from_utc_datetime(&today().and_hms_opt(h, m, s).unwrap())
}

fn record(
    category: UserCategory,
    check_in: Option<DateTime<Utc>>,
    check_out: Option<DateTime<Utc>>,
    purpose: &str,
) -> AttendanceRecord {
    AttendanceRecord {
        user_id: 42,
        user_category: category,
        date: today(),
        check_in_time: check_in,
        check_out_time: check_out,
        purpose_of_visit: purpose.to_string(),
        comments: String::new(),
    }
}

#[test]
fn negative_duration_record_is_ignored_in_average() {
    let records = vec![
        record(UserCategory::Visitor, Some(at(10, 0, 0)), Some(at(9, 0, 0)), ""),
        record(UserCategory::Visitor, Some(at(11, 0, 0)), Some(at(11, 30, 0)), ""),
    ];

    let result = aggregate(&[], &records, today());
    assert_eq!(result.avg_duration_minutes, 30);
    assert_eq!(result.total_records, 2);
}

#[test]
fn empty_range_yields_zeroes_and_empty_sequences() {
    let result = aggregate(&[], &[], today());

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "todayCount": 0,
            "todayCheckedIn": 0,
            "todayCheckedOut": 0,
            "totalRecords": 0,
            "avgDurationMinutes": 0,
            "byUserCategory": [],
            "byDate": [],
            "byHour": [],
            "byPurpose": [],
            "byWeek": [],
            "byMonth": []
        })
    );
}

#[test]
fn check_in_hours_are_bucketed() {
    let records = vec![
        record(UserCategory::Staff, Some(at(9, 5, 0)), None, ""),
        record(UserCategory::Member, Some(at(9, 45, 0)), None, ""),
        record(UserCategory::Visitor, Some(at(14, 0, 0)), None, ""),
    ];

    let result = aggregate(&[], &records, today());
    assert_eq!(
        result.by_hour,
        vec![HourCount { hour: 9, count: 2 }, HourCount { hour: 14, count: 1 }]
    );
}

#[test]
fn purposes_are_truncated_to_top_ten() {
    let mut records: Vec<AttendanceRecord> = (1..=14)
        .map(|i| record(UserCategory::Visitor, None, None, &format!("Errand {i}")))
        .collect();
    for _ in 0..5 {
        records.push(record(UserCategory::Visitor, None, None, "Interview"));
    }

    let result = aggregate(&[], &records, today());
    assert_eq!(result.by_purpose.len(), 10);
    assert_eq!(result.by_purpose[0].label, "Interview");
    assert_eq!(result.by_purpose[0].count, 5);
    // ties keep the order in which purposes were first seen
    let tail: Vec<&str> = result.by_purpose[1..].iter().map(|e| e.label.as_str()).collect();
    let expected: Vec<String> = (1..=9).map(|i| format!("Errand {i}")).collect();
    assert_eq!(tail, expected.iter().map(String::as_str).collect::<Vec<_>>());
}

#[test]
fn today_counters_are_independent_of_each_other() {
    let today_records = vec![
        // created without a check-in
        record(UserCategory::Visitor, None, None, ""),
        record(UserCategory::Staff, Some(at(8, 0, 0)), Some(at(16, 0, 0)), "Work"),
        record(UserCategory::Member, Some(at(9, 0, 0)), None, "Meeting"),
    ];

    let result = aggregate(&today_records, &today_records, today());
    assert_eq!(result.today_count, 3);
    assert_eq!(result.today_checked_in, 2);
    assert_eq!(result.today_checked_out, 1);
    assert_eq!(result.avg_duration_minutes, 480);
}

#[test]
fn full_payload_shape_for_a_small_window() {
    let records = vec![
        record(UserCategory::Staff, Some(at(8, 0, 0)), Some(at(10, 0, 0)), "Work"),
        record(UserCategory::Visitor, Some(at(8, 30, 0)), Some(at(9, 30, 0)), "Meeting"),
    ];

    let value = serde_json::to_value(aggregate(&records, &records, today())).unwrap();
    assert_eq!(value["byDate"], json!([{"date": "2026-01-07", "count": 2}]));
    assert_eq!(value["byHour"], json!([{"hour": 8, "count": 2}]));
    assert_eq!(value["byWeek"], json!([{"weekStart": "2026-01-05", "count": 2}]));
    assert_eq!(value["byMonth"], json!([{"month": "2026-01", "count": 2}]));
    assert_eq!(
        value["byUserCategory"],
        json!([{"label": "staff", "count": 1}, {"label": "visitor", "count": 1}])
    );
    assert_eq!(value["avgDurationMinutes"], json!(90));
}
