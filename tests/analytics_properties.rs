// Property-based checks for the attendance analytics aggregator

use attendance_register::analytics::aggregator::{TOP_PURPOSES, week_start};
use attendance_register::analytics::{Aggregator, aggregate};
use attendance_register::model::attendance::{AttendanceRecord, UserCategory};
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use std::collections::HashMap;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
}

fn category_strategy() -> impl Strategy<Value = UserCategory> {
    prop_oneof![
        Just(UserCategory::Staff),
        Just(UserCategory::Member),
        Just(UserCategory::Visitor),
        Just(UserCategory::Attachee),
        Just(UserCategory::NotSure),
    ]
}

fn purpose_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[A-Z][a-z]{2,6}",
        Just("Meeting".to_string()),
        Just("Training".to_string()),
    ]
}

prop_compose! {
    fn record_strategy()(
        user_id in 1u64..500,
        category in category_strategy(),
        day_offset in 0i64..90,
        check_in_minute in proptest::option::of(0i64..(24 * 60)),
        // negative stays allow clock anomalies
        stay_minutes in proptest::option::of(-120i64..600),
        purpose in purpose_strategy(),
    ) -> AttendanceRecord {
        let date = base_date() + Duration::days(day_offset);
        let midnight: DateTime<Utc> = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap());
        let check_in_time = check_in_minute.map(|m| midnight + Duration::minutes(m));
        let check_out_time = match (check_in_time, stay_minutes) {
            (Some(t), Some(stay)) => Some(t + Duration::minutes(stay)),
            _ => None,
        };
        AttendanceRecord {
            user_id,
            user_category: category,
            date,
            check_in_time,
            check_out_time,
            purpose_of_visit: purpose,
            comments: String::new(),
        }
    }
}

fn records_strategy() -> impl Strategy<Value = Vec<AttendanceRecord>> {
    prop::collection::vec(record_strategy(), 0..200)
}

proptest! {
    #[test]
    fn category_counts_partition_the_range(records in records_strategy()) {
        let result = aggregate(&[], &records, base_date());
        let sum: u64 = result.by_user_category.iter().map(|e| e.count).sum();
        prop_assert_eq!(sum, result.total_records);
        prop_assert_eq!(result.total_records, records.len() as u64);
    }

    #[test]
    fn date_week_and_month_counts_partition_the_range(records in records_strategy()) {
        let result = aggregate(&[], &records, base_date());
        prop_assert_eq!(result.by_date.iter().map(|e| e.count).sum::<u64>(), result.total_records);
        prop_assert_eq!(result.by_week.iter().map(|e| e.count).sum::<u64>(), result.total_records);
        prop_assert_eq!(result.by_month.iter().map(|e| e.count).sum::<u64>(), result.total_records);
    }

    #[test]
    fn ordered_sequences_are_strictly_ascending(records in records_strategy()) {
        let result = aggregate(&[], &records, base_date());
        prop_assert!(result.by_date.windows(2).all(|w| w[0].date < w[1].date));
        prop_assert!(result.by_hour.windows(2).all(|w| w[0].hour < w[1].hour));
        prop_assert!(result.by_week.windows(2).all(|w| w[0].week_start < w[1].week_start));
        prop_assert!(result.by_month.windows(2).all(|w| w[0].month < w[1].month));
        prop_assert!(result.by_hour.iter().all(|h| h.hour < 24));
        prop_assert!(result.by_week.iter().all(|w| w.week_start.weekday() == chrono::Weekday::Mon));
    }

    #[test]
    fn hour_buckets_count_check_ins(records in records_strategy()) {
        let result = aggregate(&[], &records, base_date());
        let checked_in = records.iter().filter(|r| r.check_in_time.is_some()).count() as u64;
        prop_assert_eq!(result.by_hour.iter().map(|h| h.count).sum::<u64>(), checked_in);
    }

    #[test]
    fn purposes_are_a_prefix_of_the_full_ranking(records in records_strategy()) {
        let result = aggregate(&[], &records, base_date());
        prop_assert!(result.by_purpose.len() <= TOP_PURPOSES);
        prop_assert!(result.by_purpose.windows(2).all(|w| w[0].count >= w[1].count));

        let mut full: HashMap<&str, u64> = HashMap::new();
        for r in records.iter().filter(|r| !r.purpose_of_visit.is_empty()) {
            *full.entry(r.purpose_of_visit.as_str()).or_insert(0) += 1;
        }
        for entry in &result.by_purpose {
            prop_assert_eq!(full.get(entry.label.as_str()).copied(), Some(entry.count));
        }
        // nothing left out counts more than the smallest reported entry
        if let Some(last) = result.by_purpose.last() {
            let reported: Vec<&str> = result.by_purpose.iter().map(|e| e.label.as_str()).collect();
            prop_assert!(full
                .iter()
                .filter(|(label, _)| !reported.contains(*label))
                .all(|(_, count)| *count <= last.count));
        } else {
            prop_assert!(full.is_empty());
        }
    }

    #[test]
    fn average_ignores_non_positive_durations(records in records_strategy()) {
        let result = aggregate(&[], &records, base_date());
        let positive: Vec<i64> = records
            .iter()
            .filter_map(|r| Some((r.check_out_time? - r.check_in_time?).num_seconds()))
            .filter(|s| *s > 0)
            .collect();
        if positive.is_empty() {
            prop_assert_eq!(result.avg_duration_minutes, 0);
        } else {
            let floor_min = *positive.iter().min().unwrap() / 60;
            let ceil_max = (*positive.iter().max().unwrap() + 59) / 60;
            prop_assert!(result.avg_duration_minutes as i64 >= floor_min);
            prop_assert!(result.avg_duration_minutes as i64 <= ceil_max);
        }
    }

    #[test]
    fn aggregation_is_deterministic(
        today in prop::collection::vec(record_strategy(), 0..50),
        range in prop::collection::vec(record_strategy(), 0..200),
    ) {
        let aggregator = Aggregator::new(FixedOffset::east_opt(3 * 3600).unwrap());
        let first = aggregator.aggregate(&today, &range, base_date());
        let second = aggregator.aggregate(&today, &range, base_date());
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        prop_assert_eq!(first, second);
    }

    #[test]
    fn week_start_is_the_preceding_monday(offset in 0i64..3650) {
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Duration::days(offset);
        let start = week_start(date);
        prop_assert_eq!(start.weekday(), chrono::Weekday::Mon);
        prop_assert!(start <= date);
        prop_assert!(date - start < Duration::days(7));
    }
}
