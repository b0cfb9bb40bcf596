//! Turns attendance records into dashboard-ready summary statistics.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Duration, FixedOffset, NaiveDate, Offset, Timelike, Utc};
use tracing::{debug, warn};

use super::result::{
    AnalyticsResult, DateCount, HourCount, LabelCount, MonthCount, MonthKey, WeekCount,
};
use crate::model::attendance::AttendanceRecord;

/// Maximum number of purposes reported in `by_purpose`.
pub const TOP_PURPOSES: usize = 10;

/// Stateless aggregator; the only setting is the zone used for hour buckets.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    display_offset: FixedOffset,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(Utc.fix())
    }
}

impl Aggregator {
    pub fn new(display_offset: FixedOffset) -> Self {
        Self { display_offset }
    }

    /// `today_records` must already be limited to `today` and `range_records`
    /// to the requested window. Nothing is filtered here.
    pub fn aggregate(
        &self,
        today_records: &[AttendanceRecord],
        range_records: &[AttendanceRecord],
        today: NaiveDate,
    ) -> AnalyticsResult {
        debug!(
            %today,
            today_records = today_records.len(),
            range_records = range_records.len(),
            "Aggregating attendance analytics"
        );

        AnalyticsResult {
            today_count: today_records.len() as u64,
            today_checked_in: count_where(today_records, |r| r.check_in_time.is_some()),
            today_checked_out: count_where(today_records, |r| r.check_out_time.is_some()),
            total_records: range_records.len() as u64,
            by_user_category: rank_by_count(
                range_records.iter().map(|r| r.user_category.as_ref()),
            ),
            by_date: self.by_date(range_records),
            by_hour: self.by_hour(range_records),
            by_purpose: top_purposes(range_records),
            by_week: self.by_week(range_records),
            by_month: self.by_month(range_records),
            avg_duration_minutes: average_duration_minutes(range_records),
        }
    }

    fn by_date(&self, records: &[AttendanceRecord]) -> Vec<DateCount> {
        count_ascending(records.iter().map(|r| r.date))
            .into_iter()
            .map(|(date, count)| DateCount { date, count })
            .collect()
    }

    fn by_hour(&self, records: &[AttendanceRecord]) -> Vec<HourCount> {
        let hours = records
            .iter()
            .filter_map(|r| r.check_in_time)
            .map(|t| t.with_timezone(&self.display_offset).hour());

        count_ascending(hours)
            .into_iter()
            .map(|(hour, count)| HourCount { hour, count })
            .collect()
    }

    fn by_week(&self, records: &[AttendanceRecord]) -> Vec<WeekCount> {
        count_ascending(records.iter().map(|r| week_start(r.date)))
            .into_iter()
            .map(|(week_start, count)| WeekCount { week_start, count })
            .collect()
    }

    fn by_month(&self, records: &[AttendanceRecord]) -> Vec<MonthCount> {
        let months = records.iter().map(|r| MonthKey {
            year: r.date.year(),
            month: r.date.month(),
        });

        count_ascending(months)
            .into_iter()
            .map(|(month, count)| MonthCount { month, count })
            .collect()
    }
}

/// Convenience for callers that bucket hours in UTC.
pub fn aggregate(
    today_records: &[AttendanceRecord],
    range_records: &[AttendanceRecord],
    today: NaiveDate,
) -> AnalyticsResult {
    Aggregator::default().aggregate(today_records, range_records, today)
}

/// Weeks start on Monday (ISO 8601).
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

fn count_where(records: &[AttendanceRecord], pred: impl Fn(&AttendanceRecord) -> bool) -> u64 {
    records.iter().filter(|r| pred(r)).count() as u64
}

fn count_ascending<K: Ord>(keys: impl Iterator<Item = K>) -> BTreeMap<K, u64> {
    let mut counts = BTreeMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Descending by count; ties keep first-seen order.
fn rank_by_count<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<LabelCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut ranked: Vec<LabelCount> = Vec::new();

    for label in labels {
        match index.get(label) {
            Some(&i) => ranked[i].count += 1,
            None => {
                index.insert(label, ranked.len());
                ranked.push(LabelCount {
                    label: label.to_string(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}

fn top_purposes(records: &[AttendanceRecord]) -> Vec<LabelCount> {
    let mut ranked = rank_by_count(
        records
            .iter()
            .map(|r| r.purpose_of_visit.as_str())
            .filter(|p| !p.is_empty()),
    );
    ranked.truncate(TOP_PURPOSES);
    ranked
}

/// Mean of the positive visit durations, rounded to whole minutes; 0 when none.
fn average_duration_minutes(records: &[AttendanceRecord]) -> u64 {
    let durations: Vec<i64> = records.iter().filter_map(visit_millis).collect();
    if durations.is_empty() {
        return 0;
    }

    // i128 holds any sum of i64 durations without overflow
    let total: i128 = durations.iter().map(|&ms| i128::from(ms)).sum();
    let mean_millis = total as f64 / durations.len() as f64;
    (mean_millis / 60_000.0).round() as u64
}

fn visit_millis(record: &AttendanceRecord) -> Option<i64> {
    match (record.check_in_time, record.check_out_time) {
        (Some(check_in), Some(check_out)) => {
            let millis = (check_out - check_in).num_milliseconds();
            if millis <= 0 {
                warn!(
                    user_id = record.user_id,
                    date = %record.date,
                    duration_ms = millis,
                    "Non-positive visit duration, excluded from average"
                );
                return None;
            }
            Some(millis)
        }
        (None, Some(_)) => {
            debug!(
                user_id = record.user_id,
                date = %record.date,
                "Check-out without check-in, excluded from average"
            );
            None
        }
        _ => None,
    }
}
