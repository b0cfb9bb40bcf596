use std::fmt;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use utoipa::ToSchema;

/// A `(label, count)` pair for categorical breakdowns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LabelCount {
    #[schema(example = "visitor")]
    pub label: String,
    #[schema(example = 12)]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DateCount {
    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct HourCount {
    /// Hour of day (0-23) in the display time zone
    #[schema(example = 9, minimum = 0, maximum = 23)]
    pub hour: u32,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeekCount {
    /// Monday of the week
    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub week_start: NaiveDate,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MonthCount {
    #[schema(example = "2026-01", value_type = String)]
    pub month: MonthKey,
    pub count: u64,
}

/// Calendar month, rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Dashboard summary produced fresh by every aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "todayCount": 3,
    "todayCheckedIn": 3,
    "todayCheckedOut": 1,
    "totalRecords": 42,
    "avgDurationMinutes": 95,
    "byUserCategory": [{"label": "visitor", "count": 30}, {"label": "staff", "count": 12}],
    "byDate": [{"date": "2026-01-05", "count": 7}],
    "byHour": [{"hour": 9, "count": 20}, {"hour": 14, "count": 22}],
    "byPurpose": [{"label": "Meeting", "count": 18}],
    "byWeek": [{"weekStart": "2026-01-05", "count": 42}],
    "byMonth": [{"month": "2026-01", "count": 42}]
}))]
pub struct AnalyticsResult {
    pub today_count: u64,
    pub today_checked_in: u64,
    pub today_checked_out: u64,
    pub total_records: u64,
    pub by_user_category: Vec<LabelCount>,
    pub by_date: Vec<DateCount>,
    pub by_hour: Vec<HourCount>,
    /// At most ten entries
    pub by_purpose: Vec<LabelCount>,
    pub by_week: Vec<WeekCount>,
    pub by_month: Vec<MonthCount>,
    pub avg_duration_minutes: u64,
}
