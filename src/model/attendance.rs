use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// Visitor classification used as an analytics grouping dimension.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum UserCategory {
    Staff,
    Member,
    Visitor,
    Attachee,
    NotSure,
}

/// One visit of one user on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "user_id": 7,
        "user_category": "visitor",
        "date": "2026-01-05",
        "check_in_time": "2026-01-05T09:12:00Z",
        "check_out_time": "2026-01-05T11:40:00Z",
        "purpose_of_visit": "Meeting",
        "comments": ""
    })
)]
pub struct AttendanceRecord {
    #[schema(example = 7)]
    pub user_id: u64,

    pub user_category: UserCategory,

    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,

    /// Stored in UTC; bucketed into hours in the display time zone.
    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub check_in_time: Option<DateTime<Utc>>,

    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub check_out_time: Option<DateTime<Utc>>,

    #[schema(example = "Meeting")]
    pub purpose_of_visit: String,

    pub comments: String,
}
