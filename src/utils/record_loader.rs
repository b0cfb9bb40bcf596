//! Loads attendance records for the aggregator.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use sqlx::{MySqlPool, Row, mysql::MySqlRow};
use tracing::{debug, warn};

use crate::model::attendance::{AttendanceRecord, UserCategory};

const RECORD_SELECT: &str = r#"
    SELECT a.user_id, u.user_type, a.date, a.check_in_time, a.check_out_time,
           a.purpose_of_visit, a.comments
    FROM attendance_records a
    JOIN users u ON u.id = a.user_id
"#;

/// Records dated `day`, newest check-in first.
pub async fn fetch_records_for_day(
    pool: &MySqlPool,
    day: NaiveDate,
) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
    let sql = format!("{RECORD_SELECT} WHERE a.date = ? ORDER BY a.check_in_time DESC");

    let rows = sqlx::query(&sql).bind(day).fetch_all(pool).await?;
    debug!(%day, rows = rows.len(), "Fetched attendance for day");

    rows.iter().map(record_from_row).collect()
}

/// Records dated within `[from, to]`, inclusive.
pub async fn fetch_records_between(
    pool: &MySqlPool,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
    let sql = format!("{RECORD_SELECT} WHERE a.date BETWEEN ? AND ? ORDER BY a.date, a.id");

    let rows = sqlx::query(&sql).bind(from).bind(to).fetch_all(pool).await?;
    debug!(%from, %to, rows = rows.len(), "Fetched attendance for range");

    rows.iter().map(record_from_row).collect()
}

fn record_from_row(row: &MySqlRow) -> Result<AttendanceRecord, sqlx::Error> {
    let user_id: u64 = row.try_get("user_id")?;
    let user_type: String = row.try_get("user_type")?;

    Ok(AttendanceRecord {
        user_id,
        user_category: parse_category(&user_type, user_id),
        date: row.try_get("date")?,
        check_in_time: timestamp_column(row, "check_in_time", user_id),
        check_out_time: timestamp_column(row, "check_out_time", user_id),
        purpose_of_visit: row
            .try_get::<Option<String>, _>("purpose_of_visit")?
            .unwrap_or_default(),
        comments: row.try_get::<Option<String>, _>("comments")?.unwrap_or_default(),
    })
}

/// Unknown user types are bucketed as not-sure rather than dropping the record.
pub fn parse_category(raw: &str, user_id: u64) -> UserCategory {
    UserCategory::from_str(raw.trim()).unwrap_or_else(|_| {
        warn!(user_id, user_type = raw, "Unknown user type, counting as not-sure");
        UserCategory::NotSure
    })
}

fn timestamp_column(row: &MySqlRow, column: &str, user_id: u64) -> Option<DateTime<Utc>> {
    decode_timestamp(row.try_get::<Option<NaiveDateTime>, _>(column), column, user_id)
}

/// A timestamp that fails to decode is flagged and treated as absent, so the
/// record still counts but stays out of duration-bearing computations.
pub fn decode_timestamp(
    decoded: Result<Option<NaiveDateTime>, sqlx::Error>,
    column: &str,
    user_id: u64,
) -> Option<DateTime<Utc>> {
    match decoded {
        Ok(value) => value.map(|naive| Utc.from_utc_datetime(&naive)),
        Err(e) => {
            warn!(error = %e, user_id, column, "Malformed timestamp, treating as absent");
            None
        }
    }
}
