//! Resolution of the analytics date window from request parameters.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use super::error::AnalyticsError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw query parameters, kept as strings so bad input falls back instead of failing.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct AnalyticsParams {
    /// Inclusive lower bound, `YYYY-MM-DD`
    #[schema(example = "2026-01-01")]
    pub date_from: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD`
    #[schema(example = "2026-01-31")]
    pub date_to: Option<String>,
}

/// Inclusive `[date_from, date_to]` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct AnalyticsQuery {
    #[schema(value_type = String, format = "date")]
    pub date_from: NaiveDate,
    #[schema(value_type = String, format = "date")]
    pub date_to: NaiveDate,
}

impl AnalyticsQuery {
    /// Missing or unparsable bounds default to a trailing window of
    /// `default_days` ending `today`. An inverted window is rejected.
    pub fn resolve(
        params: &AnalyticsParams,
        today: NaiveDate,
        default_days: u32,
    ) -> Result<Self, AnalyticsError> {
        let date_from = parse_bound("date_from", params.date_from.as_deref())
            .unwrap_or_else(|| today - Duration::days(i64::from(default_days)));
        let date_to = parse_bound("date_to", params.date_to.as_deref()).unwrap_or(today);

        if date_from > date_to {
            return Err(AnalyticsError::InvalidWindow { date_from, date_to });
        }

        Ok(Self { date_from, date_to })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.date_from <= date && date <= self.date_to
    }
}

fn parse_bound(name: &'static str, raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            debug!(param = name, value = raw, error = %e, "Unparsable date bound, using default");
            None
        }
    }
}
