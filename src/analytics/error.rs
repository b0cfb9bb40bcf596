use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use chrono::NaiveDate;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("date_from ({date_from}) cannot be after date_to ({date_to})")]
    InvalidWindow {
        date_from: NaiveDate,
        date_to: NaiveDate,
    },

    #[error("failed to load attendance records: {0}")]
    Database(#[from] sqlx::Error),
}

impl ResponseError for AnalyticsError {
    fn status_code(&self) -> StatusCode {
        match self {
            AnalyticsError::InvalidWindow { .. } => StatusCode::BAD_REQUEST,
            AnalyticsError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AnalyticsError::InvalidWindow { .. } => self.to_string(),
            // keep driver details in the logs only
            AnalyticsError::Database(_) => "Internal Server Error".to_string(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}
