use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::utils::record_loader::fetch_records_for_day;
use actix_web::{HttpResponse, Responder, web};
use chrono::{NaiveDateTime, Utc};
use serde::Deserialize;
use sqlx::MySqlPool;
use tracing::{error, info};
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CheckInRequest {
    #[schema(example = "Meeting")]
    pub purpose_of_visit: Option<String>,
    #[schema(example = "Here to see the director")]
    pub comments: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CheckOutRequest {
    #[schema(example = "Left the visitor badge at reception")]
    pub comments: Option<String>,
}

/// Appends check-out notes to the existing comments; blank notes leave them as is.
pub fn append_checkout_comment(existing: &str, note: Option<&str>) -> String {
    match note.map(str::trim).filter(|n| !n.is_empty()) {
        Some(note) => format!("{existing}\nCheck-out comments: {note}"),
        None => existing.to_string(),
    }
}

fn internal_error(e: sqlx::Error, user_id: u64, what: &'static str) -> actix_web::Error {
    error!(error = %e, user_id, "{what} failed");
    actix_web::error::ErrorInternalServerError("Internal Server Error")
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/{user_id}/check-in",
    params(
        ("user_id", Path, description = "User ID")
    ),
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Checked in successfully", body = Object, example = json!({
            "message": "Checked in successfully"
        })),
        (status = 400, description = "Already checked in today", body = Object, example = json!({
            "message": "Already checked in today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<u64>,
    payload: web::Json<CheckInRequest>,
) -> actix_web::Result<impl Responder> {
    let user_id = path.into_inner();
    let today = config.today();

    let matches = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| internal_error(e, user_id, "User lookup"))?;

    if matches == 0 {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "User not found"
        })));
    }

    // get-or-create today's record; (user_id, date) is unique
    sqlx::query(
        r#"
        INSERT IGNORE INTO attendance_records (user_id, date, purpose_of_visit, comments)
        VALUES (?, ?, '', '')
        "#,
    )
    .bind(user_id)
    .bind(today)
    .execute(pool.get_ref())
    .await
    .map_err(|e| internal_error(e, user_id, "Check-in"))?;

    let result = sqlx::query(
        r#"
        UPDATE attendance_records
        SET check_in_time = ?, purpose_of_visit = ?, comments = ?
        WHERE user_id = ?
        AND date = ?
        AND check_in_time IS NULL
        "#,
    )
    .bind(Utc::now().naive_utc())
    .bind(payload.purpose_of_visit.as_deref().unwrap_or("").trim())
    .bind(payload.comments.as_deref().unwrap_or("").trim())
    .bind(user_id)
    .bind(today)
    .execute(pool.get_ref())
    .await
    .map_err(|e| internal_error(e, user_id, "Check-in"))?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Already checked in today"
        })));
    }

    info!(user_id, %today, "Checked in");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Checked in successfully"
    })))
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/{user_id}/check-out",
    params(
        ("user_id", Path, description = "User ID")
    ),
    request_body = CheckOutRequest,
    responses(
        (status = 200, description = "Checked out successfully", body = Object, example = json!({
            "message": "Checked out successfully"
        })),
        (status = 400, description = "Not checked in or already checked out", body = Object,
            example = json!({
            "message": "Not checked in today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<u64>,
    payload: web::Json<CheckOutRequest>,
) -> actix_web::Result<impl Responder> {
    let user_id = path.into_inner();
    let today = config.today();

    let current = sqlx::query_as::<_, (u64, Option<NaiveDateTime>, Option<String>)>(
        r#"
        SELECT id, check_out_time, comments
        FROM attendance_records
        WHERE user_id = ?
        AND date = ?
        "#,
    )
    .bind(user_id)
    .bind(today)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| internal_error(e, user_id, "Check-out"))?;

    let (record_id, comments) = match current {
        None => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Not checked in today"
            })));
        }
        Some((_, Some(_), _)) => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Already checked out today"
            })));
        }
        Some((id, None, comments)) => (id, comments.unwrap_or_default()),
    };

    let comments = append_checkout_comment(&comments, payload.comments.as_deref());

    let result = sqlx::query(
        r#"
        UPDATE attendance_records
        SET check_out_time = ?, comments = ?
        WHERE id = ?
        AND check_out_time IS NULL
        "#,
    )
    .bind(Utc::now().naive_utc())
    .bind(comments)
    .bind(record_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| internal_error(e, user_id, "Check-out"))?;

    // lost a race with a concurrent check-out
    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Already checked out today"
        })));
    }

    info!(user_id, %today, "Checked out");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Checked out successfully"
    })))
}

/// Today's attendance, newest check-in first
#[utoipa::path(
    get,
    path = "/api/attendance",
    responses(
        (status = 200, description = "Today's attendance records",
            body = [crate::model::attendance::AttendanceRecord]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn list_today(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let today = config.today();

    let records = fetch_records_for_day(pool.get_ref(), today)
        .await
        .map_err(|e| {
            error!(error = %e, %today, "Failed to fetch today's attendance");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(records))
}
