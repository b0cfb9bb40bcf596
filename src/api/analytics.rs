use crate::analytics::{Aggregator, AnalyticsError, AnalyticsParams, AnalyticsQuery};
use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::utils::record_loader::{fetch_records_between, fetch_records_for_day};
use actix_web::{HttpResponse, Responder, web};
use sqlx::MySqlPool;
use tracing::{error, info};

/// Attendance analytics dashboard
#[utoipa::path(
    get,
    path = "/api/attendance/analytics",
    params(AnalyticsParams),
    responses(
        (status = 200, description = "Aggregated attendance statistics",
            body = crate::analytics::AnalyticsResult),
        (status = 400, description = "date_from is after date_to", body = Object, example = json!({
            "message": "date_from (2026-02-10) cannot be after date_to (2026-02-01)"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Analytics"
)]
pub async fn analytics_dashboard(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    params: web::Query<AnalyticsParams>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let today = config.today();
    let window = AnalyticsQuery::resolve(&params, today, config.analytics_default_days)?;

    let today_records = fetch_records_for_day(pool.get_ref(), today)
        .await
        .map_err(|e| log_load_failure(e, &window))?;
    let range_records = fetch_records_between(pool.get_ref(), window.date_from, window.date_to)
        .await
        .map_err(|e| log_load_failure(e, &window))?;

    debug_assert!(range_records.iter().all(|r| window.contains(r.date)));

    let result = Aggregator::new(config.display_offset).aggregate(
        &today_records,
        &range_records,
        today,
    );

    info!(
        staff = %auth.username,
        date_from = %window.date_from,
        date_to = %window.date_to,
        total_records = result.total_records,
        "Analytics computed"
    );

    Ok(HttpResponse::Ok().json(result))
}

fn log_load_failure(e: sqlx::Error, window: &AnalyticsQuery) -> AnalyticsError {
    error!(
        error = %e,
        date_from = %window.date_from,
        date_to = %window.date_to,
        "Failed to load attendance for analytics"
    );
    AnalyticsError::from(e)
}
