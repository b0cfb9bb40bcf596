use crate::{
    auth::{jwt::generate_access_token, password::verify_password},
    config::Config,
    models::{LoginReqDto, LoginResponse, StaffAccountSql},
};
use actix_web::{HttpResponse, Responder, web};
use sqlx::MySqlPool;
use tracing::{debug, error, info, instrument};

/// Staff login
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Access token issued", body = LoginResponse),
        (status = 400, description = "Username or password missing"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(pool, config, user),
    fields(username = %user.username)
)]
pub async fn login(
    user: web::Json<LoginReqDto>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> impl Responder {
    info!("Login request received");

    if user.username.trim().is_empty() || user.password.is_empty() {
        info!("Validation failed: empty username or password");
        return HttpResponse::BadRequest().body("Username or password required");
    }

    debug!("Fetching staff account from database");

    let account = match sqlx::query_as::<_, StaffAccountSql>(
        r#"
        SELECT id, username, password, role_id
        FROM staff_accounts
        WHERE username = ?
        "#,
    )
    .bind(user.username.trim())
    .fetch_optional(pool.get_ref())
    .await
    {
        Ok(Some(account)) => {
            debug!(account_id = account.id, "Account found");
            account
        }
        Ok(None) => {
            info!("Invalid credentials: account not found");
            return HttpResponse::Unauthorized().body("Invalid credentials");
        }
        Err(e) => {
            error!(error = %e, "Database error while fetching account");
            return HttpResponse::InternalServerError().finish();
        }
    };

    if let Err(e) = verify_password(&user.password, &account.password) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return HttpResponse::Unauthorized().body("Invalid credentials");
    }

    let access_token = match generate_access_token(
        account.id,
        account.username.clone(),
        account.role_id,
        &config.jwt_secret,
        config.access_token_ttl,
    ) {
        Ok(token) => token,
        Err(e) => {
            error!(error = %e, "Failed to sign access token");
            return HttpResponse::InternalServerError().finish();
        }
    };

    if let Err(e) = sqlx::query("UPDATE staff_accounts SET last_login_at = NOW() WHERE id = ?")
        .bind(account.id)
        .execute(pool.get_ref())
        .await
    {
        // not fatal for the login itself
        error!(error = %e, "Failed to update last_login_at");
    }

    info!("Login successful");

    HttpResponse::Ok().json(LoginResponse { access_token })
}
