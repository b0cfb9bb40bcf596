use crate::{
    auth::auth::AuthUser,
    model::{attendance::UserCategory, user::User},
    utils::db_utils::{build_update_sql, execute_update},
};
use actix_web::{HttpResponse, Responder, error::ErrorBadRequest, web};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::{MySqlPool, mysql::MySqlDatabaseError};
use std::str::FromStr;
use tracing::{error, info};
use utoipa::ToSchema;

/// Columns a partial update may touch.
pub const UPDATABLE_FIELDS: &[&str] = &[
    "email",
    "user_type",
    "first_name",
    "last_name",
    "phone_number",
    "is_active",
];

#[derive(Deserialize, ToSchema)]
pub struct CreateUser {
    #[schema(example = "jane.doe@example.com", format = "email", value_type = String)]
    pub email: String,
    #[schema(example = "visitor")]
    pub user_type: UserCategory,
    #[schema(example = "Jane")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    #[schema(example = "+254712345678")]
    pub phone_number: String,
    #[schema(example = true)]
    pub is_active: Option<bool>,
}

/// Documents the partial-update body; handlers read it as raw JSON so that
/// only the keys actually sent are written.
#[derive(Deserialize, ToSchema)]
pub struct UpdateUser {
    pub email: Option<String>,
    #[schema(example = "member")]
    pub user_type: Option<UserCategory>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[schema(example = "+254700000000")]
    pub phone_number: Option<String>,
    #[schema(example = false)]
    pub is_active: Option<bool>,
}

/// Rejects `null` for the NOT NULL columns and a `user_type` outside the known
/// categories before either reaches the table.
pub fn validate_update(payload: &Value) -> actix_web::Result<()> {
    if let Some((field, _)) = payload
        .as_object()
        .and_then(|obj| obj.iter().find(|(_, value)| value.is_null()))
    {
        return Err(ErrorBadRequest(format!("Field '{field}' cannot be null")));
    }

    if let Some(user_type) = payload.get("user_type") {
        let valid = user_type
            .as_str()
            .is_some_and(|s| UserCategory::from_str(s.trim()).is_ok());
        if !valid {
            return Err(ErrorBadRequest(
                "Invalid user_type. Allowed: staff, member, visitor, attachee, not-sure",
            ));
        }
    }
    Ok(())
}

/// MySQL `ER_DUP_ENTRY`; other 23000 errors such as a NOT NULL violation are not conflicts.
const ER_DUP_ENTRY: u16 = 1062;

fn is_duplicate_key(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db_err) => {
            db_err
                .try_downcast_ref::<MySqlDatabaseError>()
                .map(MySqlDatabaseError::number)
                == Some(ER_DUP_ENTRY)
        }
        _ => false,
    }
}

/// Create User
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = Object, example = json!({
            "id": 1
        })),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_user(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateUser>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let result = sqlx::query(
        r#"
        INSERT INTO users
        (email, user_type, first_name, last_name, phone_number, is_active, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, NOW(), NOW())
        "#,
    )
    .bind(payload.email.trim())
    .bind(payload.user_type.as_ref())
    .bind(payload.first_name.trim())
    .bind(payload.last_name.trim())
    .bind(payload.phone_number.trim())
    .bind(payload.is_active.unwrap_or(true))
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(done) => {
            let id = done.last_insert_id();
            info!(user_id = id, "User created");
            Ok(HttpResponse::Created().json(json!({ "id": id })))
        }
        Err(e) if is_duplicate_key(&e) => Ok(HttpResponse::Conflict().json(json!({
            "message": "Email already registered"
        }))),
        Err(e) => {
            error!(error = %e, "Failed to create user");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// Get User by ID
#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    params(
        ("user_id", Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "User not found", body = Object, example = json!({
            "message": "User not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_user(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let user_id = path.into_inner();

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, user_type, first_name, last_name, phone_number,
               is_active, created_at, updated_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, user_id, "Failed to fetch user");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match user {
        Some(user) => Ok(HttpResponse::Ok().json(user)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "User not found"
        }))),
    }
}

/// Update User
#[utoipa::path(
    put,
    path = "/api/users/{user_id}",
    params(
        ("user_id", Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = Object, example = json!({
            "message": "User updated successfully"
        })),
        (status = 400, description = "Unknown field or invalid value"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_user(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let user_id = path.into_inner();

    validate_update(&body)?;
    let update = build_update_sql("users", &body, UPDATABLE_FIELDS, "id", user_id)?;

    let affected = match execute_update(pool.get_ref(), update).await {
        Ok(n) => n,
        Err(e) if is_duplicate_key(&e) => {
            return Ok(HttpResponse::Conflict().json(json!({
                "message": "Email already registered"
            })));
        }
        Err(e) => {
            error!(error = %e, user_id, "Failed to update user");
            return Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ));
        }
    };

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "User not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "User updated successfully"
    })))
}

/// Delete User
#[utoipa::path(
    delete,
    path = "/api/users/{user_id}",
    params(
        ("user_id", Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Successfully deleted"
        })),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_user(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_staff()?;

    let user_id = path.into_inner();

    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(res) if res.rows_affected() == 0 => Ok(HttpResponse::NotFound().json(json!({
            "message": "User not found"
        }))),
        Ok(_) => {
            info!(user_id, "User deleted");
            Ok(HttpResponse::Ok().json(json!({
                "message": "Successfully deleted"
            })))
        }
        Err(e) => {
            error!(error = %e, user_id, "Failed to delete user");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_user_type_passes_validation() {
        assert!(validate_update(&json!({"user_type": "attachee"})).is_ok());
        assert!(validate_update(&json!({"first_name": "Ann"})).is_ok());
    }

    #[test]
    fn unknown_or_non_string_user_type_fails_validation() {
        assert!(validate_update(&json!({"user_type": "contractor"})).is_err());
        assert!(validate_update(&json!({"user_type": 3})).is_err());
    }

    #[test]
    fn null_for_not_null_column_fails_validation() {
        for field in UPDATABLE_FIELDS {
            let mut payload = serde_json::Map::new();
            payload.insert(field.to_string(), Value::Null);
            let err = validate_update(&Value::Object(payload)).unwrap_err();
            assert_eq!(
                err.as_response_error().status_code(),
                actix_web::http::StatusCode::BAD_REQUEST
            );
        }
        assert!(validate_update(&json!({"first_name": "Ann", "last_name": null})).is_err());
    }

    #[test]
    fn non_database_errors_are_not_duplicates() {
        assert!(!is_duplicate_key(&sqlx::Error::RowNotFound));
        assert!(!is_duplicate_key(&sqlx::Error::PoolTimedOut));
    }

    #[test]
    fn create_payload_rejects_unknown_category() {
        let body = json!({
            "email": "a@b.c",
            "user_type": "alien",
            "first_name": "A",
            "last_name": "B",
            "phone_number": "1"
        });
        assert!(serde_json::from_value::<CreateUser>(body).is_err());
    }

    #[test]
    fn updatable_fields_exclude_identity_and_timestamps() {
        for field in ["id", "created_at", "updated_at"] {
            assert!(!UPDATABLE_FIELDS.contains(&field));
        }
    }
}
