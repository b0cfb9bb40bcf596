use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "frontdesk")]
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
}

#[derive(FromRow)]
pub struct StaffAccountSql {
    pub id: u64, // BIGINT UNSIGNED
    pub username: String,
    pub password: String,
    pub role_id: u8,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub account_id: u64,
    pub sub: String,
    pub role: u8, // role id
    pub exp: usize,
    pub jti: String,
}
