use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "email": "jane.doe@example.com",
        "user_type": "visitor",
        "first_name": "Jane",
        "last_name": "Doe",
        "phone_number": "+254712345678",
        "is_active": true,
        "created_at": "2026-01-01T08:00:00",
        "updated_at": "2026-01-01T08:00:00"
    })
)]
pub struct User {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "jane.doe@example.com")]
    pub email: String,

    /// One of staff, member, visitor, attachee, not-sure
    #[schema(example = "visitor")]
    pub user_type: String,

    #[schema(example = "Jane")]
    pub first_name: String,

    #[schema(example = "Doe")]
    pub last_name: String,

    #[schema(example = "+254712345678")]
    pub phone_number: String,

    pub is_active: bool,

    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,

    #[schema(value_type = String, format = "date-time")]
    pub updated_at: NaiveDateTime,
}
