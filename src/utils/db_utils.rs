use actix_web::error::ErrorBadRequest;
use serde_json::Value;
use sqlx::MySqlPool;

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, PartialEq)]
pub enum SqlValue {
    String(String),
    I64(i64),
    Bool(bool),
    Null,
}

/// ===============================
/// SQL update container
/// ===============================
#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// ===============================
/// Build a partial UPDATE restricted to `allowed` columns
/// ===============================
pub fn build_update_sql(
    table: &str,
    payload: &Value,
    allowed: &[&str],
    id_column: &str,
    id_value: u64,
) -> Result<SqlUpdate, actix_web::Error> {
    let obj = payload
        .as_object()
        .ok_or_else(|| ErrorBadRequest("Payload must be a JSON object"))?;

    if obj.is_empty() {
        return Err(ErrorBadRequest("No fields provided for update"));
    }

    // Column names are interpolated, so only whitelisted keys get this far
    if let Some(unknown) = obj.keys().find(|k| !allowed.contains(&k.as_str())) {
        return Err(ErrorBadRequest(format!("Field '{}' cannot be updated", unknown)));
    }

    let set_clause = obj
        .keys()
        .map(|k| format!("{} = ?", k))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!(
        "UPDATE {} SET {}, updated_at = NOW() WHERE {} = ?",
        table, set_clause, id_column
    );

    let mut values = Vec::with_capacity(obj.len() + 1);

    for value in obj.values() {
        let bound = match value {
            Value::String(s) => SqlValue::String(s.trim().to_string()),
            Value::Number(n) => n
                .as_i64()
                .map(SqlValue::I64)
                .ok_or_else(|| ErrorBadRequest("Only integer numbers are supported"))?,
            Value::Bool(b) => SqlValue::Bool(*b),
            Value::Null => SqlValue::Null,
            _ => return Err(ErrorBadRequest("Unsupported JSON value type")),
        };
        values.push(bound);
    }

    // WHERE id = ?
    values.push(SqlValue::I64(id_value as i64));

    Ok(SqlUpdate { sql, values })
}

/// ===============================
/// Execute the update
/// ===============================
pub async fn execute_update(pool: &MySqlPool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::I64(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}
