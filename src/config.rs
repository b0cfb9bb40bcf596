use std::env;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use chrono::{FixedOffset, NaiveDate, Utc};
use dotenvy::dotenv;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    // Analytics
    pub analytics_default_days: u32,
    /// Zone used for "today" and for check-in hour buckets
    pub display_offset: FixedOffset,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            access_token_ttl: parsed("ACCESS_TOKEN_TTL", "900")?, // default 15 min

            rate_login_per_min: parsed("RATE_LOGIN_PER_MIN", "60")?,
            rate_protected_per_min: parsed("RATE_PROTECTED_PER_MIN", "1000")?,

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            analytics_default_days: parsed("ANALYTICS_DEFAULT_DAYS", "30")?,
            display_offset: parsed("DISPLAY_UTC_OFFSET", "+00:00")?,
        })
    }

    /// Current calendar date in the display time zone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.display_offset).date_naive()
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn parsed<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse()
        .map_err(|e| anyhow!("{key} has an invalid value {raw:?}: {e}"))
}
