use anyhow::Result;
use chrono::Duration;

/// Process configuration, read from the environment once at startup and
/// passed into the shared state. Nothing else reads env vars.
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: String,
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let port: u16 = env_or("SLOTSWAP_PORT", "3000").parse()?;
        let access_ttl_minutes: i64 = env_or("SLOTSWAP_ACCESS_TTL_MINUTES", "15").parse()?;
        let refresh_ttl_days: i64 = env_or("SLOTSWAP_REFRESH_TTL_DAYS", "30").parse()?;

        Ok(Self {
            host: env_or("SLOTSWAP_HOST", "0.0.0.0"),
            port,
            db_path: env_or("SLOTSWAP_DB_PATH", "slotswap.db"),
            access_secret: env_or("SLOTSWAP_ACCESS_SECRET", "dev-access-secret-change-me"),
            refresh_secret: env_or("SLOTSWAP_REFRESH_SECRET", "dev-refresh-secret-change-me"),
            access_ttl: Duration::minutes(access_ttl_minutes),
            refresh_ttl: Duration::days(refresh_ttl_days),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
