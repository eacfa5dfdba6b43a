use anyhow::{Context, Result};
use sqlx::postgres::PgConnectOptions;
use std::env;
use std::str::FromStr;

/// Runtime settings, read from the process environment (and `.env` if present).
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub db: DbConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    /// Full connection URL; when set it wins over the individual parts.
    pub url: Option<String>,
    pub pool_size: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            port: parse_var(&lookup, "PORT", 8080)?,
            db: DbConfig {
                host: text("DB_HOST", "localhost"),
                port: parse_var(&lookup, "DB_PORT", 5432)?,
                user: text("DB_USER", "app"),
                password: text("DB_PASSWORD", "app"),
                name: text("DB_NAME", "app"),
                url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
                pool_size: parse_var(&lookup, "DB_POOL_SIZE", 10)?,
            },
        })
    }
}

impl DbConfig {
    pub fn connect_options(&self) -> Result<PgConnectOptions> {
        match &self.url {
            Some(url) => PgConnectOptions::from_str(url).context("invalid DATABASE_URL"),
            None => Ok(PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .username(&self.user)
                .password(&self.password)
                .database(&self.name)),
        }
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key).filter(|value| !value.is_empty()) {
        Some(value) => value
            .parse()
            .with_context(|| format!("{} must be a number, got {:?}", key, value)),
        None => Ok(default),
    }
}
