use anyhow::anyhow;
use chrono_tz::Tz;
use std::{env, fmt, net::SocketAddr, str::FromStr, time::Duration};

use crate::models::StatusVocabulary;
use crate::services::DispatchMode;

/// Where leave requests are read from and written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres,
    Remote,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "postgres" => Ok(StoreBackend::Postgres),
            "remote" => Ok(StoreBackend::Remote),
            other => Err(anyhow!(
                "Invalid REQUEST_STORE value: {} (expected memory, postgres or remote)",
                other
            )),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StoreBackend::Memory => "memory",
            StoreBackend::Postgres => "postgres",
            StoreBackend::Remote => "remote",
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub remote_api_base_url: Option<String>,
    pub remote_api_token: Option<String>,
    pub remote_status_vocabulary: StatusVocabulary,
    pub bulk_dispatch: DispatchMode,
    pub store_call_timeout: Duration,
    pub time_zone: Tz,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            store_backend: StoreBackend::Memory,
            database_url: None,
            database_max_connections: 5,
            remote_api_base_url: None,
            remote_api_token: None,
            remote_status_vocabulary: StatusVocabulary::default(),
            bulk_dispatch: DispatchMode::Sequential,
            store_call_timeout: Duration::from_millis(5000),
            time_zone: chrono_tz::UTC,
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Blank values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();

        let bind_addr = match get("BIND_ADDR") {
            Some(raw) => raw
                .parse()
                .map_err(|_| anyhow!("Invalid BIND_ADDR value: {}", raw))?,
            None => defaults.bind_addr,
        };

        let store_backend = match get("REQUEST_STORE") {
            Some(raw) => raw.parse()?,
            None => defaults.store_backend,
        };

        let database_url = get("DATABASE_URL");
        let database_max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => parse_positive::<u32>("DATABASE_MAX_CONNECTIONS", &raw)?,
            None => defaults.database_max_connections,
        };

        let remote_api_base_url = get("REMOTE_API_BASE_URL");
        let remote_api_token = get("REMOTE_API_TOKEN");
        let remote_status_vocabulary = match get("REMOTE_STATUS_VOCABULARY") {
            Some(raw) => raw
                .parse()
                .map_err(|_| anyhow!("Invalid REMOTE_STATUS_VOCABULARY value: {}", raw))?,
            None => defaults.remote_status_vocabulary,
        };

        let max_in_flight = match get("BULK_MAX_IN_FLIGHT") {
            Some(raw) => parse_positive::<usize>("BULK_MAX_IN_FLIGHT", &raw)?,
            None => 8,
        };
        let bulk_dispatch = match get("BULK_DISPATCH").as_deref().map(str::trim) {
            None | Some("sequential") => DispatchMode::Sequential,
            Some("concurrent") => DispatchMode::Concurrent { max_in_flight },
            Some(other) => return Err(anyhow!("Invalid BULK_DISPATCH value: {}", other)),
        };

        let store_call_timeout = match get("STORE_CALL_TIMEOUT_MS") {
            Some(raw) => Duration::from_millis(parse_positive::<u64>("STORE_CALL_TIMEOUT_MS", &raw)?),
            None => defaults.store_call_timeout,
        };

        let time_zone_name = get("APP_TIMEZONE").unwrap_or_else(|| "UTC".to_string());
        let time_zone: Tz = time_zone_name
            .parse()
            .map_err(|_| anyhow!("Invalid APP_TIMEZONE value: {}", time_zone_name))?;

        match store_backend {
            StoreBackend::Postgres if database_url.is_none() => {
                return Err(anyhow!("DATABASE_URL is required when REQUEST_STORE=postgres"));
            }
            StoreBackend::Remote if remote_api_base_url.is_none() => {
                return Err(anyhow!(
                    "REMOTE_API_BASE_URL is required when REQUEST_STORE=remote"
                ));
            }
            _ => {}
        }

        Ok(Config {
            bind_addr,
            store_backend,
            database_url,
            database_max_connections,
            remote_api_base_url,
            remote_api_token,
            remote_status_vocabulary,
            bulk_dispatch,
            store_call_timeout,
            time_zone,
        })
    }
}

/// Parses a count or duration that must be a whole number above zero.
fn parse_positive<T>(key: &str, raw: &str) -> anyhow::Result<T>
where
    T: FromStr + PartialOrd + Default,
{
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => Err(anyhow!("Invalid {} value: {} (expected a positive integer)", key, raw)),
    }
}

pub fn mask_secret(s: &str) -> String {
    if s.is_empty() {
        return "<empty>".into();
    }
    let prefix = s.chars().take(4).collect::<String>();
    format!("{}*** (len={})", prefix, s.len())
}
