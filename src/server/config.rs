//! Environment-derived application configuration.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_UPLOAD_URL_TTL_SECS: u64 = 3600;

/// Runtime configuration read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub identity_endpoint: String,
    pub storage_endpoint: String,
    pub storage_bucket: String,
    pub storage_token: Option<String>,
    pub upload_url_ttl: Duration,
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// `DATABASE_URL`, `IDENTITY_ENDPOINT`, `STORAGE_ENDPOINT` and
    /// `STORAGE_BUCKET` are required; the rest have defaults.
    pub fn from_env() -> Result<Self, String> {
        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned())
            .parse::<SocketAddr>()
            .map_err(|err| format!("invalid BIND_ADDR: {err}"))?;
        let database_url = require_var("DATABASE_URL")?;
        let identity_endpoint = require_var("IDENTITY_ENDPOINT")?;
        let storage_endpoint = require_var("STORAGE_ENDPOINT")?;
        let storage_bucket = require_var("STORAGE_BUCKET")?;
        let storage_token = env::var("STORAGE_TOKEN").ok().filter(|v| !v.is_empty());
        let upload_url_ttl = match env::var("UPLOAD_URL_TTL_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.parse::<u64>()
                    .map_err(|err| format!("invalid UPLOAD_URL_TTL_SECS: {err}"))?,
            ),
            Err(_) => Duration::from_secs(DEFAULT_UPLOAD_URL_TTL_SECS),
        };

        Ok(Self {
            bind_addr,
            database_url,
            identity_endpoint,
            storage_endpoint,
            storage_bucket,
            storage_token,
            upload_url_ttl,
        })
    }
}

fn require_var(name: &'static str) -> Result<String, String> {
    env::var(name).map_err(|_| format!("{name} must be set"))
}
