use std::net::SocketAddr;
use std::time::Duration;

use axum::http::HeaderValue;
use chrono::TimeDelta;
use env_helpers::{get_env, get_env_default};
use url::Url;

use crate::application::helpers::snapshot::DEFAULT_STALENESS_WINDOW_SECS;

pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub bind_addr: SocketAddr,
    pub cors_origin: HeaderValue,
    /// Whether to trust X-Forwarded-For / X-Real-IP when identifying the requesting origin.
    /// Only enable this behind a reverse proxy that overwrites those headers.
    pub trust_proxy: bool,
    /// Minimum age of a stored record before it may be reported as changed.
    pub staleness_window: TimeDelta,
    /// Base of the SSL Labs API, e.g. "https://api.ssllabs.com/api/v3".
    pub ssl_labs_url: Url,
    /// Whois server queried first; its `refer:` line picks the registry server.
    pub whois_root_server: String,
    pub whois_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database_url: String = get_env("DATABASE_URL");
        let db_max_connections: u32 = get_env_default("DB_MAX_CONNECTIONS", 5);
        let bind_addr: SocketAddr =
            get_env_default("BIND_ADDR", SocketAddr::from(([127, 0, 0, 1], 8090)));
        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .expect("CORS_ORIGIN must be a valid header value");
        // Default to false - must explicitly enable when behind a trusted proxy
        let trust_proxy: bool = get_env_default("TRUST_PROXY", false);
        let staleness_window_secs: i64 =
            get_env_default("STALENESS_WINDOW_SECS", DEFAULT_STALENESS_WINDOW_SECS);
        let staleness_window = staleness_window_from_secs(staleness_window_secs);
        let ssl_labs_url: Url = get_env_default(
            "SSL_LABS_URL",
            "https://api.ssllabs.com/api/v3"
                .parse()
                .expect("default SSL Labs URL is valid"),
        );
        let whois_root_server: String =
            get_env_default("WHOIS_ROOT_SERVER", "whois.iana.org:43".to_string());
        let whois_timeout_secs: u64 = get_env_default("WHOIS_TIMEOUT_SECS", 10);

        Self {
            database_url,
            db_max_connections,
            bind_addr,
            cors_origin,
            trust_proxy,
            staleness_window,
            ssl_labs_url,
            whois_root_server,
            whois_timeout: Duration::from_secs(whois_timeout_secs),
        }
    }
}

fn staleness_window_from_secs(secs: i64) -> TimeDelta {
    TimeDelta::try_seconds(secs).expect("STALENESS_WINDOW_SECS out of range")
}
