use std::env;
use std::net::SocketAddr;

use crate::config::ServerConfig;
use tracing::warn;

mod env_config;

const DEFAULT_DB_URL: &str = "sqlite://roster.db";

/// Routes served by the application itself; the metrics endpoint must not shadow them.
const RESERVED_PATHS: &[&str] = &["/", "/health", "/users", "/users/ping"];

#[derive(Debug)]
pub struct Settings {
    pub addr: SocketAddr,
    pub db_url: String,
    pub db_pool_max: u32,
    pub config: ServerConfig,
}

impl Settings {
    #[must_use]
    pub fn from_env() -> Self {
        let addr = match env::var("ROSTER_ADDR") {
            Ok(value) => value.parse().unwrap_or_else(|_| {
                warn!(event = "config_invalid", field = "ROSTER_ADDR", value = %value);
                default_addr()
            }),
            Err(_) => default_addr(),
        };
        let db_url = env::var("ROSTER_DB_URL").unwrap_or_else(|_| DEFAULT_DB_URL.to_string());
        let db_pool_max = match env::var("ROSTER_DB_POOL_MAX") {
            Ok(value) => value.parse::<u32>().unwrap_or_else(|_| {
                warn!(event = "config_invalid", field = "ROSTER_DB_POOL_MAX", value = %value);
                10
            }),
            Err(_) => 10,
        };
        let config_path =
            env::var("ROSTER_CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());
        let mut config = env_config::load_config(&config_path);
        env_config::apply_server_env_overrides(&mut config);
        env_config::apply_metrics_env_overrides(&mut config);

        Self {
            addr,
            db_url,
            db_pool_max,
            config,
        }
    }
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

pub fn preflight(settings: &Settings) -> Result<(), Vec<String>> {
    let mut missing = Vec::new();
    if settings.db_pool_max == 0 {
        missing.push("ROSTER_DB_POOL_MAX must be greater than zero".to_string());
    }
    if settings.db_url.trim().is_empty() {
        missing.push("ROSTER_DB_URL must not be empty".to_string());
    }
    if settings.config.server.max_body_bytes == 0 {
        missing.push("server.max_body_bytes must be greater than zero".to_string());
    }
    if let Some(err) = validate_metrics_endpoint(settings) {
        missing.push(err);
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}

fn validate_metrics_endpoint(settings: &Settings) -> Option<String> {
    let metrics = &settings.config.metrics;
    if !metrics.enabled {
        return None;
    }
    let endpoint = metrics.endpoint.as_str();
    if !endpoint.starts_with('/') {
        return Some(format!("metrics.endpoint must start with '/': {endpoint}"));
    }
    if RESERVED_PATHS.contains(&endpoint) || endpoint.starts_with("/user/") {
        return Some(format!(
            "metrics.endpoint collides with an application route: {endpoint}"
        ));
    }
    None
}
