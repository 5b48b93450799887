use std::env;
use std::fs;
use std::path::Path;

use tracing::warn;

use crate::config::{MetricsProfile, ServerConfig};

pub(super) fn load_config(path: &str) -> ServerConfig {
    if !Path::new(path).exists() {
        return ServerConfig::default();
    }

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            warn!(event = "config_read_failed", path, error = %err);
            return ServerConfig::default();
        }
    };
    match serde_yaml::from_str(&contents) {
        Ok(config) => config,
        Err(err) => {
            warn!(event = "config_parse_failed", path, error = %err);
            ServerConfig::default()
        }
    }
}

pub(super) fn apply_server_env_overrides(config: &mut ServerConfig) {
    if let Ok(value) = env::var("ROSTER_MAX_BODY_BYTES") {
        match value.trim().parse::<usize>() {
            Ok(bytes) => config.server.max_body_bytes = bytes,
            Err(_) => {
                warn!(event = "config_invalid", field = "ROSTER_MAX_BODY_BYTES", value = %value);
            }
        }
    }
    if let Ok(value) = env::var("ROSTER_SERVER_NAME") {
        let trimmed = value.trim();
        config.server.name = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }
}

pub(super) fn apply_metrics_env_overrides(config: &mut ServerConfig) {
    if let Ok(value) = env::var("ROSTER_METRICS_ENABLED") {
        if let Some(enabled) = parse_bool(&value) {
            config.metrics.enabled = enabled;
        } else {
            warn!(
                event = "config_invalid",
                field = "ROSTER_METRICS_ENABLED",
                value = %value
            );
        }
    }
    if let Ok(value) = env::var("ROSTER_METRICS_ENDPOINT") {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            warn!(event = "config_invalid", field = "ROSTER_METRICS_ENDPOINT", value = %value);
        } else {
            config.metrics.endpoint = trimmed.to_string();
        }
    }
    if let Ok(value) = env::var("ROSTER_METRICS_PROFILE") {
        if let Some(profile) = parse_metrics_profile(&value) {
            config.metrics.profile = Some(profile);
        } else {
            warn!(
                event = "config_invalid",
                field = "ROSTER_METRICS_PROFILE",
                value = %value
            );
        }
    }
}

pub(super) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn normalize_enum(value: &str) -> String {
    value.trim().to_ascii_lowercase().replace('-', "_")
}

pub(super) fn parse_metrics_profile(value: &str) -> Option<MetricsProfile> {
    match normalize_enum(value).as_str() {
        "prod" | "production" => Some(MetricsProfile::Prod),
        "staging" => Some(MetricsProfile::Staging),
        "debug" => Some(MetricsProfile::Debug),
        _ => None,
    }
}
