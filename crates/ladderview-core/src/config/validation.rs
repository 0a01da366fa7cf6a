//! Configuration validation.
//!
//! Invalid values fail fast at startup; nothing here falls back to a default
//! for a value that was explicitly configured.

use crate::config::defaults;
use crate::config::types::{LadderviewConfig, PanelSettings};
use crate::errors::ConfigError;
use std::time::Duration;

/// Convert a configured millisecond value into a positive `u64`.
pub fn positive_millis(field: &str, value: i64) -> Result<u64, ConfigError> {
    match u64::try_from(value) {
        Ok(millis) if millis > 0 => Ok(millis),
        _ => Err(ConfigError::InvalidConfiguration {
            message: format!("{} must be a positive integer, got {}", field, value),
        }),
    }
}

/// Validate the configuration.
///
/// # Errors
///
/// Returns `ConfigError::InvalidConfiguration` for a zero or negative
/// interval/timeout, or an empty installation id.
pub fn validate_config(config: &LadderviewConfig) -> Result<(), ConfigError> {
    if let Some(interval) = config.viewer.update_interval_ms {
        positive_millis("viewer.update_interval_ms", interval)?;
    }

    if let Some(timeout) = config.viewer.request_timeout_ms {
        positive_millis("viewer.request_timeout_ms", timeout)?;
    }

    if let Some(id) = &config.cache.installation_id
        && id.trim().is_empty()
    {
        return Err(ConfigError::InvalidConfiguration {
            message: "cache.installation_id cannot be empty".to_string(),
        });
    }

    Ok(())
}

/// Validate and resolve the configuration into [`PanelSettings`].
pub fn resolve_settings(config: &LadderviewConfig) -> Result<PanelSettings, ConfigError> {
    validate_config(config)?;

    let update_interval_ms = match config.viewer.update_interval_ms {
        Some(interval) => positive_millis("viewer.update_interval_ms", interval)?,
        None => defaults::default_update_interval_ms(),
    };

    let request_timeout_ms = match config.viewer.request_timeout_ms {
        Some(timeout) => positive_millis("viewer.request_timeout_ms", timeout)?,
        None => update_interval_ms,
    };

    Ok(PanelSettings {
        update_interval_ms,
        request_timeout: Duration::from_millis(request_timeout_ms),
        cache_enabled: config
            .cache
            .enabled
            .as_ref()
            .map(|toggle| toggle.is_enabled())
            .unwrap_or_else(defaults::default_cache_enabled),
        installation_id: config
            .cache
            .installation_id
            .clone()
            .unwrap_or_else(defaults::default_installation_id),
        cache_dir: config.cache.dir.clone(),
    })
}
