//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.ladderview/config.toml`
//! 3. **Project config** - `./.ladderview/config.toml`
//! 4. **Environment** - `LADDERVIEW_UPDATE_INTERVAL`, `LADDERVIEW_ENABLE_CACHE`,
//!    `LADDERVIEW_CACHE_ID`, `LADDERVIEW_CACHE_DIR`

use crate::config::types::{CacheConfig, CacheToggle, LadderviewConfig, ViewerConfig};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_UPDATE_INTERVAL: &str = "LADDERVIEW_UPDATE_INTERVAL";
pub const ENV_ENABLE_CACHE: &str = "LADDERVIEW_ENABLE_CACHE";
pub const ENV_CACHE_ID: &str = "LADDERVIEW_CACHE_ID";
pub const ENV_CACHE_DIR: &str = "LADDERVIEW_CACHE_DIR";

/// Load configuration from the hierarchy of config files and the environment.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be read or parsed, if
/// an environment override is malformed, or if validation fails. Missing
/// config files are not errors.
pub fn load_hierarchy() -> Result<LadderviewConfig, ConfigError> {
    let mut config = LadderviewConfig::default();

    match dirs::home_dir() {
        Some(home) => {
            if let Some(user_config) = load_config_file(&user_config_path(&home))? {
                config = merge_configs(config, user_config);
            }
        }
        None => {
            tracing::warn!(
                event = "core.config.home_dir_not_found",
                "Could not determine home directory - skipping user config"
            );
        }
    }

    let project_path = std::env::current_dir()?
        .join(".ladderview")
        .join("config.toml");
    if let Some(project_config) = load_config_file(&project_path)? {
        config = merge_configs(config, project_config);
    }

    config = apply_env_overrides(config, |key| std::env::var(key).ok())?;

    validate_config(&config)?;

    tracing::debug!(
        event = "core.config.load_completed",
        update_interval_ms = ?config.viewer.update_interval_ms,
        cache_enabled = ?config.cache.enabled
    );

    Ok(config)
}

fn user_config_path(home: &Path) -> PathBuf {
    home.join(".ladderview").join("config.toml")
}

/// Load a configuration file. Returns `Ok(None)` if the file does not exist.
pub fn load_config_file(path: &Path) -> Result<Option<LadderviewConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ConfigError::IoError { source: e }),
    };

    let config = toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        message: format!("'{}': {}", path.display(), e),
    })?;

    Ok(Some(config))
}

/// Merge two configurations, with `override_config` taking precedence.
///
/// Override values replace base values only if present.
pub fn merge_configs(base: LadderviewConfig, override_config: LadderviewConfig) -> LadderviewConfig {
    LadderviewConfig {
        viewer: ViewerConfig {
            update_interval_ms: override_config
                .viewer
                .update_interval_ms
                .or(base.viewer.update_interval_ms),
            request_timeout_ms: override_config
                .viewer
                .request_timeout_ms
                .or(base.viewer.request_timeout_ms),
        },
        cache: CacheConfig {
            enabled: override_config.cache.enabled.or(base.cache.enabled),
            installation_id: override_config
                .cache
                .installation_id
                .or(base.cache.installation_id),
            dir: override_config.cache.dir.or(base.cache.dir),
        },
    }
}

/// Apply `LADDERVIEW_*` overrides using `lookup` to read variables.
///
/// Empty variables are ignored. The interval variable must parse as an
/// integer; range checks happen in validation.
pub fn apply_env_overrides<F>(
    mut config: LadderviewConfig,
    lookup: F,
) -> Result<LadderviewConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let read = |key: &str| lookup(key).filter(|value| !value.is_empty());

    if let Some(raw) = read(ENV_UPDATE_INTERVAL) {
        let interval = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ConfigError::InvalidConfiguration {
                message: format!(
                    "{} must be a positive integer, got '{}'",
                    ENV_UPDATE_INTERVAL, raw
                ),
            })?;
        config.viewer.update_interval_ms = Some(interval);
    }

    if let Some(raw) = read(ENV_ENABLE_CACHE) {
        config.cache.enabled = Some(CacheToggle::Text(raw));
    }

    if let Some(raw) = read(ENV_CACHE_ID) {
        config.cache.installation_id = Some(raw);
    }

    if let Some(raw) = read(ENV_CACHE_DIR) {
        config.cache.dir = Some(PathBuf::from(raw));
    }

    Ok(config)
}
