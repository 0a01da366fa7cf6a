//! Configuration type definitions.
//!
//! These types are serialized/deserialized from TOML config files. Numeric
//! intervals are kept signed here so that a negative value in a config file
//! is reported as invalid rather than failing to parse.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration loaded from TOML config files.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LadderviewConfig {
    /// Viewer panel refresh settings
    #[serde(default)]
    pub viewer: ViewerConfig,

    /// Persistent cache settings
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Viewer refresh configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ViewerConfig {
    /// Polling interval in milliseconds. Must be positive.
    /// Default: 60000ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_interval_ms: Option<i64>,

    /// Upper bound for a single gateway call in milliseconds.
    /// Default: the polling interval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<i64>,
}

/// Persistent cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CacheConfig {
    /// Cache toggle. Accepts a TOML boolean or a boolean-like string
    /// (case-insensitive `"true"` enables). Default: enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<CacheToggle>,

    /// Prefix for cache keys, unique per client installation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_id: Option<String>,

    /// Directory backing the file store. Default: `~/.ladderview/cache`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// Boolean-like cache flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CacheToggle {
    Flag(bool),
    Text(String),
}

impl CacheToggle {
    /// Only `true` or a case-insensitive `"true"` string enables the cache.
    pub fn is_enabled(&self) -> bool {
        match self {
            CacheToggle::Flag(flag) => *flag,
            CacheToggle::Text(text) => text.eq_ignore_ascii_case("true"),
        }
    }
}

/// Validated settings the panel is started with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSettings {
    pub update_interval_ms: u64,
    pub request_timeout: Duration,
    pub cache_enabled: bool,
    pub installation_id: String,
    pub cache_dir: Option<PathBuf>,
}
