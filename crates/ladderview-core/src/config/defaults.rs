//! Default values for configuration.

/// Returns the default polling interval (60000ms).
pub fn default_update_interval_ms() -> u64 {
    60_000
}

/// Returns the default cache key prefix.
pub fn default_installation_id() -> String {
    "ladderview".to_string()
}

/// The cache is on unless explicitly disabled.
pub fn default_cache_enabled() -> bool {
    true
}
