use std::sync::Arc;

use tracing::warn;

use ladderview_core::{
    ConfigError, FileStore, LadderviewConfig, PanelSettings, PersistentCache, events,
};

/// Load and resolve settings, falling back to defaults with a warning.
pub fn load_settings_with_warning() -> Result<PanelSettings, ConfigError> {
    let settings = resolve_settings_or_defaults()?;
    events::log_settings_resolved(&settings);
    Ok(settings)
}

fn resolve_settings_or_defaults() -> Result<PanelSettings, ConfigError> {
    match LadderviewConfig::load_hierarchy().and_then(|config| config.resolve()) {
        Ok(settings) => Ok(settings),
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.ladderview/config.toml and ./.ladderview/config.toml for syntax errors.",
                e
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            LadderviewConfig::default().resolve()
        }
    }
}

/// Persistent cache over the file store the settings point at.
pub fn open_cache(settings: &PanelSettings) -> PersistentCache {
    let store = match &settings.cache_dir {
        Some(dir) => FileStore::new(dir),
        None => FileStore::at_default_location(),
    };
    PersistentCache::from_settings(Arc::new(store), settings)
}

/// Channel ids are used as fixture file names; keep them to a safe alphabet.
pub fn is_valid_channel_id(channel_id: &str) -> bool {
    !channel_id.is_empty()
        && channel_id.len() <= 64
        && channel_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
