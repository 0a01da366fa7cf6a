//! # Configuration System
//!
//! Hierarchical TOML configuration for the ladder panel.
//!
//! ## Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.ladderview/config.toml`
//! 3. **Project config** - `./.ladderview/config.toml`
//! 4. **Environment** - `LADDERVIEW_*` variables
//! 5. **CLI arguments** - Command-line flags (highest priority)
//!
//! ## Usage Example
//!
//! ```toml
//! # ~/.ladderview/config.toml
//! [viewer]
//! update_interval_ms = 60000
//! request_timeout_ms = 10000
//!
//! [cache]
//! enabled = "true"
//! installation_id = "ladderview-7f3a"
//! ```
//!
//! ## Loading Configuration
//!
//! ```rust,no_run
//! use ladderview_core::config::LadderviewConfig;
//!
//! // Invalid intervals fail here instead of silently falling back to defaults
//! fn example() -> Result<(), ladderview_core::ConfigError> {
//!     let settings = LadderviewConfig::load_hierarchy()?.resolve()?;
//!     println!("polling every {}ms", settings.update_interval_ms);
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

// Public API exports
pub use types::{CacheConfig, CacheToggle, LadderviewConfig, PanelSettings, ViewerConfig};
pub use validation::{positive_millis, validate_config};

impl LadderviewConfig {
    /// Load configuration from the hierarchy of config files and environment.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy()
    }

    /// Validate the configuration.
    ///
    /// See [`validation::validate_config`] for details.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }

    /// Validate and resolve into the typed settings consumed at startup.
    ///
    /// See [`validation::resolve_settings`] for details.
    pub fn resolve(&self) -> Result<PanelSettings, crate::errors::ConfigError> {
        validation::resolve_settings(self)
    }
}
