//! ladderview-core: data-freshness core for the ladder stats panel
//!
//! This library owns everything the viewer panel needs between the
//! authentication handshake and the renderer: the player snapshot model,
//! the remote gateway contract, the per-channel persistent cache and the
//! freshness controller that keeps the displayed state current without
//! regressing a good display on transient failures.
//!
//! # Main Entry Points
//!
//! - [`controller`] - Freshness controller, polling handle and viewer session
//! - [`view`] - View state and the projector used by renderers
//! - [`cache`] - Persistent cache over a host key/value store
//! - [`gateway`] - Remote data gateway contract and response classification
//! - [`broadcaster`] - Broadcaster configuration panel
//! - [`config`] - Configuration management

pub mod broadcaster;
pub mod cache;
pub mod config;
pub mod controller;
pub mod errors;
pub mod events;
pub mod gateway;
pub mod logging;
pub mod snapshot;
pub mod view;

#[doc(hidden)]
pub mod test_helpers;

// Re-export commonly used types at crate root for convenience
pub use broadcaster::{ConfigGateway, ConfigLookup, ConfigPanel, ProfileIds};
pub use cache::{CacheEntry, FileStore, KeyValueStore, MemoryStore, PersistentCache};
pub use config::{LadderviewConfig, PanelSettings};
pub use controller::{FreshnessController, PollingHandle, RefreshReport, ViewerSession};
pub use errors::{ConfigError, LadderError};
pub use gateway::{Credentials, FetchOutcome, GatewayError, GatewayResponse, PlayerGateway};
pub use snapshot::{GameMode, LadderStats, Ladders, Player, PlayerSnapshot};
pub use view::{ProjectedView, ViewState, ViewStatus, project};

// Re-export logging initialization
pub use logging::init_logging;
