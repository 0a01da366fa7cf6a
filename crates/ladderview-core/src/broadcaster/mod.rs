//! Broadcaster configuration panel.
//!
//! Lets the channel owner point the viewer panel at a StarCraft II profile:
//! profile URL parsing and form validation, the configuration backend
//! contract and the panel's status state machine.

pub mod errors;
pub mod gateway;
pub mod panel;
pub mod profile_url;

pub use errors::ProfileUrlError;
pub use gateway::{ConfigGateway, ConfigLookup, SaveConfigRequest};
pub use panel::{ConfigPanel, MessageKey, StatusKind, StatusMessage};
pub use profile_url::{ProfileIds, validate_profile_url_field};
