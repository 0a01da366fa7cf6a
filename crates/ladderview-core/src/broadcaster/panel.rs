use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::gateway::{ConfigGateway, ConfigLookup, SAVE_CREATED, SaveConfigRequest};
use super::profile_url::validate_profile_url_field;
use crate::gateway::Credentials;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Info,
    Warning,
    Success,
    Danger,
}

/// Which status text the panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKey {
    Loading,
    NoConfigFound,
    GetSuccess,
    GetError,
    SaveInProgress,
    SaveSuccess,
    SaveError,
}

impl MessageKey {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKey::Loading => "config_loading",
            MessageKey::NoConfigFound => "config_get_no_config_found_warning",
            MessageKey::GetSuccess => "config_get_success",
            MessageKey::GetError => "config_get_error",
            MessageKey::SaveInProgress => "config_save_inprogress",
            MessageKey::SaveSuccess => "config_save_success",
            MessageKey::SaveError => "config_save_error",
        }
    }

    /// English text for the key.
    pub fn text(self) -> &'static str {
        match self {
            MessageKey::Loading => "Loading configuration...",
            MessageKey::NoConfigFound => {
                "No configuration found. Paste your StarCraft II profile URL below to get started."
            }
            MessageKey::GetSuccess => "Configuration loaded.",
            MessageKey::GetError => "Could not load your configuration. Please try again later.",
            MessageKey::SaveInProgress => "Saving configuration...",
            MessageKey::SaveSuccess => "Configuration saved.",
            MessageKey::SaveError => "Could not save your configuration. Please try again later.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub key: MessageKey,
    pub throbber_visible: bool,
}

impl StatusMessage {
    fn new(kind: StatusKind, key: MessageKey) -> Self {
        Self {
            kind,
            key,
            throbber_visible: matches!(key, MessageKey::Loading | MessageKey::SaveInProgress),
        }
    }
}

/// Broadcaster-side configuration panel.
///
/// Starts out loading with submission disabled. [`load`](Self::load) settles
/// it on the stored configuration; [`submit`](Self::submit) saves a new
/// profile URL.
pub struct ConfigPanel {
    gateway: Arc<dyn ConfigGateway>,
    credentials: Option<Credentials>,
    status: StatusMessage,
    submission_disabled: bool,
    api_disabled: bool,
    profile_url: Option<String>,
}

impl ConfigPanel {
    pub fn new(gateway: Arc<dyn ConfigGateway>) -> Self {
        Self {
            gateway,
            credentials: None,
            status: StatusMessage::new(StatusKind::Info, MessageKey::Loading),
            submission_disabled: true,
            api_disabled: false,
            profile_url: None,
        }
    }

    /// Fetch the stored configuration for the authenticated channel.
    pub async fn load(&mut self, credentials: Credentials) {
        let lookup = self
            .gateway
            .get_config(&credentials.channel_id, &credentials.token)
            .await;

        let status = match lookup {
            Ok(ConfigLookup::NotFound { api_disabled }) => {
                self.api_disabled = api_disabled;
                StatusMessage::new(StatusKind::Warning, MessageKey::NoConfigFound)
            }
            Ok(ConfigLookup::Found {
                profile,
                api_disabled,
            }) => {
                self.api_disabled = api_disabled;
                self.profile_url = Some(profile.to_url());
                StatusMessage::new(StatusKind::Success, MessageKey::GetSuccess)
            }
            Ok(ConfigLookup::Failed { status }) => {
                warn!(
                    event = "core.broadcaster.config_load_failed",
                    channel_id = %credentials.channel_id,
                    status = status
                );
                StatusMessage::new(StatusKind::Danger, MessageKey::GetError)
            }
            Err(e) => {
                warn!(
                    event = "core.broadcaster.config_load_failed",
                    channel_id = %credentials.channel_id,
                    error = %e
                );
                StatusMessage::new(StatusKind::Danger, MessageKey::GetError)
            }
        };

        self.credentials = Some(credentials);
        self.set_status(status);
    }

    /// Save `profile_url` for the channel.
    ///
    /// Invalid URLs, gateway errors and any status other than 201 end in
    /// `Danger/save_error`.
    pub async fn submit(&mut self, profile_url: &str) {
        let Some(credentials) = self.credentials.clone() else {
            warn!(
                event = "core.broadcaster.config_save_failed",
                reason = "not authenticated"
            );
            self.set_status(StatusMessage::new(StatusKind::Danger, MessageKey::SaveError));
            return;
        };

        let profile = match validate_profile_url_field(profile_url) {
            Ok(profile) => profile,
            Err(e) => {
                warn!(
                    event = "core.broadcaster.config_save_failed",
                    channel_id = %credentials.channel_id,
                    error = %e
                );
                self.set_status(StatusMessage::new(StatusKind::Danger, MessageKey::SaveError));
                return;
            }
        };

        self.set_status(StatusMessage::new(
            StatusKind::Info,
            MessageKey::SaveInProgress,
        ));

        let request = SaveConfigRequest {
            profile,
            token: credentials.token.clone(),
        };
        let status = match self
            .gateway
            .save_config(&credentials.channel_id, &request)
            .await
        {
            Ok(SAVE_CREATED) => {
                info!(
                    event = "core.broadcaster.config_saved",
                    channel_id = %credentials.channel_id
                );
                self.profile_url = Some(profile.to_url());
                StatusMessage::new(StatusKind::Success, MessageKey::SaveSuccess)
            }
            Ok(status) => {
                warn!(
                    event = "core.broadcaster.config_save_failed",
                    channel_id = %credentials.channel_id,
                    status = status
                );
                StatusMessage::new(StatusKind::Danger, MessageKey::SaveError)
            }
            Err(e) => {
                warn!(
                    event = "core.broadcaster.config_save_failed",
                    channel_id = %credentials.channel_id,
                    error = %e
                );
                StatusMessage::new(StatusKind::Danger, MessageKey::SaveError)
            }
        };
        self.set_status(status);
    }

    pub fn status(&self) -> StatusMessage {
        self.status
    }

    pub fn submission_disabled(&self) -> bool {
        self.submission_disabled
    }

    /// Profile URL rebuilt from the stored ids, if any.
    pub fn profile_url(&self) -> Option<&str> {
        self.profile_url.as_deref()
    }

    pub fn shows_blackout_notice(&self) -> bool {
        self.api_disabled
    }

    /// The form is hidden only while the API is disabled and nothing is configured.
    pub fn shows_form(&self) -> bool {
        !(self.api_disabled && self.status.key == MessageKey::NoConfigFound)
    }

    fn set_status(&mut self, status: StatusMessage) {
        self.status = status;
        // Only a save in progress blocks another submission
        self.submission_disabled = status.key == MessageKey::SaveInProgress;
        tracing::debug!(
            event = "core.broadcaster.status_changed",
            status = status.key.as_str()
        );
    }
}

impl std::fmt::Debug for ConfigPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigPanel")
            .field("status", &self.status)
            .field("submission_disabled", &self.submission_disabled)
            .field("api_disabled", &self.api_disabled)
            .field("profile_url", &self.profile_url)
            .finish_non_exhaustive()
    }
}
