use std::sync::Arc;

use tracing::{debug, info};

use super::freshness::{ControllerOptions, FreshnessController};
use super::polling::PollingHandle;
use crate::cache::PersistentCache;
use crate::config::PanelSettings;
use crate::errors::ConfigError;
use crate::events;
use crate::gateway::{Credentials, PlayerGateway};
use crate::view::ViewState;

/// One mounted viewer: a controller plus the polling bound to the current
/// credentials.
///
/// At most one polling timer is alive at a time. Re-authentication replaces
/// the previous timer; unmounting (or dropping the session) tears the
/// controller down.
#[derive(Debug)]
pub struct ViewerSession {
    controller: FreshnessController,
    interval_ms: u64,
    credentials: Option<Credentials>,
    polling: Option<PollingHandle>,
}

impl ViewerSession {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidConfiguration` if `interval_ms` is zero.
    pub fn new(controller: FreshnessController, interval_ms: u64) -> Result<Self, ConfigError> {
        if interval_ms == 0 {
            return Err(ConfigError::InvalidConfiguration {
                message: "update interval must be a positive number of milliseconds, got 0"
                    .to_string(),
            });
        }

        Ok(Self {
            controller,
            interval_ms,
            credentials: None,
            polling: None,
        })
    }

    pub fn from_settings(
        gateway: Arc<dyn PlayerGateway>,
        cache: PersistentCache,
        settings: &PanelSettings,
    ) -> Result<Self, ConfigError> {
        let controller = FreshnessController::with_options(
            gateway,
            cache,
            ControllerOptions {
                request_timeout: Some(settings.request_timeout),
            },
        );
        Self::new(controller, settings.update_interval_ms)
    }

    /// Handle an authentication event from the host.
    ///
    /// The first event for a channel hydrates from the cache, refreshes once
    /// and starts polling. Later events restart polling with the new token.
    /// Switching to another channel resets the view first.
    /// Events arriving after [`unmount`](Self::unmount) are ignored.
    pub async fn on_auth(&mut self, credentials: Credentials) -> Result<(), ConfigError> {
        if self.controller.is_torn_down() {
            debug!(
                event = "core.session.auth_ignored",
                channel_id = %credentials.channel_id,
                reason = "unmounted"
            );
            return Ok(());
        }

        if let Some(mut previous) = self.polling.take() {
            previous.stop();
        }

        let channel_changed = match &self.credentials {
            Some(current) => current.channel_id != credentials.channel_id,
            None => true,
        };

        if channel_changed {
            if self.credentials.is_some() {
                info!(
                    event = "core.session.channel_changed",
                    channel_id = %credentials.channel_id
                );
                self.controller.reset();
            }
            self.controller.hydrate(&credentials.channel_id);
        } else {
            debug!(
                event = "core.session.credentials_refreshed",
                channel_id = %credentials.channel_id
            );
        }

        self.controller
            .refresh(&credentials.channel_id, &credentials.token)
            .await;

        self.polling = Some(
            self.controller
                .start_polling(credentials.clone(), self.interval_ms)?,
        );
        if channel_changed {
            events::log_viewer_mounted(&credentials.channel_id, self.interval_ms);
        }
        self.credentials = Some(credentials);
        Ok(())
    }

    pub fn controller(&self) -> &FreshnessController {
        &self.controller
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn view_state(&self) -> ViewState {
        self.controller.state()
    }

    pub fn is_polling(&self) -> bool {
        self.polling.as_ref().is_some_and(PollingHandle::is_active)
    }

    /// Stop polling and tear the controller down. Idempotent.
    pub fn unmount(&mut self) {
        if let Some(mut polling) = self.polling.take() {
            polling.stop();
        }
        if self.controller.is_torn_down() {
            return;
        }
        self.controller.stop();
        events::log_viewer_unmounted(
            self.credentials
                .as_ref()
                .map(|credentials| credentials.channel_id.as_str()),
        );
    }
}

impl Drop for ViewerSession {
    fn drop(&mut self) {
        self.unmount();
    }
}
