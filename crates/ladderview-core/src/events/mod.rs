//! Lifecycle events for the panel and its viewers.

use tracing::{error, info, warn};

use crate::config::PanelSettings;
use crate::errors::LadderError;

/// The binary started and is about to run `command`.
pub fn log_app_startup(command: &str) {
    info!(
        event = "core.app.startup_completed",
        version = env!("CARGO_PKG_VERSION"),
        command = command
    );
}

pub fn log_app_shutdown(command: &str) {
    info!(event = "core.app.shutdown_started", command = command);
}

/// Settings the panel runs with, after config files and env overrides.
pub fn log_settings_resolved(settings: &PanelSettings) {
    info!(
        event = "core.panel.settings_resolved",
        update_interval_ms = settings.update_interval_ms,
        request_timeout_ms = u64::try_from(settings.request_timeout.as_millis()).unwrap_or(u64::MAX),
        cache_enabled = settings.cache_enabled,
        installation_id = %settings.installation_id
    );
}

pub fn log_viewer_mounted(channel_id: &str, interval_ms: u64) {
    info!(
        event = "core.viewer.mount_completed",
        channel_id = channel_id,
        interval_ms = interval_ms
    );
}

/// `channel_id` is `None` when the viewer never authenticated.
pub fn log_viewer_unmounted(channel_id: Option<&str>) {
    info!(
        event = "core.viewer.unmount_completed",
        channel_id = channel_id.unwrap_or("<unauthenticated>")
    );
}

/// User mistakes are logged at warn level, everything else as an error.
pub fn log_ladder_error(error: &dyn LadderError) {
    if error.is_user_error() {
        warn!(
            event = "core.app.user_error_occurred",
            error = %error,
            error_code = error.error_code()
        );
    } else {
        error!(
            event = "core.app.error_occurred",
            error = %error,
            error_code = error.error_code()
        );
    }
}

pub fn log_app_error(error: &dyn std::error::Error) {
    error!(
        event = "core.app.error_occurred",
        error = %error,
        error_type = std::any::type_name_of_val(error)
    );
}
