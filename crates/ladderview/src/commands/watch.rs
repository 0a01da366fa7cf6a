use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::ArgMatches;
use tracing::{error, info, warn};

use ladderview_core::{Credentials, PanelSettings, ViewerSession, events};

use super::helpers::{is_valid_channel_id, load_settings_with_warning, open_cache};
use crate::fixture::FixtureGateway;
use crate::render;

pub(crate) fn handle_watch_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let channel_id = matches
        .get_one::<String>("channel")
        .ok_or("Channel argument is required")?;
    let token = matches
        .get_one::<String>("token")
        .ok_or("Token argument is required")?;
    let fixtures = PathBuf::from(
        matches
            .get_one::<String>("fixtures")
            .ok_or("Fixtures argument is required")?,
    );
    let json_output = matches.get_flag("json");
    let ticks = matches.get_one::<u64>("ticks").copied();

    if !is_valid_channel_id(channel_id) {
        eprintln!("❌ Invalid channel id: {}", channel_id);
        error!(event = "cli.watch_invalid_channel", channel_id = %channel_id);
        return Err("Invalid channel id".into());
    }

    if !fixtures.is_dir() {
        eprintln!("❌ Fixtures directory not found: {}", fixtures.display());
        error!(
            event = "cli.watch_fixtures_missing",
            path = %fixtures.display()
        );
        return Err("Fixtures directory not found".into());
    }

    let mut settings = load_settings_with_warning()?;
    if let Some(interval_ms) = matches.get_one::<u64>("interval-ms") {
        settings.update_interval_ms = *interval_ms;
    }

    info!(
        event = "cli.watch_started",
        channel_id = %channel_id,
        interval_ms = settings.update_interval_ms,
        ticks = ?ticks,
        json_output = json_output
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let credentials = Credentials::new(channel_id.as_str(), token.as_str());
    match runtime.block_on(run_watch(credentials, settings, fixtures, json_output, ticks)) {
        Ok(()) => {
            info!(event = "cli.watch_completed", channel_id = %channel_id);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Watch failed: {}", e);
            error!(event = "cli.watch_failed", channel_id = %channel_id, error = %e);
            events::log_app_error(&*e);
            Err(e)
        }
    }
}

async fn run_watch(
    credentials: Credentials,
    settings: PanelSettings,
    fixtures: PathBuf,
    json_output: bool,
    ticks: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let gateway = Arc::new(FixtureGateway::new(fixtures));
    let cache = open_cache(&settings);
    let mut session = ViewerSession::from_settings(gateway, cache, &settings)?;
    let mut updates = session.controller().subscribe();

    session.on_auth(credentials).await?;
    render::print_view(&updates.borrow_and_update(), json_output)?;

    if ticks.is_none() && !json_output {
        println!("Watching. Press Ctrl+C to exit.");
    }
    let stop = wait_for_stop(run_length(settings.update_interval_ms, ticks));
    tokio::pin!(stop);

    loop {
        tokio::select! {
            _ = &mut stop => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                render::print_view(&state, json_output)?;
            }
        }
    }

    session.unmount();
    Ok(())
}

/// How long to stay mounted: half an interval past the last requested tick.
fn run_length(interval_ms: u64, ticks: Option<u64>) -> Option<Duration> {
    ticks.map(|ticks| match ticks {
        0 => Duration::ZERO,
        n => Duration::from_millis(
            interval_ms
                .saturating_mul(n)
                .saturating_add(interval_ms / 2),
        ),
    })
}

async fn wait_for_stop(run_length: Option<Duration>) {
    match run_length {
        Some(duration) => tokio::time::sleep(duration).await,
        None => {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(event = "cli.watch_signal_failed", error = %e);
            }
        }
    }
}
