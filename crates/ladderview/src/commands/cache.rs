use clap::ArgMatches;
use tracing::{error, info};

use super::helpers::{is_valid_channel_id, load_settings_with_warning, open_cache};
use crate::render;

pub(crate) fn handle_cache_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("show", sub_matches)) => handle_show_command(sub_matches),
        Some(("clear", sub_matches)) => handle_clear_command(sub_matches),
        _ => {
            error!(event = "cli.command_unknown", command = "cache");
            Err("Unknown cache command".into())
        }
    }
}

fn channel_arg(matches: &ArgMatches) -> Result<&str, Box<dyn std::error::Error>> {
    let channel_id = matches
        .get_one::<String>("channel")
        .ok_or("Channel argument is required")?;

    if !is_valid_channel_id(channel_id) {
        eprintln!("❌ Invalid channel id: {}", channel_id);
        error!(event = "cli.cache_invalid_channel", channel_id = %channel_id);
        return Err("Invalid channel id".into());
    }
    Ok(channel_id.as_str())
}

fn handle_show_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let channel_id = channel_arg(matches)?;
    let json_output = matches.get_flag("json");

    info!(event = "cli.cache_show_started", channel_id = channel_id);

    let settings = load_settings_with_warning()?;
    let cache = open_cache(&settings);

    if !cache.is_enabled() {
        println!("Cache is disabled.");
        return Ok(());
    }

    match cache.get(channel_id) {
        Some(entry) => {
            if json_output {
                println!("{}", serde_json::to_string_pretty(&entry)?);
            } else {
                println!(
                    "Cached view for channel {} (saved {}):",
                    channel_id,
                    entry.saved_at.format("%Y-%m-%d %H:%M:%S UTC")
                );
                render::print_view(&entry.into_view_state(), false)?;
            }
            info!(event = "cli.cache_show_completed", channel_id = channel_id, hit = true);
        }
        None => {
            if json_output {
                println!("null");
            } else {
                println!("No cached view for channel {}.", channel_id);
            }
            info!(event = "cli.cache_show_completed", channel_id = channel_id, hit = false);
        }
    }

    Ok(())
}

fn handle_clear_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let channel_id = channel_arg(matches)?;

    info!(event = "cli.cache_clear_started", channel_id = channel_id);

    let settings = load_settings_with_warning()?;
    let cache = open_cache(&settings);

    if !cache.is_enabled() {
        println!("Cache is disabled.");
        return Ok(());
    }

    if cache.remove(channel_id) {
        println!("✅ Cleared cached view for channel {}.", channel_id);
        info!(event = "cli.cache_clear_completed", channel_id = channel_id);
        Ok(())
    } else {
        eprintln!("❌ Failed to clear cached view for channel {}.", channel_id);
        error!(event = "cli.cache_clear_failed", channel_id = channel_id);
        Err("Failed to clear cache entry".into())
    }
}
