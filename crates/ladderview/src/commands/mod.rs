use clap::ArgMatches;
use tracing::error;

use ladderview_core::events;

pub mod helpers;

mod cache;
mod profile;
mod watch;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let command = matches.subcommand_name().unwrap_or("none");
    events::log_app_startup(command);

    let result = match matches.subcommand() {
        Some(("watch", sub_matches)) => watch::handle_watch_command(sub_matches),
        Some(("cache", sub_matches)) => cache::handle_cache_command(sub_matches),
        Some(("profile", sub_matches)) => profile::handle_profile_command(sub_matches),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    };

    events::log_app_shutdown(command);
    result
}
