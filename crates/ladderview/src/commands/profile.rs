use clap::ArgMatches;
use tracing::{error, info};

use ladderview_core::broadcaster::validate_profile_url_field;
use ladderview_core::events;

pub(crate) fn handle_profile_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("parse", sub_matches)) => handle_parse_command(sub_matches),
        _ => {
            error!(event = "cli.command_unknown", command = "profile");
            Err("Unknown profile command".into())
        }
    }
}

fn handle_parse_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let url = matches
        .get_one::<String>("url")
        .ok_or("URL argument is required")?;
    let json_output = matches.get_flag("json");

    info!(event = "cli.profile_parse_started", json_output = json_output);

    match validate_profile_url_field(url) {
        Ok(ids) => {
            if json_output {
                println!("{}", serde_json::to_string_pretty(&ids)?);
            } else {
                println!("Region: {}", ids.region_id);
                println!("Realm:  {}", ids.realm_id);
                println!("Player: {}", ids.player_id);
                println!("URL:    {}", ids.to_url());
            }

            info!(
                event = "cli.profile_parse_completed",
                region_id = ids.region_id,
                realm_id = ids.realm_id,
                player_id = ids.player_id
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Invalid profile URL: {}", e);
            error!(event = "cli.profile_parse_failed", error = %e);
            events::log_ladder_error(&e);
            Err(e.into())
        }
    }
}
