use ladderview_core::{PlayerSnapshot, ViewState, project};

/// Print what the panel would render for `state`.
pub fn print_view(state: &ViewState, json_output: bool) -> Result<(), serde_json::Error> {
    let view = project(state);

    if json_output {
        println!("{}", serde_json::to_string(&view)?);
        return Ok(());
    }

    match (view.snapshot(), view.message()) {
        (Some(snapshot), _) => print_snapshot(snapshot),
        (None, Some(message)) => {
            match message.emote {
                Some(emote) => println!("[{}] {} {}", view.status(), emote, message.text),
                None => println!("[{}] {}", view.status(), message.text),
            }
        }
        (None, None) => println!("[{}]", view.status()),
    }
    Ok(())
}

fn print_snapshot(snapshot: &PlayerSnapshot) {
    let player = &snapshot.player;
    let clan = if player.clan.tag.is_empty() {
        String::new()
    } else {
        format!(" [{}]", player.clan.tag)
    };
    println!(
        "[ready] {}{} - {} - {}",
        player.name, clan, player.server, player.rank
    );

    for (mode, stats) in snapshot.ladders.iter() {
        if stats.is_ranked() {
            println!(
                "  {:<7} {:<12} MMR {:<6} {}W {}L {}T",
                mode.to_string(),
                stats.top_rank,
                stats.top_mmr,
                stats.wins,
                stats.losses,
                stats.ties
            );
        } else {
            println!("  {:<7} unranked", mode.to_string());
        }
    }
}
