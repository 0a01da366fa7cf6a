//! Schema validation for the gateway's player payload.
//!
//! Expected shape:
//!
//! ```json
//! {
//!   "player": { "server": "EU", "name": "Serral", "clan": { "name": "", "tag": "" },
//!               "rank": "Grandmaster", "portrait": "https://..." },
//!   "ladders": { "1v1": { "totalLadders": 1, "topRankId": 6, "topRank": "Grandmaster",
//!                         "topMMR": 7200, "wins": 120, "losses": 31, "ties": 0 } }
//! }
//! ```

use serde_json::{Map, Value};

use super::errors::PayloadError;
use super::types::{GameMode, LadderStats, Ladders, Player, PlayerSnapshot};

/// Validate a gateway body and build a [`PlayerSnapshot`] from it.
///
/// `player.name` is required. Missing ladder modes take the unranked default,
/// unknown modes are skipped.
pub fn parse_player_payload(body: &Value) -> Result<PlayerSnapshot, PayloadError> {
    let object = body.as_object().ok_or(PayloadError::NotAnObject)?;

    let player = parse_player(object)?;
    let ladders = match object.get("ladders") {
        None | Some(Value::Null) => Ladders::default(),
        Some(Value::Object(raw)) => parse_ladders(raw)?,
        Some(_) => {
            return Err(PayloadError::InvalidField {
                field: "ladders".to_string(),
                message: "expected an object".to_string(),
            });
        }
    };

    Ok(PlayerSnapshot { player, ladders })
}

fn parse_player(object: &Map<String, Value>) -> Result<Player, PayloadError> {
    let value = object.get("player").ok_or_else(|| PayloadError::MissingField {
        field: "player".to_string(),
    })?;

    let fields = value.as_object().ok_or_else(|| PayloadError::InvalidField {
        field: "player".to_string(),
        message: "expected an object".to_string(),
    })?;

    match fields.get("name") {
        Some(Value::String(_)) => {}
        Some(_) => {
            return Err(PayloadError::InvalidField {
                field: "player.name".to_string(),
                message: "expected a string".to_string(),
            });
        }
        None => {
            return Err(PayloadError::MissingField {
                field: "player.name".to_string(),
            });
        }
    }

    serde_json::from_value(value.clone()).map_err(|e| PayloadError::InvalidField {
        field: "player".to_string(),
        message: e.to_string(),
    })
}

fn parse_ladders(raw: &Map<String, Value>) -> Result<Ladders, PayloadError> {
    let mut ladders = Ladders::default();

    for (key, value) in raw {
        let Some(mode) = GameMode::from_key(key) else {
            tracing::debug!(
                event = "core.payload.unknown_mode_skipped",
                mode = %key
            );
            continue;
        };

        let stats: LadderStats =
            serde_json::from_value(value.clone()).map_err(|e| PayloadError::InvalidField {
                field: format!("ladders.{}", key),
                message: e.to_string(),
            })?;
        ladders.set(mode, stats);
    }

    Ok(ladders)
}
