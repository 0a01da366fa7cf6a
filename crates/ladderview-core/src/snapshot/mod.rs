//! Player snapshot model and gateway payload validation.

pub mod errors;
pub mod types;
pub mod validation;

pub use errors::PayloadError;
pub use types::{Clan, GameMode, LadderStats, Ladders, Player, PlayerSnapshot};
pub use validation::parse_player_payload;
