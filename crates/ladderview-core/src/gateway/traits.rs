use async_trait::async_trait;

use super::errors::GatewayError;
use super::types::FetchOutcome;

/// Source of player data for a channel.
///
/// Implementations report expected conditions through [`FetchOutcome`]:
/// a transport failure or a 5xx response is `TransientFailure`, never `Err`.
/// An `Err` means the call itself broke and is treated like a protocol error.
#[async_trait]
pub trait PlayerGateway: Send + Sync {
    /// Fetch the configured player's data for `channel_id`.
    async fn fetch_player_data(
        &self,
        channel_id: &str,
        token: &str,
    ) -> Result<FetchOutcome, GatewayError>;
}
