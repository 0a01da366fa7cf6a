use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::profile_url::ProfileIds;
use crate::gateway::{GatewayError, GatewayResponse};

/// Status code the backend answers a successful save with.
pub const SAVE_CREATED: u16 = 201;

/// Body field carrying the ladder API blackout flag.
pub const API_DISABLED_FIELD: &str = "apiDisabledJanuary2020";

/// Stored configuration of a channel, as seen by the broadcaster panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLookup {
    Found { profile: ProfileIds, api_disabled: bool },
    NotFound { api_disabled: bool },
    /// Any other answer, or a body without usable ids.
    Failed { status: u16 },
}

impl ConfigLookup {
    /// Classify a raw backend response.
    pub fn from_response(response: &GatewayResponse) -> Self {
        let api_disabled = response
            .body
            .get(API_DISABLED_FIELD)
            .and_then(Value::as_bool)
            .unwrap_or(false);

        match response.status {
            200 => match profile_from_body(&response.body) {
                Some(profile) => ConfigLookup::Found {
                    profile,
                    api_disabled,
                },
                None => ConfigLookup::Failed { status: 200 },
            },
            404 => ConfigLookup::NotFound { api_disabled },
            status => ConfigLookup::Failed { status },
        }
    }

    pub fn api_disabled(&self) -> bool {
        match self {
            ConfigLookup::Found { api_disabled, .. } | ConfigLookup::NotFound { api_disabled } => {
                *api_disabled
            }
            ConfigLookup::Failed { .. } => false,
        }
    }
}

// Ids arrive as numbers or numeric strings.
fn profile_from_body(body: &Value) -> Option<ProfileIds> {
    fn id(body: &Value, field: &str) -> Option<u64> {
        match body.get(field)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    let region_id = u8::try_from(id(body, "regionId")?).ok()?;
    let realm_id = u8::try_from(id(body, "realmId")?).ok()?;
    let player_id = id(body, "playerId")?;
    ProfileIds::new(region_id, realm_id, player_id).ok()
}

/// Payload of a save request.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct SaveConfigRequest {
    #[serde(flatten)]
    pub profile: ProfileIds,
    pub token: String,
}

impl fmt::Debug for SaveConfigRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaveConfigRequest")
            .field("profile", &self.profile)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Backend the broadcaster panel reads and writes channel configuration through.
#[async_trait]
pub trait ConfigGateway: Send + Sync {
    async fn get_config(&self, channel_id: &str, token: &str)
    -> Result<ConfigLookup, GatewayError>;

    /// Store the configuration. Returns the response status code.
    async fn save_config(
        &self,
        channel_id: &str,
        request: &SaveConfigRequest,
    ) -> Result<u16, GatewayError>;
}
