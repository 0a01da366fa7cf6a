use crate::errors::LadderError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("Gateway request failed: {message}")]
    Request { message: String },

    #[error("Gateway response could not be decoded: {message}")]
    Decode { message: String },

    #[error("Invalid channel id '{channel_id}'")]
    InvalidChannel { channel_id: String },
}

impl LadderError for GatewayError {
    fn error_code(&self) -> &'static str {
        match self {
            GatewayError::Request { .. } => "GATEWAY_REQUEST_FAILED",
            GatewayError::Decode { .. } => "GATEWAY_DECODE_FAILED",
            GatewayError::InvalidChannel { .. } => "GATEWAY_INVALID_CHANNEL",
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            GatewayError::InvalidChannel { .. } => true,
            GatewayError::Request { .. } | GatewayError::Decode { .. } => false,
        }
    }
}
