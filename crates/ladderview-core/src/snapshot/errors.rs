use crate::errors::LadderError;

/// A gateway body that does not match the player payload schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("Payload is not a JSON object")]
    NotAnObject,

    #[error("Payload is missing required field '{field}'")]
    MissingField { field: String },

    #[error("Payload field '{field}' is invalid: {message}")]
    InvalidField { field: String, message: String },
}

impl LadderError for PayloadError {
    fn error_code(&self) -> &'static str {
        match self {
            PayloadError::NotAnObject => "PAYLOAD_NOT_AN_OBJECT",
            PayloadError::MissingField { .. } => "PAYLOAD_MISSING_FIELD",
            PayloadError::InvalidField { .. } => "PAYLOAD_INVALID_FIELD",
        }
    }
}
