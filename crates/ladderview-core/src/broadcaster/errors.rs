use crate::errors::LadderError;

/// Why a profile URL form field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileUrlError {
    #[error("Field cannot be empty")]
    Empty,

    #[error("Value is too long: {length} characters (max {max})")]
    TooLong { length: usize, max: usize },

    #[error("This URL looks invalid: {message}")]
    Malformed { message: String },

    #[error("Not a StarCraft II profile URL: {url}")]
    NotAProfile { url: String },

    #[error("Unknown region id: {region_id}")]
    UnknownRegion { region_id: u8 },

    #[error("Unknown realm id: {realm_id}")]
    UnknownRealm { realm_id: u8 },
}

impl LadderError for ProfileUrlError {
    fn error_code(&self) -> &'static str {
        match self {
            ProfileUrlError::Empty => "PROFILE_URL_EMPTY",
            ProfileUrlError::TooLong { .. } => "PROFILE_URL_TOO_LONG",
            ProfileUrlError::Malformed { .. } => "PROFILE_URL_MALFORMED",
            ProfileUrlError::NotAProfile { .. } => "PROFILE_URL_NOT_A_PROFILE",
            ProfileUrlError::UnknownRegion { .. } => "PROFILE_URL_UNKNOWN_REGION",
            ProfileUrlError::UnknownRealm { .. } => "PROFILE_URL_UNKNOWN_REALM",
        }
    }

    fn is_user_error(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_long_display() {
        let error = ProfileUrlError::TooLong {
            length: 95,
            max: 80,
        };
        assert_eq!(
            error.to_string(),
            "Value is too long: 95 characters (max 80)"
        );
        assert_eq!(error.error_code(), "PROFILE_URL_TOO_LONG");
        assert!(error.is_user_error());
    }
}
