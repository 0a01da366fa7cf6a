use crate::errors::LadderError;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Failed to read cache entry '{key}': {message}")]
    ReadFailed { key: String, message: String },

    #[error("Failed to write cache entry '{key}': {message}")]
    WriteFailed { key: String, message: String },

    #[error("Cache store unavailable: {message}")]
    StoreUnavailable { message: String },
}

impl LadderError for CacheError {
    fn error_code(&self) -> &'static str {
        match self {
            CacheError::ReadFailed { .. } => "CACHE_READ_FAILED",
            CacheError::WriteFailed { .. } => "CACHE_WRITE_FAILED",
            CacheError::StoreUnavailable { .. } => "CACHE_STORE_UNAVAILABLE",
        }
    }
}
