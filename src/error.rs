//! Mythweaver error types

/// Opaque message returned to callers for server-class faults.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Mythweaver error types
#[derive(Debug, thiserror::Error)]
pub enum MythError {
    // Client-visible request errors
    #[error("{0}")]
    Validation(String),

    #[error("Content flagged by moderation system")]
    ContentRejected,

    #[error("Failed to generate myth: {0}")]
    GenerationFailed(String),

    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("empty response from model")]
    EmptyResponse,

    /// Model output that is not valid JSON or violates the artifact schema.
    /// Recovered by the retry/fallback path, never surfaced to callers.
    #[error("malformed model output: {0}")]
    Parse(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl MythError {
    /// Whether this error belongs to the client-error class.
    ///
    /// Only validation failures, moderation rejections and first-attempt
    /// generation failures are reported back as client errors; everything
    /// else is a server fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            MythError::Validation(_) | MythError::ContentRejected | MythError::GenerationFailed(_)
        )
    }

    /// Message that is safe to show to the caller.
    pub fn client_message(&self) -> String {
        if self.is_client_error() {
            self.to_string()
        } else {
            INTERNAL_ERROR_MESSAGE.to_string()
        }
    }

    /// Whether this error came from the provider transport rather than
    /// from the content of a successful response.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            MythError::Http(_) | MythError::Api { .. } | MythError::EmptyResponse
        )
    }
}

/// Result type alias for Mythweaver operations
pub type Result<T> = std::result::Result<T, MythError>;
