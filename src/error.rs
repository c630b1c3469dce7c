use thiserror::Error;

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Authentication error: {0}")]
    AuthError(String),
    #[error("Provider returned no image data")]
    EmptyResponse,
    #[error("Transport error: {0}")]
    TransportError(String),
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Decode error: {0}")]
    DecodeError(String),
    #[error("Input error: {0}")]
    InputError(String),
    #[error("Enter a prompt or upload at least one image")]
    NothingToGenerate,
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl StudioError {
    /// Credential failures abort the whole batch; everything else is per-call.
    pub fn is_auth(&self) -> bool {
        matches!(self, StudioError::AuthError(_))
    }

    /// Maps a raw provider failure onto the taxonomy. Only the provider
    /// adapter calls this; the orchestrator works on the classified variant.
    pub fn classify_provider_failure(status: Option<u16>, message: &str) -> Self {
        let lowered = message.to_ascii_lowercase();
        let auth_status = matches!(status, Some(401) | Some(403));
        let auth_message =
            lowered.contains("permission") || lowered.contains("401") || lowered.contains("403");

        if auth_status || auth_message {
            return StudioError::AuthError(message.to_string());
        }

        match status {
            Some(status) => StudioError::ApiError {
                status,
                message: message.to_string(),
            },
            None => StudioError::TransportError(message.to_string()),
        }
    }
}

/// Strips the request URL, which carries the API key. Errors without an
/// HTTP status are always transport failures.
impl From<reqwest::Error> for StudioError {
    fn from(e: reqwest::Error) -> Self {
        let status = e.status().map(|s| s.as_u16());
        let e = e.without_url();
        match status {
            Some(status) => StudioError::classify_provider_failure(Some(status), &e.to_string()),
            None => StudioError::TransportError(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for StudioError {
    fn from(e: serde_json::Error) -> Self {
        StudioError::SerializationError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;
