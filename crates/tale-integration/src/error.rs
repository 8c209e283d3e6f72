use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("Server is offline or unreachable")]
    Offline,

    #[error("Request timed out")]
    Timeout,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to decode payload: {0}")]
    Decode(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),
}

impl From<reqwest::Error> for IntegrationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            IntegrationError::Timeout
        } else if err.is_connect() {
            IntegrationError::Offline
        } else {
            IntegrationError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for IntegrationError {
    fn from(err: serde_json::Error) -> Self {
        IntegrationError::Serialization(err.to_string())
    }
}

impl From<base64::DecodeError> for IntegrationError {
    fn from(err: base64::DecodeError) -> Self {
        IntegrationError::Decode(err.to_string())
    }
}

impl From<image::ImageError> for IntegrationError {
    fn from(err: image::ImageError) -> Self {
        IntegrationError::InvalidImage(err.to_string())
    }
}

impl From<url::ParseError> for IntegrationError {
    fn from(err: url::ParseError) -> Self {
        IntegrationError::InvalidUrl(err.to_string())
    }
}
