use thiserror::Error;

/// Failure of a single request against a single host
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Empty response body from {url}")]
    EmptyBody { url: String },

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

/// The whole payload could not be parsed. Element-level problems never surface here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Response is not valid JSON: {0}")]
    InvalidJson(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl CatalogError {
    pub fn is_transport(&self) -> bool {
        matches!(self, CatalogError::Transport(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, CatalogError::Decode(_))
    }
}
