use async_trait::async_trait;
use url::Url;
use crate::error::TransportError;

/// Raw outcome of one HTTP exchange, before any success checks are applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self { status: 200, body: body.into() }
    }
}

/// The HTTP transport shared by every resolver.
///
/// Implementations report only transport-level failures (connection errors,
/// timeouts). Status and body checks belong to the failover client so that all
/// transports agree on what counts as a successful response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<TransportResponse, TransportError>;
}
