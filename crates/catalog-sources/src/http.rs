use crate::error::TransportError;
use crate::traits::{Transport, TransportResponse};
use anyhow::Result;
use async_trait::async_trait;
use catalog_config::ApiConfig;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Production transport backed by a single pooled reqwest client
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(connect_timeout: Duration, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .user_agent(concat!("cinebrowse/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| map_reqwest_error(url, e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| map_reqwest_error(url, e))?;
        Ok(TransportResponse { status, body })
    }
}

fn map_reqwest_error(url: &Url, e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout { url: url.to_string() }
    } else {
        TransportError::Request {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}

/// GET with host failover.
///
/// The primary attempt uses the URL as given. On failure each fallback host is
/// tried once, in order, with only the authority swapped. If every host fails
/// the primary's error is returned so messages always name the canonical host.
#[derive(Clone)]
pub struct FailoverClient {
    transport: Arc<dyn Transport>,
    fallback_hosts: Arc<Vec<Url>>,
}

impl FailoverClient {
    pub fn new(transport: Arc<dyn Transport>, fallback_hosts: Vec<Url>) -> Self {
        Self {
            transport,
            fallback_hosts: Arc::new(fallback_hosts),
        }
    }

    pub fn from_config(api: &ApiConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(api.connect_timeout(), api.request_timeout())?;
        Ok(Self::new(Arc::new(transport), api.fallback_urls()?))
    }

    pub async fn fetch(&self, url: &Url) -> Result<String, TransportError> {
        let primary_error = match self.attempt(url).await {
            Ok(body) => return Ok(body),
            Err(e) => e,
        };

        if self.fallback_hosts.is_empty() {
            warn!(error = %primary_error, "Request failed and no fallback hosts are configured");
            return Err(primary_error);
        }

        debug!(error = %primary_error, "Primary host failed, trying {} fallback host(s)", self.fallback_hosts.len());

        for host in self.fallback_hosts.iter() {
            let alternate = match with_authority(url, host) {
                Ok(alternate) => alternate,
                Err(e) => {
                    debug!(host = %host, error = %e, "Skipping unusable fallback host");
                    continue;
                }
            };

            match self.attempt(&alternate).await {
                Ok(body) => {
                    info!(host = %host, path = url.path(), "Served by fallback host");
                    return Ok(body);
                }
                Err(e) => {
                    debug!(host = %host, error = %e, "Fallback host failed");
                }
            }
        }

        warn!(error = %primary_error, "All hosts failed");
        Err(primary_error)
    }

    /// One exchange against one host, with the success checks applied
    async fn attempt(&self, url: &Url) -> Result<String, TransportError> {
        debug!(url = %url, "GET");
        let response = self.transport.get(url).await?;

        if !(200..300).contains(&response.status) {
            return Err(TransportError::Status {
                status: response.status,
                url: url.to_string(),
            });
        }

        if response.body.trim().is_empty() {
            return Err(TransportError::EmptyBody { url: url.to_string() });
        }

        Ok(response.body)
    }
}

/// Replace scheme, host and port of `url` with those of `host`, keeping path and query
pub fn with_authority(url: &Url, host: &Url) -> Result<Url, TransportError> {
    let invalid = || TransportError::InvalidUrl(format!("cannot move {} onto {}", url, host));

    let mut rewritten = url.clone();
    rewritten.set_scheme(host.scheme()).map_err(|_| invalid())?;
    rewritten.set_host(host.host_str()).map_err(|_| invalid())?;
    rewritten.set_port(host.port()).map_err(|_| invalid())?;
    Ok(rewritten)
}
