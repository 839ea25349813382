//! reqwest-backed transport with a shared connection cap.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::debug;

use crate::{Transport, TransportError};

/// Simultaneous outbound requests allowed across all callers.
pub const DEFAULT_MAX_CONNECTIONS: usize = 2;

/// Default seconds a connection may go without progress before it fails.
pub const DEFAULT_STALL_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportSettings {
    pub max_connections: usize,
    /// Bounds connecting, waiting for response headers and each body read.
    /// A transfer that keeps delivering data is never cut short.
    pub stall_timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            stall_timeout: Duration::from_secs(DEFAULT_STALL_TIMEOUT_SECS),
            user_agent: format!("packsync/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP transport.
///
/// Requests past `max_connections` wait for a permit instead of failing, so
/// callers can issue every fetch up front.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    permits: Arc<Semaphore>,
    max_connections: usize,
    stall_timeout: Duration,
}

impl HttpTransport {
    pub fn new(settings: TransportSettings) -> Result<Self, TransportError> {
        let max_connections = settings.max_connections.max(1);
        let client = Client::builder()
            .connect_timeout(settings.stall_timeout)
            .user_agent(settings.user_agent)
            .pool_max_idle_per_host(max_connections)
            .build()
            .map_err(|err| TransportError::Client(err.to_string()))?;

        Ok(Self {
            client,
            permits: Arc::new(Semaphore::new(max_connections)),
            max_connections,
            stall_timeout: settings.stall_timeout,
        })
    }

    pub fn max_connections(&self) -> usize {
        self.max_connections
    }

    pub fn available_connections(&self) -> usize {
        self.permits.available_permits()
    }

    async fn open(&self, url: &str) -> Result<(SemaphorePermit<'_>, Response), TransportError> {
        let permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| TransportError::LimiterClosed {
                url: url.to_string(),
            })?;

        debug!(%url, "fetching");
        let response = tokio::time::timeout(self.stall_timeout, self.client.get(url).send())
            .await
            .map_err(|_| self.stalled(url))?
            .map_err(|err| TransportError::Request {
                url: url.to_string(),
                reason: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok((permit, response))
    }

    fn stalled(&self, url: &str) -> TransportError {
        TransportError::Stalled {
            url: url.to_string(),
            after: self.stall_timeout,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        // Content-Length is not trusted for preallocation.
        let mut body = Vec::new();
        self.fetch_chunks(url, &mut |chunk: &[u8]| body.extend_from_slice(chunk))
            .await?;
        Ok(body)
    }

    async fn fetch_chunks(
        &self,
        url: &str,
        sink: &mut (dyn for<'b> FnMut(&'b [u8]) + Send),
    ) -> Result<(), TransportError> {
        let (_permit, mut response) = self.open(url).await?;

        let mut received = 0_usize;
        loop {
            let chunk = tokio::time::timeout(self.stall_timeout, response.chunk())
                .await
                .map_err(|_| self.stalled(url))?
                .map_err(|err| TransportError::Request {
                    url: url.to_string(),
                    reason: err.to_string(),
                })?;
            let Some(chunk) = chunk else {
                break;
            };
            received += chunk.len();
            sink(&chunk[..]);
        }

        debug!(%url, bytes = received, "fetched");
        Ok(())
    }
}
