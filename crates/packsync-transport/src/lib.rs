//! Byte and JSON fetching for package manifests and archives.
//!
//! Everything above this crate talks to the network through the [`Transport`]
//! trait so reconcile runs can be driven by in-memory fakes in tests.

mod error;
mod http;

pub use error::TransportError;
pub use http::{
    HttpTransport, TransportSettings, DEFAULT_MAX_CONNECTIONS, DEFAULT_STALL_TIMEOUT_SECS,
};

use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Fetches the full body behind a URL.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, TransportError>;

    /// Hands the body to `sink` piece by piece as it arrives.
    ///
    /// The default delivers the whole body from [`Transport::fetch_bytes`]
    /// as a single piece.
    async fn fetch_chunks(
        &self,
        url: &str,
        sink: &mut (dyn for<'b> FnMut(&'b [u8]) + Send),
    ) -> Result<(), TransportError> {
        let body = self.fetch_bytes(url).await?;
        sink(&body[..]);
        Ok(())
    }
}

/// Fetches `url` and decodes the body as JSON.
pub async fn fetch_json<T, R>(transport: &R, url: &str) -> Result<T, TransportError>
where
    T: DeserializeOwned,
    R: Transport + ?Sized,
{
    let body = transport.fetch_bytes(url).await?;
    serde_json::from_slice(&body).map_err(|err| TransportError::Decode {
        url: url.to_string(),
        reason: err.to_string(),
    })
}
