use std::time::Duration;

/// Failures below the protocol level: connecting, reading, decoding.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("{url} made no progress for {}s", after.as_secs())]
    Stalled { url: String, after: Duration },

    #[error("{url} returned HTTP status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to decode JSON from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("connection limiter closed while waiting for {url}")]
    LimiterClosed { url: String },
}

impl TransportError {
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Client(_) => None,
            Self::Request { url, .. }
            | Self::Stalled { url, .. }
            | Self::Status { url, .. }
            | Self::Decode { url, .. }
            | Self::LimiterClosed { url } => Some(url),
        }
    }
}
