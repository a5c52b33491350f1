use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure: connect, timeout, or body read.
    #[error("explorer request to {endpoint} failed: {source}")]
    Unavailable {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("explorer returned status {status} for {endpoint}")]
    Status { endpoint: String, status: u16 },

    #[error("malformed explorer response from {endpoint}: {reason}")]
    Malformed { endpoint: String, reason: String },

    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),
}

impl ClientError {
    pub fn malformed(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }
}
