use thiserror::Error;

/// Failures talking to a claim store.
///
/// A missing document and a create that loses the race are not errors; they
/// are reported through `Option` and [`CreateOutcome`](crate::CreateOutcome).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("store returned {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("{0}")]
    Other(String),
}

impl StoreError {
    /// Connectivity problems, as opposed to the store refusing a request.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }
}
