use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid upstream address: {0}")]
    InvalidUpstreamAddress(String),

    #[error("Lookup of {name} failed: {reason}")]
    ResolutionFailed { name: String, reason: String },

    #[error("No records found for {0}")]
    NoRecords(String),

    #[error("Transport timeout talking to {server}")]
    TransportTimeout { server: String },

    #[error("Transport error with {server}: {reason}")]
    TransportIo { server: String, reason: String },

    #[error("Response id {received} from {server} does not match request id {expected}")]
    IdMismatch {
        server: String,
        expected: u16,
        received: u16,
    },

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("DNS codec error: {0}")]
    Codec(String),
}

impl DomainError {
    /// Errors raised while talking to an upstream, as opposed to a bad answer.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            DomainError::TransportTimeout { .. }
                | DomainError::TransportIo { .. }
                | DomainError::IdMismatch { .. }
        )
    }
}
