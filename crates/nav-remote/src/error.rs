use thiserror::Error;

/// Failure of a single remote call.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection to the simulation server was lost")]
    Disconnected,

    #[error("malformed reply: {0}")]
    Malformed(String),

    #[error("server rejected {op}: {reason}")]
    Rejected { op: &'static str, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TransportResult<T> = Result<T, TransportError>;
