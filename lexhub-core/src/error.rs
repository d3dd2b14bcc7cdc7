use thiserror::Error;

/// Domain errors surfaced to callers. Each rejected operation carries a
/// distinct, stable reason so a client can tell "no access" from "does not
/// exist" from "bad input".
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("not authorized to {0}")]
    Forbidden(&'static str),

    #[error("a document cannot be shared with its owner")]
    InvalidGrantee,

    #[error("{0}")]
    Validation(String),

    /// Infrastructure failure (storage I/O, serialization). Not part of the
    /// domain contract; callers treat it as an internal error.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
