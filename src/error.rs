use thiserror::Error;

type Cause = Box<dyn std::error::Error + Send + Sync>;

/// Domain error for every fallible update operation.
///
/// Transport and decoder faults are collapsed into these variants at the
/// HTTP/filesystem boundary; the original cause is kept as a source for
/// diagnostics. Programmer errors are not represented here.
#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("network transport failed: {0}")]
    TransportFailed(#[source] Cause),

    #[error("server responded with status {status}")]
    ResponseUnsuccessful { status: u16 },

    #[error("server response was empty")]
    ResponseEmpty,

    #[error("release feed is malformed: {0}")]
    FeedMalformed(#[source] Cause),

    #[error("operation was cancelled")]
    Cancelled,

    #[error("filesystem operation failed: {0}")]
    FilesystemFailed(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl UpdateError {
    pub(crate) fn transport(source: impl Into<Cause>) -> Self {
        UpdateError::TransportFailed(source.into())
    }

    pub(crate) fn malformed(source: impl Into<Cause>) -> Self {
        UpdateError::FeedMalformed(source.into())
    }
}

pub type Result<T> = std::result::Result<T, UpdateError>;
