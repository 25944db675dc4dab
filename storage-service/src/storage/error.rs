use thiserror::Error;

/// Failures surfaced by object store operations.
///
/// Nothing here is retried: the first error encountered is returned as-is.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing a local file failed.
    #[error("Local I/O error: {0}")]
    LocalIo(#[from] std::io::Error),

    /// The remote store rejected the request or the transfer broke off.
    #[error("Transfer error: {0}")]
    Transfer(String),

    /// The remote call succeeded but its body could not be drained.
    #[error("Read error: {0}")]
    Read(String),
}

pub type StorageResult<T> = Result<T, StorageError>;
