/// Errors returned by [`SecretStorage`](crate::storage::SecretStorage).
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("secret storage i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// The backing file is not a JSON object of strings.
    #[error("a deserialization error occurred")]
    SerdeError(#[from] serde_json::Error),
    /// An internal error occurred.
    #[error("an internal error occurred")]
    InternalError(#[from] eyre::Error),
}
