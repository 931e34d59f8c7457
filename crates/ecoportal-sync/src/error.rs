use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// The snapshot violates an identity invariant (duplicate ids). Not retried.
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),
}
