use thiserror::Error;

/// Failure of a storage backend. Absent records are `Ok(None)`, not errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend refused a read or a batch commit.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A stored record or meta value could not be encoded or decoded.
    #[error("record encoding error: {0}")]
    Serialization(String),

    /// Stored records contradict each other or a key is malformed.
    #[error("inconsistent stored state: {0}")]
    Corruption(String),
}
