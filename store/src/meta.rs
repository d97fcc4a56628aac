//! Metadata storage trait.

use crate::StoreError;

/// Well-known metadata keys.
pub mod keys {
    /// Number of proposals ever created; also the next id to allocate.
    pub const PROPOSAL_COUNT: &str = "proposal_count";
    /// Serialized ranking index.
    pub const RANKING: &str = "ranking";
    /// Last logical height stamped by an operator-driven environment.
    pub const CHAIN_HEIGHT: &str = "chain_height";
    /// On-disk schema version.
    pub const SCHEMA_VERSION: &str = "schema_version";
}

/// Key-value store for bookkeeping that doesn't belong in the proposal or
/// vote tables.
pub trait MetaStore {
    /// Retrieve a metadata value.
    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Read a big-endian `u64` value, `0` when absent.
    fn get_meta_u64(&self, key: &str) -> Result<u64, StoreError> {
        match self.get_meta(key)? {
            Some(bytes) => {
                let arr: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    StoreError::Corruption(format!("meta key '{}' is not a u64", key))
                })?;
                Ok(u64::from_be_bytes(arr))
            }
            None => Ok(0),
        }
    }
}
