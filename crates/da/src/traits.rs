use alloy_primitives::Bytes;
use async_trait::async_trait;

use crate::errors::FetchError;

/// Blob retrieval from the EigenDA disperser, addressed by the batch header
/// hash and the blob's index within that batch.
///
/// Implementations must be safe to call from concurrent tasks.
#[async_trait]
pub trait EigenDaProvider: Send + Sync {
    /// Fetches the blob at `blob_index` within the batch identified by
    /// `batch_header_hash`.
    async fn get_blob(&self, batch_header_hash: &[u8], blob_index: u64)
        -> Result<Bytes, FetchError>;
}

/// Blob retrieval from a Celestia light node, addressed by block height,
/// namespace, and blob commitment.
///
/// Implementations must be safe to call from concurrent tasks.
#[async_trait]
pub trait CelestiaProvider: Send + Sync {
    /// Fetches the blob with `commitment` posted under `namespace` at
    /// `height`. Returns [`FetchError::NotFound`] if no such blob exists.
    async fn get_blob(
        &self,
        height: u64,
        namespace: &[u8],
        commitment: &[u8],
    ) -> Result<Bytes, FetchError>;
}
