use std::time::Duration;

use alloy_primitives::Bytes;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::trace;
use url::Url;

use crate::errors::FetchError;
use crate::traits::EigenDaProvider;

const GET_METHOD: &str = "get";

/// HTTP retrieval client for EigenDA blobs.
///
/// Talks to an EigenDA retrieval proxy that fronts the disperser, addressing
/// blobs by hex-encoded batch header hash and blob index in the request
/// path.
#[derive(Debug, Clone)]
pub struct ProxyEigenDaClient {
    /// The proxy base url.
    base: Url,
    /// The inner reqwest client used to talk to the proxy.
    inner: Client,
}

impl ProxyEigenDaClient {
    /// Creates a new client against `base` with a per-request `timeout`.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, FetchError> {
        let inner = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| FetchError::Backend(err.to_string()))?;
        Ok(Self { base, inner })
    }

    fn blob_url(&self, batch_header_hash: &[u8], blob_index: u64) -> String {
        format!(
            "{}/{}/0x{}/{}",
            self.base.as_str().trim_end_matches('/'),
            GET_METHOD,
            hex::encode(batch_header_hash),
            blob_index
        )
    }
}

#[async_trait]
impl EigenDaProvider for ProxyEigenDaClient {
    async fn get_blob(
        &self,
        batch_header_hash: &[u8],
        blob_index: u64,
    ) -> Result<Bytes, FetchError> {
        let url = self.blob_url(batch_header_hash, blob_index);
        trace!(target: "da", %url, "fetching EigenDA blob");

        let response = self
            .inner
            .get(url)
            .send()
            .await
            .map_err(|err| FetchError::Backend(err.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(FetchError::NotFound),
            status if !status.is_success() => {
                Err(FetchError::Backend(format!("proxy returned {status}")))
            }
            _ => response
                .bytes()
                .await
                .map(Bytes::from)
                .map_err(|err| FetchError::Backend(err.to_string())),
        }
    }
}
