use std::time::Duration;

use alloy_primitives::Bytes;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::trace;
use url::Url;

use crate::errors::FetchError;
use crate::traits::CelestiaProvider;

const JSONRPC_VERSION: &str = "2.0";
const BLOB_GET_METHOD: &str = "blob.Get";

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'a str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<BlobPayload>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// The slice of the light node's blob object the operator cares about.
#[derive(Deserialize)]
struct BlobPayload {
    /// Blob bytes, base64-encoded by the node.
    data: String,
}

/// JSON-RPC client for a Celestia light node's blob API.
#[derive(Debug, Clone)]
pub struct CelestiaLightNodeClient {
    inner: Client,
    url: Url,
    auth_token: Option<String>,
}

impl CelestiaLightNodeClient {
    /// Creates a new client against `url` with a per-request `timeout`.
    /// Light nodes usually require a bearer `auth_token` for blob reads.
    pub fn new(url: Url, auth_token: Option<String>, timeout: Duration) -> Result<Self, FetchError> {
        let inner = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| FetchError::Backend(err.to_string()))?;
        Ok(Self {
            inner,
            url,
            auth_token,
        })
    }

    async fn request(&self, method: &str, params: Value) -> Result<JsonRpcResponse, FetchError> {
        let payload = JsonRpcRequest {
            jsonrpc: JSONRPC_VERSION,
            id: 1,
            method,
            params,
        };

        let mut request = self.inner.post(self.url.clone()).json(&payload);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| FetchError::Backend(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Backend(format!("light node returned {status}")));
        }

        response
            .json::<JsonRpcResponse>()
            .await
            .map_err(|err| FetchError::Backend(err.to_string()))
    }
}

#[async_trait]
impl CelestiaProvider for CelestiaLightNodeClient {
    async fn get_blob(
        &self,
        height: u64,
        namespace: &[u8],
        commitment: &[u8],
    ) -> Result<Bytes, FetchError> {
        trace!(target: "da", height, "fetching Celestia blob");

        let params = json!([height, BASE64.encode(namespace), BASE64.encode(commitment)]);
        let response = self.request(BLOB_GET_METHOD, params).await?;

        if let Some(error) = response.error {
            // the node reports a missing blob as a plain rpc error
            if error.message.contains("not found") {
                return Err(FetchError::NotFound);
            }
            return Err(FetchError::Backend(format!(
                "light node error {}: {}",
                error.code, error.message
            )));
        }

        let blob = response.result.ok_or(FetchError::NotFound)?;
        BASE64
            .decode(blob.data)
            .map(Bytes::from)
            .map_err(|err| FetchError::Backend(format!("undecodable blob data: {err}")))
    }
}
