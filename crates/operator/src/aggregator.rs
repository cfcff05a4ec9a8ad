use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::signer::SignedTaskResponse;

const JSONRPC_VERSION: &str = "2.0";
const SEND_METHOD: &str = "SendSignedTaskResponseToAggregator";

/// Delivery attempts before the submitter gives up on a response.
const SEND_ATTEMPTS: u32 = 3;
/// Pause between delivery attempts.
const SEND_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Transport and protocol errors from the aggregator RPC.
#[derive(Debug, thiserror::Error)]
pub enum AggregatorClientError {
    /// The HTTP request could not be built or sent.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// The aggregator answered with a non-success HTTP status.
    #[error("aggregator returned http status {0}")]
    HttpStatus(StatusCode),
    /// The aggregator rejected the call at the RPC layer.
    #[error("aggregator rejected the response: {code} {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// JSON-RPC error message.
        message: String,
    },
}

/// Fire-and-forget delivery of signed responses to the aggregator.
///
/// The core never waits on delivery and never observes individual
/// outcomes; implementations own their retry policy and report only
/// through logs.
#[async_trait]
pub trait ResponseSubmitter: Send + Sync {
    /// Delivers `signed` on a best-effort basis.
    async fn send(&self, signed: SignedTaskResponse);
}

#[derive(Serialize)]
struct JsonRpcRequest<'a, T> {
    jsonrpc: &'a str,
    id: u64,
    method: &'a str,
    params: (T,),
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// JSON-RPC client for the aggregator with a small bounded retry policy.
#[derive(Debug, Clone)]
pub struct AggregatorRpcClient {
    inner: Client,
    url: Url,
}

impl AggregatorRpcClient {
    /// Creates a client against the aggregator at `url` with a per-request
    /// `timeout`.
    pub fn new(url: Url, timeout: Duration) -> Result<Self, AggregatorClientError> {
        let inner = Client::builder().timeout(timeout).build()?;
        Ok(Self { inner, url })
    }

    async fn call(&self, signed: &SignedTaskResponse) -> Result<(), AggregatorClientError> {
        let payload = JsonRpcRequest {
            jsonrpc: JSONRPC_VERSION,
            id: u64::from(signed.response.task_index),
            method: SEND_METHOD,
            params: (signed,),
        };

        let response = self.inner.post(self.url.clone()).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AggregatorClientError::HttpStatus(status));
        }

        let body: JsonRpcResponse = response.json().await?;
        if let Some(error) = body.error {
            return Err(AggregatorClientError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ResponseSubmitter for AggregatorRpcClient {
    async fn send(&self, signed: SignedTaskResponse) {
        let task_index = signed.response.task_index;

        for attempt in 1..=SEND_ATTEMPTS {
            match self.call(&signed).await {
                Ok(()) => {
                    debug!(task_index, "signed task response delivered to aggregator");
                    return;
                }
                Err(err) => {
                    warn!(task_index, attempt, %err, "could not deliver signed task response");
                }
            }
            if attempt < SEND_ATTEMPTS {
                tokio::time::sleep(SEND_RETRY_DELAY).await;
            }
        }

        warn!(task_index, "giving up on signed task response delivery");
    }
}
