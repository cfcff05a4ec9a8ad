use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::Bytes;
use kiai_primitives::DaPayload;
use tracing::debug;

use crate::errors::FetchError;
use crate::traits::{CelestiaProvider, EigenDaProvider};

/// Default deadline for a single backend fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolves raw proof bytes for a [`DaPayload`].
///
/// Stateless across calls; the backend clients are shared handles and the
/// fetcher itself is cheap to clone. Calldata payloads are returned inline
/// without touching the network and cannot fail; backend fetches run under
/// the configured deadline.
#[derive(Clone)]
pub struct DaFetcher {
    eigenda: Arc<dyn EigenDaProvider>,
    celestia: Arc<dyn CelestiaProvider>,
    /// Namespace under which this service's proof blobs are posted on
    /// Celestia.
    namespace: Bytes,
    fetch_timeout: Duration,
}

impl DaFetcher {
    /// Creates a fetcher over the given backend clients.
    pub fn new(
        eigenda: Arc<dyn EigenDaProvider>,
        celestia: Arc<dyn CelestiaProvider>,
        namespace: Bytes,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            eigenda,
            celestia,
            namespace,
            fetch_timeout,
        }
    }

    /// Returns the proof bytes the payload points at.
    pub async fn fetch(&self, payload: &DaPayload) -> Result<Bytes, FetchError> {
        match payload {
            DaPayload::Calldata { data } => Ok(data.clone()),
            DaPayload::EigenDa {
                batch_header_hash,
                blob_index,
            } => {
                debug!(target: "da", blob_index, "resolving proof from EigenDA");
                self.bounded(self.eigenda.get_blob(batch_header_hash, *blob_index))
                    .await
            }
            DaPayload::Celestia { height, commitment } => {
                debug!(target: "da", height, "resolving proof from Celestia");
                self.bounded(
                    self.celestia
                        .get_blob(*height, &self.namespace, commitment),
                )
                .await
            }
        }
    }

    async fn bounded<F>(&self, fut: F) -> Result<Bytes, FetchError>
    where
        F: std::future::Future<Output = Result<Bytes, FetchError>>,
    {
        match tokio::time::timeout(self.fetch_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.fetch_timeout)),
        }
    }
}

impl std::fmt::Debug for DaFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DaFetcher")
            .field("namespace", &self.namespace)
            .field("fetch_timeout", &self.fetch_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Backends for tests: canned answers, recorded locators.
    #[derive(Default)]
    struct MockEigenDa {
        response: Option<Result<Bytes, FetchError>>,
        delay: Option<Duration>,
        seen: Mutex<Vec<(Vec<u8>, u64)>>,
    }

    #[async_trait]
    impl EigenDaProvider for MockEigenDa {
        async fn get_blob(
            &self,
            batch_header_hash: &[u8],
            blob_index: u64,
        ) -> Result<Bytes, FetchError> {
            self.seen
                .lock()
                .unwrap()
                .push((batch_header_hash.to_vec(), blob_index));
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.response
                .clone()
                .unwrap_or(Err(FetchError::NotFound))
        }
    }

    #[derive(Default)]
    struct MockCelestia {
        response: Option<Result<Bytes, FetchError>>,
        seen: Mutex<Vec<(u64, Vec<u8>, Vec<u8>)>>,
    }

    #[async_trait]
    impl CelestiaProvider for MockCelestia {
        async fn get_blob(
            &self,
            height: u64,
            namespace: &[u8],
            commitment: &[u8],
        ) -> Result<Bytes, FetchError> {
            self.seen
                .lock()
                .unwrap()
                .push((height, namespace.to_vec(), commitment.to_vec()));
            self.response
                .clone()
                .unwrap_or(Err(FetchError::NotFound))
        }
    }

    fn fetcher_with(eigenda: MockEigenDa, celestia: MockCelestia, timeout: Duration) -> DaFetcher {
        DaFetcher::new(
            Arc::new(eigenda),
            Arc::new(celestia),
            Bytes::from_static(b"test-namespace"),
            timeout,
        )
    }

    #[tokio::test]
    async fn calldata_is_returned_verbatim() {
        let fetcher = fetcher_with(
            MockEigenDa::default(),
            MockCelestia::default(),
            DEFAULT_FETCH_TIMEOUT,
        );
        let payload = DaPayload::Calldata {
            data: Bytes::from_static(b"inline proof"),
        };

        let fetched = fetcher.fetch(&payload).await.unwrap();
        assert_eq!(fetched, Bytes::from_static(b"inline proof"));
    }

    #[tokio::test]
    async fn eigenda_routes_the_locator() {
        let eigenda = MockEigenDa {
            response: Some(Ok(Bytes::from_static(b"blob"))),
            ..Default::default()
        };
        let fetcher = fetcher_with(eigenda, MockCelestia::default(), DEFAULT_FETCH_TIMEOUT);

        let fetched = fetcher
            .fetch(&DaPayload::EigenDa {
                batch_header_hash: Bytes::from_static(b"batch"),
                blob_index: 4,
            })
            .await
            .unwrap();

        assert_eq!(fetched, Bytes::from_static(b"blob"));
    }

    #[tokio::test]
    async fn celestia_uses_the_configured_namespace() {
        let celestia = Arc::new(MockCelestia {
            response: Some(Ok(Bytes::from_static(b"blob"))),
            ..Default::default()
        });
        let fetcher = DaFetcher::new(
            Arc::new(MockEigenDa::default()),
            celestia.clone(),
            Bytes::from_static(b"test-namespace"),
            DEFAULT_FETCH_TIMEOUT,
        );

        fetcher
            .fetch(&DaPayload::Celestia {
                height: 77,
                commitment: Bytes::from_static(b"commitment"),
            })
            .await
            .unwrap();

        let seen = celestia.seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![(77, b"test-namespace".to_vec(), b"commitment".to_vec())]
        );
    }

    #[tokio::test]
    async fn backend_errors_pass_through() {
        let eigenda = MockEigenDa {
            response: Some(Err(FetchError::Backend("disperser down".into()))),
            ..Default::default()
        };
        let fetcher = fetcher_with(eigenda, MockCelestia::default(), DEFAULT_FETCH_TIMEOUT);

        let err = fetcher
            .fetch(&DaPayload::EigenDa {
                batch_header_hash: Bytes::from_static(b"batch"),
                blob_index: 0,
            })
            .await
            .unwrap_err();

        assert_eq!(err, FetchError::Backend("disperser down".into()));
    }

    #[tokio::test]
    async fn slow_backends_hit_the_deadline() {
        let eigenda = MockEigenDa {
            response: Some(Ok(Bytes::from_static(b"late"))),
            delay: Some(Duration::from_millis(50)),
            ..Default::default()
        };
        let fetcher = fetcher_with(eigenda, MockCelestia::default(), Duration::from_millis(5));

        let err = fetcher
            .fetch(&DaPayload::EigenDa {
                batch_header_hash: Bytes::from_static(b"batch"),
                blob_index: 0,
            })
            .await
            .unwrap_err();

        assert_eq!(err, FetchError::Timeout(Duration::from_millis(5)));
    }
}
