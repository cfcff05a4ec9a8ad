use kiai_da::{DaFetcher, FetchError};
use kiai_primitives::{IProofServiceManager::NewTaskCreated, NewTask, TaskDecodeError, TaskResponse};
use kiai_verifiers::VerifierRegistry;
use tracing::info;

/// An error that abandons the whole task: no response is produced, nothing
/// is submitted. A missing input leaves an unfillable slot in the result
/// vector, and a partial response cannot be aggregated against the on-chain
/// task commitment.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// The wire task could not be mapped into the domain model.
    #[error(transparent)]
    Decode(#[from] TaskDecodeError),
    /// Proof bytes could not be resolved from the DA backend.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// No verifier is registered for this proving system.
    #[error("unrecognized proving system ID {0}")]
    UnknownProvingSystem(u16),
    /// The verification worker died before returning a verdict.
    #[error("verification worker failed: {0}")]
    Worker(String),
}

/// Runs the per-proof pipeline for one task: resolve bytes through the DA
/// fetcher, dispatch to the verifier for the proof's system, collect the
/// verdicts in task order.
#[derive(Debug, Clone)]
pub struct TaskProcessor {
    fetcher: DaFetcher,
    verifiers: VerifierRegistry,
}

impl TaskProcessor {
    /// Creates a processor over the given fetcher and verifier registry.
    pub fn new(fetcher: DaFetcher, verifiers: VerifierRegistry) -> Self {
        Self { fetcher, verifiers }
    }

    /// Verifies every proof in the task and returns the verdict vector.
    ///
    /// `proof_results[i]` corresponds to the i-th proof of the task. A proof
    /// that fails verification is a `false` entry; a proof whose inputs
    /// cannot be obtained or interpreted abandons the task with an error.
    pub async fn process(&self, event: &NewTaskCreated) -> Result<TaskResponse, TaskError> {
        let task = NewTask::try_from(event)?;
        let num_proofs = task.proof_verifications.len();

        info!(
            task_index = task.task_index,
            task_created_block = task.task_created_block,
            num_proofs,
            "received new task with proofs to verify"
        );

        let mut proof_results = vec![false; num_proofs];
        for (i, verification) in task.proof_verifications.into_iter().enumerate() {
            let proof = self.fetcher.fetch(&verification.da_payload).await?;

            let verifier = self
                .verifiers
                .get(verification.proving_system)
                .ok_or_else(|| {
                    TaskError::UnknownProvingSystem(verification.proving_system.as_u16())
                })?;

            // verification is CPU-bound; keep it off the runtime workers so
            // a long proof cannot starve the subscription
            let system = verification.proving_system;
            let verdict = tokio::task::spawn_blocking(move || {
                verifier.verify(&proof, &verification.pub_input, &verification.verification_key)
            })
            .await
            .map_err(|err| TaskError::Worker(err.to_string()))?;

            info!(task_index = task.task_index, ?system, verdict, "proof verification result");
            proof_results[i] = verdict;
        }

        Ok(TaskResponse {
            task_index: task.task_index,
            proof_results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Bytes;
    use async_trait::async_trait;
    use kiai_da::{CelestiaProvider, EigenDaProvider, DEFAULT_FETCH_TIMEOUT};
    use kiai_primitives::{
        BatchProofVerificationTask, DAPayload, ProofVerificationData, ProvingSystemId,
    };
    use kiai_verifiers::ProofVerifier;
    use std::sync::Arc;

    /// Verifier stub: verdict is the first proof byte.
    struct FirstByteVerdict;

    impl ProofVerifier for FirstByteVerdict {
        fn verify(&self, proof: &[u8], _pub_input: &[u8], _verification_key: &[u8]) -> bool {
            proof.first().copied() == Some(1)
        }
    }

    struct StubEigenDa(Result<Bytes, FetchError>);

    #[async_trait]
    impl EigenDaProvider for StubEigenDa {
        async fn get_blob(&self, _hash: &[u8], _index: u64) -> Result<Bytes, FetchError> {
            self.0.clone()
        }
    }

    struct StubCelestia(Result<Bytes, FetchError>);

    #[async_trait]
    impl CelestiaProvider for StubCelestia {
        async fn get_blob(
            &self,
            _height: u64,
            _namespace: &[u8],
            _commitment: &[u8],
        ) -> Result<Bytes, FetchError> {
            self.0.clone()
        }
    }

    fn registry_with_stub() -> VerifierRegistry {
        let mut registry = VerifierRegistry::new();
        let stub: Arc<dyn ProofVerifier> = Arc::new(FirstByteVerdict);
        registry.register(ProvingSystemId::GnarkPlonkBls12_381, stub.clone());
        registry.register(ProvingSystemId::GnarkPlonkBn254, stub.clone());
        registry.register(ProvingSystemId::Sp1, stub);
        registry
    }

    fn processor(eigenda: StubEigenDa, celestia: StubCelestia) -> TaskProcessor {
        let fetcher = DaFetcher::new(
            Arc::new(eigenda),
            Arc::new(celestia),
            Bytes::from_static(b"ns"),
            DEFAULT_FETCH_TIMEOUT,
        );
        TaskProcessor::new(fetcher, registry_with_stub())
    }

    fn calldata_proof(system: u16, proof_bytes: &[u8]) -> ProofVerificationData {
        ProofVerificationData {
            provingSystemId: system,
            daPayload: DAPayload {
                solution: 0,
                proofAssociatedData: Bytes::copy_from_slice(proof_bytes),
                index: 0,
            },
            pubInput: Bytes::from_static(b"pub"),
            verificationKey: Bytes::from_static(b"vk"),
        }
    }

    fn event(task_index: u32, proofs: Vec<ProofVerificationData>) -> NewTaskCreated {
        NewTaskCreated {
            taskIndex: task_index,
            task: BatchProofVerificationTask {
                taskCreatedBlock: 1,
                proofVerificationsData: proofs,
            },
        }
    }

    #[tokio::test]
    async fn all_valid_batch_yields_all_true() {
        let processor = processor(
            StubEigenDa(Err(FetchError::NotFound)),
            StubCelestia(Err(FetchError::NotFound)),
        );
        let event = event(1, vec![calldata_proof(1, &[1]), calldata_proof(1, &[1])]);

        let response = processor.process(&event).await.unwrap();
        assert_eq!(response.task_index, 1);
        assert_eq!(response.proof_results, vec![true, true]);
    }

    #[tokio::test]
    async fn mixed_verdicts_preserve_proof_order() {
        let processor = processor(
            StubEigenDa(Err(FetchError::NotFound)),
            StubCelestia(Err(FetchError::NotFound)),
        );
        let event = event(
            2,
            vec![
                calldata_proof(0, &[1]),
                calldata_proof(1, &[0]),
                calldata_proof(2, &[1]),
            ],
        );

        let response = processor.process(&event).await.unwrap();
        assert_eq!(response.proof_results, vec![true, false, true]);
    }

    #[tokio::test]
    async fn each_index_flips_independently() {
        let processor = processor(
            StubEigenDa(Err(FetchError::NotFound)),
            StubCelestia(Err(FetchError::NotFound)),
        );

        for flipped in 0..3 {
            let proofs = (0..3)
                .map(|i| calldata_proof(1, if i == flipped { &[0] } else { &[1] }))
                .collect();
            let response = processor.process(&event(3, proofs)).await.unwrap();

            let expected: Vec<bool> = (0..3).map(|i| i != flipped).collect();
            assert_eq!(response.proof_results, expected);
        }
    }

    #[tokio::test]
    async fn unknown_proving_system_abandons_the_task() {
        let processor = processor(
            StubEigenDa(Err(FetchError::NotFound)),
            StubCelestia(Err(FetchError::NotFound)),
        );
        let event = event(4, vec![calldata_proof(1, &[1]), calldata_proof(0xFFFF, &[1])]);

        let err = processor.process(&event).await.unwrap_err();
        assert!(matches!(
            err,
            TaskError::Decode(TaskDecodeError::UnknownProvingSystem(0xFFFF))
        ));
    }

    #[tokio::test]
    async fn fetch_failure_abandons_the_task() {
        let processor = processor(
            StubEigenDa(Err(FetchError::Backend("disperser down".into()))),
            StubCelestia(Err(FetchError::NotFound)),
        );
        let event = event(
            5,
            vec![ProofVerificationData {
                provingSystemId: 2,
                daPayload: DAPayload {
                    solution: 1,
                    proofAssociatedData: Bytes::from_static(b"batch"),
                    index: 0,
                },
                pubInput: Bytes::new(),
                verificationKey: Bytes::new(),
            }],
        );

        let err = processor.process(&event).await.unwrap_err();
        assert!(matches!(err, TaskError::Fetch(FetchError::Backend(_))));
    }

    #[tokio::test]
    async fn empty_task_yields_an_empty_response() {
        let processor = processor(
            StubEigenDa(Err(FetchError::NotFound)),
            StubCelestia(Err(FetchError::NotFound)),
        );
        let response = processor.process(&event(6, Vec::new())).await.unwrap();

        assert_eq!(response.task_index, 6);
        assert!(response.proof_results.is_empty());
    }
}
