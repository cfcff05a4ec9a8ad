use alloy_primitives::keccak256;
use alloy_sol_types::SolValue;
use serde::{Deserialize, Serialize};

use crate::bindings::BatchProofVerificationTaskResponse;

/// Verdict vector for one task. `proof_results[i]` is the outcome of the
/// i-th proof in the originating task; the vector length always equals the
/// number of proofs in that task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponse {
    /// Index of the task being answered.
    pub task_index: u32,
    /// Per-proof verdicts, in task order.
    pub proof_results: Vec<bool>,
}

impl TaskResponse {
    /// The Solidity form of the response, as declared by the service manager.
    pub fn to_sol(&self) -> BatchProofVerificationTaskResponse {
        BatchProofVerificationTaskResponse {
            taskIndex: self.task_index,
            proofResults: self.proof_results.clone(),
        }
    }

    /// Canonical ABI encoding of the response.
    pub fn abi_encode(&self) -> Vec<u8> {
        self.to_sol().abi_encode()
    }

    /// Decodes a response from its canonical ABI encoding.
    pub fn abi_decode(data: &[u8]) -> Result<Self, alloy_sol_types::Error> {
        let sol = BatchProofVerificationTaskResponse::abi_decode(data)?;
        Ok(Self {
            task_index: sol.taskIndex,
            proof_results: sol.proofResults,
        })
    }

    /// Keccak-256 digest of the canonical encoding. This is the message the
    /// operator's BLS signature commits to.
    pub fn digest(&self) -> [u8; 32] {
        keccak256(self.abi_encode()).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abi_round_trip() {
        let response = TaskResponse {
            task_index: 11,
            proof_results: vec![true, false, true],
        };

        let decoded = TaskResponse::abi_decode(&response.abi_encode()).unwrap();
        assert_eq!(decoded, response);
    }

    #[test]
    fn digest_is_deterministic() {
        let response = TaskResponse {
            task_index: 3,
            proof_results: vec![true, true],
        };

        assert_eq!(response.digest(), response.digest());
    }

    #[test]
    fn digest_commits_to_every_verdict() {
        let base = TaskResponse {
            task_index: 3,
            proof_results: vec![true, true, true],
        };

        for flip in 0..base.proof_results.len() {
            let mut altered = base.clone();
            altered.proof_results[flip] = false;
            assert_ne!(altered.digest(), base.digest());
        }

        let mut other_index = base.clone();
        other_index.task_index = 4;
        assert_ne!(other_index.digest(), base.digest());
    }

    #[test]
    fn empty_result_vector_encodes() {
        let response = TaskResponse {
            task_index: 0,
            proof_results: Vec::new(),
        };

        let decoded = TaskResponse::abi_decode(&response.abi_encode()).unwrap();
        assert_eq!(decoded, response);
    }
}
