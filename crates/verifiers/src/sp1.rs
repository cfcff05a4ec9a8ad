use sp1_sdk::{ProverClient, SP1ProofWithPublicValues};
use tracing::{info, warn};

use crate::ProofVerifier;

/// Upper bound on the serialized SP1 proof envelope the operator accepts.
pub const MAX_PROOF_SIZE: usize = 2 * 1024 * 1024;

/// Upper bound on the guest ELF carried in the task's `pubInput` field.
pub const MAX_ELF_BUFFER_SIZE: usize = 8 * 1024 * 1024;

/// SP1 zkVM proof verifier.
///
/// The task's `pubInput` field carries the guest ELF for SP1 proofs; the
/// verifying key is derived from the ELF, so the task's `verificationKey`
/// field goes unused. Inputs over the size bounds are rejected with a
/// `false` verdict rather than truncated.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sp1Verifier;

impl ProofVerifier for Sp1Verifier {
    fn verify(&self, proof: &[u8], pub_input: &[u8], _verification_key: &[u8]) -> bool {
        if proof.len() > MAX_PROOF_SIZE {
            warn!(
                target: "verifiers",
                proof_len = proof.len(),
                max = MAX_PROOF_SIZE,
                "SP1 proof exceeds the size bound"
            );
            return false;
        }
        if pub_input.len() > MAX_ELF_BUFFER_SIZE {
            warn!(
                target: "verifiers",
                elf_len = pub_input.len(),
                max = MAX_ELF_BUFFER_SIZE,
                "SP1 guest ELF exceeds the size bound"
            );
            return false;
        }

        let proof: SP1ProofWithPublicValues = match serde_json::from_slice(proof) {
            Ok(proof) => proof,
            Err(err) => {
                warn!(target: "verifiers", %err, "could not deserialize SP1 proof");
                return false;
            }
        };

        let client = ProverClient::from_env();
        let (_, vk) = client.setup(pub_input);
        let verdict = client.verify(&proof, &vk).is_ok();
        info!(target: "verifiers", verdict, "SP1 proof verification result");
        verdict
    }
}
