use alloy_primitives::B256;
use kiai_bls::{BlsKeyPair, BlsSignature};
use kiai_primitives::TaskResponse;
use serde::{Deserialize, Serialize};

/// A task response bound to the operator that produced it: the verdict
/// vector, the BLS signature over its canonical digest, and the operator id
/// the aggregator tracks the signature under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedTaskResponse {
    /// The verdict vector being attested.
    pub response: TaskResponse,
    /// BLS signature over `response.digest()`.
    pub bls_signature: BlsSignature,
    /// Keccak-256 of the operator's compressed BLS public key.
    pub operator_id: B256,
}

/// Signs task responses with the operator's BLS key.
///
/// The signature commits to the Keccak-256 digest of the ABI-encoded
/// response, so the aggregator and the on-chain contract agree on the
/// message. Signing is deterministic: the same response under the same key
/// always produces the same bytes.
#[derive(Debug, Clone)]
pub struct ResponseSigner {
    keypair: BlsKeyPair,
    operator_id: B256,
}

impl ResponseSigner {
    /// Creates a signer from the operator's BLS keypair.
    pub fn new(keypair: BlsKeyPair) -> Self {
        let operator_id = keypair.operator_id();
        Self {
            keypair,
            operator_id,
        }
    }

    /// Signs `response`, consuming it into the submission envelope.
    pub fn sign(&self, response: TaskResponse) -> SignedTaskResponse {
        let digest = response.digest();
        let bls_signature = self.keypair.sign(&digest);
        SignedTaskResponse {
            response,
            bls_signature,
            operator_id: self.operator_id,
        }
    }
}
