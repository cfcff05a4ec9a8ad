use ark_ec::pairing::Pairing;
use ark_serialize::CanonicalDeserialize;
use jf_plonk::proof_system::structs::{Proof, VerifyingKey};
use jf_plonk::proof_system::{PlonkKzgSnark, UniversalSNARK};
use jf_plonk::transcript::StandardTranscript;
use tracing::{info, warn};

use crate::ProofVerifier;

/// PLONK verification over a concrete pairing engine.
///
/// Deserializes the proof, then the public-input field elements over the
/// curve's scalar field, then the verifying key, in that order; any
/// deserialization failure is logged and yields `false`. A well-formed but
/// invalid proof also yields `false`.
macro_rules! plonk_verify_impl {
    ($name:ident, $engine:ty, $label:literal) => {
        fn $name(proof_bytes: &[u8], pub_input_bytes: &[u8], vk_bytes: &[u8]) -> bool {
            let proof = match Proof::<$engine>::deserialize_compressed(proof_bytes) {
                Ok(proof) => proof,
                Err(err) => {
                    warn!(target: "verifiers", system = $label, ?err, "could not deserialize proof");
                    return false;
                }
            };

            let pub_input = match Vec::<<$engine as Pairing>::ScalarField>::deserialize_compressed(
                pub_input_bytes,
            ) {
                Ok(pub_input) => pub_input,
                Err(err) => {
                    warn!(target: "verifiers", system = $label, ?err, "could not read public input");
                    return false;
                }
            };

            let vk = match VerifyingKey::<$engine>::deserialize_compressed(vk_bytes) {
                Ok(vk) => vk,
                Err(err) => {
                    warn!(target: "verifiers", system = $label, ?err, "could not read verifying key");
                    return false;
                }
            };

            let verdict = PlonkKzgSnark::<$engine>::verify::<StandardTranscript>(
                &vk, &pub_input, &proof, None,
            )
            .is_ok();
            info!(target: "verifiers", system = $label, verdict, "PLONK proof verification result");
            verdict
        }
    };
}

plonk_verify_impl!(verify_plonk_bls12_381, ark_bls12_381::Bls12_381, "PLONK BLS12_381");
plonk_verify_impl!(verify_plonk_bn254, ark_bn254::Bn254, "PLONK BN254");

/// PLONK verifier over BLS12-381.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlonkBls12_381Verifier;

impl ProofVerifier for PlonkBls12_381Verifier {
    fn verify(&self, proof: &[u8], pub_input: &[u8], verification_key: &[u8]) -> bool {
        verify_plonk_bls12_381(proof, pub_input, verification_key)
    }
}

/// PLONK verifier over BN254.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlonkBn254Verifier;

impl ProofVerifier for PlonkBn254Verifier {
    fn verify(&self, proof: &[u8], pub_input: &[u8], verification_key: &[u8]) -> bool {
        verify_plonk_bn254(proof, pub_input, verification_key)
    }
}
