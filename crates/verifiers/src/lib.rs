//! Proof verification backends, one per supported proving system.
//!
//! Verifiers are pure apart from logging: `(proof, public input, verifying
//! key) -> bool`, safe for concurrent use. A proof that fails to verify or
//! to deserialize yields `false`; it never errors out of the pipeline. The
//! [`VerifierRegistry`] maps wire proving-system tags to handlers, so
//! supporting a new system is one `register` call.

use std::collections::HashMap;
use std::sync::Arc;

use kiai_primitives::ProvingSystemId;

mod plonk;
pub use plonk::{PlonkBls12_381Verifier, PlonkBn254Verifier};

mod sp1;
pub use sp1::{Sp1Verifier, MAX_ELF_BUFFER_SIZE, MAX_PROOF_SIZE};

/// A single proving system's verifier.
///
/// Implementations must be side-effect-free apart from logging and safe to
/// call from concurrent tasks.
pub trait ProofVerifier: Send + Sync {
    /// Returns `true` iff `proof` verifies against `pub_input` and
    /// `verification_key`. Malformed inputs are a `false` verdict, not an
    /// error.
    fn verify(&self, proof: &[u8], pub_input: &[u8], verification_key: &[u8]) -> bool;
}

/// Maps proving-system tags to their verifiers.
#[derive(Clone, Default)]
pub struct VerifierRegistry {
    verifiers: HashMap<ProvingSystemId, Arc<dyn ProofVerifier>>,
}

impl VerifierRegistry {
    /// An empty registry. Mostly useful as a base for tests; production
    /// code wants [`VerifierRegistry::standard`].
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry with every production verifier wired in.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(
            ProvingSystemId::GnarkPlonkBls12_381,
            Arc::new(PlonkBls12_381Verifier),
        );
        registry.register(ProvingSystemId::GnarkPlonkBn254, Arc::new(PlonkBn254Verifier));
        registry.register(ProvingSystemId::Sp1, Arc::new(Sp1Verifier));
        registry
    }

    /// Registers (or replaces) the handler for `system`.
    pub fn register(&mut self, system: ProvingSystemId, verifier: Arc<dyn ProofVerifier>) {
        self.verifiers.insert(system, verifier);
    }

    /// The handler for `system`, if one is registered.
    pub fn get(&self, system: ProvingSystemId) -> Option<Arc<dyn ProofVerifier>> {
        self.verifiers.get(&system).cloned()
    }
}

impl std::fmt::Debug for VerifierRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifierRegistry")
            .field("systems", &self.verifiers.keys().collect::<Vec<_>>())
            .finish()
    }
}
