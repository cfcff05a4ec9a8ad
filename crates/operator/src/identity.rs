use alloy_primitives::{Address, B256};
use alloy_signer_local::PrivateKeySigner;
use kiai_bls::BlsKeyPair;

/// Keys and identifiers the operator holds for its lifetime.
///
/// Built once from configuration at startup; read-only afterwards. The
/// settlement-chain address is derived from the ECDSA key, the operator id
/// from the BLS public key.
#[derive(Debug, Clone)]
pub struct OperatorIdentity {
    address: Address,
    ecdsa_signer: PrivateKeySigner,
    bls_keypair: BlsKeyPair,
    operator_id: B256,
}

impl OperatorIdentity {
    /// Assembles the identity from its two keys.
    pub fn new(ecdsa_signer: PrivateKeySigner, bls_keypair: BlsKeyPair) -> Self {
        let address = ecdsa_signer.address();
        let operator_id = bls_keypair.operator_id();
        Self {
            address,
            ecdsa_signer,
            bls_keypair,
            operator_id,
        }
    }

    /// The operator's settlement-chain address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The identifier the aggregator tracks this operator under.
    pub fn operator_id(&self) -> B256 {
        self.operator_id
    }

    /// The BLS keypair used to sign task responses.
    pub fn bls_keypair(&self) -> &BlsKeyPair {
        &self.bls_keypair
    }

    /// The chain-level auth key. Not used by the verification hot path.
    pub fn ecdsa_signer(&self) -> &PrivateKeySigner {
        &self.ecdsa_signer
    }
}
