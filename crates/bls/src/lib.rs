//! BLS12-381 keys and signatures for the verifier-operator.
//!
//! Signatures live in G1 and public keys in G2, with messages hashed to the
//! curve under the standard ciphersuite DST, so single-operator signatures
//! can later be aggregated by the off-chain aggregator without interaction.
//! The operator id the aggregator tracks is the Keccak-256 digest of the
//! compressed public key.

use alloy_primitives::{keccak256, B256};
use bls12_381::hash_to_curve::{ExpandMsgXmd, HashToCurve};
use bls12_381::{pairing, G1Affine, G1Projective, G2Affine, G2Projective, Scalar};
use group::Curve;
use rand::RngCore;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::Sha256;

/// Domain separation tag for hashing digests to G1.
const BLS_DST: &[u8] = b"BLS_SIG_BLS12381G1_XMD:SHA-256_SSWU_RO_NUL_";

/// Byte length of a compressed G1 signature.
pub const SIGNATURE_LENGTH: usize = 48;
/// Byte length of a compressed G2 public key.
pub const PUBLIC_KEY_LENGTH: usize = 96;
/// Byte length of a canonical scalar secret key.
pub const SECRET_KEY_LENGTH: usize = 32;

/// Key material errors surfaced while loading or decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlsError {
    /// Wrong number of bytes for the expected encoding.
    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Expected byte length.
        expected: usize,
        /// Actual byte length.
        got: usize,
    },
    /// Bytes do not encode a point on the curve.
    #[error("bytes do not encode a valid curve point")]
    InvalidPoint,
    /// Bytes do not encode a canonical scalar.
    #[error("bytes do not encode a valid scalar")]
    InvalidScalar,
}

/// The operator's BLS keypair. Constructed once at startup, read-only after.
#[derive(Clone)]
pub struct BlsKeyPair {
    secret: Scalar,
    public: G2Affine,
}

impl BlsKeyPair {
    /// Generates a fresh keypair from the given randomness source.
    pub fn generate<R: RngCore>(rng: &mut R) -> Self {
        let mut wide = [0u8; 64];
        rng.fill_bytes(&mut wide);
        Self::from_scalar(Scalar::from_bytes_wide(&wide))
    }

    /// Loads a keypair from a canonical 32-byte secret scalar encoding.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, BlsError> {
        let arr: [u8; SECRET_KEY_LENGTH] =
            bytes.try_into().map_err(|_| BlsError::InvalidLength {
                expected: SECRET_KEY_LENGTH,
                got: bytes.len(),
            })?;
        let secret = Option::<Scalar>::from(Scalar::from_bytes(&arr)).ok_or(BlsError::InvalidScalar)?;
        Ok(Self::from_scalar(secret))
    }

    fn from_scalar(secret: Scalar) -> Self {
        let public = (G2Projective::generator() * secret).to_affine();
        Self { secret, public }
    }

    /// The public half of the keypair.
    pub fn public_key(&self) -> BlsPublicKey {
        BlsPublicKey(self.public)
    }

    /// Canonical encoding of the secret scalar.
    pub fn secret_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        self.secret.to_bytes()
    }

    /// Fixed-width operator identifier: Keccak-256 of the compressed public
    /// key.
    pub fn operator_id(&self) -> B256 {
        keccak256(self.public.to_compressed())
    }

    /// Signs a 32-byte message digest. Deterministic: the same digest under
    /// the same key always yields the same signature.
    pub fn sign(&self, digest: &[u8; 32]) -> BlsSignature {
        let point =
            <G1Projective as HashToCurve<ExpandMsgXmd<Sha256>>>::hash_to_curve(digest, BLS_DST);
        BlsSignature((point * self.secret).to_affine())
    }
}

impl core::fmt::Debug for BlsKeyPair {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BlsKeyPair")
            .field("public", &hex::encode(self.public.to_compressed()))
            .finish_non_exhaustive()
    }
}

/// A BLS public key (a point in G2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlsPublicKey(G2Affine);

impl BlsPublicKey {
    /// Compressed 96-byte encoding.
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.0.to_compressed()
    }

    /// Decodes a compressed public key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BlsError> {
        let arr: [u8; PUBLIC_KEY_LENGTH] =
            bytes.try_into().map_err(|_| BlsError::InvalidLength {
                expected: PUBLIC_KEY_LENGTH,
                got: bytes.len(),
            })?;
        Option::<G2Affine>::from(G2Affine::from_compressed(&arr))
            .map(Self)
            .ok_or(BlsError::InvalidPoint)
    }

    /// Checks `signature` over `digest`: e(sig, g2) == e(H(digest), pk).
    pub fn verify(&self, digest: &[u8; 32], signature: &BlsSignature) -> bool {
        let message =
            <G1Projective as HashToCurve<ExpandMsgXmd<Sha256>>>::hash_to_curve(digest, BLS_DST)
                .to_affine();
        pairing(&signature.0, &G2Affine::generator()) == pairing(&message, &self.0)
    }
}

/// A single-operator BLS signature (a point in G1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlsSignature(G1Affine);

impl BlsSignature {
    /// Compressed 48-byte encoding, the form sent to the aggregator.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        self.0.to_compressed()
    }

    /// Decodes a compressed signature.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BlsError> {
        let arr: [u8; SIGNATURE_LENGTH] =
            bytes.try_into().map_err(|_| BlsError::InvalidLength {
                expected: SIGNATURE_LENGTH,
                got: bytes.len(),
            })?;
        Option::<G1Affine>::from(G1Affine::from_compressed(&arr))
            .map(Self)
            .ok_or(BlsError::InvalidPoint)
    }
}

impl core::fmt::Display for BlsSignature {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&hex::encode(self.to_bytes()))
    }
}

impl Serialize for BlsSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.to_bytes()))
    }
}

impl<'de> Deserialize<'de> for BlsSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let bytes = hex::decode(&encoded).map_err(D::Error::custom)?;
        Self::from_bytes(&bytes).map_err(D::Error::custom)
    }
}
