//! Ed25519 signatures using blake2b-512 as the internal hash
//!
//! Key expansion and the signing transcript hash with blake2b-512 instead of
//! SHA-512, matching the signatures produced by existing Aurium wallets.

use crate::CryptoError;
use aur_primitives::{PublicKey, H256};
use blake2::{Blake2b512, Digest};
use ed25519_dalek::hazmat::{raw_sign, raw_verify, ExpandedSecretKey};
use ed25519_dalek::{Signature as DalekSignature, VerifyingKey};
use rand::RngCore;
use std::fmt;

/// Detached 64-byte signature (R || s)
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; 64]);

impl Signature {
    /// Size in bytes
    pub const LEN: usize = 64;

    /// All-zero signature slot (genesis block)
    pub const ZERO: Signature = Signature([0u8; 64]);

    /// Create from bytes
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Signature(bytes)
    }

    /// Get as bytes
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Convert to lowercase hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}..)", &self.to_hex()[..16])
    }
}

impl From<[u8; 64]> for Signature {
    fn from(bytes: [u8; 64]) -> Self {
        Signature(bytes)
    }
}

/// Account keypair derived from a 32-byte seed
pub struct Keypair {
    seed: [u8; 32],
    public: PublicKey,
}

impl Keypair {
    /// Derive a keypair from a seed
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let expanded = expand(&seed);
        let public = PublicKey::from_bytes(VerifyingKey::from(&expanded).to_bytes());
        Self { seed, public }
    }

    /// Derive a keypair from a seed slice
    pub fn from_slice(seed: &[u8]) -> Result<Self, CryptoError> {
        let seed: [u8; 32] = seed
            .try_into()
            .map_err(|_| CryptoError::InvalidSeed(seed.len()))?;
        Ok(Self::from_seed(seed))
    }

    /// Generate a keypair from the thread-local RNG
    pub fn random() -> Self {
        let mut seed = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut seed);
        Self::from_seed(seed)
    }

    /// Account public key
    pub fn public_key(&self) -> PublicKey {
        self.public
    }

    /// Raw seed bytes
    pub fn seed(&self) -> &[u8; 32] {
        &self.seed
    }

    /// Sign a block hash
    pub fn sign(&self, hash: &H256) -> Signature {
        sign(hash, self)
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair").field("public", &self.public).finish_non_exhaustive()
    }
}

fn expand(seed: &[u8; 32]) -> ExpandedSecretKey {
    let digest = Blake2b512::digest(seed);
    let mut bytes = [0u8; 64];
    bytes.copy_from_slice(&digest);
    ExpandedSecretKey::from_bytes(&bytes)
}

/// Sign a block hash with a keypair
pub fn sign(hash: &H256, keypair: &Keypair) -> Signature {
    let expanded = expand(&keypair.seed);
    let verifying_key = VerifyingKey::from(&expanded);
    let signature = raw_sign::<Blake2b512>(&expanded, hash.as_bytes(), &verifying_key);
    Signature(signature.to_bytes())
}

/// Verify a signature over a block hash against an account key.
///
/// Small-order keys, the null account among them, never verify.
pub fn verify(hash: &H256, signature: &Signature, public_key: &PublicKey) -> Result<(), CryptoError> {
    let verifying_key =
        VerifyingKey::from_bytes(public_key.as_bytes()).map_err(|_| CryptoError::InvalidPublicKey)?;
    // small-order keys verify forged signatures
    if verifying_key.is_weak() {
        return Err(CryptoError::InvalidPublicKey);
    }
    let signature = DalekSignature::from_bytes(signature.as_bytes());
    raw_verify::<Blake2b512>(&verifying_key, hash.as_bytes(), &signature)
        .map_err(|_| CryptoError::InvalidSignature)
}
