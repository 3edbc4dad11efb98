//! blake2b hashing

use aur_primitives::H256;
use blake2::digest::consts::{U32, U8};
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;
type Blake2b64 = Blake2b<U8>;

/// Compute the 32-byte blake2b digest of the input data
pub fn blake2b_256(data: &[u8]) -> H256 {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    H256::from_bytes(hasher.finalize().into())
}

/// Compute the 8-byte blake2b checksum used by address encoding
pub fn checksum(data: &[u8]) -> [u8; 8] {
    let mut hasher = Blake2b64::new();
    hasher.update(data);
    hasher.finalize().into()
}
