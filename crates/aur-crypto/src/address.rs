//! Address text encoding
//!
//! An address is `aur_` followed by the Base58 form of the 32-byte public
//! key and its 8-byte blake2b checksum. Addresses are display-only; the
//! ledger always stores raw keys.

use crate::hash::checksum;
use crate::CryptoError;
use aur_primitives::PublicKey;

/// Network prefix of every address
pub const ADDRESS_PREFIX: &str = "aur_";

const DECODED_LEN: usize = PublicKey::LEN + 8;

/// Encode a public key as an address
pub fn encode_address(public_key: &PublicKey) -> String {
    let mut payload = Vec::with_capacity(DECODED_LEN);
    payload.extend_from_slice(public_key.as_bytes());
    payload.extend_from_slice(&checksum(public_key.as_bytes()));
    format!("{}{}", ADDRESS_PREFIX, bs58::encode(payload).into_string())
}

/// Decode an address back into its public key, rejecting bad checksums
pub fn decode_address(address: &str) -> Result<PublicKey, CryptoError> {
    let body = address
        .strip_prefix(ADDRESS_PREFIX)
        .ok_or(CryptoError::MissingPrefix(ADDRESS_PREFIX))?;
    let decoded = bs58::decode(body)
        .into_vec()
        .map_err(|e| CryptoError::InvalidBase58(e.to_string()))?;
    if decoded.len() != DECODED_LEN {
        return Err(CryptoError::InvalidAddressLength(decoded.len()));
    }

    let (key, check) = decoded.split_at(PublicKey::LEN);
    if checksum(key).as_slice() != check {
        return Err(CryptoError::ChecksumMismatch);
    }
    PublicKey::from_slice(key).map_err(|_| CryptoError::InvalidAddressLength(decoded.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NULL_ADDRESS: &str = "aur_11111111111111111111111111111111ZxeF6dTF8vL";
    const GENESIS_ADDRESS: &str = "aur_AUdeYSF6fZ6XKY8F39Kp8hvCLbX4t7WFY7p6rq8TJ9sEgUAtkZGxqb6";

    #[test]
    fn test_null_account_address() {
        assert_eq!(encode_address(&PublicKey::NULL), NULL_ADDRESS);
        assert_eq!(decode_address(NULL_ADDRESS).unwrap(), PublicKey::NULL);
    }

    #[test]
    fn test_known_address_decodes() {
        let key = decode_address(GENESIS_ADDRESS).unwrap();
        assert_eq!(
            key.to_hex(),
            "beb8650b67bbef63c448dbbd7b263a6023a27447dd6c210047e2fb05bd75bdf4"
        );
        assert_eq!(encode_address(&key), GENESIS_ADDRESS);
    }

    #[test]
    fn test_address_roundtrip() {
        let key = PublicKey::from_bytes([0x3c; 32]);
        let address = encode_address(&key);
        assert!(address.starts_with(ADDRESS_PREFIX));
        assert_eq!(decode_address(&address).unwrap(), key);
    }

    #[test]
    fn test_missing_prefix() {
        let body = &GENESIS_ADDRESS[ADDRESS_PREFIX.len()..];
        assert_eq!(
            decode_address(body),
            Err(CryptoError::MissingPrefix(ADDRESS_PREFIX))
        );
        assert!(decode_address(&format!("xrb_{}", body)).is_err());
    }

    #[test]
    fn test_corrupted_checksum() {
        let key = PublicKey::from_bytes([0x11; 32]);
        let mut payload = key.as_bytes().to_vec();
        let mut bad = checksum(key.as_bytes());
        bad[0] ^= 0xff;
        payload.extend_from_slice(&bad);
        let address = format!("{}{}", ADDRESS_PREFIX, bs58::encode(payload).into_string());
        assert_eq!(decode_address(&address), Err(CryptoError::ChecksumMismatch));
    }

    #[test]
    fn test_invalid_base58() {
        // '0', 'O', 'I' and 'l' are not in the alphabet
        assert!(matches!(
            decode_address("aur_0OIl"),
            Err(CryptoError::InvalidBase58(_))
        ));
    }

    #[test]
    fn test_wrong_length() {
        let address = format!("{}{}", ADDRESS_PREFIX, bs58::encode([1u8; 20]).into_string());
        assert_eq!(decode_address(&address), Err(CryptoError::InvalidAddressLength(20)));
    }
}
