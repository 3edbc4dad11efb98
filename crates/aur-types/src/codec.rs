//! Binary wire layouts for blocks.
//!
//! Every multi-byte integer is big-endian. Every layout ends with the 64-byte
//! signature slot, and the canonical hash covers everything before it.
//!
//! ```text
//! Send (201 bytes)
//!   [0]        kind = 0
//!   [1..33]    source
//!   [33..65]   recipient
//!   [65..81]   amount (u128)
//!   [81..113]  previous
//!   [113..129] reference
//!   [129..137] timestamp (u64)
//!   [137..201] signature
//!
//! Receive (169 bytes)
//!   [0]        kind = 1
//!   [1..33]    recipient
//!   [33..65]   claimed hash
//!   [65..97]   previous
//!   [97..105]  timestamp (u64)
//!   [105..169] signature
//! ```

use crate::block::{Block, BlockKind, ReceiveBlock, SendBlock};
use aur_crypto::{blake2b_256, Signature};
use aur_primitives::{PublicKey, H256};

/// Encoded size of a `Send` block
pub const SEND_BLOCK_LEN: usize = 201;

/// Encoded size of a `Receive` block
pub const RECEIVE_BLOCK_LEN: usize = 169;

/// Size of the trailing signature slot
pub const SIGNATURE_LEN: usize = 64;

/// Hash of the non-signature prefix of an encoded block.
///
/// Inputs shorter than the signature slot hash as the empty prefix.
pub fn canonical_hash(bytes: &[u8]) -> H256 {
    let end = bytes.len().saturating_sub(SIGNATURE_LEN);
    blake2b_256(&bytes[..end])
}

// ============================================================================
// Encoding
// ============================================================================

/// Encode a send block
pub fn encode_send(block: &SendBlock) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SEND_BLOCK_LEN);
    buf.push(BlockKind::Send.tag());                      // 1
    buf.extend_from_slice(block.source.as_bytes());       // 32
    buf.extend_from_slice(block.recipient.as_bytes());    // 32
    buf.extend_from_slice(&block.amount.to_be_bytes());   // 16
    buf.extend_from_slice(block.previous.as_bytes());     // 32
    buf.extend_from_slice(&block.reference);              // 16
    buf.extend_from_slice(&block.timestamp.to_be_bytes()); // 8
    buf.extend_from_slice(block.signature.as_bytes());    // 64
    buf
}

/// Encode a receive block
pub fn encode_receive(block: &ReceiveBlock) -> Vec<u8> {
    let mut buf = Vec::with_capacity(RECEIVE_BLOCK_LEN);
    buf.push(BlockKind::Receive.tag());                   // 1
    buf.extend_from_slice(block.recipient.as_bytes());    // 32
    buf.extend_from_slice(block.claimed_hash.as_bytes()); // 32
    buf.extend_from_slice(block.previous.as_bytes());     // 32
    buf.extend_from_slice(&block.timestamp.to_be_bytes()); // 8
    buf.extend_from_slice(block.signature.as_bytes());    // 64
    buf
}

// ============================================================================
// Decoding
// ============================================================================

/// Decode a block, dispatching on the kind byte.
///
/// Returns `None` for an unknown or reserved kind, or when the input is not
/// exactly the kind's fixed size.
pub fn decode(bytes: &[u8]) -> Option<Block> {
    let kind = BlockKind::from_tag(*bytes.first()?)?;
    if bytes.len() != kind.encoded_len()? {
        return None;
    }
    match kind {
        BlockKind::Send => decode_send(bytes).map(Block::Send),
        BlockKind::Receive => decode_receive(bytes).map(Block::Receive),
        BlockKind::Split | BlockKind::Claim => None,
    }
}

fn decode_send(bytes: &[u8]) -> Option<SendBlock> {
    Some(SendBlock {
        source: PublicKey::from_slice(&bytes[1..33]).ok()?,
        recipient: PublicKey::from_slice(&bytes[33..65]).ok()?,
        amount: u128::from_be_bytes(bytes[65..81].try_into().ok()?),
        previous: H256::from_slice(&bytes[81..113]).ok()?,
        reference: bytes[113..129].try_into().ok()?,
        timestamp: u64::from_be_bytes(bytes[129..137].try_into().ok()?),
        signature: Signature::from_bytes(bytes[137..201].try_into().ok()?),
    })
}

fn decode_receive(bytes: &[u8]) -> Option<ReceiveBlock> {
    Some(ReceiveBlock {
        recipient: PublicKey::from_slice(&bytes[1..33]).ok()?,
        claimed_hash: H256::from_slice(&bytes[33..65]).ok()?,
        previous: H256::from_slice(&bytes[65..97]).ok()?,
        timestamp: u64::from_be_bytes(bytes[97..105].try_into().ok()?),
        signature: Signature::from_bytes(bytes[105..169].try_into().ok()?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_send() -> SendBlock {
        SendBlock {
            source: PublicKey::from_bytes([0x11; 32]),
            recipient: PublicKey::from_bytes([0x22; 32]),
            amount: 0x0102_0304_0506_0708_090a_0b0c_0d0e_0f10,
            previous: H256::from_bytes([0x33; 32]),
            reference: [0x44; 16],
            timestamp: 0x0a0b_0c0d_0e0f_1011,
            signature: Signature::from_bytes([0x55; 64]),
        }
    }

    fn sample_receive() -> ReceiveBlock {
        ReceiveBlock {
            recipient: PublicKey::from_bytes([0x66; 32]),
            claimed_hash: H256::from_bytes([0x77; 32]),
            previous: H256::from_bytes([0x88; 32]),
            timestamp: 42,
            signature: Signature::from_bytes([0x99; 64]),
        }
    }

    // ==================== Layout ====================

    #[test]
    fn test_send_layout() {
        let bytes = encode_send(&sample_send());
        assert_eq!(bytes.len(), SEND_BLOCK_LEN);
        assert_eq!(bytes[0], 0);
        assert_eq!(&bytes[1..33], &[0x11; 32]);
        assert_eq!(&bytes[33..65], &[0x22; 32]);
        assert_eq!(bytes[65], 0x01);
        assert_eq!(bytes[80], 0x10);
        assert_eq!(&bytes[81..113], &[0x33; 32]);
        assert_eq!(&bytes[113..129], &[0x44; 16]);
        assert_eq!(&bytes[129..137], &[0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f, 0x10, 0x11]);
        assert_eq!(&bytes[137..201], &[0x55; 64][..]);
    }

    #[test]
    fn test_receive_layout() {
        let bytes = encode_receive(&sample_receive());
        assert_eq!(bytes.len(), RECEIVE_BLOCK_LEN);
        assert_eq!(bytes[0], 1);
        assert_eq!(&bytes[1..33], &[0x66; 32]);
        assert_eq!(&bytes[33..65], &[0x77; 32]);
        assert_eq!(&bytes[65..97], &[0x88; 32]);
        assert_eq!(&bytes[97..105], &42u64.to_be_bytes());
        assert_eq!(&bytes[105..169], &[0x99; 64][..]);
    }

    #[test]
    fn test_decode_roundtrip() {
        let send = Block::Send(sample_send());
        assert_eq!(decode(&send.encode()), Some(send));

        let receive = Block::Receive(sample_receive());
        assert_eq!(decode(&receive.encode()), Some(receive));
    }

    // ==================== Malformed input ====================

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode(&[]), None);
    }

    #[test]
    fn test_decode_unknown_kind() {
        let mut bytes = encode_send(&sample_send());
        bytes[0] = 0xff;
        assert_eq!(decode(&bytes), None);
    }

    #[test]
    fn test_decode_reserved_kinds() {
        for tag in [2u8, 3u8] {
            let mut bytes = vec![0u8; SEND_BLOCK_LEN];
            bytes[0] = tag;
            assert_eq!(decode(&bytes), None);
        }
    }

    #[test]
    fn test_decode_short_and_long() {
        let bytes = encode_send(&sample_send());
        assert_eq!(decode(&bytes[..SEND_BLOCK_LEN - 1]), None);

        let mut long = bytes.clone();
        long.push(0);
        assert_eq!(decode(&long), None);

        // a send-sized buffer tagged as receive is malformed
        let mut retagged = bytes;
        retagged[0] = 1;
        assert_eq!(decode(&retagged), None);
    }

    // ==================== Canonical hash ====================

    #[test]
    fn test_hash_excludes_signature() {
        let mut send = sample_send();
        let before = canonical_hash(&encode_send(&send));
        send.signature = Signature::from_bytes([0xee; 64]);
        assert_eq!(canonical_hash(&encode_send(&send)), before);
    }

    #[test]
    fn test_hash_covers_every_other_byte() {
        let bytes = encode_receive(&sample_receive());
        let base = canonical_hash(&bytes);
        for i in 0..RECEIVE_BLOCK_LEN - SIGNATURE_LEN {
            let mut changed = bytes.clone();
            changed[i] ^= 0x01;
            assert_ne!(canonical_hash(&changed), base, "byte {} not covered", i);
        }
    }

    #[test]
    fn test_genesis_hash_vector() {
        let genesis = SendBlock {
            source: PublicKey::NULL,
            recipient: PublicKey::from_hex(
                "beb8650b67bbef63c448dbbd7b263a6023a27447dd6c210047e2fb05bd75bdf4",
            )
            .unwrap(),
            amount: 15_000_000_000_000,
            previous: H256::ZERO,
            reference: [0u8; 16],
            timestamp: 0,
            signature: Signature::ZERO,
        };
        assert_eq!(
            genesis.hash().to_hex(),
            "54344ca9eeee32450cd28684eea94a5ecbe4f32dc16010ce6c110f7de9bb319e"
        );
    }

    #[test]
    fn test_hash_of_short_input() {
        assert_eq!(canonical_hash(&[1u8; 10]), blake2b_256(&[]));
    }
}
