//! Text-field block encoding.
//!
//! API callers describe a block with strings (addresses, decimal amounts,
//! hex hashes). [`encode_fields`] validates every field against its fixed
//! slot and produces the wire bytes.

use crate::block::{Block, BlockKind, ReceiveBlock, SendBlock};
use crate::error::{FormatError, FormatResult};
use aur_crypto::{decode_address, encode_address, Signature};
use aur_primitives::{PublicKey, H256};
use serde::{Deserialize, Serialize};

/// Block described by text fields
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockFields {
    /// Kind name (`SEND`, `RECEIVE`)
    #[serde(rename = "type")]
    pub kind: String,
    /// Source address (send)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Recipient address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    /// Decimal amount (send)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    /// Hex hash of the claimed send block (receive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed_hash: Option<String>,
    /// Hex hash of the signer's previous head
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    /// Hex reference, 16 bytes (send, zero when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Decimal timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Hex signature, 64 bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl BlockFields {
    /// Describe a decoded block
    pub fn from_block(block: &Block) -> Self {
        match block {
            Block::Send(send) => Self {
                kind: BlockKind::Send.name().to_string(),
                source: Some(encode_address(&send.source)),
                recipient: Some(encode_address(&send.recipient)),
                amount: Some(send.amount.to_string()),
                previous: Some(send.previous.to_hex()),
                reference: Some(hex::encode(send.reference)),
                timestamp: Some(send.timestamp.to_string()),
                signature: Some(send.signature.to_hex()),
                ..Self::default()
            },
            Block::Receive(receive) => Self {
                kind: BlockKind::Receive.name().to_string(),
                recipient: Some(encode_address(&receive.recipient)),
                claimed_hash: Some(receive.claimed_hash.to_hex()),
                previous: Some(receive.previous.to_hex()),
                timestamp: Some(receive.timestamp.to_string()),
                signature: Some(receive.signature.to_hex()),
                ..Self::default()
            },
        }
    }

    /// Parse into a typed block
    pub fn to_block(&self) -> FormatResult<Block> {
        let kind = BlockKind::from_name(&self.kind)
            .ok_or_else(|| FormatError::UnknownKind(self.kind.clone()))?;
        match kind {
            BlockKind::Send => Ok(Block::Send(SendBlock {
                source: address_field("source", &self.source)?,
                recipient: address_field("recipient", &self.recipient)?,
                amount: number_field("amount", &self.amount)?,
                previous: hash_field("previous", &self.previous)?,
                reference: match &self.reference {
                    Some(value) => fixed_hex::<16>("reference", value)?,
                    None => [0u8; 16],
                },
                timestamp: number_field("timestamp", &self.timestamp)?,
                signature: signature_field(&self.signature)?,
            })),
            BlockKind::Receive => Ok(Block::Receive(ReceiveBlock {
                recipient: address_field("recipient", &self.recipient)?,
                claimed_hash: hash_field("claimedHash", &self.claimed_hash)?,
                previous: hash_field("previous", &self.previous)?,
                timestamp: number_field("timestamp", &self.timestamp)?,
                signature: signature_field(&self.signature)?,
            })),
            BlockKind::Split | BlockKind::Claim => Err(FormatError::UnsupportedKind(kind.name())),
        }
    }
}

/// Encode text fields to wire bytes
pub fn encode_fields(fields: &BlockFields) -> FormatResult<Vec<u8>> {
    Ok(fields.to_block()?.encode())
}

fn required<'a>(field: &'static str, value: &'a Option<String>) -> FormatResult<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .ok_or(FormatError::MissingField(field))
}

fn fixed_hex<const N: usize>(field: &'static str, value: &str) -> FormatResult<[u8; N]> {
    let value = value.trim();
    let value = value.strip_prefix("0x").unwrap_or(value);
    let bytes = hex::decode(value).map_err(|e| FormatError::InvalidHex {
        field,
        reason: e.to_string(),
    })?;
    let got = bytes.len();
    bytes.try_into().map_err(|_| FormatError::FieldLength {
        field,
        expected: N,
        got,
    })
}

fn hash_field(field: &'static str, value: &Option<String>) -> FormatResult<H256> {
    Ok(H256::from_bytes(fixed_hex::<32>(field, required(field, value)?)?))
}

fn signature_field(value: &Option<String>) -> FormatResult<Signature> {
    Ok(Signature::from_bytes(fixed_hex::<64>(
        "signature",
        required("signature", value)?,
    )?))
}

fn address_field(field: &'static str, value: &Option<String>) -> FormatResult<PublicKey> {
    decode_address(required(field, value)?).map_err(|e| FormatError::InvalidAddress {
        field,
        reason: e.to_string(),
    })
}

fn number_field<T: std::str::FromStr>(field: &'static str, value: &Option<String>) -> FormatResult<T> {
    let value = required(field, value)?;
    value.parse().map_err(|_| FormatError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}
