//! Core types: HashDigest, NodeEncoding, SignedBlock

use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 256-bit digest produced by a [`Hasher`](crate::core::traits::Hasher)
pub type HashDigest = [u8; 32];

/// How two child digests are laid out before being hashed into their parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NodeEncoding {
    /// `hash(hex(left) || hex(right))` over lowercase ASCII hex text
    #[default]
    Hex,
    /// `hash(left || right)` over the raw digest bytes
    Raw,
}

/// A sealed block: Merkle root over its leaves plus an optional signature
///
/// Produced exactly once when a block seals and never modified afterwards.
/// `items` is empty when the attestor was configured not to retain item
/// bytes; `leaves` is always present.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SignedBlock {
    pub block_id: u64,
    #[cfg_attr(feature = "serde", serde(with = "crate::utils::serde_hex::bytes_vec"))]
    pub items: Vec<Vec<u8>>,
    #[cfg_attr(feature = "serde", serde(with = "crate::utils::serde_hex::digest_vec"))]
    pub leaves: Vec<HashDigest>,
    #[cfg_attr(feature = "serde", serde(with = "crate::utils::serde_hex::digest"))]
    pub merkle_root: HashDigest,
    pub signature: Option<String>,
    /// Unix wall-clock time of sealing, in milliseconds
    pub timestamp_ms: u64,
}

impl SignedBlock {
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    pub fn merkle_root_hex(&self) -> String {
        hex::encode(self.merkle_root)
    }

    /// Item `index` as UTF-8 text, if retained and valid UTF-8.
    pub fn item_str(&self, index: usize) -> Option<&str> {
        self.items
            .get(index)
            .and_then(|item| core::str::from_utf8(item).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn sample_block() -> SignedBlock {
        SignedBlock {
            block_id: 4,
            items: vec![b"fox".to_vec(), vec![0xff, 0xfe]],
            leaves: vec![[1u8; 32], [2u8; 32]],
            merkle_root: [0xabu8; 32],
            signature: None,
            timestamp_ms: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_signed_block_accessors() {
        let block = sample_block();
        assert_eq!(block.len(), 2);
        assert!(!block.is_empty());
        assert!(!block.is_signed());
        assert_eq!(block.merkle_root_hex(), "ab".repeat(32));
    }

    #[test]
    fn test_item_str() {
        let block = sample_block();
        assert_eq!(block.item_str(0), Some("fox"));
        assert_eq!(block.item_str(1), None);
        assert_eq!(block.item_str(2), None);
    }

    #[test]
    fn test_node_encoding_default_is_hex() {
        assert_eq!(NodeEncoding::default(), NodeEncoding::Hex);
    }
}
