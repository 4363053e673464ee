//! Hash utilities - SHA-256 hasher and the Merkle leaf/node hashing policy
//!
//! Leaves are `hash(item)`. Internal nodes are `hash(left || right)` where the
//! children are laid out according to [`NodeEncoding`]. The default `Hex`
//! layout concatenates the lowercase hex text of both children, which keeps
//! roots byte-for-byte compatible with tooling that hashes hex strings.

use crate::core::errors::{AttestError, Result};
use crate::core::traits::Hasher;
use crate::core::types::{HashDigest, NodeEncoding};
use crate::utils::constants::{EMPTY_TREE_INPUT, HASH_ALGORITHM_SHA256, HASH_HEX_SIZE};

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use sha2::{Digest, Sha256};

/// SHA-256 digest of `data`
pub fn sha256(data: &[u8]) -> HashDigest {
    Sha256::digest(data).into()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sha256Hasher;

impl Hasher for Sha256Hasher {
    fn digest(&self, data: &[u8]) -> HashDigest {
        sha256(data)
    }

    fn name(&self) -> &'static str {
        HASH_ALGORITHM_SHA256
    }
}

/// Leaf and node hashing policy shared by trees, proofs and the attestor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleHasher<H = Sha256Hasher> {
    hasher: H,
    encoding: NodeEncoding,
}

impl Default for MerkleHasher<Sha256Hasher> {
    fn default() -> Self {
        Self::sha256_hex()
    }
}

impl MerkleHasher<Sha256Hasher> {
    pub fn sha256(encoding: NodeEncoding) -> Self {
        Self {
            hasher: Sha256Hasher,
            encoding,
        }
    }

    /// Reference policy: SHA-256 leaves, hex-text node concatenation.
    pub fn sha256_hex() -> Self {
        Self::sha256(NodeEncoding::Hex)
    }
}

impl<H: Hasher> MerkleHasher<H> {
    pub fn new(hasher: H, encoding: NodeEncoding) -> Self {
        Self { hasher, encoding }
    }

    pub fn encoding(&self) -> NodeEncoding {
        self.encoding
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub fn hash_leaf(&self, data: &[u8]) -> HashDigest {
        self.hasher.digest(data)
    }

    pub fn combine(&self, left: &HashDigest, right: &HashDigest) -> HashDigest {
        match self.encoding {
            NodeEncoding::Hex => {
                let mut text = String::with_capacity(HASH_HEX_SIZE * 2);
                text.push_str(&hex::encode(left));
                text.push_str(&hex::encode(right));
                self.hasher.digest(text.as_bytes())
            }
            NodeEncoding::Raw => {
                let mut combined = Vec::with_capacity(left.len() + right.len());
                combined.extend_from_slice(left);
                combined.extend_from_slice(right);
                self.hasher.digest(&combined)
            }
        }
    }

    /// Sentinel root of a tree without leaves.
    pub fn empty_root(&self) -> HashDigest {
        self.hasher.digest(EMPTY_TREE_INPUT)
    }
}

pub fn digest_to_hex(digest: &HashDigest) -> String {
    hex::encode(digest)
}

pub fn digest_from_hex(text: &str) -> Result<HashDigest> {
    let mut digest = [0u8; 32];
    hex::decode_to_slice(text, &mut digest).map_err(|e| AttestError::SerializationError {
        reason: format!("Invalid hex digest: {}", e),
    })?;
    Ok(digest)
}

/// Constant-time equality comparison for fixed-size byte arrays.
/// Avoids timing side-channels by always comparing all bytes.
pub fn constant_time_eq_fixed<const N: usize>(a: &[u8; N], b: &[u8; N]) -> bool {
    let mut result = 0u8;
    for i in 0..N {
        result |= a[i] ^ b[i];
    }
    result == 0
}
