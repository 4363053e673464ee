//! MerkleTree - binary hash tree over one block of leaves
//!
//! Odd node policy: a trailing node without a right neighbour is combined
//! with itself (`combine(x, x)`), never promoted unpaired. Changing this
//! changes every root built over a non-power-of-two leaf count.

use crate::core::errors::{AttestError, Result};
use crate::core::traits::Hasher;
use crate::core::types::HashDigest;
use crate::utils::hash::{constant_time_eq_fixed, MerkleHasher, Sha256Hasher};

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct MerkleTree<H = Sha256Hasher> {
    hasher: MerkleHasher<H>,
    /// levels[0] = leaves, last level = [root]; empty for a tree without leaves
    levels: Vec<Vec<HashDigest>>,
    root: HashDigest,
}

impl MerkleTree<Sha256Hasher> {
    /// Tree over `leaves` with the default SHA-256 / hex policy.
    pub fn from_leaves(leaves: Vec<HashDigest>) -> Self {
        Self::new(leaves, MerkleHasher::sha256_hex())
    }
}

impl<H: Hasher> MerkleTree<H> {
    pub fn new(leaves: Vec<HashDigest>, hasher: MerkleHasher<H>) -> Self {
        if leaves.is_empty() {
            let root = hasher.empty_root();
            return Self {
                hasher,
                levels: Vec::new(),
                root,
            };
        }

        let mut levels = Vec::new();
        let mut current_level = leaves;

        // Build tree levels
        while current_level.len() > 1 {
            let next_level: Vec<HashDigest> = current_level
                .chunks(2)
                .map(|pair| {
                    // For odd count, combine last node with itself
                    let right = pair.get(1).unwrap_or(&pair[0]);
                    hasher.combine(&pair[0], right)
                })
                .collect();

            levels.push(current_level);
            current_level = next_level;
        }

        let root = current_level[0];
        levels.push(current_level);

        Self {
            hasher,
            levels,
            root,
        }
    }

    pub fn root(&self) -> &HashDigest {
        &self.root
    }

    pub fn leaves(&self) -> &[HashDigest] {
        self.levels.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn num_leaves(&self) -> usize {
        self.leaves().len()
    }

    /// Number of combine steps between a leaf and the root.
    pub fn depth(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    pub fn hasher(&self) -> &MerkleHasher<H> {
        &self.hasher
    }

    #[allow(clippy::manual_is_multiple_of)]
    pub fn get_proof(&self, index: usize) -> Result<InclusionProof> {
        let leaves = self.leaves();
        if index >= leaves.len() {
            return Err(AttestError::MerkleError {
                reason: format!("Invalid index: {} >= {}", index, leaves.len()),
            });
        }

        let mut siblings = Vec::with_capacity(self.depth());
        let mut current_index = index;

        // Collect sibling nodes at each level below the root
        for level in &self.levels[..self.depth()] {
            let sibling_index = if current_index % 2 == 0 {
                current_index + 1
            } else {
                current_index - 1
            };

            let sibling = match level.get(sibling_index) {
                Some(sibling) => *sibling,
                // For odd count, the node is its own sibling
                None => level[current_index],
            };

            siblings.push(sibling);
            current_index /= 2;
        }

        Ok(InclusionProof {
            leaf_hash: leaves[index],
            leaf_index: index,
            siblings,
            root: self.root,
        })
    }

    pub fn verify_proof(&self, proof: &InclusionProof) -> bool {
        proof.verify_with(&self.hasher)
    }
}

/// Accumulates leaves and builds a [`MerkleTree`] on demand; reusable after `clear`.
#[derive(Debug, Clone)]
pub struct MerkleTreeBuilder<H = Sha256Hasher> {
    hasher: MerkleHasher<H>,
    leaves: Vec<HashDigest>,
}

impl Default for MerkleTreeBuilder<Sha256Hasher> {
    fn default() -> Self {
        Self::new(MerkleHasher::sha256_hex())
    }
}

impl<H: Hasher + Clone> MerkleTreeBuilder<H> {
    pub fn new(hasher: MerkleHasher<H>) -> Self {
        Self {
            hasher,
            leaves: Vec::new(),
        }
    }

    /// Hash `data` into a new leaf and return its index.
    pub fn add_leaf(&mut self, data: &[u8]) -> usize {
        let leaf = self.hasher.hash_leaf(data);
        self.push_leaf_hash(leaf)
    }

    pub fn push_leaf_hash(&mut self, leaf: HashDigest) -> usize {
        self.leaves.push(leaf);
        self.leaves.len() - 1
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn build(&self) -> MerkleTree<H> {
        MerkleTree::new(self.leaves.clone(), self.hasher.clone())
    }

    /// Build from the accumulated leaves and reset for the next batch.
    pub fn finish(&mut self) -> MerkleTree<H> {
        let leaves = core::mem::take(&mut self.leaves);
        MerkleTree::new(leaves, self.hasher.clone())
    }

    pub fn clear(&mut self) {
        self.leaves.clear();
    }
}

/// Sibling path proving that `leaf_hash` sits at `leaf_index` under `root`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InclusionProof {
    #[cfg_attr(feature = "serde", serde(with = "crate::utils::serde_hex::digest"))]
    pub leaf_hash: HashDigest,
    pub leaf_index: usize,
    /// Ordered from the leaf level up to the level below the root
    #[cfg_attr(feature = "serde", serde(with = "crate::utils::serde_hex::digest_vec"))]
    pub siblings: Vec<HashDigest>,
    #[cfg_attr(feature = "serde", serde(with = "crate::utils::serde_hex::digest"))]
    pub root: HashDigest,
}

impl InclusionProof {
    /// Compute the root hash from this path and its leaf.
    /// Returns the computed root without comparing to any expected value.
    #[allow(clippy::manual_is_multiple_of)]
    pub fn compute_root_with<H: Hasher>(&self, hasher: &MerkleHasher<H>) -> HashDigest {
        let mut current_hash = self.leaf_hash;
        let mut current_index = self.leaf_index;

        for sibling in &self.siblings {
            current_hash = if current_index % 2 == 0 {
                // Left child
                hasher.combine(&current_hash, sibling)
            } else {
                // Right child
                hasher.combine(sibling, &current_hash)
            };
            current_index /= 2;
        }

        current_hash
    }

    /// Verify this path against an externally-provided trusted root.
    ///
    /// The `expected_root` should come from a trusted source (e.g. a signed
    /// block in the history), NOT from the proof itself.
    pub fn verify_against_with<H: Hasher>(
        &self,
        hasher: &MerkleHasher<H>,
        expected_root: &HashDigest,
    ) -> bool {
        if !self.index_fits_path() {
            return false;
        }
        let computed_root = self.compute_root_with(hasher);
        constant_time_eq_fixed(&computed_root, expected_root)
    }

    /// A path of `n` siblings addresses leaves `0..2^n`; any higher index
    /// would let one path claim several positions.
    fn index_fits_path(&self) -> bool {
        u32::try_from(self.siblings.len())
            .ok()
            .and_then(|depth| self.leaf_index.checked_shr(depth))
            .map_or(true, |rest| rest == 0)
    }

    /// Verify this path against the root it carries.
    pub fn verify_with<H: Hasher>(&self, hasher: &MerkleHasher<H>) -> bool {
        self.verify_against_with(hasher, &self.root)
    }

    /// Verify with the default SHA-256 / hex policy.
    pub fn verify(&self) -> bool {
        self.verify_with(&MerkleHasher::sha256_hex())
    }

    pub fn root_hex(&self) -> String {
        hex::encode(self.root)
    }

    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }
}

/// Verify `proof` with the default SHA-256 / hex policy; never panics.
pub fn verify_proof(proof: &InclusionProof) -> bool {
    proof.verify()
}
