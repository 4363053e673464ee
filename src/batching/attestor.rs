//! BatchedMerkleAttestor - seals a stream of items into signed Merkle blocks
//!
//! Items are hashed into the leaves of the open block in call order. A block
//! seals when it reaches `block_size` items or on `flush`; sealing builds the
//! tree, asks the signer (if any) for a signature over the hex root, and
//! appends the `SignedBlock` to the history. Block IDs start at 0 and never
//! skip. A signer failure leaves the block unsigned and is reported through
//! `tracing` and the failure counters; it never aborts the seal.
//!
//! Only the leaves of a sealed block are kept; proofs rebuild the block's
//! tree from them on demand.

use crate::batching::config::AttestorConfig;
use crate::batching::merkle::{InclusionProof, MerkleTree};
use crate::core::errors::{AttestError, Result};
use crate::core::traits::{Hasher, Signer};
use crate::core::types::{HashDigest, SignedBlock};
use crate::signing::guard::SignerGuard;
use crate::utils::hash::{constant_time_eq_fixed, digest_to_hex, MerkleHasher, Sha256Hasher};

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, trace, warn};

pub struct BatchedMerkleAttestor<H = Sha256Hasher> {
    config: AttestorConfig,
    hasher: MerkleHasher<H>,
    signer: Option<SignerGuard>,
    pending_items: Vec<Vec<u8>>,
    pending_leaves: Vec<HashDigest>,
    history: Vec<SignedBlock>,
    signer_failures: u64,
    last_signer_error: Option<AttestError>,
}

impl<H: core::fmt::Debug> core::fmt::Debug for BatchedMerkleAttestor<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BatchedMerkleAttestor")
            .field("config", &self.config)
            .field("hasher", &self.hasher)
            .field("signer", &self.signer)
            .field("pending", &self.pending_leaves.len())
            .field("blocks", &self.history.len())
            .field("signer_failures", &self.signer_failures)
            .finish()
    }
}

impl BatchedMerkleAttestor<Sha256Hasher> {
    /// Attestor with SHA-256 leaves and the configured node encoding.
    pub fn new(config: AttestorConfig) -> Result<Self> {
        let hasher = MerkleHasher::sha256(config.encoding);
        Self::with_hasher(config, hasher)
    }
}

impl<H: Hasher + Clone> BatchedMerkleAttestor<H> {
    /// Attestor with a custom hashing policy; the hasher's own encoding wins
    /// over `config.encoding`.
    pub fn with_hasher(mut config: AttestorConfig, hasher: MerkleHasher<H>) -> Result<Self> {
        config.validate()?;
        config.encoding = hasher.encoding();

        Ok(Self {
            pending_items: Vec::with_capacity(if config.retain_items {
                config.block_size
            } else {
                0
            }),
            pending_leaves: Vec::with_capacity(config.block_size),
            config,
            hasher,
            signer: None,
            history: Vec::new(),
            signer_failures: 0,
            last_signer_error: None,
        })
    }

    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.set_signer(Some(signer));
        self
    }

    /// Replace the signer. A stalled call of the previous signer is abandoned
    /// with its worker thread.
    pub fn set_signer(&mut self, signer: Option<Arc<dyn Signer>>) {
        let timeout_ms = self.config.sign_timeout_ms;
        self.signer = signer.map(|signer| SignerGuard::new(signer, timeout_ms));
    }

    pub fn config(&self) -> &AttestorConfig {
        &self.config
    }

    pub fn hasher(&self) -> &MerkleHasher<H> {
        &self.hasher
    }

    /// Append one item to the open block; returns the block it sealed, if any.
    pub fn add_item(&mut self, item: impl AsRef<[u8]>) -> Option<SignedBlock> {
        let item = item.as_ref();
        let leaf = self.hasher.hash_leaf(item);
        self.pending_leaves.push(leaf);
        if self.config.retain_items {
            self.pending_items.push(item.to_vec());
        }

        trace!(
            pending = self.pending_leaves.len(),
            block_size = self.config.block_size,
            "item added"
        );

        if self.pending_leaves.len() >= self.config.block_size {
            return Some(self.seal());
        }
        None
    }

    /// Seal the open block even if it is partial; `None` if it is empty.
    pub fn flush(&mut self) -> Option<SignedBlock> {
        if self.pending_leaves.is_empty() {
            return None;
        }
        Some(self.seal())
    }

    fn seal(&mut self) -> SignedBlock {
        let block_id = self.history.len() as u64;
        let leaves = std::mem::take(&mut self.pending_leaves);
        let items = std::mem::take(&mut self.pending_items);
        self.pending_leaves.reserve(self.config.block_size);

        let merkle_root = *MerkleTree::new(leaves.clone(), self.hasher.clone()).root();
        let root_hex = digest_to_hex(&merkle_root);

        let signature = self.sign_root(block_id, &root_hex);

        let block = SignedBlock {
            block_id,
            items,
            leaves,
            merkle_root,
            signature,
            timestamp_ms: now_ms(),
        };

        debug!(
            block_id,
            leaves = block.len(),
            root = %&root_hex[..16],
            signed = block.is_signed(),
            "block sealed"
        );

        self.history.push(block.clone());
        block
    }

    fn sign_root(&mut self, block_id: u64, root_hex: &str) -> Option<String> {
        let guard = self.signer.as_mut()?;

        match guard.sign(root_hex) {
            Ok(signature) => Some(signature),
            Err(err) => {
                warn!(block_id, error = %err, "signer failed, block left unsigned");
                self.signer_failures += 1;
                self.last_signer_error = Some(err);
                None
            }
        }
    }

    /// All sealed blocks in block-ID order.
    pub fn history(&self) -> &[SignedBlock] {
        &self.history
    }

    pub fn get_history(&self) -> &[SignedBlock] {
        self.history()
    }

    pub fn block(&self, block_id: u64) -> Option<&SignedBlock> {
        usize::try_from(block_id)
            .ok()
            .and_then(|index| self.history.get(index))
    }

    pub fn block_count(&self) -> usize {
        self.history.len()
    }

    /// Items waiting in the open block.
    pub fn pending_len(&self) -> usize {
        self.pending_leaves.len()
    }

    pub fn signer_failures(&self) -> u64 {
        self.signer_failures
    }

    pub fn last_signer_error(&self) -> Option<&AttestError> {
        self.last_signer_error.as_ref()
    }

    pub fn get_proof(&self, block_id: u64, leaf_index: usize) -> Result<InclusionProof> {
        let block = self
            .block(block_id)
            .ok_or(AttestError::BlockNotFound { block_id })?;
        if leaf_index >= block.leaves.len() {
            return Err(AttestError::LeafIndexOutOfRange {
                block_id,
                index: leaf_index,
                len: block.leaves.len(),
            });
        }
        MerkleTree::new(block.leaves.clone(), self.hasher.clone()).get_proof(leaf_index)
    }

    /// Verify `proof` with this attestor's hashing policy; never panics.
    pub fn verify_proof(&self, proof: &InclusionProof) -> bool {
        proof.verify_with(&self.hasher)
    }

    /// Verify `proof` against the stored root of `block_id` rather than the
    /// root the proof carries.
    pub fn verify_proof_in_block(&self, block_id: u64, proof: &InclusionProof) -> bool {
        match self.block(block_id) {
            Some(block) => proof.verify_against_with(&self.hasher, &block.merkle_root),
            None => false,
        }
    }

    /// Recompute a block's root from its stored leaves (and retained items).
    pub fn verify_block(&self, block_id: u64) -> Result<bool> {
        let block = self
            .block(block_id)
            .ok_or(AttestError::BlockNotFound { block_id })?;
        Ok(self.check_block(block).is_ok())
    }

    fn check_block(&self, block: &SignedBlock) -> core::result::Result<(), &'static str> {
        if block.leaves.is_empty() {
            return Err("sealed block has no leaves");
        }

        if !block.items.is_empty() {
            if block.items.len() != block.leaves.len() {
                return Err("item count does not match leaf count");
            }
            let items_match = block
                .items
                .iter()
                .zip(&block.leaves)
                .all(|(item, leaf)| constant_time_eq_fixed(&self.hasher.hash_leaf(item), leaf));
            if !items_match {
                return Err("item does not hash to its leaf");
            }
        }

        let tree = MerkleTree::new(block.leaves.clone(), self.hasher.clone());
        if !constant_time_eq_fixed(tree.root(), &block.merkle_root) {
            return Err("root mismatch");
        }
        Ok(())
    }

    /// Check ID contiguity and every block's root, reporting the first violation.
    pub fn verify_history(&self) -> Result<()> {
        verify_blocks(&self.history, |block| self.check_block(block))
    }

    /// JSON array of all sealed blocks, digests and items hex-encoded.
    #[cfg(feature = "serde")]
    pub fn export_history_json(&self) -> Result<String> {
        serde_json::to_string(&self.history).map_err(|e| AttestError::SerializationError {
            reason: format!("Cannot serialize history: {}", e),
        })
    }
}

/// Check a sequence of blocks: IDs must run 0..N-1 and `check` must accept each.
pub fn verify_blocks<F>(blocks: &[SignedBlock], mut check: F) -> Result<()>
where
    F: FnMut(&SignedBlock) -> core::result::Result<(), &'static str>,
{
    for (expected_id, block) in blocks.iter().enumerate() {
        if block.block_id != expected_id as u64 {
            return Err(AttestError::HistoryCorrupted {
                block_id: block.block_id,
                reason: format!("Expected block id {}", expected_id),
            });
        }
        check(block).map_err(|reason| AttestError::HistoryCorrupted {
            block_id: block.block_id,
            reason: reason.into(),
        })?;
    }
    Ok(())
}

/// Parse an exported JSON history and verify it with the SHA-256 policy.
#[cfg(feature = "serde")]
pub fn import_history_json(json: &str, encoding: crate::core::types::NodeEncoding) -> Result<Vec<SignedBlock>> {
    let blocks: Vec<SignedBlock> =
        serde_json::from_str(json).map_err(|e| AttestError::SerializationError {
            reason: format!("Cannot parse history: {}", e),
        })?;

    let config = AttestorConfig {
        encoding,
        ..AttestorConfig::default()
    };
    let verifier = BatchedMerkleAttestor::new(config)?;
    verify_blocks(&blocks, |block| verifier.check_block(block))?;
    Ok(blocks)
}

fn now_ms() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_millis() as u64,
        Err(e) => {
            warn!(error = %e, "system clock before Unix epoch, using 0");
            0
        }
    }
}
