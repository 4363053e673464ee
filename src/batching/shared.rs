//! SharedAttestor - mutex-serialized attestor handle for multi-threaded producers
//!
//! Every operation takes the lock for its whole duration, so a seal (tree,
//! signature, history append) is atomic with respect to readers: no reader
//! can observe a block ID without its complete `SignedBlock`.

use crate::batching::attestor::BatchedMerkleAttestor;
use crate::batching::merkle::InclusionProof;
use crate::core::errors::Result;
use crate::core::traits::Hasher;
use crate::core::types::SignedBlock;
use crate::utils::hash::Sha256Hasher;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
pub struct SharedAttestor<H = Sha256Hasher> {
    inner: Arc<Mutex<BatchedMerkleAttestor<H>>>,
}

impl<H> Clone for SharedAttestor<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H: Hasher + Clone> SharedAttestor<H> {
    pub fn new(attestor: BatchedMerkleAttestor<H>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(attestor)),
        }
    }

    /// A panic while holding the lock cannot leave half a seal behind, so a
    /// poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, BatchedMerkleAttestor<H>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_item(&self, item: impl AsRef<[u8]>) -> Option<SignedBlock> {
        self.lock().add_item(item)
    }

    pub fn flush(&self) -> Option<SignedBlock> {
        self.lock().flush()
    }

    /// Snapshot of the sealed blocks.
    pub fn history(&self) -> Vec<SignedBlock> {
        self.lock().history().to_vec()
    }

    pub fn get_proof(&self, block_id: u64, leaf_index: usize) -> Result<InclusionProof> {
        self.lock().get_proof(block_id, leaf_index)
    }

    pub fn verify_proof(&self, proof: &InclusionProof) -> bool {
        self.lock().verify_proof(proof)
    }

    pub fn block_count(&self) -> usize {
        self.lock().block_count()
    }

    pub fn pending_len(&self) -> usize {
        self.lock().pending_len()
    }

    pub fn verify_history(&self) -> Result<()> {
        self.lock().verify_history()
    }

    /// Run `f` with exclusive access to the underlying attestor.
    pub fn with_attestor<R>(&self, f: impl FnOnce(&mut BatchedMerkleAttestor<H>) -> R) -> R {
        f(&mut *self.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batching::config::AttestorConfig;
    use std::thread;

    #[test]
    fn test_concurrent_producers_seal_every_item() {
        let config = AttestorConfig::builder().block_size(8).build().unwrap();
        let shared = SharedAttestor::new(BatchedMerkleAttestor::new(config).unwrap());

        let handles: Vec<_> = (0..4)
            .map(|producer| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        shared.add_item(format!("p{}-{}", producer, i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        shared.flush();

        let history = shared.history();
        let total: usize = history.iter().map(SignedBlock::len).sum();
        assert_eq!(total, 200);
        assert_eq!(history.len(), 25);
        for (i, block) in history.iter().enumerate() {
            assert_eq!(block.block_id, i as u64);
        }
        assert!(shared.verify_history().is_ok());
    }

    #[test]
    fn test_proofs_through_shared_handle() {
        let shared = SharedAttestor::new(
            BatchedMerkleAttestor::new(AttestorConfig::for_testing()).unwrap(),
        );
        for item in ["a", "b", "c", "d", "e"] {
            shared.add_item(item);
        }
        assert_eq!(shared.block_count(), 1);
        assert_eq!(shared.pending_len(), 1);

        let proof = shared.get_proof(0, 3).unwrap();
        assert!(shared.verify_proof(&proof));

        let sealed = shared.with_attestor(|attestor| attestor.flush());
        assert_eq!(sealed.map(|b| b.block_id), Some(1));
    }
}
