//! Batching System - seal item streams into Merkle blocks with inclusion proofs

#[cfg(feature = "std")]
pub mod attestor;
pub mod config;
pub mod merkle;
#[cfg(feature = "std")]
pub mod shared;

#[cfg(feature = "std")]
pub use attestor::{verify_blocks, BatchedMerkleAttestor};
#[cfg(all(feature = "std", feature = "serde"))]
pub use attestor::import_history_json;
pub use config::{AttestorConfig, AttestorConfigBuilder};
pub use merkle::{verify_proof, InclusionProof, MerkleTree, MerkleTreeBuilder};
#[cfg(feature = "std")]
pub use shared::SharedAttestor;

// Re-export
pub use crate::core::types::SignedBlock;
