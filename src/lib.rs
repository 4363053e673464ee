//! merkle-attest - batched Merkle-tree attestation for token streams
//!
//! Items are grouped into fixed-size blocks, each sealed into a binary
//! Merkle tree whose root is optionally signed by a slow, fallible external
//! signer. Any item of a sealed block can be proven with an inclusion proof.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, unused_qualifications, missing_debug_implementations)]

extern crate alloc;

pub mod batching;
pub mod core;
pub mod signing;
pub mod utils;

pub use crate::core::{
    errors::{AttestError, Result},
    traits::{Hasher, Signer},
    types::{HashDigest, NodeEncoding, SignedBlock},
};

#[cfg(feature = "std")]
pub use crate::batching::{BatchedMerkleAttestor, SharedAttestor};
pub use crate::batching::{
    verify_proof, AttestorConfig, InclusionProof, MerkleTree, MerkleTreeBuilder,
};

pub use crate::signing::HmacSigner;
pub use crate::utils::hash::{MerkleHasher, Sha256Hasher};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = "merkle-attest";

/// Prelude module for convenient re-exports
pub mod prelude {
    pub use crate::batching::{verify_proof, AttestorConfig, InclusionProof, MerkleTree};
    pub use crate::core::errors::{AttestError, Result};
    pub use crate::core::traits::{Hasher, Signer};
    pub use crate::core::types::{HashDigest, NodeEncoding, SignedBlock};

    #[cfg(feature = "std")]
    pub use crate::batching::{BatchedMerkleAttestor, SharedAttestor};
    pub use crate::signing::HmacSigner;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "merkle-attest");
    }
}
