//! Utility functions - hash, constants, hex serialization

pub mod constants;
pub mod hash;
#[cfg(feature = "serde")]
pub mod serde_hex;

pub use constants::*;
pub use hash::{digest_from_hex, digest_to_hex, sha256, MerkleHasher, Sha256Hasher};
