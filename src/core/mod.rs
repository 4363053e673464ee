//! Core types and traits (SignedBlock, Hasher, Signer, errors)

pub mod errors;
pub mod traits;
pub mod types;

// Re-exports
pub use errors::{AttestError, Result};
pub use traits::{Hasher, Signer};
pub use types::{HashDigest, NodeEncoding, SignedBlock};
