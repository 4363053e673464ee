//! Core traits: Hasher, Signer

use crate::core::errors::Result;
use crate::core::types::HashDigest;

use alloc::string::String;

/// Hasher trait - deterministic, collision-resistant `bytes -> 256-bit digest`
///
/// Used both for leaf hashing and for combining tree nodes.
pub trait Hasher {
    fn digest(&self, data: &[u8]) -> HashDigest;

    fn name(&self) -> &'static str {
        "unnamed"
    }
}

/// Signer trait - external, fallible signing capability over block roots
///
/// Implementations may be slow (hardware enclaves, remote services) and are
/// treated as untrusted: an error, a panic or a timeout only leaves the
/// block unsigned. Retry policy, if any, belongs to the implementation.
pub trait Signer: Send + Sync {
    fn sign(&self, data: &str) -> Result<String>;

    fn algorithm(&self) -> &str {
        "external"
    }
}

impl<F> Signer for F
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    fn sign(&self, data: &str) -> Result<String> {
        self(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::AttestError;
    use alloc::format;

    struct XorHasher;

    impl Hasher for XorHasher {
        fn digest(&self, data: &[u8]) -> HashDigest {
            let mut out = [0u8; 32];
            for (i, byte) in data.iter().enumerate() {
                out[i % 32] ^= byte;
            }
            out
        }
    }

    #[test]
    fn test_hasher_trait() {
        let hasher = XorHasher;
        assert_eq!(hasher.digest(b"")[0], 0);
        assert_eq!(hasher.digest(&[7u8])[0], 7);
        assert_eq!(hasher.name(), "unnamed");
    }

    #[test]
    fn test_closure_signer() {
        let signer = |data: &str| -> Result<String> { Ok(format!("sig:{}", data)) };
        assert_eq!(signer.sign("root").unwrap(), "sig:root");
        assert_eq!(Signer::algorithm(&signer), "external");
    }

    #[test]
    fn test_failing_closure_signer() {
        let signer = |_: &str| -> Result<String> {
            Err(AttestError::SignerFailed {
                reason: "offline".into(),
            })
        };
        assert!(signer.sign("root").is_err());
    }
}
