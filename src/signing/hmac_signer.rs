//! HmacSigner - HMAC-SHA256 over block roots, lowercase hex output

use crate::core::errors::{AttestError, Result};
use crate::core::traits::Signer;
use crate::utils::constants::SIGNATURE_ALGORITHM_HMAC_SHA256;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

type HmacSha256 = Hmac<Sha256>;

/// Symmetric signer; the key is cleared on drop via zeroize
#[derive(Clone)]
pub struct HmacSigner {
    key: Vec<u8>,
}

impl core::fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HmacSigner")
            .field("key_len", &self.key.len())
            .field("key", &"<redacted>")
            .finish()
    }
}

impl Zeroize for HmacSigner {
    fn zeroize(&mut self) {
        self.key.zeroize();
    }
}

impl ZeroizeOnDrop for HmacSigner {}

impl Drop for HmacSigner {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl HmacSigner {
    pub fn new(key: impl AsRef<[u8]>) -> Result<Self> {
        let key = key.as_ref();
        if key.is_empty() {
            return Err(AttestError::ConfigurationError {
                reason: "HMAC key is empty".into(),
            });
        }
        Ok(Self { key: key.to_vec() })
    }

    /// Key taken from the environment variable `var`.
    #[cfg(feature = "std")]
    pub fn from_env(var: &str) -> Result<Self> {
        let key = std::env::var(var).map_err(|e| AttestError::ConfigurationError {
            reason: format!("Cannot read signing key from {}: {}", var, e),
        })?;
        Self::new(key)
    }

    fn mac(&self) -> Result<HmacSha256> {
        HmacSha256::new_from_slice(&self.key).map_err(|e| AttestError::SignerFailed {
            reason: format!("Invalid HMAC key: {}", e),
        })
    }

    pub fn sign_bytes(&self, data: &[u8]) -> Result<String> {
        let mut mac = self.mac()?;
        mac.update(data);
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Constant-time check of a hex signature over `data`.
    pub fn verify(&self, data: &str, signature: &str) -> bool {
        let Ok(expected) = hex::decode(signature) else {
            return false;
        };
        let Ok(mut mac) = self.mac() else {
            return false;
        };
        mac.update(data.as_bytes());
        mac.verify_slice(&expected).is_ok()
    }
}

impl Signer for HmacSigner {
    fn sign(&self, data: &str) -> Result<String> {
        self.sign_bytes(data.as_bytes())
    }

    fn algorithm(&self) -> &str {
        SIGNATURE_ALGORITHM_HMAC_SHA256
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn test_hmac_known_vector() {
        let signer = HmacSigner::new(b"key").unwrap();
        let signature = signer
            .sign("The quick brown fox jumps over the lazy dog")
            .unwrap();
        assert_eq!(
            signature,
            "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
        );
    }

    #[test]
    fn test_hmac_verify() {
        let signer = HmacSigner::new("secret").unwrap();
        let signature = signer.sign("root").unwrap();

        assert!(signer.verify("root", &signature));
        assert!(!signer.verify("other root", &signature));
        assert!(!signer.verify("root", "not-hex"));
        assert!(!HmacSigner::new("other").unwrap().verify("root", &signature));
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(HmacSigner::new(b"").is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let signer = HmacSigner::new("super-secret").unwrap();
        let debug = format!("{:?}", signer);
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_algorithm_name() {
        let signer = HmacSigner::new("k").unwrap();
        assert_eq!(signer.algorithm(), "HMAC-SHA256");
    }
}
