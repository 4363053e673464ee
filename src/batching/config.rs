//! AttestorConfig - block capacity, signer deadline, and hashing layout

use crate::core::errors::{AttestError, Result};
use crate::core::types::NodeEncoding;
use crate::utils::constants::{
    DEFAULT_BLOCK_SIZE, DEFAULT_SIGN_TIMEOUT_MS, HIGH_THROUGHPUT_BLOCK_SIZE, MAX_BLOCK_SIZE,
    MIN_BLOCK_SIZE, TESTING_BLOCK_SIZE, TESTING_SIGN_TIMEOUT_MS,
};

use alloc::format;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AttestorConfig {
    /// Items per block; a block seals as soon as it holds this many
    pub block_size: usize,
    /// Deadline for one signer call; `None` runs the signer inline without a deadline
    pub sign_timeout_ms: Option<u64>,
    pub encoding: NodeEncoding,
    /// Keep item bytes in each `SignedBlock` (leaf hashes are always kept)
    pub retain_items: bool,
}

impl Default for AttestorConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            sign_timeout_ms: Some(DEFAULT_SIGN_TIMEOUT_MS),
            encoding: NodeEncoding::Hex,
            retain_items: true,
        }
    }
}

impl AttestorConfig {
    pub fn for_testing() -> Self {
        Self {
            block_size: TESTING_BLOCK_SIZE,
            sign_timeout_ms: Some(TESTING_SIGN_TIMEOUT_MS),
            encoding: NodeEncoding::Hex,
            retain_items: true,
        }
    }

    /// Larger blocks, leaf hashes only.
    pub fn high_throughput() -> Self {
        Self {
            block_size: HIGH_THROUGHPUT_BLOCK_SIZE,
            sign_timeout_ms: Some(DEFAULT_SIGN_TIMEOUT_MS),
            encoding: NodeEncoding::Hex,
            retain_items: false,
        }
    }

    pub fn builder() -> AttestorConfigBuilder {
        AttestorConfigBuilder::new()
    }

    pub fn validate(&self) -> Result<()> {
        if self.block_size < MIN_BLOCK_SIZE {
            return Err(AttestError::ConfigurationError {
                reason: format!(
                    "Block size too small: {} < {}",
                    self.block_size,
                    MIN_BLOCK_SIZE
                ),
            });
        }

        if self.block_size > MAX_BLOCK_SIZE {
            return Err(AttestError::ConfigurationError {
                reason: format!(
                    "Block size too large: {} > {}",
                    self.block_size,
                    MAX_BLOCK_SIZE
                ),
            });
        }

        if self.sign_timeout_ms == Some(0) {
            return Err(AttestError::ConfigurationError {
                reason: "Sign timeout must be positive".into(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct AttestorConfigBuilder {
    config: AttestorConfig,
}

impl AttestorConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AttestorConfig::default(),
        }
    }

    pub fn block_size(mut self, block_size: usize) -> Self {
        self.config.block_size = block_size;
        self
    }

    pub fn sign_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.sign_timeout_ms = Some(timeout_ms);
        self
    }

    pub fn without_sign_timeout(mut self) -> Self {
        self.config.sign_timeout_ms = None;
        self
    }

    pub fn encoding(mut self, encoding: NodeEncoding) -> Self {
        self.config.encoding = encoding;
        self
    }

    pub fn retain_items(mut self, retain: bool) -> Self {
        self.config.retain_items = retain;
        self
    }

    pub fn build(self) -> Result<AttestorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for AttestorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AttestorConfig::default();
        assert_eq!(config.block_size, 32);
        assert_eq!(config.sign_timeout_ms, Some(3_000));
        assert_eq!(config.encoding, NodeEncoding::Hex);
        assert!(config.retain_items);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_testing_config() {
        let config = AttestorConfig::for_testing();
        assert_eq!(config.block_size, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_high_throughput_config() {
        let config = AttestorConfig::high_throughput();
        assert_eq!(config.block_size, 256);
        assert!(!config.retain_items);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = AttestorConfig::builder()
            .block_size(8)
            .encoding(NodeEncoding::Raw)
            .without_sign_timeout()
            .retain_items(false)
            .build()
            .unwrap();

        assert_eq!(config.block_size, 8);
        assert_eq!(config.encoding, NodeEncoding::Raw);
        assert_eq!(config.sign_timeout_ms, None);
        assert!(!config.retain_items);
    }

    #[test]
    fn test_invalid_block_size_zero() {
        let config = AttestorConfig::builder().block_size(0).build();
        assert!(matches!(
            config,
            Err(AttestError::ConfigurationError { .. })
        ));
    }

    #[test]
    fn test_invalid_block_size_too_large() {
        let config = AttestorConfig {
            block_size: MAX_BLOCK_SIZE + 1,
            ..AttestorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_zero_timeout() {
        let config = AttestorConfig::builder().sign_timeout_ms(0).build();
        assert!(config.is_err());
    }
}
