//! Error types for merkle-attest

use alloc::string::String;

use core::fmt;

pub type Result<T> = core::result::Result<T, AttestError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttestError {
    BlockNotFound {
        block_id: u64,
    },
    LeafIndexOutOfRange {
        block_id: u64,
        index: usize,
        len: usize,
    },
    SignerFailed {
        reason: String,
    },
    SignerTimeout {
        timeout_ms: u64,
    },
    ConfigurationError {
        reason: String,
    },
    MerkleError {
        reason: String,
    },
    HistoryCorrupted {
        block_id: u64,
        reason: String,
    },
    SerializationError {
        reason: String,
    },
}

impl AttestError {
    /// Caller errors are surfaced immediately and never swallowed.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            AttestError::BlockNotFound { .. } | AttestError::LeafIndexOutOfRange { .. }
        )
    }

    /// Signer errors degrade a block to unsigned; they never abort sealing.
    pub fn is_signer_error(&self) -> bool {
        matches!(
            self,
            AttestError::SignerFailed { .. } | AttestError::SignerTimeout { .. }
        )
    }
}

impl fmt::Display for AttestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttestError::BlockNotFound { block_id } => {
                write!(f, "Block not found: {}", block_id)
            }
            AttestError::LeafIndexOutOfRange {
                block_id,
                index,
                len,
            } => {
                write!(
                    f,
                    "Leaf index out of range in block {}: {} >= {}",
                    block_id, index, len
                )
            }
            AttestError::SignerFailed { reason } => {
                write!(f, "Signer failed: {}", reason)
            }
            AttestError::SignerTimeout { timeout_ms } => {
                write!(f, "Signer timed out after {} ms", timeout_ms)
            }
            AttestError::ConfigurationError { reason } => {
                write!(f, "Configuration error: {}", reason)
            }
            AttestError::MerkleError { reason } => {
                write!(f, "Merkle tree error: {}", reason)
            }
            AttestError::HistoryCorrupted { block_id, reason } => {
                write!(f, "History corrupted at block {}: {}", block_id, reason)
            }
            AttestError::SerializationError { reason } => {
                write!(f, "Serialization error: {}", reason)
            }
        }
    }
}

// Implement Error trait in std environment
#[cfg(feature = "std")]
impl std::error::Error for AttestError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn test_error_display_block_not_found() {
        let err = AttestError::BlockNotFound { block_id: 7 };
        assert_eq!(format!("{}", err), "Block not found: 7");
    }

    #[test]
    fn test_error_display_leaf_index_out_of_range() {
        let err = AttestError::LeafIndexOutOfRange {
            block_id: 2,
            index: 9,
            len: 4,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("block 2"));
        assert!(msg.contains("9 >= 4"));
    }

    #[test]
    fn test_error_display_signer_failed() {
        let err = AttestError::SignerFailed {
            reason: "enclave unavailable".into(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Signer failed"));
        assert!(msg.contains("enclave unavailable"));
    }

    #[test]
    fn test_error_display_signer_timeout() {
        let err = AttestError::SignerTimeout { timeout_ms: 1500 };
        assert_eq!(format!("{}", err), "Signer timed out after 1500 ms");
    }

    #[test]
    fn test_error_display_configuration_error() {
        let err = AttestError::ConfigurationError {
            reason: "block size is zero".into(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Configuration error"));
        assert!(msg.contains("block size is zero"));
    }

    #[test]
    fn test_error_display_history_corrupted() {
        let err = AttestError::HistoryCorrupted {
            block_id: 3,
            reason: "root mismatch".into(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("block 3"));
        assert!(msg.contains("root mismatch"));
    }

    #[test]
    fn test_error_classification() {
        assert!(AttestError::BlockNotFound { block_id: 0 }.is_caller_error());
        assert!(AttestError::SignerTimeout { timeout_ms: 1 }.is_signer_error());
        assert!(!AttestError::SignerTimeout { timeout_ms: 1 }.is_caller_error());
        assert!(!AttestError::HistoryCorrupted {
            block_id: 0,
            reason: "x".into()
        }
        .is_signer_error());
    }

    #[test]
    fn test_error_equality() {
        let err1 = AttestError::BlockNotFound { block_id: 1 };
        let err2 = AttestError::BlockNotFound { block_id: 1 };
        let err3 = AttestError::BlockNotFound { block_id: 2 };

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }
}
