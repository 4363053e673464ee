//! Constants - defaults, limits, and algorithm identifiers

/// Items per block when none is configured
pub const DEFAULT_BLOCK_SIZE: usize = 32;
pub const MIN_BLOCK_SIZE: usize = 1;
/// Upper bound on block capacity to keep a single seal bounded in memory and time
pub const MAX_BLOCK_SIZE: usize = 1 << 20;

/// Default deadline for one signer call
pub const DEFAULT_SIGN_TIMEOUT_MS: u64 = 3_000;
pub const TESTING_SIGN_TIMEOUT_MS: u64 = 500;
pub const HIGH_THROUGHPUT_BLOCK_SIZE: usize = 256;
pub const TESTING_BLOCK_SIZE: usize = 4;

pub const HASH_OUTPUT_SIZE: usize = 32;
/// Hex-encoded digest length
pub const HASH_HEX_SIZE: usize = HASH_OUTPUT_SIZE * 2;

/// Root of a tree without leaves is the digest of this input
pub const EMPTY_TREE_INPUT: &[u8] = b"";

pub const HASH_ALGORITHM_SHA256: &str = "sha256";
pub const SIGNATURE_ALGORITHM_HMAC_SHA256: &str = "HMAC-SHA256";

/// Name given to the helper thread that runs a signer under a deadline
pub const SIGNER_THREAD_NAME: &str = "merkle-attest-signer";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_validity() {
        const _: () = assert!(MIN_BLOCK_SIZE <= DEFAULT_BLOCK_SIZE);
        const _: () = assert!(DEFAULT_BLOCK_SIZE <= MAX_BLOCK_SIZE);
        const _: () = assert!(TESTING_BLOCK_SIZE <= MAX_BLOCK_SIZE);
        const _: () = assert!(HIGH_THROUGHPUT_BLOCK_SIZE <= MAX_BLOCK_SIZE);
        const _: () = assert!(DEFAULT_SIGN_TIMEOUT_MS > 0);
        const _: () = assert!(TESTING_SIGN_TIMEOUT_MS > 0);

        assert_eq!(HASH_HEX_SIZE, 64);
        assert!(EMPTY_TREE_INPUT.is_empty());
    }
}
