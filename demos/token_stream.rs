//! # Token Stream Example
//!
//! Streams generated tokens through an attestor, signs every block root with
//! HMAC-SHA256, then proves one token's membership.
//!
//! Set `ATTEST_SIGNING_KEY` to sign with your own key.

use std::sync::Arc;

use merkle_attest::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .init();

    println!("=== merkle-attest Token Stream Example ===\n");

    // 1. Setup
    let signer = match HmacSigner::from_env("ATTEST_SIGNING_KEY") {
        Ok(signer) => signer,
        Err(_) => HmacSigner::new("default-development-key")?,
    };
    let config = AttestorConfig::builder().block_size(4).build()?;
    let mut attestor = BatchedMerkleAttestor::new(config)?.with_signer(Arc::new(signer.clone()));
    println!("1. Attestor ready (block size 4, {} signer)", signer.algorithm());

    // 2. Stream tokens
    println!("\n2. Streaming tokens...");
    let tokens = ["The", "quick", "brown", "fox", "jumps", "over", "the", "lazy", "dog"];
    for token in tokens {
        if let Some(block) = attestor.add_item(token) {
            println!(
                "   Block {}: {} tokens -> {}...",
                block.block_id,
                block.len(),
                &block.merkle_root_hex()[..16]
            );
        }
    }
    if let Some(block) = attestor.flush() {
        println!(
            "   Block {} (partial): {} tokens -> {}...",
            block.block_id,
            block.len(),
            &block.merkle_root_hex()[..16]
        );
    }

    // 3. Prove "fox"
    println!("\n3. Proving membership of 'fox' (block 0, index 3)...");
    let proof = attestor.get_proof(0, 3)?;
    println!("   Siblings: {}", proof.len());
    println!("   Valid: {}", verify_proof(&proof));

    // 4. Check signatures and history
    println!("\n4. Checking history...");
    for block in attestor.history() {
        let valid = block
            .signature
            .as_deref()
            .is_some_and(|signature| signer.verify(&block.merkle_root_hex(), signature));
        println!("   Block {} signature valid: {}", block.block_id, valid);
    }
    attestor.verify_history()?;
    println!("   History intact: {} blocks", attestor.block_count());

    println!("\n=== Done ===");
    Ok(())
}
