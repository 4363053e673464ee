//! Fuzz target for inclusion proof verification
//! Tests: InclusionProof::verify / verify_against_with with arbitrary paths
//! Goal: Ensure no panics for any index, depth, or digest content

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use merkle_attest::batching::merkle::InclusionProof;
use merkle_attest::{MerkleHasher, NodeEncoding};

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    leaf_index: usize,
    leaf_hash: [u8; 32],
    siblings: Vec<[u8; 32]>,
    root: [u8; 32],
    expected_root: [u8; 32],
    raw_encoding: bool,
}

fuzz_target!(|input: FuzzInput| {
    // Limit siblings to reasonable depth (prevent OOM)
    if input.siblings.len() > 64 {
        return;
    }

    let proof = InclusionProof {
        leaf_hash: input.leaf_hash,
        leaf_index: input.leaf_index,
        siblings: input.siblings,
        root: input.root,
    };

    let encoding = if input.raw_encoding {
        NodeEncoding::Raw
    } else {
        NodeEncoding::Hex
    };
    let hasher = MerkleHasher::sha256(encoding);

    // None of these may panic
    let _ = proof.compute_root_with(&hasher);
    let _ = proof.verify_against_with(&hasher, &input.expected_root);
    let _ = proof.verify();
});
