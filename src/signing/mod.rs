//! Signing - Signer implementations and the deadline guard around signer calls

#[cfg(feature = "std")]
pub mod guard;
pub mod hmac_signer;

#[cfg(feature = "std")]
pub use guard::SignerGuard;
pub use hmac_signer::HmacSigner;
