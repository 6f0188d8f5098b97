//! Wallet and address management
//!
//! ML-DSA-44 keypairs with SHA3-derived addresses. The chain itself never
//! holds keys; wallets sign transaction payloads before admission.

pub mod wallet;
pub mod wallets;

pub use wallet::{derive_address, validate_address, Wallet, ADDRESS_LEN};
pub use wallets::Wallets;
