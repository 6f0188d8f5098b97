//! Utility functions and helpers
//!
//! Cryptographic primitives (SHA3-256 hashing, ML-DSA-44 signatures) and
//! the serialization layer used throughout the ledger.

pub mod crypto;
pub mod serialization;

pub use crypto::{
    current_timestamp, mldsa_sign, mldsa_verify, new_key_pair, sha3_256_digest,
    MLDSA44_SIGNATURE_LEN, MLDSA44_SIGNING_KEY_LEN, MLDSA44_VERIFICATION_KEY_LEN,
};

pub use serialization::{deserialize, serialize};
