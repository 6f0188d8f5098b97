use crate::error::Result;
use crate::utils::{mldsa_sign, new_key_pair, sha3_256_digest};
use data_encoding::HEXLOWER;

/// Addresses are the first 40 hex chars of SHA3-256(public key)
pub const ADDRESS_LEN: usize = 40;

/// An in-memory ML-DSA-44 keypair with its derived ledger address.
#[derive(Clone)]
pub struct Wallet {
    signing_key: Vec<u8>,
    public_key: Vec<u8>,
}

impl Wallet {
    pub fn new() -> Result<Wallet> {
        let (public_key, signing_key) = new_key_pair()?;
        Ok(Wallet {
            signing_key,
            public_key,
        })
    }

    pub fn get_address(&self) -> String {
        derive_address(self.public_key.as_slice())
    }

    pub fn get_public_key(&self) -> &[u8] {
        self.public_key.as_slice()
    }

    /// Sign an arbitrary payload with this wallet's signing key.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        mldsa_sign(self.signing_key.as_slice(), message)
    }
}

/// Derive a ledger address from a public key.
pub fn derive_address(public_key: &[u8]) -> String {
    let digest = sha3_256_digest(public_key);
    let mut encoded = HEXLOWER.encode(digest.as_slice());
    encoded.truncate(ADDRESS_LEN);
    encoded
}

pub fn validate_address(address: &str) -> bool {
    address.len() == ADDRESS_LEN
        && address
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}
