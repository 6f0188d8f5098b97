// A transaction is a signed value transfer between two addresses.
// The signature covers the canonical payload (sender, recipient, amount,
// timestamp); the content hash additionally covers the signature, so any
// single-byte change anywhere invalidates the hash.

use crate::error::{BlockchainError, Result};
use crate::utils::{current_timestamp, mldsa_verify, sha3_256_digest};
use crate::wallet::{derive_address, validate_address, Wallet};
use serde::{Deserialize, Serialize};

/// Sentinel sender for coinbase (mining reward) transactions
pub const COINBASE_SENDER: &str = "System";

#[derive(Debug, Clone, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct Transaction {
    id: Vec<u8>,
    sender: String,
    recipient: String,
    amount: f64,
    timestamp: i64,
    public_key: Vec<u8>,
    signature: Vec<u8>,
}

impl Transaction {
    /// Create and sign a value transfer from a wallet.
    ///
    /// The amount is not range-checked here; admission (`add_transaction`)
    /// enforces positivity so that rejection is a typed, recoverable error.
    pub fn new_signed(wallet: &Wallet, recipient: &str, amount: f64) -> Result<Transaction> {
        if !validate_address(recipient) {
            return Err(BlockchainError::InvalidAddress(recipient.to_string()));
        }

        let sender = wallet.get_address();
        let timestamp = current_timestamp()?;
        let payload = signing_payload(&sender, recipient, amount, timestamp);
        let signature = wallet.sign(&payload)?;

        let mut tx = Transaction {
            id: vec![],
            sender,
            recipient: recipient.to_string(),
            amount,
            timestamp,
            public_key: wallet.get_public_key().to_vec(),
            signature,
        };
        tx.id = tx.hash_contents();
        Ok(tx)
    }

    /// Coinbase transaction crediting a mining reward. No signature; the
    /// proof-of-work on the containing block is what authorizes it.
    pub fn new_coinbase(recipient: &str, reward: f64) -> Result<Transaction> {
        if !validate_address(recipient) {
            return Err(BlockchainError::InvalidAddress(recipient.to_string()));
        }

        let mut tx = Transaction {
            id: vec![],
            sender: COINBASE_SENDER.to_string(),
            recipient: recipient.to_string(),
            amount: reward,
            timestamp: current_timestamp()?,
            public_key: vec![],
            signature: vec![],
        };
        tx.id = tx.hash_contents();
        Ok(tx)
    }

    pub fn get_id(&self) -> &[u8] {
        self.id.as_slice()
    }

    pub fn get_sender(&self) -> &str {
        self.sender.as_str()
    }

    pub fn get_recipient(&self) -> &str {
        self.recipient.as_str()
    }

    pub fn get_amount(&self) -> f64 {
        self.amount
    }

    pub fn get_timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn get_signature(&self) -> &[u8] {
        self.signature.as_slice()
    }

    pub fn is_coinbase(&self) -> bool {
        self.sender == COINBASE_SENDER
    }

    /// Content hash recomputed from the current field values.
    ///
    /// Validation always uses this, never the stored `id`, so a mutated
    /// field can't hide behind a stale identifier.
    pub fn hash_contents(&self) -> Vec<u8> {
        let mut data = signing_payload(&self.sender, &self.recipient, self.amount, self.timestamp);
        data.extend_from_slice(self.signature.as_slice());
        sha3_256_digest(data.as_slice())
    }

    /// Verify the signature against the sender's public key, including
    /// that the sender address actually belongs to that key.
    pub fn verify(&self) -> bool {
        if self.is_coinbase() {
            return true;
        }
        if derive_address(self.public_key.as_slice()) != self.sender {
            return false;
        }
        let payload = signing_payload(&self.sender, &self.recipient, self.amount, self.timestamp);
        mldsa_verify(
            self.public_key.as_slice(),
            self.signature.as_slice(),
            &payload,
        )
    }

    /// Mutate the amount in place (for tamper tests only)
    #[cfg(test)]
    pub fn set_amount(&mut self, amount: f64) {
        self.amount = amount;
    }

    /// Replace the signature in place (for tamper tests only)
    #[cfg(test)]
    pub fn set_signature(&mut self, signature: Vec<u8>) {
        self.signature = signature;
    }

    /// Overwrite the stored id (for tamper tests only)
    #[cfg(test)]
    pub fn set_id(&mut self, id: Vec<u8>) {
        self.id = id;
    }
}

/// Canonical byte layout signed by the sender: sender ∥ recipient ∥
/// amount (IEEE-754 bits, big-endian) ∥ timestamp (big-endian).
fn signing_payload(sender: &str, recipient: &str, amount: f64, timestamp: i64) -> Vec<u8> {
    let mut data = Vec::with_capacity(sender.len() + recipient.len() + 16);
    data.extend_from_slice(sender.as_bytes());
    data.extend_from_slice(recipient.as_bytes());
    data.extend_from_slice(&amount.to_bits().to_be_bytes());
    data.extend_from_slice(&timestamp.to_be_bytes());
    data
}
