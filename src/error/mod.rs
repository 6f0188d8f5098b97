//! Error handling for the ledger
//!
//! This module provides the error taxonomy for all ledger operations.
//! Admission errors are recoverable (the transaction simply never enters
//! the pending pool); integrity violations are reported with the offending
//! block index and are never silently repaired.

use std::fmt;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, BlockchainError>;

/// Which structural check a block failed during chain validation
#[derive(Debug, Clone, PartialEq)]
pub enum IntegrityFault {
    /// Block index does not follow its predecessor
    IndexOutOfSequence { expected: u64, found: u64 },
    /// Stored hash does not match the recomputed header hash, or the
    /// previous-hash field does not match the predecessor's hash
    HashLinkMismatch,
    /// Merkle root does not match the block's own transaction list
    MerkleMismatch,
    /// Block hash does not satisfy the block's difficulty target
    DifficultyNotMet,
    /// A transaction's stored id does not match its recomputed content hash
    TransactionIdMismatch { tx_index: usize },
    /// A non-coinbase transaction's signature failed verification
    BadTransactionSignature { tx_index: usize },
}

impl fmt::Display for IntegrityFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityFault::IndexOutOfSequence { expected, found } => {
                write!(f, "index out of sequence (expected {expected}, found {found})")
            }
            IntegrityFault::HashLinkMismatch => write!(f, "hash link mismatch"),
            IntegrityFault::MerkleMismatch => write!(f, "merkle root mismatch"),
            IntegrityFault::DifficultyNotMet => write!(f, "difficulty target not met"),
            IntegrityFault::TransactionIdMismatch { tx_index } => {
                write!(f, "stale id on transaction {tx_index}")
            }
            IntegrityFault::BadTransactionSignature { tx_index } => {
                write!(f, "bad signature on transaction {tx_index}")
            }
        }
    }
}

/// Error types for ledger operations
#[derive(Debug, Clone)]
pub enum BlockchainError {
    /// Cryptographic operation errors
    Crypto(String),
    /// Configuration errors
    Config(String),
    /// Serialization/deserialization errors
    Serialization(String),
    /// File I/O errors
    Io(String),
    /// Invalid address format
    InvalidAddress(String),
    /// Admission: transaction signature did not verify
    InvalidSignature(String),
    /// Admission: transaction amount must be strictly positive
    InvalidAmount(f64),
    /// Admission: the anomaly scorer flagged the transaction
    FlaggedAsSuspicious { score: f64, threshold: f64 },
    /// Validation: a block failed a structural or cryptographic check
    ChainIntegrityViolation { index: u64, fault: IntegrityFault },
    /// Mining was cancelled cooperatively; the candidate block is
    /// discarded and pending is left untouched
    MiningCancelled,
    /// The chain has no genesis block
    EmptyChainState,
}

impl fmt::Display for BlockchainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockchainError::Crypto(msg) => write!(f, "Cryptographic error: {msg}"),
            BlockchainError::Config(msg) => write!(f, "Configuration error: {msg}"),
            BlockchainError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            BlockchainError::Io(msg) => write!(f, "I/O error: {msg}"),
            BlockchainError::InvalidAddress(addr) => write!(f, "Invalid address: {addr}"),
            BlockchainError::InvalidSignature(msg) => write!(f, "Invalid signature: {msg}"),
            BlockchainError::InvalidAmount(amount) => {
                write!(f, "Invalid amount: {amount} (must be positive)")
            }
            BlockchainError::FlaggedAsSuspicious { score, threshold } => {
                write!(
                    f,
                    "Transaction flagged as suspicious: score {score:.2} exceeds threshold {threshold:.2}"
                )
            }
            BlockchainError::ChainIntegrityViolation { index, fault } => {
                write!(f, "Chain integrity violation at block {index}: {fault}")
            }
            BlockchainError::MiningCancelled => write!(f, "Mining cancelled"),
            BlockchainError::EmptyChainState => {
                write!(f, "Chain has no genesis block")
            }
        }
    }
}

impl std::error::Error for BlockchainError {}

impl From<std::io::Error> for BlockchainError {
    fn from(err: std::io::Error) -> Self {
        BlockchainError::Io(err.to_string())
    }
}

impl From<bincode::error::EncodeError> for BlockchainError {
    fn from(err: bincode::error::EncodeError) -> Self {
        BlockchainError::Serialization(err.to_string())
    }
}

impl From<bincode::error::DecodeError> for BlockchainError {
    fn from(err: bincode::error::DecodeError) -> Self {
        BlockchainError::Serialization(err.to_string())
    }
}
