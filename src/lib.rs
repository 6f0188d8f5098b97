//! # QuantumShield - A Post-Quantum Proof-of-Work Ledger
//!
//! A single-node, in-memory blockchain with ML-DSA (post-quantum)
//! transaction signatures, SHA3-256 hashing throughout, and an
//! anomaly-scoring gate in front of the pending pool.
//!
//! ## How the code is organized
//! - `core/`: blocks, transactions, Merkle commitment, mining, the chain
//! - `wallet/`: ML-DSA key pairs and address derivation
//! - `security/`: transaction anomaly scorers for the admission gate
//! - `config/`: chain parameters from defaults, TOML, or environment
//! - `utils/`: hashing, signatures, serialization helpers
//! - `cli/`: command-line interface
//!
//! ## Key design decisions
//! - ML-DSA-44 signatures so recorded history stays verifiable against
//!   quantum adversaries
//! - Validation recomputes everything from field values; stored hashes
//!   and roots are claims to check, never inputs to trust
//! - One `RwLock` over blocks plus pending, one mining guard; mining
//!   snapshots state and searches nonces without holding either lock
//! - Balances are a read-time projection over the committed chain

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod security;
pub mod utils;
pub mod wallet;

#[cfg(test)]
pub mod testnet;

// Re-export commonly used types for convenience
pub use cli::{Command, Opt};
pub use config::ChainConfig;
pub use core::{
    Block, Blockchain, CancelToken, ChainInfo, MerkleTree, ProofOfWork, Transaction,
    COINBASE_SENDER, GENESIS_PREVIOUS_HASH,
};
pub use error::{BlockchainError, IntegrityFault, Result};
pub use security::{RuleBasedScorer, StatisticalScorer, TransactionScorer};
pub use wallet::{derive_address, validate_address, Wallet, Wallets};
