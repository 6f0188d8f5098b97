// This is the core ledger implementation: an in-memory append-only chain
// with a pending-transaction pool in front of it. The chain exclusively
// owns both; everything external goes through the methods below.
//
// Single-writer model: one mining operation at a time per chain instance.
// Transactions arriving while a block is being mined simply stay pending
// and ride in the next block.

use crate::config::ChainConfig;
use crate::core::proof_of_work::CancelToken;
use crate::core::{Block, ProofOfWork, Transaction};
use crate::error::{BlockchainError, IntegrityFault, Result};
use crate::security::{RuleBasedScorer, TransactionScorer};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, RwLock};

struct ChainState {
    blocks: Vec<Block>,
    pending: Vec<Transaction>,
}

#[derive(Clone)]
pub struct Blockchain {
    // Blocks and pending pool move together, so they live under one lock
    state: Arc<RwLock<ChainState>>,
    // Held across the whole snapshot-mine-append sequence
    mining_guard: Arc<Mutex<()>>,
    config: ChainConfig,
    scorer: Arc<dyn TransactionScorer>,
}

/// Summary statistics for callers and the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainInfo {
    pub blocks: usize,
    pub total_transactions: usize,
    pub pending_transactions: usize,
    pub difficulty: u32,
    pub latest_hash: String,
    pub is_valid: bool,
}

impl Blockchain {
    /// Create a chain with its genesis block mined at construction time.
    pub fn new(config: ChainConfig, scorer: Arc<dyn TransactionScorer>) -> Result<Blockchain> {
        config.validate()?;

        info!(
            "Creating genesis block with difficulty {}",
            config.difficulty
        );
        let genesis = Block::generate_genesis_block(config.difficulty, &CancelToken::new())?;

        Ok(Blockchain {
            state: Arc::new(RwLock::new(ChainState {
                blocks: vec![genesis],
                pending: vec![],
            })),
            mining_guard: Arc::new(Mutex::new(())),
            config,
            scorer,
        })
    }

    /// Convenience constructor with the rule-based admission scorer.
    pub fn with_default_scorer(config: ChainConfig) -> Result<Blockchain> {
        Blockchain::new(config, Arc::new(RuleBasedScorer))
    }

    pub fn get_config(&self) -> &ChainConfig {
        &self.config
    }

    /// Admit a transaction into the pending pool.
    ///
    /// Checked in order: signature, amount positivity, anomaly score.
    /// A rejected transaction never enters the pool.
    pub fn add_transaction(&self, tx: Transaction) -> Result<()> {
        if tx.is_coinbase() {
            return Err(BlockchainError::InvalidSignature(
                "coinbase transactions are created by the miner, not submitted".to_string(),
            ));
        }
        if !tx.verify() {
            return Err(BlockchainError::InvalidSignature(format!(
                "signature does not verify for sender {}",
                tx.get_sender()
            )));
        }
        let amount = tx.get_amount();
        if !amount.is_finite() || amount <= 0.0 {
            return Err(BlockchainError::InvalidAmount(amount));
        }

        // Scoring and the pool append happen under one lock so admission
        // sees a consistent history
        let mut state = self
            .state
            .write()
            .expect("Failed to acquire write lock on chain state");

        let history = Self::recent_history(&state, self.config.history_window);
        let score = self.scorer.score(&tx, &history);
        if score > self.config.anomaly_threshold {
            return Err(BlockchainError::FlaggedAsSuspicious {
                score,
                threshold: self.config.anomaly_threshold,
            });
        }

        info!(
            "Transaction admitted: {} -> {} ({}) score {score:.2}",
            tx.get_sender(),
            tx.get_recipient(),
            tx.get_amount()
        );
        state.pending.push(tx);
        Ok(())
    }

    /// Mine the pending pool into a new block and append it.
    ///
    /// A coinbase transaction crediting `mining_reward` to the miner is
    /// prepended to a snapshot of pending. Transactions submitted while
    /// the nonce search runs are not included; they stay pending for the
    /// next block. On cancellation the candidate is discarded and neither
    /// the chain nor the pool changes.
    pub fn mine_pending_block(&self, miner_address: &str, cancel: &CancelToken) -> Result<Block> {
        let _mining = self
            .mining_guard
            .lock()
            .expect("Failed to acquire mining guard");

        let (pre_block_hash, next_index, snapshot) = {
            let state = self
                .state
                .read()
                .expect("Failed to acquire read lock on chain state");
            let tip = state.blocks.last().ok_or(BlockchainError::EmptyChainState)?;
            (
                tip.get_hash().to_string(),
                tip.get_index() + 1,
                state.pending.clone(),
            )
        };

        let coinbase = Transaction::new_coinbase(miner_address, self.config.mining_reward)?;
        let mut block_transactions = Vec::with_capacity(snapshot.len() + 1);
        block_transactions.push(coinbase);
        block_transactions.extend(snapshot.iter().cloned());

        info!(
            "Mining block {next_index} with {} transactions (difficulty {})",
            block_transactions.len(),
            self.config.difficulty
        );

        // The nonce search runs outside the state lock; only the mining
        // guard is held, so readers and add_transaction stay live
        let block = Block::new_block(
            pre_block_hash,
            &block_transactions,
            next_index,
            self.config.difficulty,
            cancel,
        )?;

        let included: HashSet<Vec<u8>> =
            snapshot.iter().map(|tx| tx.get_id().to_vec()).collect();

        let mut state = self
            .state
            .write()
            .expect("Failed to acquire write lock on chain state");
        state.blocks.push(block.clone());
        state.pending.retain(|tx| !included.contains(tx.get_id()));

        info!(
            "Successfully mined block {next_index}: {} ({} still pending)",
            block.get_hash(),
            state.pending.len()
        );
        Ok(block)
    }

    /// Walk the whole chain and assert every structural invariant,
    /// stopping at the first failure with the offending block and check.
    pub fn validate_chain(&self) -> Result<()> {
        let snapshot = self.get_chain_snapshot();
        Self::validate_blocks(&snapshot)
    }

    /// Validation over an explicit block sequence. Genesis is never
    /// checked against a predecessor.
    pub fn validate_blocks(blocks: &[Block]) -> Result<()> {
        if blocks.is_empty() {
            return Err(BlockchainError::EmptyChainState);
        }

        for i in 1..blocks.len() {
            let current = &blocks[i];
            let previous = &blocks[i - 1];
            let position = i as u64;

            let expected = previous.get_index() + 1;
            if current.get_index() != expected {
                return Err(BlockchainError::ChainIntegrityViolation {
                    index: position,
                    fault: IntegrityFault::IndexOutOfSequence {
                        expected,
                        found: current.get_index(),
                    },
                });
            }

            // The stored hash must be the true hash of the header fields
            // and the previous-hash field must point at the predecessor
            if ProofOfWork::recompute_hash(current) != current.get_hash()
                || current.get_pre_block_hash() != previous.get_hash()
            {
                return Err(BlockchainError::ChainIntegrityViolation {
                    index: position,
                    fault: IntegrityFault::HashLinkMismatch,
                });
            }

            if !current.verify_merkle_root() {
                return Err(BlockchainError::ChainIntegrityViolation {
                    index: position,
                    fault: IntegrityFault::MerkleMismatch,
                });
            }

            if !ProofOfWork::validate(current) {
                return Err(BlockchainError::ChainIntegrityViolation {
                    index: position,
                    fault: IntegrityFault::DifficultyNotMet,
                });
            }

            for (tx_index, tx) in current.get_transactions().iter().enumerate() {
                // The Merkle leaves recompute content hashes, so a stale
                // stored id is only caught by comparing it directly
                if tx.get_id() != tx.hash_contents().as_slice() {
                    return Err(BlockchainError::ChainIntegrityViolation {
                        index: position,
                        fault: IntegrityFault::TransactionIdMismatch { tx_index },
                    });
                }
                if !tx.verify() {
                    return Err(BlockchainError::ChainIntegrityViolation {
                        index: position,
                        fault: IntegrityFault::BadTransactionSignature { tx_index },
                    });
                }
            }
        }

        Ok(())
    }

    /// Balance as a read-time projection over the committed chain: the
    /// ledger itself is the single source of truth, there is no balance
    /// table to drift out of sync.
    pub fn get_balance(&self, address: &str) -> f64 {
        let state = self
            .state
            .read()
            .expect("Failed to acquire read lock on chain state");

        let mut balance = 0.0;
        for block in &state.blocks {
            for tx in block.get_transactions() {
                if tx.get_recipient() == address {
                    balance += tx.get_amount();
                }
                if tx.get_sender() == address {
                    balance -= tx.get_amount();
                }
            }
        }
        balance
    }

    /// Read-only copy of the block sequence for callers and serialization.
    pub fn get_chain_snapshot(&self) -> Vec<Block> {
        self.state
            .read()
            .expect("Failed to acquire read lock on chain state")
            .blocks
            .clone()
    }

    pub fn get_tip_hash(&self) -> Result<String> {
        let state = self
            .state
            .read()
            .expect("Failed to acquire read lock on chain state");
        let tip = state.blocks.last().ok_or(BlockchainError::EmptyChainState)?;
        Ok(tip.get_hash().to_string())
    }

    pub fn get_best_height(&self) -> Result<u64> {
        let state = self
            .state
            .read()
            .expect("Failed to acquire read lock on chain state");
        let tip = state.blocks.last().ok_or(BlockchainError::EmptyChainState)?;
        Ok(tip.get_index())
    }

    pub fn pending_count(&self) -> usize {
        self.state
            .read()
            .expect("Failed to acquire read lock on chain state")
            .pending
            .len()
    }

    /// Chain statistics for callers and the CLI.
    pub fn get_chain_info(&self) -> ChainInfo {
        // One read lock so the block and pending counts are consistent
        // with each other
        let (snapshot, pending_transactions) = {
            let state = self
                .state
                .read()
                .expect("Failed to acquire read lock on chain state");
            (state.blocks.clone(), state.pending.len())
        };

        ChainInfo {
            blocks: snapshot.len(),
            total_transactions: snapshot
                .iter()
                .map(|b| b.get_transactions().len())
                .sum(),
            pending_transactions,
            difficulty: self.config.difficulty,
            latest_hash: snapshot
                .last()
                .map(|b| b.get_hash().to_string())
                .unwrap_or_default(),
            is_valid: Self::validate_blocks(&snapshot).is_ok(),
        }
    }

    // Scoring history: the tail of committed transactions followed by the
    // pending pool, bounded by the configured window
    fn recent_history(state: &ChainState, window: usize) -> Vec<Transaction> {
        let mut history: Vec<Transaction> = state
            .blocks
            .iter()
            .flat_map(|b| b.get_transactions().iter().cloned())
            .chain(state.pending.iter().cloned())
            .collect();
        if history.len() > window {
            history.drain(..history.len() - window);
        }
        history
    }
}
