use crate::core::Block;
use crate::error::{BlockchainError, Result};
use crate::utils::sha3_256_digest;
use data_encoding::HEXLOWER;
use num_bigint::{BigInt, Sign};
use std::ops::ShlAssign;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How many nonce attempts between cancellation checks
const CANCEL_CHECK_INTERVAL: u64 = 1024;

/// Cooperative cancellation for the nonce search.
///
/// Mining is unbounded by design (cost is the security property), so every
/// search takes a token the caller can trip, optionally with a deadline.
/// A cancelled search discards the candidate block; nothing else changes.
#[derive(Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    pub fn with_deadline(timeout: Duration) -> CancelToken {
        CancelToken {
            flag: Arc::new(AtomicBool::new(false)),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        if self.flag.load(Ordering::Relaxed) {
            return true;
        }
        match self.deadline {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }
}

pub struct ProofOfWork {
    block: Block,
    target: BigInt,
    difficulty: u32,
}

impl ProofOfWork {
    pub fn new_proof_of_work(block: Block) -> ProofOfWork {
        // difficulty counts leading zero hex digits: d of them means the
        // hash, read as a big-endian integer, is below 2^(256 - 4d)
        let difficulty = block.get_difficulty().min(64);
        let mut target = BigInt::from(1);
        target.shl_assign(256 - 4 * difficulty as usize);
        ProofOfWork {
            block,
            target,
            difficulty,
        }
    }

    /// Check that a block's hash satisfies its own difficulty target.
    pub fn validate(block: &Block) -> bool {
        let pow = ProofOfWork::new_proof_of_work(block.clone());
        let data = pow.prepare_data(block.get_nonce());
        let hash = sha3_256_digest(data.as_slice());
        let hash_int = BigInt::from_bytes_be(Sign::Plus, hash.as_slice());
        hash_int < pow.target
    }

    /// Recompute a block's hash from its header fields at its stored nonce.
    pub fn recompute_hash(block: &Block) -> String {
        let pow = ProofOfWork::new_proof_of_work(block.clone());
        let data = pow.prepare_data(block.get_nonce());
        HEXLOWER.encode(sha3_256_digest(data.as_slice()).as_slice())
    }

    // Hash preimage, in the canonical header field order:
    // index ∥ previous_hash ∥ timestamp ∥ merkle_root ∥ difficulty ∥ nonce
    fn prepare_data(&self, nonce: u64) -> Vec<u8> {
        let mut data_bytes = vec![];
        data_bytes.extend(self.block.get_index().to_be_bytes());
        data_bytes.extend(self.block.get_pre_block_hash().as_bytes());
        data_bytes.extend(self.block.get_timestamp().to_be_bytes());
        data_bytes.extend(self.block.get_merkle_root());
        data_bytes.extend(self.difficulty.to_be_bytes());
        data_bytes.extend(nonce.to_be_bytes());
        data_bytes
    }

    /// Search the nonce space until the hash meets the target.
    ///
    /// Difficulty 0 succeeds on the very first attempt; higher difficulties
    /// run until found or the token cancels the search.
    pub fn run(&self, cancel: &CancelToken) -> Result<(u64, String)> {
        let mut nonce: u64 = 0;
        loop {
            if nonce % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
                return Err(BlockchainError::MiningCancelled);
            }

            let data = self.prepare_data(nonce);
            let hash = sha3_256_digest(data.as_slice());
            let hash_int = BigInt::from_bytes_be(Sign::Plus, hash.as_slice());

            if hash_int < self.target {
                return Ok((nonce, HEXLOWER.encode(hash.as_slice())));
            }

            nonce = nonce.checked_add(1).ok_or_else(|| {
                BlockchainError::Crypto("Nonce space exhausted without a solution".to_string())
            })?;
        }
    }
}
