use crate::core::proof_of_work::CancelToken;
use crate::core::{MerkleTree, ProofOfWork, Transaction};
use crate::error::Result;
use crate::utils::{current_timestamp, deserialize, serialize};
use log::info;
use serde::{Deserialize, Serialize};

/// Previous-hash constant for the genesis block: the all-zero digest
pub const GENESIS_PREVIOUS_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

#[derive(Debug, Clone, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct Block {
    index: u64,
    timestamp: i64,
    pre_block_hash: String,
    hash: String,
    transactions: Vec<Transaction>,
    merkle_root: Vec<u8>,
    nonce: u64,
    difficulty: u32,
}

impl Block {
    /// Build a candidate block and mine it in place.
    ///
    /// The candidate is mutable (nonce starts at 0) until the returned
    /// block carries a hash that satisfies the difficulty; after that it
    /// is never modified again.
    pub fn new_block(
        pre_block_hash: String,
        transactions: &[Transaction],
        index: u64,
        difficulty: u32,
        cancel: &CancelToken,
    ) -> Result<Block> {
        let merkle_root = MerkleTree::root_of_transactions(transactions);

        let mut block = Block {
            index,
            timestamp: current_timestamp()?,
            pre_block_hash,
            hash: String::new(),
            transactions: transactions.to_vec(),
            merkle_root,
            nonce: 0,
            difficulty,
        };

        info!("Starting proof-of-work for block {index} with difficulty {difficulty}");
        let pow = ProofOfWork::new_proof_of_work(block.clone());
        let (nonce, hash) = pow.run(cancel)?;
        block.nonce = nonce;
        block.hash = hash.clone();
        info!("Proof-of-work completed for block {index}: {hash}");

        Ok(block)
    }

    /// Block 0: empty transaction list, all-zero previous hash, mined with
    /// the same miner as every other block.
    pub fn generate_genesis_block(difficulty: u32, cancel: &CancelToken) -> Result<Block> {
        Block::new_block(
            GENESIS_PREVIOUS_HASH.to_string(),
            &[],
            0,
            difficulty,
            cancel,
        )
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Block> {
        deserialize::<Block>(bytes)
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        serialize(self)
    }

    pub fn get_index(&self) -> u64 {
        self.index
    }

    pub fn get_timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn get_pre_block_hash(&self) -> &str {
        self.pre_block_hash.as_str()
    }

    pub fn get_hash(&self) -> &str {
        self.hash.as_str()
    }

    pub fn get_transactions(&self) -> &[Transaction] {
        self.transactions.as_slice()
    }

    pub fn get_merkle_root(&self) -> &[u8] {
        &self.merkle_root
    }

    pub fn get_nonce(&self) -> u64 {
        self.nonce
    }

    pub fn get_difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Recompute the Merkle root from transaction contents and compare it
    /// to the committed root.
    pub fn verify_merkle_root(&self) -> bool {
        MerkleTree::verify_transactions(&self.transactions, &self.merkle_root)
    }

    /// Mutable transaction access for tamper tests only
    #[cfg(test)]
    pub fn transactions_mut(&mut self) -> &mut Vec<Transaction> {
        &mut self.transactions
    }

    /// Overwrite the timestamp for tamper tests only
    #[cfg(test)]
    pub fn set_timestamp(&mut self, timestamp: i64) {
        self.timestamp = timestamp;
    }

    /// Overwrite the previous hash for tamper tests only
    #[cfg(test)]
    pub fn set_pre_block_hash(&mut self, pre_block_hash: String) {
        self.pre_block_hash = pre_block_hash;
    }
}
