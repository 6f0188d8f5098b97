use crate::core::Transaction;
use crate::utils::sha3_256_digest;
use once_cell::sync::Lazy;

/// Root committed by a block with no transactions: SHA3-256 of the empty
/// string. Defined rather than an error so the genesis block can carry an
/// empty transaction list.
pub static EMPTY_MERKLE_ROOT: Lazy<Vec<u8>> = Lazy::new(|| sha3_256_digest(b""));

/// Merkle root builder over an ordered sequence of transaction hashes.
///
/// Conventions (fixed, order-sensitive):
/// - levels reduce pairwise left-to-right with SHA3-256(left ∥ right)
/// - an odd level duplicates its last hash to complete the final pair
/// - a single leaf IS the root (the reduction loop never runs)
/// - the empty list yields [`EMPTY_MERKLE_ROOT`]
pub struct MerkleTree;

impl MerkleTree {
    /// Reduce a list of leaf hashes to the Merkle root.
    pub fn calculate_merkle_root(leaf_hashes: &[Vec<u8>]) -> Vec<u8> {
        if leaf_hashes.is_empty() {
            return EMPTY_MERKLE_ROOT.clone();
        }

        let mut current_level = leaf_hashes.to_vec();

        while current_level.len() > 1 {
            if current_level.len() % 2 != 0 {
                // Duplicate the last hash so every node has a sibling
                let last = current_level
                    .last()
                    .expect("level is non-empty inside the reduction loop")
                    .clone();
                current_level.push(last);
            }

            let mut next_level = Vec::with_capacity(current_level.len() / 2);
            for pair in current_level.chunks_exact(2) {
                next_level.push(Self::hash_pair(&pair[0], &pair[1]));
            }
            current_level = next_level;
        }

        current_level
            .into_iter()
            .next()
            .expect("reduction always leaves exactly one hash")
    }

    /// Root over a transaction list, recomputing each leaf from the
    /// transaction contents (stored ids are not trusted).
    pub fn root_of_transactions(transactions: &[Transaction]) -> Vec<u8> {
        let leaf_hashes: Vec<Vec<u8>> = transactions.iter().map(|tx| tx.hash_contents()).collect();
        Self::calculate_merkle_root(&leaf_hashes)
    }

    /// Check a transaction list against an expected root.
    pub fn verify_transactions(transactions: &[Transaction], expected_root: &[u8]) -> bool {
        Self::root_of_transactions(transactions) == expected_root
    }

    fn hash_pair(left: &[u8], right: &[u8]) -> Vec<u8> {
        let mut combined = Vec::with_capacity(left.len() + right.len());
        combined.extend_from_slice(left);
        combined.extend_from_slice(right);
        sha3_256_digest(&combined)
    }
}
