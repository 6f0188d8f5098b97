pub mod block;
pub mod blockchain;
pub mod merkle;
pub mod proof_of_work;
pub mod transaction;

pub use block::{Block, GENESIS_PREVIOUS_HASH};
pub use blockchain::{Blockchain, ChainInfo};
pub use merkle::{MerkleTree, EMPTY_MERKLE_ROOT};
pub use proof_of_work::{CancelToken, ProofOfWork};
pub use transaction::{Transaction, COINBASE_SENDER};
