//! Test utilities for chain testing

use crate::config::ChainConfig;
use crate::core::proof_of_work::CancelToken;
use crate::core::{Blockchain, Transaction};
use crate::wallet::{Wallet, Wallets};

/// Configuration tuned for fast tests: difficulty 1 keeps the nonce
/// search to a handful of attempts.
pub fn test_config() -> ChainConfig {
    ChainConfig {
        difficulty: 1,
        ..ChainConfig::default()
    }
}

/// A fresh chain with the test configuration and the rule-based scorer.
pub fn test_chain() -> Blockchain {
    Blockchain::with_default_scorer(test_config()).expect("test chain construction failed")
}

/// Create `count` wallets and return the collection with their addresses.
pub fn create_test_wallets(count: usize) -> (Wallets, Vec<String>) {
    let mut wallets = Wallets::new();
    let mut addresses = Vec::new();
    for _ in 0..count {
        addresses.push(wallets.create_wallet().expect("wallet creation failed"));
    }
    (wallets, addresses)
}

/// Mine an empty block to `address` so it has spendable balance.
pub fn fund_address(chain: &Blockchain, address: &str) -> f64 {
    chain
        .mine_pending_block(address, &CancelToken::new())
        .expect("funding block failed");
    chain.get_balance(address)
}

/// Sign a transfer from `wallet` without submitting it.
pub fn signed_transfer(wallet: &Wallet, recipient: &str, amount: f64) -> Transaction {
    Transaction::new_signed(wallet, recipient, amount).expect("transaction signing failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_wallets_are_unique() {
        let (_wallets, addresses) = create_test_wallets(4);
        assert_eq!(addresses.len(), 4);
        for i in 0..addresses.len() {
            for j in i + 1..addresses.len() {
                assert_ne!(addresses[i], addresses[j]);
            }
        }
    }

    #[test]
    fn test_fund_address_credits_reward() {
        let chain = test_chain();
        let (_wallets, addresses) = create_test_wallets(1);
        let balance = fund_address(&chain, &addresses[0]);
        assert_eq!(balance, chain.get_config().mining_reward);
    }
}
