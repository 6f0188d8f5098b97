//! Chain integration tests
//!
//! End-to-end scenarios against the public API: mining and balance
//! accounting, the admission gate, cancellation, and whole-chain
//! validation.

use quantumshield::{
    Blockchain, BlockchainError, CancelToken, ChainConfig, ProofOfWork, Transaction, Wallets,
    COINBASE_SENDER, GENESIS_PREVIOUS_HASH,
};
use std::time::Duration;

fn fast_config() -> ChainConfig {
    ChainConfig {
        difficulty: 1,
        ..ChainConfig::default()
    }
}

fn fast_chain() -> Blockchain {
    Blockchain::with_default_scorer(fast_config()).unwrap()
}

#[test]
fn test_chain_starts_at_genesis() {
    let chain = fast_chain();

    assert_eq!(chain.get_best_height().unwrap(), 0);
    let snapshot = chain.get_chain_snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].get_pre_block_hash(), GENESIS_PREVIOUS_HASH);
    assert!(snapshot[0].get_transactions().is_empty());
    assert!(ProofOfWork::validate(&snapshot[0]));
    assert!(chain.validate_chain().is_ok());
}

#[test]
fn test_mining_and_balance_accounting() {
    let chain = fast_chain();
    let mut wallets = Wallets::new();
    let alice = wallets.create_wallet().unwrap();
    let bob = wallets.create_wallet().unwrap();
    let miner = wallets.create_wallet().unwrap();

    // Fund alice with one reward, then transfer part of it to bob
    chain
        .mine_pending_block(&alice, &CancelToken::new())
        .unwrap();
    let reward = chain.get_config().mining_reward;
    assert_eq!(chain.get_balance(&alice), reward);

    let alice_wallet = wallets.get_wallet(&alice).unwrap();
    chain
        .add_transaction(Transaction::new_signed(alice_wallet, &bob, 2.5).unwrap())
        .unwrap();
    chain
        .add_transaction(Transaction::new_signed(alice_wallet, &bob, 1.0).unwrap())
        .unwrap();
    assert_eq!(chain.pending_count(), 2);

    let block = chain
        .mine_pending_block(&miner, &CancelToken::new())
        .unwrap();

    // Coinbase first, then both transfers, and the pool drains
    assert_eq!(block.get_transactions().len(), 3);
    assert_eq!(block.get_transactions()[0].get_sender(), COINBASE_SENDER);
    assert_eq!(chain.pending_count(), 0);

    assert_eq!(chain.get_balance(&alice), reward - 3.5);
    assert_eq!(chain.get_balance(&bob), 3.5);
    assert_eq!(chain.get_balance(&miner), reward);
    assert!(chain.validate_chain().is_ok());
}

#[test]
fn test_rejected_transactions_never_enter_the_pool() {
    let chain = fast_chain();
    let mut wallets = Wallets::new();
    let alice = wallets.create_wallet().unwrap();
    let bob = wallets.create_wallet().unwrap();
    let alice_wallet = wallets.get_wallet(&alice).unwrap();

    // Non-positive amount
    let tx = Transaction::new_signed(alice_wallet, &bob, -5.0).unwrap();
    assert!(matches!(
        chain.add_transaction(tx),
        Err(BlockchainError::InvalidAmount(a)) if a == -5.0
    ));

    let tx = Transaction::new_signed(alice_wallet, &bob, 0.0).unwrap();
    assert!(matches!(
        chain.add_transaction(tx),
        Err(BlockchainError::InvalidAmount(_))
    ));

    // Coinbase submitted from outside the miner
    let coinbase = Transaction::new_coinbase(&bob, 10.0).unwrap();
    assert!(chain.add_transaction(coinbase).is_err());

    assert_eq!(chain.pending_count(), 0);
}

#[test]
fn test_admission_gate_flags_suspicious_transfer() {
    // Tight threshold so the self-transfer rule (0.5) trips the gate
    let config = ChainConfig {
        anomaly_threshold: 0.4,
        ..fast_config()
    };
    let chain = Blockchain::with_default_scorer(config).unwrap();

    let mut wallets = Wallets::new();
    let alice = wallets.create_wallet().unwrap();
    let alice_wallet = wallets.get_wallet(&alice).unwrap();

    let self_transfer = Transaction::new_signed(alice_wallet, &alice, 50.0).unwrap();
    let result = chain.add_transaction(self_transfer);

    match result {
        Err(BlockchainError::FlaggedAsSuspicious { score, threshold }) => {
            assert!(score > threshold);
        }
        other => panic!("expected FlaggedAsSuspicious, got {other:?}"),
    }
    assert_eq!(chain.pending_count(), 0);
}

#[test]
fn test_cancelled_mining_leaves_pending_intact() {
    let chain = fast_chain();
    let mut wallets = Wallets::new();
    let alice = wallets.create_wallet().unwrap();
    let bob = wallets.create_wallet().unwrap();

    chain
        .mine_pending_block(&alice, &CancelToken::new())
        .unwrap();
    let alice_wallet = wallets.get_wallet(&alice).unwrap();
    chain
        .add_transaction(Transaction::new_signed(alice_wallet, &bob, 1.0).unwrap())
        .unwrap();

    let height = chain.get_best_height().unwrap();
    let cancel = CancelToken::new();
    cancel.cancel();

    let result = chain.mine_pending_block(&bob, &cancel);
    assert!(matches!(result, Err(BlockchainError::MiningCancelled)));

    // Nothing changed; the same transaction mines fine afterwards
    assert_eq!(chain.get_best_height().unwrap(), height);
    assert_eq!(chain.pending_count(), 1);
    chain
        .mine_pending_block(&bob, &CancelToken::new())
        .unwrap();
    assert_eq!(chain.pending_count(), 0);
    assert!(chain.validate_chain().is_ok());
}

#[test]
fn test_deadline_token_bounds_the_search() {
    let chain = fast_chain();
    let mut wallets = Wallets::new();
    let miner = wallets.create_wallet().unwrap();

    // An already-expired deadline cancels on the first check
    let cancel = CancelToken::with_deadline(Duration::from_millis(0));
    let result = chain.mine_pending_block(&miner, &cancel);
    assert!(matches!(result, Err(BlockchainError::MiningCancelled)));
}

#[test]
fn test_chain_info_summarizes_state() {
    let chain = fast_chain();
    let mut wallets = Wallets::new();
    let miner = wallets.create_wallet().unwrap();

    chain
        .mine_pending_block(&miner, &CancelToken::new())
        .unwrap();
    let info = chain.get_chain_info();

    assert_eq!(info.blocks, 2);
    assert_eq!(info.total_transactions, 1);
    assert_eq!(info.pending_transactions, 0);
    assert_eq!(info.difficulty, 1);
    assert_eq!(info.latest_hash, chain.get_tip_hash().unwrap());
    assert!(info.is_valid);

    // The summary serializes for the CLI
    let json = serde_json::to_string(&info).unwrap();
    assert!(json.contains("\"blocks\":2"));
}

#[test]
fn test_block_serialization_survives_validation() {
    let chain = fast_chain();
    let mut wallets = Wallets::new();
    let alice = wallets.create_wallet().unwrap();
    let bob = wallets.create_wallet().unwrap();

    chain
        .mine_pending_block(&alice, &CancelToken::new())
        .unwrap();
    let alice_wallet = wallets.get_wallet(&alice).unwrap();
    chain
        .add_transaction(Transaction::new_signed(alice_wallet, &bob, 2.0).unwrap())
        .unwrap();
    chain
        .mine_pending_block(&alice, &CancelToken::new())
        .unwrap();

    // Round-trip every block through bytes, then validate the restored
    // sequence as a whole
    let restored: Vec<_> = chain
        .get_chain_snapshot()
        .iter()
        .map(|b| quantumshield::Block::deserialize(&b.serialize().unwrap()).unwrap())
        .collect();
    assert!(Blockchain::validate_blocks(&restored).is_ok());
}

#[test]
fn test_transactions_admitted_mid_mining_wait_for_next_block() {
    let chain = fast_chain();
    let mut wallets = Wallets::new();
    let alice = wallets.create_wallet().unwrap();
    let bob = wallets.create_wallet().unwrap();

    chain
        .mine_pending_block(&alice, &CancelToken::new())
        .unwrap();
    let alice_wallet = wallets.get_wallet(&alice).unwrap().clone();

    // Submit from another thread while this one mines repeatedly; every
    // admitted transaction must end up committed exactly once
    let submitter = {
        let chain = chain.clone();
        let bob = bob.clone();
        std::thread::spawn(move || {
            for _ in 0..5 {
                let tx = Transaction::new_signed(&alice_wallet, &bob, 0.5).unwrap();
                chain.add_transaction(tx).unwrap();
                std::thread::sleep(Duration::from_millis(2));
            }
        })
    };

    for _ in 0..5 {
        chain
            .mine_pending_block(&alice, &CancelToken::new())
            .unwrap();
    }
    submitter.join().unwrap();
    // Sweep whatever is still pending into one final block
    chain
        .mine_pending_block(&alice, &CancelToken::new())
        .unwrap();

    assert_eq!(chain.pending_count(), 0);
    assert_eq!(chain.get_balance(&bob), 2.5);
    assert!(chain.validate_chain().is_ok());
}
