//! Anomaly scoring for the transaction admission gate
//!
//! Two interchangeable scorers behind one trait: rule-based heuristics and
//! a statistical model over recent transaction history.

pub mod anomaly;

pub use anomaly::{RuleBasedScorer, StatisticalScorer, TransactionScorer};
