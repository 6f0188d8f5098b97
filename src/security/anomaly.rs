// Admission-time anomaly scoring. The chain never depends on which scorer
// is active; both variants sit behind the same TransactionScorer trait and
// return a suspicion confidence in [0, 1].

use crate::core::Transaction;

/// Amounts above this contribute the high-value rule weight
pub const HIGH_AMOUNT_CUTOFF: f64 = 10_000.0;
/// Amounts below this are treated as dust/spam
pub const DUST_CUTOFF: f64 = 0.01;
/// Minimum history before the statistical scorer trusts its own model
pub const MIN_TRAINING_SAMPLES: usize = 10;

/// Score a candidate transaction against recent history.
///
/// Higher is more suspicious; the chain rejects when the score exceeds its
/// configured threshold.
pub trait TransactionScorer: Send + Sync {
    fn score(&self, tx: &Transaction, history: &[Transaction]) -> f64;
}

/// Heuristic scorer: a handful of additive rules, capped at 1.0.
#[derive(Clone, Copy, Debug, Default)]
pub struct RuleBasedScorer;

impl TransactionScorer for RuleBasedScorer {
    fn score(&self, tx: &Transaction, _history: &[Transaction]) -> f64 {
        let amount = tx.get_amount();
        let mut suspicion: f64 = 0.0;

        if amount > HIGH_AMOUNT_CUTOFF {
            suspicion += 0.4;
        }
        // Round-number amounts show up disproportionately in fraud
        if amount > 0.0 && (amount % 100.0).abs() < f64::EPSILON {
            suspicion += 0.1;
        }
        if amount > 0.0 && amount < DUST_CUTOFF {
            suspicion += 0.3;
        }
        if tx.get_sender() == tx.get_recipient() {
            suspicion += 0.5;
        }

        suspicion.min(1.0)
    }
}

/// Statistical scorer: the learned-model variant.
///
/// Scores the amount's z-score against the history's mean and standard
/// deviation through a sigmoid centered three deviations out. With too
/// little history it falls back to the rule-based scorer, the same way the
/// original detector did before its model was trained.
#[derive(Clone, Copy, Debug, Default)]
pub struct StatisticalScorer {
    fallback: RuleBasedScorer,
}

impl TransactionScorer for StatisticalScorer {
    fn score(&self, tx: &Transaction, history: &[Transaction]) -> f64 {
        if history.len() < MIN_TRAINING_SAMPLES {
            return self.fallback.score(tx, history);
        }

        let amounts: Vec<f64> = history.iter().map(|t| t.get_amount()).collect();
        let mean = amounts.iter().sum::<f64>() / amounts.len() as f64;
        let variance =
            amounts.iter().map(|a| (a - mean).powi(2)).sum::<f64>() / amounts.len() as f64;
        let std_dev = variance.sqrt().max(f64::EPSILON);

        let z = (tx.get_amount() - mean).abs() / std_dev;
        1.0 / (1.0 + (3.0 - z).exp())
    }
}
