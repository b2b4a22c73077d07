use std::fmt;

use num_bigint::BigInt;

use crate::codec;
use crate::config::HeuristicsConfig;

use super::types::{RuleHit, RuleKind, SnapshotWindow};

/// A scoring rule: fires when `metric(window) > threshold`, adding `weight`
/// to the score and one reason built by `describe`.
#[derive(Clone)]
pub struct Rule {
    pub kind: RuleKind,
    pub weight: u32,
    pub threshold: BigInt,
    metric: fn(&SnapshotWindow) -> BigInt,
    describe: fn(&BigInt, &SnapshotWindow) -> String,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("kind", &self.kind)
            .field("weight", &self.weight)
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}

impl Rule {
    pub fn new(
        kind: RuleKind,
        weight: u32,
        threshold: impl Into<BigInt>,
        metric: fn(&SnapshotWindow) -> BigInt,
        describe: fn(&BigInt, &SnapshotWindow) -> String,
    ) -> Self {
        Self {
            kind,
            weight,
            threshold: threshold.into(),
            metric,
            describe,
        }
    }

    pub fn check(&self, window: &SnapshotWindow) -> Option<RuleHit> {
        let value = (self.metric)(window);
        if value <= self.threshold {
            return None;
        }
        Some(RuleHit {
            kind: self.kind,
            weight: self.weight,
            reason: (self.describe)(&value, window),
        })
    }
}

/// The rule table, in evaluation order.
pub fn default_rules(config: &HeuristicsConfig) -> Vec<Rule> {
    vec![
        balance_drain(config.balance_drain_weight),
        activity_spike(config.activity_weight, config.activity_threshold),
        code_presence(config.code_presence_weight),
    ]
}

/// Net outflow of native balance across the window.
pub fn balance_drain(weight: u32) -> Rule {
    Rule::new(
        RuleKind::BalanceDrain,
        weight,
        0,
        SnapshotWindow::drained,
        |drained, window| {
            format!(
                "balance drop ~{} ETH/{} blocks",
                codec::wei_to_ether(drained.magnitude()),
                window.window_blocks
            )
        },
    )
}

/// Nonce growth above `threshold` across the window.
pub fn activity_spike(weight: u32, threshold: u64) -> Rule {
    Rule::new(
        RuleKind::ActivitySpike,
        weight,
        threshold,
        SnapshotWindow::nonce_delta,
        |delta, window| {
            format!(
                "high tx activity: +{} nonce/{} blocks",
                delta, window.window_blocks
            )
        },
    )
}

/// Deployed bytecode at the latest block (contract or smart wallet).
pub fn code_presence(weight: u32) -> Rule {
    Rule::new(
        RuleKind::CodePresence,
        weight,
        0,
        |window| BigInt::from(u8::from(window.has_code())),
        |_, _| "address has code (smart wallet or contract)".to_string(),
    )
}
