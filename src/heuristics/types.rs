use num_bigint::{BigInt, BigUint};

use crate::chain::ChainSnapshot;

/// Heuristics the engine knows how to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    BalanceDrain,
    ActivitySpike,
    CodePresence,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BalanceDrain => "balance_drain",
            Self::ActivitySpike => "activity_spike",
            Self::CodePresence => "code_presence",
        }
    }
}

/// The two snapshots a probe compares, `window_blocks` apart (or equal when
/// the chain is shorter than the window).
#[derive(Debug, Clone)]
pub struct SnapshotWindow {
    pub latest: ChainSnapshot,
    pub reference: ChainSnapshot,
    pub latest_block: u64,
    pub window_blocks: u64,
}

impl SnapshotWindow {
    /// Wei lost across the window. Negative when the balance grew.
    pub fn drained(&self) -> BigInt {
        BigInt::from(self.reference.balance.clone()) - BigInt::from(self.latest.balance.clone())
    }

    /// Transactions sent across the window.
    pub fn nonce_delta(&self) -> BigInt {
        BigInt::from(self.latest.nonce.clone()) - BigInt::from(self.reference.nonce.clone())
    }

    pub fn has_code(&self) -> bool {
        self.latest.has_code.unwrap_or(false)
    }
}

/// A rule that fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleHit {
    pub kind: RuleKind,
    pub weight: u32,
    pub reason: String,
}

/// Outcome of evaluating a wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub latest_block: u64,
    pub score: u32,
    pub reasons: Vec<String>,
    pub balance_latest: BigUint,
}
