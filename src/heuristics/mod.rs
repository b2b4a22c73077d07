pub mod engine;
pub mod rules;
pub mod types;

pub use engine::{HeuristicEngine, MAX_RISK_SCORE};
pub use types::{Assessment, RuleHit, RuleKind, SnapshotWindow};
