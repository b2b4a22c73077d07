use crate::chain::{BlockTag, ChainClient, ChainSnapshot, RpcTransport};
use crate::config::ProbeConfig;
use crate::error::Result;

use super::rules::{self, Rule};
use super::types::{Assessment, RuleHit, SnapshotWindow};

/// Upper bound of the risk score.
pub const MAX_RISK_SCORE: u32 = 100;

/// Fetches a two-point snapshot of a wallet and scores it against the rule table.
pub struct HeuristicEngine {
    rules: Vec<Rule>,
    window_blocks: u64,
}

impl HeuristicEngine {
    pub fn new(rules: Vec<Rule>, window_blocks: u64) -> Self {
        Self {
            rules,
            window_blocks,
        }
    }

    pub fn from_config(config: &ProbeConfig) -> Self {
        Self::new(rules::default_rules(&config.heuristics), config.window_blocks)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The block `window_blocks` behind `latest`, or `latest` itself when the
    /// chain is not long enough. The latter collapses every delta to zero.
    pub fn reference_block(&self, latest: u64) -> u64 {
        if latest > self.window_blocks {
            latest - self.window_blocks
        } else {
            latest
        }
    }

    /// Read the wallet at the chain tip and at the reference block.
    ///
    /// Calls are issued one at a time in a fixed order; the first failure
    /// aborts the whole collection.
    pub async fn collect<T: RpcTransport>(
        &self,
        client: &ChainClient<T>,
        address: &str,
    ) -> Result<SnapshotWindow> {
        let latest_block = client.get_block_number().await?;
        let reference_block = self.reference_block(latest_block);
        let latest_tag = BlockTag::Number(latest_block);
        let reference_tag = BlockTag::Number(reference_block);

        tracing::debug!(
            address,
            latest = latest_block,
            reference = reference_block,
            "Collecting wallet snapshots"
        );

        let balance_latest = client.get_balance(address, latest_tag).await?;
        let balance_reference = client.get_balance(address, reference_tag).await?;
        let nonce_latest = client.get_transaction_count(address, latest_tag).await?;
        let nonce_reference = client.get_transaction_count(address, reference_tag).await?;
        let code = client.get_code(address, latest_tag).await?;

        Ok(SnapshotWindow {
            latest: ChainSnapshot {
                block: latest_tag,
                balance: balance_latest,
                nonce: nonce_latest,
                has_code: Some(!code.is_empty()),
            },
            reference: ChainSnapshot {
                block: reference_tag,
                balance: balance_reference,
                nonce: nonce_reference,
                has_code: None,
            },
            latest_block,
            window_blocks: self.window_blocks,
        })
    }

    /// Run every rule in table order and return the hits.
    pub fn evaluate(&self, window: &SnapshotWindow) -> Vec<RuleHit> {
        self.rules
            .iter()
            .filter_map(|rule| rule.check(window))
            .collect()
    }

    /// Collect and score a wallet.
    pub async fn assess<T: RpcTransport>(
        &self,
        client: &ChainClient<T>,
        address: &str,
    ) -> Result<Assessment> {
        let window = self.collect(client, address).await?;
        let hits = self.evaluate(&window);

        for hit in &hits {
            tracing::debug!(
                rule = hit.kind.as_str(),
                weight = hit.weight,
                reason = %hit.reason,
                "Rule triggered"
            );
        }

        let score = clamp_score(&hits);

        Ok(Assessment {
            latest_block: window.latest_block,
            score,
            reasons: hits.into_iter().map(|h| h.reason).collect(),
            balance_latest: window.latest.balance,
        })
    }
}

/// Sum of triggered weights, capped at [`MAX_RISK_SCORE`].
pub fn clamp_score(hits: &[RuleHit]) -> u32 {
    hits.iter()
        .fold(0u32, |acc, hit| acc.saturating_add(hit.weight))
        .min(MAX_RISK_SCORE)
}
