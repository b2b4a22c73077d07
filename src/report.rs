use num_bigint::BigUint;
use serde::Serialize;

use crate::chain::{ChainClient, RpcTransport};
use crate::codec;
use crate::config::ProbeConfig;
use crate::error::Result;
use crate::heuristics::{Assessment, HeuristicEngine};

/// The document emitted for one probe run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub address: String,
    /// Hex block height the probe was anchored at.
    pub latest_block: String,
    pub risk_score: u32,
    pub reasons: Vec<String>,
    /// Latest balance in ether, six fractional digits.
    pub balance_eth: String,
}

pub fn assemble(address: &str, assessment: Assessment) -> ProbeResult {
    ProbeResult {
        address: address.to_string(),
        latest_block: codec::encode_hex(&BigUint::from(assessment.latest_block)),
        risk_score: assessment.score,
        reasons: assessment.reasons,
        balance_eth: codec::wei_to_ether(&assessment.balance_latest),
    }
}

/// Probe `config.address` through `client` and build the report.
pub async fn run_probe<T: RpcTransport>(
    client: &ChainClient<T>,
    config: &ProbeConfig,
) -> Result<ProbeResult> {
    let engine = HeuristicEngine::from_config(config);
    tracing::info!(
        address = %config.address,
        window_blocks = config.window_blocks,
        rules = engine.rules().len(),
        "Probing wallet"
    );

    let assessment = engine.assess(client, &config.address).await?;
    let result = assemble(&config.address, assessment);

    tracing::info!(
        address = %result.address,
        block = %result.latest_block,
        score = result.risk_score,
        reasons = result.reasons.len(),
        "Probe complete"
    );
    Ok(result)
}
