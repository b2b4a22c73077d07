use num_bigint::BigUint;
use serde_json::{json, Value};

use crate::codec;
use crate::error::Result;

use super::transport::RpcTransport;
use super::types::{BlockTag, RpcMethod};

/// Typed access to the handful of chain reads the probe needs.
///
/// Every method issues exactly one request. Nothing is retried or cached.
pub struct ChainClient<T> {
    transport: T,
}

impl<T: RpcTransport> ChainClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Issue `method` and return its hex-string result.
    async fn call(&self, method: RpcMethod, params: Vec<Value>) -> Result<String> {
        tracing::debug!(method = method.as_str(), params = ?params, "RPC request");
        let raw = self.transport.request(method.as_str(), params).await?;
        method.result_str(&raw).map(str::to_owned)
    }

    pub async fn get_block_number(&self) -> Result<u64> {
        let hex = self.call(RpcMethod::BlockNumber, vec![]).await?;
        codec::decode_block_height(&hex)
    }

    /// Balance in wei.
    pub async fn get_balance(&self, address: &str, tag: BlockTag) -> Result<BigUint> {
        let hex = self
            .call(RpcMethod::GetBalance, account_params(address, tag))
            .await?;
        codec::decode_hex(&hex)
    }

    pub async fn get_transaction_count(&self, address: &str, tag: BlockTag) -> Result<BigUint> {
        let hex = self
            .call(RpcMethod::GetTransactionCount, account_params(address, tag))
            .await?;
        codec::decode_hex(&hex)
    }

    /// Deployed bytecode. Empty for externally-owned accounts.
    pub async fn get_code(&self, address: &str, tag: BlockTag) -> Result<Vec<u8>> {
        let hex = self
            .call(RpcMethod::GetCode, account_params(address, tag))
            .await?;
        codec::decode_bytes(&hex)
    }
}

fn account_params(address: &str, tag: BlockTag) -> Vec<Value> {
    vec![json!(address), json!(tag.to_param())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::transport::testing::ScriptedTransport;
    use crate::error::ProbeError;

    const ADDR: &str = "0x00000000000000000000000000000000000000aa";

    #[tokio::test(flavor = "current_thread")]
    async fn test_typed_calls() {
        let transport = ScriptedTransport::new()
            .respond("eth_blockNumber", vec![], Ok(json!("0x3e8")))
            .respond(
                "eth_getBalance",
                vec![json!(ADDR), json!("latest")],
                Ok(json!("0x14d1120d7b160000")),
            )
            .respond(
                "eth_getTransactionCount",
                vec![json!(ADDR), json!("0x384")],
                Ok(json!("0x5")),
            )
            .respond(
                "eth_getCode",
                vec![json!(ADDR), json!("0x3e8")],
                Ok(json!("0x6080604052")),
            );
        let client = ChainClient::new(transport);

        assert_eq!(client.get_block_number().await.unwrap(), 1000);
        assert_eq!(
            client.get_balance(ADDR, BlockTag::Latest).await.unwrap(),
            BigUint::from(1_500_000_000_000_000_000u64)
        );
        assert_eq!(
            client
                .get_transaction_count(ADDR, BlockTag::Number(900))
                .await
                .unwrap(),
            BigUint::from(5u32)
        );
        assert_eq!(
            client.get_code(ADDR, BlockTag::Number(1000)).await.unwrap(),
            vec![0x60, 0x80, 0x60, 0x40, 0x52]
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_empty_code_is_zero_length() {
        let transport = ScriptedTransport::new().respond(
            "eth_getCode",
            vec![json!(ADDR), json!("latest")],
            Ok(json!("0x")),
        );
        let client = ChainClient::new(transport);
        assert!(client.get_code(ADDR, BlockTag::Latest).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_errors_pass_through_unchanged() {
        let protocol = ProbeError::Protocol {
            code: -32602,
            message: "invalid argument".to_string(),
        };
        let transport = ScriptedTransport::new()
            .respond("eth_blockNumber", vec![], Err(ProbeError::Transport("refused".into())))
            .respond(
                "eth_getBalance",
                vec![json!(ADDR), json!("latest")],
                Err(protocol.clone()),
            )
            .respond(
                "eth_getTransactionCount",
                vec![json!(ADDR), json!("latest")],
                Ok(json!("0xnothex")),
            );
        let client = ChainClient::new(transport);

        assert!(matches!(
            client.get_block_number().await,
            Err(ProbeError::Transport(_))
        ));
        assert_eq!(
            client.get_balance(ADDR, BlockTag::Latest).await.unwrap_err(),
            protocol
        );
        assert!(matches!(
            client.get_transaction_count(ADDR, BlockTag::Latest).await,
            Err(ProbeError::Decode(_))
        ));
        assert_eq!(client.transport().calls().len(), 3);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_non_string_result_is_decode_error() {
        let transport = ScriptedTransport::new()
            .respond("eth_blockNumber", vec![], Ok(json!(1000)))
            .respond(
                "eth_getCode",
                vec![json!(ADDR), json!("latest")],
                Ok(Value::Null),
            );
        let client = ChainClient::new(transport);

        assert!(matches!(
            client.get_block_number().await,
            Err(ProbeError::Decode(_))
        ));
        assert!(matches!(
            client.get_code(ADDR, BlockTag::Latest).await,
            Err(ProbeError::Decode(_))
        ));
    }
}
