use std::fmt;

use num_bigint::BigUint;
use serde_json::Value;

use crate::error::{ProbeError, Result};

/// A point in chain history to read state at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    Latest,
    Number(u64),
}

impl BlockTag {
    /// The JSON-RPC parameter form: `"latest"` or a hex quantity.
    pub fn to_param(&self) -> String {
        match self {
            Self::Latest => "latest".to_string(),
            Self::Number(n) => format!("0x{:x}", n),
        }
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_param())
    }
}

/// State of one address at one block. Built once per block point, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSnapshot {
    pub block: BlockTag,
    pub balance: BigUint,
    pub nonce: BigUint,
    /// `None` when code was not queried at this block.
    pub has_code: Option<bool>,
}

/// The JSON-RPC methods the probe issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcMethod {
    BlockNumber,
    GetBalance,
    GetTransactionCount,
    GetCode,
}

impl RpcMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BlockNumber => "eth_blockNumber",
            Self::GetBalance => "eth_getBalance",
            Self::GetTransactionCount => "eth_getTransactionCount",
            Self::GetCode => "eth_getCode",
        }
    }

    /// Every result the probe reads is a `0x`-prefixed hex string.
    pub fn result_str<'a>(&self, raw: &'a Value) -> Result<&'a str> {
        raw.as_str().ok_or_else(|| {
            ProbeError::decode(format!("{} returned non-string result: {}", self.as_str(), raw))
        })
    }
}
