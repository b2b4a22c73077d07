use serde::Deserialize;

use crate::error::{ProbeError, Result};

/// Environment variable holding the JSON-RPC endpoint.
pub const RPC_URL_ENV: &str = "RPC_URL";
/// Environment variable holding the address to probe.
pub const ADDRESS_ENV: &str = "ADDRESS";

/// Probe configuration as read from an optional TOML file and the environment.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub rpc_url: Option<String>,
    pub address: Option<String>,
    #[serde(default = "default_window_blocks")]
    pub window_blocks: u64,
    #[serde(default)]
    pub heuristics: HeuristicsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: None,
            address: None,
            window_blocks: default_window_blocks(),
            heuristics: HeuristicsConfig::default(),
        }
    }
}

fn default_window_blocks() -> u64 {
    100
}

// ============================================================
// Heuristics Config
// ============================================================

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HeuristicsConfig {
    #[serde(default = "default_balance_drain_weight")]
    pub balance_drain_weight: u32,
    #[serde(default = "default_activity_weight")]
    pub activity_weight: u32,
    /// Nonce increase across the window that must be exceeded to flag activity.
    #[serde(default = "default_activity_threshold")]
    pub activity_threshold: u64,
    #[serde(default = "default_code_presence_weight")]
    pub code_presence_weight: u32,
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            balance_drain_weight: default_balance_drain_weight(),
            activity_weight: default_activity_weight(),
            activity_threshold: default_activity_threshold(),
            code_presence_weight: default_code_presence_weight(),
        }
    }
}

fn default_balance_drain_weight() -> u32 {
    35
}

fn default_activity_weight() -> u32 {
    25
}

fn default_activity_threshold() -> u64 {
    20
}

fn default_code_presence_weight() -> u32 {
    10
}

/// Fully resolved configuration: endpoint and address are known to be present.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub rpc_url: String,
    pub address: String,
    pub window_blocks: u64,
    pub heuristics: HeuristicsConfig,
}

impl Config {
    /// Read `path` if given, then overlay the environment through `env`.
    pub fn load(path: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    ProbeError::Config(format!("Failed to read config file '{}': {}", path, e))
                })?;
                Self::from_toml(&content).map_err(|e| match e {
                    ProbeError::Config(msg) => ProbeError::Config(format!("'{}': {}", path, msg)),
                    other => other,
                })?
            }
            None => Self::default(),
        };
        Ok(config.with_env(env))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ProbeError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Non-empty `RPC_URL` / `ADDRESS` values take precedence over the file.
    pub fn with_env(mut self, env: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = lookup(RPC_URL_ENV) {
            self.rpc_url = Some(url);
        }
        if let Some(address) = lookup(ADDRESS_ENV) {
            self.address = Some(address);
        }
        self
    }

    pub fn resolve(self) -> Result<ProbeConfig> {
        let rpc_url = self
            .rpc_url
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ProbeError::Config(format!("{} is not set", RPC_URL_ENV)))?;
        let address = self
            .address
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ProbeError::Config(format!("{} is not set", ADDRESS_ENV)))?;

        if !is_address(&address) {
            return Err(ProbeError::Config(format!(
                "Invalid address '{}': expected 0x followed by 40 hex characters",
                address
            )));
        }
        if self.window_blocks == 0 {
            return Err(ProbeError::Config(
                "window_blocks must be greater than zero".to_string(),
            ));
        }

        Ok(ProbeConfig {
            rpc_url,
            address,
            window_blocks: self.window_blocks,
            heuristics: self.heuristics,
        })
    }
}

fn is_address(s: &str) -> bool {
    s.len() == 42
        && s.starts_with("0x")
        && s[2..].bytes().all(|b| b.is_ascii_hexdigit())
}
