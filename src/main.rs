use alloy::providers::Provider;
use tracing_subscriber::EnvFilter;

use wallet_probe::chain::{connect_http, ChainClient, HttpTransport};
use wallet_probe::config::{Config, ProbeConfig};
use wallet_probe::error::Result;
use wallet_probe::report::run_probe;

const USAGE: &str = "usage: RPC_URL=<rpc> ADDRESS=<0x..> wallet-probe [config.toml]";

/// Resolve configuration and build the transport. Nothing here touches the network.
fn prepare(
    config_path: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<(ProbeConfig, HttpTransport<impl Provider>)> {
    let config = Config::load(config_path, env)?.resolve()?;
    let transport = connect_http(&config.rpc_url)?;
    Ok((config, transport))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    // Logs go to stderr so stdout carries only the JSON report (set RUST_LOG=debug for per-call output)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration: optional TOML file, then RPC_URL / ADDRESS from the environment
    let config_path = std::env::args().nth(1);
    let (config, transport) = match prepare(config_path.as_deref(), |key| std::env::var(key).ok())
    {
        Ok(prepared) => prepared,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("{}", USAGE);
            std::process::exit(1);
        }
    };

    let client = ChainClient::new(transport);
    let result = run_probe(&client, &config)
        .await
        .map_err(|e| eyre::eyre!("Probe of {} failed: {}", config.address, e))?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
