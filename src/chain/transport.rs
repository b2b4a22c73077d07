use std::borrow::Cow;
use std::future::Future;

use alloy::providers::{Provider, ProviderBuilder};
use alloy::transports::{RpcError, TransportError};
use serde_json::Value;

use crate::error::{ProbeError, Result};

/// Issues a single JSON-RPC request and returns the raw `result` member.
///
/// Implementations classify failures into [`ProbeError::Transport`],
/// [`ProbeError::Protocol`] and [`ProbeError::Decode`]. They must not retry.
pub trait RpcTransport {
    fn request(
        &self,
        method: &'static str,
        params: Vec<Value>,
    ) -> impl Future<Output = Result<Value>> + Send;
}

/// JSON-RPC over HTTP, backed by an alloy provider.
pub struct HttpTransport<P> {
    provider: P,
}

impl<P: Provider> HttpTransport<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

/// Build an HTTP transport for `rpc_url`.
pub fn connect_http(rpc_url: &str) -> Result<HttpTransport<impl Provider>> {
    let url = rpc_url
        .parse()
        .map_err(|e| ProbeError::Config(format!("Invalid RPC URL '{}': {}", rpc_url, e)))?;
    Ok(HttpTransport::new(ProviderBuilder::new().connect_http(url)))
}

impl<P: Provider> RpcTransport for HttpTransport<P> {
    async fn request(&self, method: &'static str, params: Vec<Value>) -> Result<Value> {
        self.provider
            .raw_request::<_, Value>(Cow::Borrowed(method), params)
            .await
            .map_err(classify_error)
    }
}

/// Map an alloy transport error onto the probe's error taxonomy.
pub fn classify_error(err: TransportError) -> ProbeError {
    match err {
        RpcError::ErrorResp(payload) => ProbeError::Protocol {
            code: payload.code,
            message: payload.message.to_string(),
        },
        RpcError::NullResp => ProbeError::decode("null result"),
        RpcError::DeserError { err, .. } => ProbeError::decode(err.to_string()),
        other => ProbeError::Transport(other.to_string()),
    }
}
