use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProbeError>;

/// Everything that can abort a probe run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The endpoint could not be reached or the connection failed mid-request.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The node answered with a JSON-RPC error envelope.
    #[error("rpc error {code}: {message}")]
    Protocol { code: i64, message: String },
    /// The node answered, but the result was not the value we expected.
    #[error("decode error: {0}")]
    Decode(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ProbeError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}
