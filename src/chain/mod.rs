pub mod client;
pub mod transport;
pub mod types;

pub use client::ChainClient;
pub use transport::{connect_http, HttpTransport, RpcTransport};
pub use types::{BlockTag, ChainSnapshot};
