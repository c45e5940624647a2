pub mod chain_client;
pub mod http;
pub mod rpc;

pub use chain_client::{ChainClient, ReceiptPolicy, DEFAULT_RECEIPT_POLL_INTERVAL, DEFAULT_VERIFY_TIMEOUT};
pub use http::{HttpClient, JsonFetcher, DEFAULT_REQUEST_TIMEOUT};
pub use rpc::{AlloyRpc, EvmRpc};
