pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod signing;
pub mod strategy;

pub use adapters::{AlloyRpc, ChainClient, EvmRpc, HttpClient, JsonFetcher};
pub use config::AppConfig;
pub use domain::{Chain, ClaimData, ClaimOutcome, ProxyAddr, TxStatus, WalletRecord};
pub use error::{ClaimerError, Result};
pub use persistence::WalletStore;
pub use signing::Wallet;
pub use strategy::{
    AirdropClaimer, ClaimOrchestrator, ClaimQueue, DelayRange, GasGate, RetryPolicy, RunSummary,
};
