//! JSON-RPC access to an EVM chain
//!
//! [`EvmRpc`] is the narrow surface the chain client needs. [`AlloyRpc`] is
//! the production implementation over an alloy `RootProvider`, optionally
//! tunnelled through the wallet's HTTP proxy.

use alloy::network::{ReceiptResponse, TransactionBuilder};
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, RootProvider};
use alloy::rpc::client::RpcClient;
use alloy::rpc::types::TransactionRequest;
use alloy::transports::http::{reqwest, Http};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::domain::{Chain, ProxyAddr, TxParams};
use crate::error::{ClaimerError, Result};

#[async_trait]
pub trait EvmRpc: Send + Sync {
    async fn chain_id(&self) -> Result<u64>;

    /// Transaction count (next nonce) for `address`
    async fn transaction_count(&self, address: Address) -> Result<u64>;

    /// Current legacy gas price in wei
    async fn gas_price(&self) -> Result<u128>;

    /// Simulate the transaction; provider rejection is an error
    async fn estimate_gas(&self, params: &TxParams) -> Result<u64>;

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash>;

    /// `Some(status)` once mined, `None` while pending
    async fn receipt_status(&self, tx_hash: TxHash) -> Result<Option<bool>>;

    /// Read-only `eth_call`
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes>;
}

/// Production RPC client
#[derive(Clone)]
pub struct AlloyRpc {
    provider: RootProvider,
    chain_name: &'static str,
}

impl AlloyRpc {
    /// Connect to `chain`, routing traffic through `proxy` when given.
    ///
    /// Fails fatally when the chain has no RPC endpoint or the endpoint is not
    /// a URL.
    pub fn connect(chain: &Chain, proxy: Option<&ProxyAddr>, timeout: Duration) -> Result<Self> {
        let endpoint = chain.rpc_endpoint()?;
        let url: url::Url = endpoint.parse().map_err(|e| {
            ClaimerError::Validation(format!("Invalid RPC URL for {}: {}", chain.name, e))
        })?;

        let mut builder = reqwest::Client::builder().timeout(timeout);
        if let Some(proxy) = proxy {
            let proxy = reqwest::Proxy::all(proxy.to_url())
                .map_err(|_| ClaimerError::InvalidProxy(proxy.to_string()))?;
            builder = builder.proxy(proxy);
        }
        let http_client = builder
            .build()
            .map_err(|e| ClaimerError::Validation(format!("RPC client: {}", e)))?;

        let transport = Http::with_client(http_client, url);
        let client = RpcClient::new(transport, false);

        debug!(
            "Connected RPC for {} (proxied: {})",
            chain.name,
            proxy.is_some()
        );

        Ok(Self {
            provider: RootProvider::new(client),
            chain_name: chain.name,
        })
    }

    pub fn chain_name(&self) -> &'static str {
        self.chain_name
    }
}

#[async_trait]
impl EvmRpc for AlloyRpc {
    async fn chain_id(&self) -> Result<u64> {
        self.provider.get_chain_id().await.map_err(ClaimerError::rpc)
    }

    async fn transaction_count(&self, address: Address) -> Result<u64> {
        self.provider
            .get_transaction_count(address)
            .await
            .map_err(ClaimerError::rpc)
    }

    async fn gas_price(&self) -> Result<u128> {
        self.provider.get_gas_price().await.map_err(ClaimerError::rpc)
    }

    async fn estimate_gas(&self, params: &TxParams) -> Result<u64> {
        self.provider
            .estimate_gas(params.to_request())
            .await
            .map_err(|e| ClaimerError::EstimateRejected(e.to_string()))
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash> {
        let pending = self
            .provider
            .send_raw_transaction(raw)
            .await
            .map_err(|e| ClaimerError::Broadcast(e.to_string()))?;
        Ok(*pending.tx_hash())
    }

    async fn receipt_status(&self, tx_hash: TxHash) -> Result<Option<bool>> {
        let receipt = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(ClaimerError::rpc)?;
        Ok(receipt.map(|r| r.status()))
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        let request = TransactionRequest::default().with_to(to).with_input(data);
        self.provider.call(request).await.map_err(ClaimerError::rpc)
    }
}
