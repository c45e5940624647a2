//! Signed writes and reads for one wallet on one chain
//!
//! Every network step that can flake (parameter fetch, gas estimate, HTTP
//! GET) runs under the client's [`RetryPolicy`]. Broadcast is attempted once
//! per call; receipt polling is bounded by a timeout and never propagates
//! errors.

use alloy::primitives::{Address, Bytes, TxHash, U256};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::http::JsonFetcher;
use super::rpc::EvmRpc;
use crate::domain::{short_address, Chain, TxParams, TxStatus};
use crate::error::{ClaimerError, Result};
use crate::signing::Wallet;
use crate::strategy::retry::RetryPolicy;

pub const DEFAULT_VERIFY_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Receipt polling settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ReceiptPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_VERIFY_TIMEOUT,
            poll_interval: DEFAULT_RECEIPT_POLL_INTERVAL,
        }
    }
}

pub struct ChainClient<R, H> {
    chain: Chain,
    wallet: Wallet,
    rpc: R,
    http: H,
    retry: RetryPolicy,
    receipts: ReceiptPolicy,
}

impl<R: EvmRpc, H: JsonFetcher> ChainClient<R, H> {
    pub fn new(chain: Chain, wallet: Wallet, rpc: R, http: H) -> Self {
        Self {
            chain,
            wallet,
            rpc,
            http,
            retry: RetryPolicy::default(),
            receipts: ReceiptPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_receipt_policy(mut self, receipts: ReceiptPolicy) -> Self {
        self.receipts = receipts;
        self
    }

    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Fetch chain id, nonce and gas price and assemble unsigned parameters.
    ///
    /// Retried as a whole; any failed network read fails the attempt.
    pub async fn build_transaction(
        &self,
        to: Address,
        data: Option<Bytes>,
        from: Option<Address>,
        value: Option<U256>,
    ) -> Result<TxParams> {
        let from = from.unwrap_or_else(|| self.address());
        let data = data.unwrap_or_default();
        let value = value.unwrap_or(U256::ZERO);

        self.retry
            .run("Fetching transaction parameters", || {
                let data = data.clone();
                async move {
                    let chain_id = self.rpc.chain_id().await?;
                    let nonce = self.rpc.transaction_count(self.address()).await?;
                    let gas_price = self.rpc.gas_price().await?;
                    Ok(TxParams {
                        chain_id,
                        from,
                        nonce,
                        to,
                        data,
                        value,
                        gas_price,
                        gas_limit: None,
                    })
                }
            })
            .await
    }

    /// Simulate `params` and return the gas limit to use.
    ///
    /// A rejected estimate usually means the call would revert, so repeated
    /// rejections exhaust the retry budget rather than submitting anyway.
    pub async fn estimate_gas(&self, params: &TxParams) -> Result<u64> {
        self.retry
            .run("Transaction estimate", || async move {
                self.rpc.estimate_gas(params).await
            })
            .await
    }

    /// Build, estimate, sign locally and broadcast a transaction
    pub async fn send_transaction(
        &self,
        to: Address,
        data: Option<Bytes>,
        from: Option<Address>,
        value: Option<U256>,
    ) -> Result<TxHash> {
        let params = self.build_transaction(to, data, from, value).await?;
        let gas = self.estimate_gas(&params).await?;
        let params = params.with_gas_limit(gas);

        debug!(
            "Signing tx for {}: nonce={} gas={} gas_price={}",
            self, params.nonce, gas, params.gas_price
        );

        let raw = self.wallet.sign_transaction(params.to_request()).await?;

        match self.rpc.send_raw_transaction(&raw).await {
            Ok(tx_hash) => {
                info!("Transaction sent: {}", self.chain.tx_link(tx_hash));
                Ok(tx_hash)
            }
            Err(e) => {
                error!("Error while sending transaction for {}: {}", self, e);
                Err(match e {
                    ClaimerError::Broadcast(_) => e,
                    other => ClaimerError::Broadcast(other.to_string()),
                })
            }
        }
    }

    /// Poll for the receipt of `tx_hash` for at most `timeout`.
    ///
    /// Timeouts and polling errors come back as [`TxStatus::Unknown`].
    pub async fn wait_for_receipt(&self, tx_hash: TxHash, timeout: Duration) -> TxStatus {
        let poll = async {
            loop {
                match self.rpc.receipt_status(tx_hash).await {
                    Ok(Some(true)) => return TxStatus::Confirmed,
                    Ok(Some(false)) => return TxStatus::Reverted,
                    Ok(None) => {}
                    Err(e) => return TxStatus::Unknown(e.to_string()),
                }
                tokio::time::sleep(self.receipts.poll_interval).await;
            }
        };

        match tokio::time::timeout(timeout, poll).await {
            Ok(status) => status,
            Err(_) => TxStatus::Unknown(format!(
                "no receipt after {}s",
                timeout.as_secs()
            )),
        }
    }

    /// Wait for `tx_hash` and report whether it succeeded
    pub async fn verify_transaction(&self, tx_hash: TxHash, timeout: Duration) -> bool {
        self.verify_status(tx_hash, Some(timeout)).await.is_confirmed()
    }

    /// [`wait_for_receipt`](Self::wait_for_receipt) with outcome logging,
    /// using the configured timeout when `timeout` is `None`
    pub async fn verify_status(&self, tx_hash: TxHash, timeout: Option<Duration>) -> TxStatus {
        let timeout = timeout.unwrap_or(self.receipts.timeout);
        let status = self.wait_for_receipt(tx_hash, timeout).await;
        let link = self.chain.tx_link(tx_hash);
        match &status {
            TxStatus::Confirmed => info!("✅ Transaction was successful: {}", link),
            TxStatus::Reverted => error!("Transaction failed: {}", link),
            TxStatus::Unknown(reason) => {
                warn!("Could not verify transaction {}: {}", link, reason)
            }
        }
        status
    }

    /// Read-only contract call
    pub async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        self.rpc.call(to, data).await
    }

    /// GET `url` as JSON, through the wallet proxy when `use_proxy` is set.
    ///
    /// A `null` body counts as no answer and is retried like any failure.
    pub async fn send_get_request(&self, url: &str, use_proxy: bool) -> Result<serde_json::Value> {
        self.retry
            .run_settled(&format!("GET {}", url), || async move {
                self.http.get_json(url, use_proxy).await
            })
            .await
    }
}

impl<R, H> std::fmt::Display for ChainClient<R, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&short_address(&self.wallet.address()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::delay::DelayRange;
    use alloy::primitives::address;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const CONTRACT: Address = address!("95702a335e3349d197036Acb04BECA1b4997A91a");

    #[derive(Default)]
    struct FakeRpc {
        nonce_failures: AtomicU32,
        estimate_failures: AtomicU32,
        estimate_calls: AtomicU32,
        reject_broadcast: bool,
        receipts: Mutex<Vec<Result<Option<bool>>>>,
        broadcasts: Mutex<Vec<Vec<u8>>>,
    }

    #[async_trait]
    impl EvmRpc for FakeRpc {
        async fn chain_id(&self) -> Result<u64> {
            Ok(324)
        }

        async fn transaction_count(&self, _address: Address) -> Result<u64> {
            if self.nonce_failures.load(Ordering::SeqCst) > 0 {
                self.nonce_failures.fetch_sub(1, Ordering::SeqCst);
                return Err(ClaimerError::Rpc("nonce unavailable".into()));
            }
            Ok(5)
        }

        async fn gas_price(&self) -> Result<u128> {
            Ok(250_000_000)
        }

        async fn estimate_gas(&self, _params: &TxParams) -> Result<u64> {
            self.estimate_calls.fetch_add(1, Ordering::SeqCst);
            if self.estimate_failures.load(Ordering::SeqCst) > 0 {
                self.estimate_failures.fetch_sub(1, Ordering::SeqCst);
                return Err(ClaimerError::EstimateRejected("execution reverted".into()));
            }
            Ok(600_000)
        }

        async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash> {
            if self.reject_broadcast {
                return Err(ClaimerError::Broadcast("nonce too low".into()));
            }
            self.broadcasts.lock().unwrap().push(raw.to_vec());
            Ok(TxHash::repeat_byte(0x11))
        }

        async fn receipt_status(&self, _tx_hash: TxHash) -> Result<Option<bool>> {
            let mut receipts = self.receipts.lock().unwrap();
            if receipts.is_empty() {
                Ok(None)
            } else {
                receipts.remove(0)
            }
        }

        async fn call(&self, _to: Address, _data: Bytes) -> Result<Bytes> {
            Ok(Bytes::new())
        }
    }

    struct NoHttp;

    #[async_trait]
    impl JsonFetcher for NoHttp {
        async fn get_json(&self, url: &str, _use_proxy: bool) -> Result<serde_json::Value> {
            Err(ClaimerError::HttpStatus {
                status: 503,
                url: url.to_string(),
            })
        }
    }

    fn client(rpc: FakeRpc) -> ChainClient<FakeRpc, NoHttp> {
        ChainClient::new(
            Chain::zksync_era("http://localhost:3050"),
            Wallet::from_private_key(TEST_KEY).unwrap(),
            rpc,
            NoHttp,
        )
        .with_retry(RetryPolicy::new(10, DelayRange::new(5, 10)))
        .with_receipt_policy(ReceiptPolicy {
            timeout: Duration::from_secs(300),
            poll_interval: Duration::from_secs(2),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn build_transaction_fills_live_fields() {
        let client = client(FakeRpc::default());
        let params = client
            .build_transaction(CONTRACT, Some(Bytes::from_static(&[1, 2])), None, None)
            .await
            .unwrap();

        assert_eq!(params.chain_id, 324);
        assert_eq!(params.nonce, 5);
        assert_eq!(params.gas_price, 250_000_000);
        assert_eq!(params.from, client.address());
        assert_eq!(params.value, U256::ZERO);
        assert_eq!(params.gas_limit, None);
    }

    #[tokio::test(start_paused = true)]
    async fn build_transaction_retries_transient_failures() {
        let rpc = FakeRpc::default();
        rpc.nonce_failures.store(3, Ordering::SeqCst);
        let params = client(rpc)
            .build_transaction(CONTRACT, None, None, None)
            .await
            .unwrap();
        assert_eq!(params.nonce, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn build_estimate_sign_is_repeatable() {
        let client = client(FakeRpc::default());
        let data = Some(Bytes::from_static(&[0xaa, 0xbb]));

        let first = client.build_transaction(CONTRACT, data.clone(), None, None).await.unwrap();
        let second = client.build_transaction(CONTRACT, data, None, None).await.unwrap();
        assert_eq!(first, second);

        let gas = client.estimate_gas(&first).await.unwrap();
        let a = client.wallet.sign_transaction(first.with_gas_limit(gas).to_request()).await.unwrap();
        let b = client.wallet.sign_transaction(second.with_gas_limit(gas).to_request()).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_estimate_rejection_aborts_submission() {
        let rpc = FakeRpc::default();
        rpc.estimate_failures.store(u32::MAX, Ordering::SeqCst);
        let client = client(rpc);

        let err = client
            .send_transaction(CONTRACT, None, None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, ClaimerError::RetriesExhausted { attempts: 10, .. }));
        assert_eq!(client.rpc.estimate_calls.load(Ordering::SeqCst), 10);
        assert!(client.rpc.broadcasts.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn send_transaction_broadcasts_signed_payload() {
        let client = client(FakeRpc::default());
        let tx_hash = client
            .send_transaction(CONTRACT, Some(Bytes::from_static(&[9])), None, None)
            .await
            .unwrap();
        assert_eq!(tx_hash, TxHash::repeat_byte(0x11));
        assert_eq!(client.rpc.broadcasts.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn broadcast_rejection_is_reported() {
        let client = client(FakeRpc {
            reject_broadcast: true,
            ..FakeRpc::default()
        });
        let err = client
            .send_transaction(CONTRACT, None, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimerError::Broadcast(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn receipt_polling_until_mined() {
        let rpc = FakeRpc::default();
        *rpc.receipts.lock().unwrap() = vec![Ok(None), Ok(None), Ok(Some(true))];
        let client = client(rpc);

        let start = tokio::time::Instant::now();
        assert!(
            client
                .verify_transaction(TxHash::ZERO, Duration::from_secs(300))
                .await
        );
        assert_eq!(start.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn reverted_receipt_is_not_success() {
        let rpc = FakeRpc::default();
        *rpc.receipts.lock().unwrap() = vec![Ok(Some(false))];
        let client = client(rpc);
        assert_eq!(
            client.wait_for_receipt(TxHash::ZERO, Duration::from_secs(300)).await,
            TxStatus::Reverted
        );
    }

    #[tokio::test(start_paused = true)]
    async fn receipt_timeout_is_unknown_not_error() {
        let client = client(FakeRpc::default());
        let status = client.verify_status(TxHash::ZERO, Some(Duration::from_secs(30))).await;
        assert!(matches!(status, TxStatus::Unknown(_)));
        assert!(!client.verify_transaction(TxHash::ZERO, Duration::from_secs(30)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn receipt_rpc_error_is_unknown() {
        let rpc = FakeRpc::default();
        *rpc.receipts.lock().unwrap() = vec![Err(ClaimerError::Rpc("503".into()))];
        let status = client(rpc)
            .wait_for_receipt(TxHash::ZERO, Duration::from_secs(300))
            .await;
        assert!(matches!(status, TxStatus::Unknown(reason) if reason.contains("503")));
    }

    #[tokio::test(start_paused = true)]
    async fn get_request_gives_up_after_retry_budget() {
        let err = client(FakeRpc::default())
            .send_get_request("https://example.com/a.json", false)
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimerError::RetriesExhausted { attempts: 10, .. }));
    }
}
