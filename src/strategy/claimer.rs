//! Airdrop claim contract binding
//!
//! Talks to the merkle-distributor style claim contract on zkSync Era and to
//! the two static JSON services that publish each wallet's amount and proof.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::debug;

use super::orchestrator::{AirdropClaim, ClaimConnector};
use crate::adapters::{AlloyRpc, ChainClient, EvmRpc, HttpClient, JsonFetcher};
use crate::config::{AirdropConfig, AppConfig};
use crate::domain::{parse_amount, parse_proof, ClaimData, ClaimOutcome, TxStatus, WalletRecord};
use crate::error::{ClaimerError, Result};

sol! {
    #[allow(missing_docs)]
    interface IAirdropClaim {
        /// Claim `amount` base units for the caller
        function claim(bytes32[] calldata proof, uint256 amount) external;

        /// Whether `account` has already claimed
        function claimRecord(address account) external view returns (bool);
    }
}

/// Contract and service locations for one airdrop
#[derive(Debug, Clone)]
pub struct ClaimSettings {
    pub contract: Address,
    pub amount_url: String,
    pub proof_url: String,
    pub decimals: u32,
}

impl ClaimSettings {
    pub fn from_config(config: &AirdropConfig) -> Result<Self> {
        Ok(Self {
            contract: config.contract_address().map_err(ClaimerError::Validation)?,
            amount_url: config.amount_url.clone(),
            proof_url: config.proof_url.clone(),
            decimals: config.decimals,
        })
    }
}

/// Fill a `{}` URL template with the lowercased hex address
pub fn service_url(template: &str, address: Address) -> String {
    template.replace("{}", &address.to_string().to_lowercase())
}

pub fn encode_claim(proof: &[alloy::primitives::B256], amount: U256) -> Bytes {
    IAirdropClaim::claimCall {
        proof: proof.to_vec(),
        amount,
    }
    .abi_encode()
    .into()
}

pub fn encode_claim_record(account: Address) -> Bytes {
    IAirdropClaim::claimRecordCall { account }.abi_encode().into()
}

/// Decode a single ABI `bool` return word
pub fn decode_bool(output: &[u8]) -> Result<bool> {
    let word = output
        .get(..32)
        .ok_or_else(|| ClaimerError::rpc(format!("short bool return ({} bytes)", output.len())))?;
    Ok(!U256::from_be_slice(word).is_zero())
}

/// One wallet's claim handle
pub struct AirdropClaimer<R, H> {
    client: ChainClient<R, H>,
    settings: ClaimSettings,
}

impl<R: EvmRpc, H: JsonFetcher> AirdropClaimer<R, H> {
    pub fn new(client: ChainClient<R, H>, settings: ClaimSettings) -> Self {
        Self { client, settings }
    }

    pub fn client(&self) -> &ChainClient<R, H> {
        &self.client
    }

    async fn fetch_amount(&self) -> Result<Decimal> {
        let url = service_url(&self.settings.amount_url, self.client.address());
        let payload = self.client.send_get_request(&url, false).await?;
        if payload.as_array().is_some_and(|items| items.is_empty()) {
            return Ok(Decimal::ZERO);
        }
        parse_amount(&payload)
    }

    async fn fetch_proof(&self) -> Result<Vec<alloy::primitives::B256>> {
        let url = service_url(&self.settings.proof_url, self.client.address());
        let payload = self.client.send_get_request(&url, false).await?;
        parse_proof(&payload)
    }
}

#[async_trait]
impl<R: EvmRpc, H: JsonFetcher> AirdropClaim for AirdropClaimer<R, H> {
    async fn is_claimed(&self) -> Result<bool> {
        let output = self
            .client
            .call(self.settings.contract, encode_claim_record(self.client.address()))
            .await?;
        decode_bool(&output)
    }

    async fn claim_data(&self) -> Result<Option<ClaimData>> {
        let (amount, proof) = tokio::try_join!(self.fetch_amount(), self.fetch_proof())?;
        debug!(
            "{} | Claim data: amount={} proof_len={}",
            self.client,
            amount,
            proof.len()
        );
        Ok(ClaimData::new(amount, proof))
    }

    async fn submit_claim(&self, data: &ClaimData) -> ClaimOutcome {
        let amount = match data.scaled_amount(self.settings.decimals) {
            Ok(amount) => amount,
            Err(e) => return ClaimOutcome::Failed { reason: e.to_string() },
        };

        let calldata = encode_claim(&data.proof, amount);
        let tx_hash = match self
            .client
            .send_transaction(self.settings.contract, Some(calldata), None, None)
            .await
        {
            Ok(tx_hash) => tx_hash,
            Err(e) => return ClaimOutcome::Failed { reason: e.to_string() },
        };

        match self.client.verify_status(tx_hash, None).await {
            TxStatus::Confirmed => ClaimOutcome::Claimed { tx_hash },
            TxStatus::Reverted => ClaimOutcome::Failed {
                reason: format!("transaction {} reverted", tx_hash),
            },
            TxStatus::Unknown(reason) => ClaimOutcome::Unconfirmed { tx_hash, reason },
        }
    }
}

/// Connects each wallet to zkSync Era through its own proxy
pub struct RpcClaimConnector {
    config: Arc<AppConfig>,
    settings: ClaimSettings,
}

impl RpcClaimConnector {
    pub fn new(config: Arc<AppConfig>) -> Result<Self> {
        let settings = ClaimSettings::from_config(&config.airdrop)?;
        Ok(Self { config, settings })
    }
}

impl ClaimConnector for RpcClaimConnector {
    type Claim = AirdropClaimer<AlloyRpc, HttpClient>;

    fn connect(&self, wallet: &WalletRecord) -> Result<Self::Claim> {
        let chain = self.config.zksync();
        let timeout = self.config.retry.request_timeout();
        let rpc = AlloyRpc::connect(&chain, wallet.proxy(), timeout)?;
        let http = HttpClient::new(wallet.proxy(), timeout)?;

        let client = ChainClient::new(chain, wallet.signer()?, rpc, http)
            .with_retry(self.config.retry.policy())
            .with_receipt_policy(self.config.retry.receipt_policy());

        Ok(AirdropClaimer::new(client, self.settings.clone()))
    }
}
