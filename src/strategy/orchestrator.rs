//! Claim orchestrator
//!
//! Drains the wallet queue: flagged wallets leave without any network call,
//! every other wallet goes through the gas gate, the on-chain claim record,
//! the claim data services and finally the claim transaction. A wallet only
//! leaves the store once its claim is known to be on-chain.

use async_trait::async_trait;
use tracing::{error, info, warn};

use super::delay::DelayRange;
use super::gas_gate::GasGate;
use super::queue::ClaimQueue;
use crate::domain::{ClaimData, ClaimOutcome, WalletRecord};
use crate::error::Result;

/// Claim operations bound to one wallet
#[async_trait]
pub trait AirdropClaim: Send + Sync {
    /// Whether the contract already records a claim for this wallet
    async fn is_claimed(&self) -> Result<bool>;

    /// Amount and proof from the claim services, `None` when there is nothing to claim
    async fn claim_data(&self) -> Result<Option<ClaimData>>;

    /// Submit the claim transaction and wait for its receipt
    async fn submit_claim(&self, data: &ClaimData) -> ClaimOutcome;
}

/// Builds the per-wallet claim handle (signer, proxied transports)
pub trait ClaimConnector: Send + Sync {
    type Claim: AirdropClaim;

    fn connect(&self, wallet: &WalletRecord) -> Result<Self::Claim>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub claimed: usize,
    pub already_claimed: usize,
    pub skipped_flagged: usize,
    pub failed_attempts: usize,
    pub remaining: usize,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "claimed={} already_claimed={} skipped={} failed_attempts={} remaining={}",
            self.claimed, self.already_claimed, self.skipped_flagged, self.failed_attempts, self.remaining
        )
    }
}

pub struct ClaimOrchestrator<C> {
    connector: C,
    queue: ClaimQueue,
    gas_gate: GasGate,
    pacing: DelayRange,
    token_symbol: String,
}

impl<C: ClaimConnector> ClaimOrchestrator<C> {
    pub fn new(
        connector: C,
        queue: ClaimQueue,
        gas_gate: GasGate,
        pacing: DelayRange,
        token_symbol: impl Into<String>,
    ) -> Self {
        Self {
            connector,
            queue,
            gas_gate,
            pacing,
            token_symbol: token_symbol.into(),
        }
    }

    pub fn queue(&self) -> &ClaimQueue {
        &self.queue
    }

    /// Process wallets until the store is empty
    pub async fn run(&mut self) -> Result<RunSummary> {
        self.run_bounded(None).await
    }

    /// Like [`run`](Self::run) but stops after `max_attempts` wallet picks
    pub async fn run_bounded(&mut self, max_attempts: Option<usize>) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let mut picks = 0usize;

        info!(
            "Claiming ${} for {} wallet(s)",
            self.token_symbol,
            self.queue.pending_len()
        );

        while max_attempts.map_or(true, |max| picks < max) {
            let Some(wallet) = self.queue.next() else {
                break;
            };
            picks += 1;

            if wallet.tokens_claimed() {
                info!("{} already claimed ${}, removing", wallet, self.token_symbol);
                self.complete(&wallet).await?;
                summary.skipped_flagged += 1;
                continue;
            }

            let outcome = self.gas_gate.run(|| self.claim_wallet(&wallet)).await?;
            self.record(&wallet, &outcome, &mut summary).await?;

            if self.queue.is_drained() {
                break;
            }
            self.pacing.sleep_logged().await;
        }

        summary.remaining = self.queue.pending_len();
        if self.queue.is_drained() {
            info!("✅ Claimed ${} on all wallets", self.token_symbol);
        } else {
            warn!("Stopped with {} wallet(s) still pending", summary.remaining);
        }
        info!("Run summary: {}", summary);
        Ok(summary)
    }

    async fn claim_wallet(&self, wallet: &WalletRecord) -> Result<ClaimOutcome> {
        let claim = match self.connector.connect(wallet) {
            Ok(claim) => claim,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                return Ok(ClaimOutcome::Failed {
                    reason: format!("connect: {}", e),
                })
            }
        };

        match claim.is_claimed().await {
            Ok(true) => return Ok(ClaimOutcome::AlreadyClaimed),
            Ok(false) => {}
            Err(e) => warn!("{} | Could not read claim record: {}", wallet, e),
        }

        let data = match claim.claim_data().await {
            Ok(Some(data)) => data,
            Ok(None) => return Ok(ClaimOutcome::NoAllocation),
            Err(e) => {
                return Ok(ClaimOutcome::Failed {
                    reason: format!("claim data: {}", e),
                })
            }
        };

        info!(
            "{} | Claiming {} ${} ({} proof nodes)",
            wallet,
            data.amount,
            self.token_symbol,
            data.proof.len()
        );
        Ok(claim.submit_claim(&data).await)
    }

    async fn record(
        &mut self,
        wallet: &WalletRecord,
        outcome: &ClaimOutcome,
        summary: &mut RunSummary,
    ) -> Result<()> {
        match outcome {
            ClaimOutcome::Claimed { tx_hash } => {
                info!("✅ {} | Claimed ${} in {}", wallet, self.token_symbol, tx_hash);
                summary.claimed += 1;
            }
            ClaimOutcome::AlreadyClaimed => {
                info!("{} | ${} already claimed on-chain", wallet, self.token_symbol);
                summary.already_claimed += 1;
            }
            ClaimOutcome::NoAllocation => {
                warn!("{} | No claimable ${}", wallet, self.token_symbol);
                summary.failed_attempts += 1;
            }
            ClaimOutcome::Failed { reason } => {
                error!("{} | Claim failed: {}", wallet, reason);
                summary.failed_attempts += 1;
            }
            ClaimOutcome::Unconfirmed { tx_hash, reason } => {
                warn!("{} | Claim {} unconfirmed: {}", wallet, tx_hash, reason);
                summary.failed_attempts += 1;
            }
        }

        if outcome.is_resolved() {
            self.complete(wallet).await
        } else {
            self.queue.defer(wallet.address());
            Ok(())
        }
    }

    /// Drop a resolved wallet. A failed save only costs the on-disk record;
    /// the next run's claim record check resolves the wallet again.
    async fn complete(&mut self, wallet: &WalletRecord) -> Result<()> {
        match self.queue.complete(wallet.address()).await {
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                error!("{} | Failed to persist the wallet store: {}", wallet, e);
                Ok(())
            }
            Ok(()) => Ok(()),
        }
    }
}
