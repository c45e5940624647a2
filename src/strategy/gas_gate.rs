//! Gas-price gate
//!
//! Blocks a protected operation until the reference chain's gas price is at
//! or below a ceiling. The wait is deliberately unbounded: claiming is cost
//! sensitive, not time critical.

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

use super::delay::DelayRange;
use crate::adapters::EvmRpc;
use crate::error::{ClaimerError, Result};

pub const WEI_PER_GWEI: u128 = 1_000_000_000;
pub const DEFAULT_GAS_RECHECK_DELAY: DelayRange = DelayRange::fixed(10);

/// Anything that can report the current gas price in wei
#[async_trait]
pub trait GasPriceSource: Send + Sync {
    async fn gas_price(&self) -> Result<u128>;
}

/// Gas price read from a chain's RPC
pub struct RpcGasOracle<R> {
    rpc: R,
}

impl<R: EvmRpc> RpcGasOracle<R> {
    pub fn new(rpc: R) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl<R: EvmRpc> GasPriceSource for RpcGasOracle<R> {
    async fn gas_price(&self) -> Result<u128> {
        self.rpc.gas_price().await
    }
}

/// Convert a gwei amount to wei, truncating fractions of a wei
pub fn gwei_to_wei(gwei: Decimal) -> Result<u128> {
    gwei.checked_mul(Decimal::from(WEI_PER_GWEI as u64))
        .map(|wei| wei.trunc())
        .and_then(|wei| wei.to_u128())
        .ok_or_else(|| ClaimerError::Validation(format!("invalid gas threshold {} gwei", gwei)))
}

/// Render a wei amount as gwei with two decimals
pub fn format_gwei(wei: u128) -> String {
    match i128::try_from(wei)
        .ok()
        .and_then(|w| Decimal::try_from_i128_with_scale(w, 9).ok())
    {
        Some(gwei) => gwei.round_dp(2).normalize().to_string(),
        None => format!("{} wei", wei),
    }
}

pub struct GasGate {
    source: Arc<dyn GasPriceSource>,
    threshold_wei: u128,
    recheck: DelayRange,
}

impl GasGate {
    pub fn new(source: Arc<dyn GasPriceSource>, threshold_gwei: Decimal, recheck: DelayRange) -> Result<Self> {
        Ok(Self {
            source,
            threshold_wei: gwei_to_wei(threshold_gwei)?,
            recheck,
        })
    }

    pub fn threshold_wei(&self) -> u128 {
        self.threshold_wei
    }

    /// Block until the gas price does not exceed the threshold.
    ///
    /// A failed price read counts like a price above the threshold. Returns
    /// the accepted price.
    pub async fn wait_for_acceptable_gas(&self) -> u128 {
        loop {
            match self.source.gas_price().await {
                Ok(price) if price <= self.threshold_wei => {
                    debug!(
                        "Gas {} GWEI within threshold {} GWEI",
                        format_gwei(price),
                        format_gwei(self.threshold_wei)
                    );
                    return price;
                }
                Ok(price) => {
                    let delay = self.recheck.sample();
                    warn!(
                        "Current gas fee {} GWEI > Gas threshold {} GWEI. Waiting for {} seconds...",
                        format_gwei(price),
                        format_gwei(self.threshold_wei),
                        delay.as_secs()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    let delay = self.recheck.sample();
                    warn!(
                        "Failed to read gas price: {}. Waiting for {} seconds...",
                        e,
                        delay.as_secs()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Wait for acceptable gas, then run `op` exactly once
    pub async fn run<T, F, Fut>(&self, op: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        self.wait_for_acceptable_gas().await;
        op().await
    }
}
