//! Claim strategy
//!
//! Scheduling wrappers (delay, retry, gas gate), the wallet work queue, the
//! orchestrator loop and the claim contract binding.

pub mod claimer;
pub mod delay;
pub mod gas_gate;
pub mod orchestrator;
pub mod queue;
pub mod retry;

pub use claimer::{AirdropClaimer, ClaimSettings, RpcClaimConnector};
pub use delay::DelayRange;
pub use gas_gate::{GasGate, GasPriceSource, RpcGasOracle};
pub use orchestrator::{AirdropClaim, ClaimConnector, ClaimOrchestrator, RunSummary};
pub use queue::ClaimQueue;
pub use retry::{RetryPolicy, Settled};
