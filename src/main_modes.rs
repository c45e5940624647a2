use airdrop_claimer::adapters::AlloyRpc;
use airdrop_claimer::config::AppConfig;
use airdrop_claimer::error::{ClaimerError, Result};
use airdrop_claimer::persistence::WalletStore;
use airdrop_claimer::strategy::{
    ClaimOrchestrator, ClaimQueue, GasGate, RpcClaimConnector, RpcGasOracle,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Menu option 1: rebuild the store from the key and proxy files
pub async fn run_store_init(config: &AppConfig) -> Result<()> {
    info!(
        "Creating database from {} and {}",
        config.paths.private_keys.display(),
        config.paths.proxies.display()
    );

    let store = WalletStore::create(
        &config.paths.store,
        &config.paths.private_keys,
        &config.paths.proxies,
        config.proxy.mobile,
    )
    .await?;

    if store.is_empty() {
        warn!("No private keys found, the database is empty");
    }
    Ok(())
}

/// Menu option 2: claim on every wallet left in the store
pub async fn run_claimer(config: AppConfig) -> Result<()> {
    if let Err(errors) = config.validate() {
        return Err(ClaimerError::Validation(errors.join("; ")));
    }

    let config = Arc::new(config);
    let store = WalletStore::load(&config.paths.store).await?;
    info!("Loaded {} wallet(s) from {}", store.len(), config.paths.store.display());

    let mainnet = AlloyRpc::connect(&config.mainnet(), None, config.retry.request_timeout())?;
    let gas_gate = GasGate::new(
        Arc::new(RpcGasOracle::new(mainnet)),
        config.gas.threshold_gwei,
        config.gas.recheck_delay,
    )?;

    let connector = RpcClaimConnector::new(Arc::clone(&config))?;
    let mut orchestrator = ClaimOrchestrator::new(
        connector,
        ClaimQueue::new(store),
        gas_gate,
        config.pacing.tx_delay,
        config.airdrop.token_symbol.clone(),
    );

    let summary = orchestrator.run().await?;
    info!(
        "Done: {} claimed, {} already claimed, {} skipped",
        summary.claimed, summary.already_claimed, summary.skipped_flagged
    );
    Ok(())
}
