//! Claim work queue
//!
//! Pending wallets live in the [`WalletStore`]; completed ones are removed
//! from it (and persisted) as soon as they resolve. Selection is uniformly
//! random across whatever is still pending.

use alloy::primitives::Address;
use std::collections::HashMap;
use tracing::debug;

use crate::domain::WalletRecord;
use crate::error::Result;
use crate::persistence::WalletStore;

pub struct ClaimQueue {
    store: WalletStore,
    completed: Vec<Address>,
    attempts: HashMap<Address, u32>,
}

impl ClaimQueue {
    pub fn new(store: WalletStore) -> Self {
        Self {
            store,
            completed: Vec::new(),
            attempts: HashMap::new(),
        }
    }

    /// Pick a random pending wallet and count the attempt
    pub fn next(&mut self) -> Option<WalletRecord> {
        let wallet = self.store.random_wallet()?.clone();
        *self.attempts.entry(wallet.address()).or_default() += 1;
        Some(wallet)
    }

    /// Move `address` from pending to completed and persist the store.
    ///
    /// The wallet leaves the in-memory queue even when the save fails.
    pub async fn complete(&mut self, address: Address) -> Result<()> {
        if self.store.get(address).is_none() {
            return Ok(());
        }
        self.completed.push(address);
        self.store.remove(address).await?;
        Ok(())
    }

    /// Leave `address` pending for a later pick
    pub fn defer(&mut self, address: Address) {
        debug!(
            "Wallet {} stays pending after {} attempt(s)",
            address,
            self.attempts(address)
        );
    }

    pub fn pending_len(&self) -> usize {
        self.store.len()
    }

    pub fn is_drained(&self) -> bool {
        self.store.is_empty()
    }

    pub fn completed(&self) -> &[Address] {
        &self.completed
    }

    pub fn attempts(&self, address: Address) -> u32 {
        self.attempts.get(&address).copied().unwrap_or(0)
    }

    pub fn store(&self) -> &WalletStore {
        &self.store
    }
}
