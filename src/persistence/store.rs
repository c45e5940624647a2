//! JSON file holding the wallets still to be processed
//!
//! The file is a flat array of [`StoredWallet`]. Addresses are re-derived
//! from keys on load and the collection never holds two records with the
//! same address. Every mutation is followed by a full rewrite through a
//! temporary file and a rename.

use alloy::primitives::Address;
use rand::Rng;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::input::{pair_keys_with_proxies, read_lines};
use crate::domain::{StoredWallet, WalletRecord};
use crate::error::{ClaimerError, Result};

pub struct WalletStore {
    path: PathBuf,
    wallets: Vec<WalletRecord>,
}

impl WalletStore {
    /// Wrap already-built records, dropping duplicate addresses
    pub fn new(path: impl Into<PathBuf>, wallets: Vec<WalletRecord>) -> Self {
        Self {
            path: path.into(),
            wallets: dedup_by_address(wallets),
        }
    }

    /// Build records from key/proxy lists without touching the disk
    pub fn from_inputs(
        path: impl Into<PathBuf>,
        private_keys: Vec<String>,
        proxies: Vec<String>,
        mobile_proxy: bool,
    ) -> Result<Self> {
        let wallets = pair_keys_with_proxies(private_keys, proxies, mobile_proxy)?
            .into_iter()
            .map(|(key, proxy)| WalletRecord::new(&key, proxy.as_deref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(path, wallets))
    }

    /// Rebuild the store from the key and proxy text files and persist it
    pub async fn create(
        path: impl Into<PathBuf>,
        private_keys_file: impl AsRef<Path>,
        proxies_file: impl AsRef<Path>,
        mobile_proxy: bool,
    ) -> Result<Self> {
        let private_keys = read_lines(private_keys_file).await?;
        let proxies = read_lines(proxies_file).await?;
        let store = Self::from_inputs(path, private_keys, proxies, mobile_proxy)?;
        store.save().await?;
        info!("✅ Database created with {} wallets", store.len());
        Ok(store)
    }

    /// Load the store file, re-deriving every address
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ClaimerError::InputFile {
                path: path.display().to_string(),
                source,
            })?;

        let stored: Vec<StoredWallet> = serde_json::from_str(&contents)?;
        let wallets = stored
            .into_iter()
            .map(WalletRecord::from_stored)
            .collect::<Result<Vec<_>>>()?;

        debug!("Loaded {} wallets from {}", wallets.len(), path.display());
        Ok(Self::new(path, wallets))
    }

    /// Overwrite the store file with the current records
    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let stored: Vec<StoredWallet> = self.wallets.iter().map(WalletRecord::to_stored).collect();
        let body = serde_json::to_string_pretty(&stored)?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    pub fn wallets(&self) -> &[WalletRecord] {
        &self.wallets
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    pub fn get(&self, address: Address) -> Option<&WalletRecord> {
        self.wallets.iter().find(|w| w.address() == address)
    }

    /// Uniformly random remaining wallet
    pub fn random_wallet(&self) -> Option<&WalletRecord> {
        if self.wallets.is_empty() {
            return None;
        }
        let index = rand::thread_rng().gen_range(0..self.wallets.len());
        self.wallets.get(index)
    }

    /// Flag `address` as claimed, drop it and persist the store
    pub async fn remove(&mut self, address: Address) -> Result<Option<WalletRecord>> {
        let Some(index) = self.wallets.iter().position(|w| w.address() == address) else {
            return Ok(None);
        };
        let mut removed = self.wallets.remove(index);
        removed.mark_claimed();
        self.save().await?;
        Ok(Some(removed))
    }
}

fn dedup_by_address(wallets: Vec<WalletRecord>) -> Vec<WalletRecord> {
    let mut seen = HashSet::new();
    wallets
        .into_iter()
        .filter(|w| {
            let fresh = seen.insert(w.address());
            if !fresh {
                warn!("Dropping duplicate wallet {}", w);
            }
            fresh
        })
        .collect()
}
