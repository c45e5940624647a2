use crate::error::{ClaimerError, Result};

pub const ZKSYNC_ERA_CHAIN_ID: u64 = 324;
pub const MAINNET_CHAIN_ID: u64 = 1;

/// Immutable description of an EVM chain the claimer talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub name: &'static str,
    pub chain_id: u64,
    pub coin_symbol: &'static str,
    pub rpc: String,
    pub explorer: Option<&'static str>,
}

impl Chain {
    /// Chain hosting the claim contract
    pub fn zksync_era(rpc: impl Into<String>) -> Self {
        Self {
            name: "ZkSync Era",
            chain_id: ZKSYNC_ERA_CHAIN_ID,
            coin_symbol: "ETH",
            rpc: rpc.into(),
            explorer: Some("https://explorer.zksync.io/"),
        }
    }

    /// Reference chain for gas gating
    pub fn mainnet(rpc: impl Into<String>) -> Self {
        Self {
            name: "Ethereum Mainnet",
            chain_id: MAINNET_CHAIN_ID,
            coin_symbol: "ETH",
            rpc: rpc.into(),
            explorer: None,
        }
    }

    /// RPC endpoint, or a fatal error when none is configured
    pub fn rpc_endpoint(&self) -> Result<&str> {
        let rpc = self.rpc.trim();
        if rpc.is_empty() {
            return Err(ClaimerError::MissingRpcEndpoint {
                chain: self.name.to_string(),
            });
        }
        Ok(rpc)
    }

    /// Explorer link for a transaction, falling back to the bare hash
    pub fn tx_link(&self, tx_hash: impl std::fmt::Display) -> String {
        match self.explorer {
            Some(base) => format!("{}tx/{}", base, tx_hash),
            None => tx_hash.to_string(),
        }
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.chain_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rpc_is_missing_endpoint() {
        let chain = Chain::mainnet("  ");
        let err = chain.rpc_endpoint().unwrap_err();
        assert!(matches!(err, ClaimerError::MissingRpcEndpoint { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn tx_link_uses_explorer_when_present() {
        let zk = Chain::zksync_era("https://mainnet.era.zksync.io");
        assert_eq!(zk.tx_link("0xabc"), "https://explorer.zksync.io/tx/0xabc");
        assert_eq!(Chain::mainnet("http://x").tx_link("0xabc"), "0xabc");
    }
}
