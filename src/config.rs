use alloy::primitives::Address;
use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::adapters::chain_client::{ReceiptPolicy, DEFAULT_RECEIPT_POLL_INTERVAL, DEFAULT_VERIFY_TIMEOUT};
use crate::adapters::http::DEFAULT_REQUEST_TIMEOUT;
use crate::domain::Chain;
use crate::strategy::delay::DelayRange;
use crate::strategy::gas_gate::DEFAULT_GAS_RECHECK_DELAY;
use crate::strategy::retry::{RetryPolicy, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY};

pub const DEFAULT_CLAIM_CONTRACT: &str = "0x95702a335e3349d197036Acb04BECA1b4997A91a";
pub const DEFAULT_AMOUNT_URL: &str = "https://www.zksyncpepe.com/resources/amounts/{}.json";
pub const DEFAULT_PROOF_URL: &str = "https://www.zksyncpepe.com/resources/proofs/{}.json";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub rpc: RpcConfig,
    pub gas: GasConfig,
    pub pacing: PacingConfig,
    pub retry: RetryConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
    pub paths: PathsConfig,
    pub airdrop: AirdropConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    /// zkSync Era endpoint used for every wallet transaction
    #[serde(default)]
    pub zksync: String,
    /// Ethereum mainnet endpoint, only read for the gas price
    #[serde(default)]
    pub mainnet: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GasConfig {
    /// Highest acceptable mainnet gas price
    pub threshold_gwei: Decimal,
    /// Wait between gas price checks, seconds
    pub recheck_delay: DelayRange,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PacingConfig {
    /// Wait between wallets, seconds
    pub tx_delay: DelayRange,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub delay: DelayRange,
    pub request_timeout_secs: u64,
    pub verify_timeout_secs: u64,
    pub receipt_poll_interval_ms: u64,
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.delay)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn receipt_policy(&self) -> ReceiptPolicy {
        ReceiptPolicy {
            timeout: Duration::from_secs(self.verify_timeout_secs),
            poll_interval: Duration::from_millis(self.receipt_poll_interval_ms),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProxyConfig {
    /// Reuse one (rotating) proxy list cyclically for every key
    #[serde(default)]
    pub mobile: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    pub private_keys: PathBuf,
    pub proxies: PathBuf,
    pub store: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirdropConfig {
    /// Claim contract on zkSync Era
    pub contract: String,
    /// Amount service, `{}` is replaced with the lowercased address
    pub amount_url: String,
    /// Proof service, `{}` is replaced with the lowercased address
    pub proof_url: String,
    pub decimals: u32,
    pub token_symbol: String,
}

impl AirdropConfig {
    pub fn contract_address(&self) -> Result<Address, String> {
        self.contract
            .trim()
            .parse()
            .map_err(|e| format!("airdrop.contract `{}` is not an address: {}", self.contract, e))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
    /// Directory for daily-rolling log files
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            .set_default("rpc.zksync", "")?
            .set_default("rpc.mainnet", "")?
            .set_default("gas.threshold_gwei", "70")?
            .set_default("gas.recheck_delay", vec![10, 10])?
            .set_default("pacing.tx_delay", vec![10, 15])?
            .set_default("retry.max_retries", 10)?
            .set_default("retry.delay", vec![5, 10])?
            .set_default("retry.request_timeout_secs", 100)?
            .set_default("retry.verify_timeout_secs", 300)?
            .set_default("retry.receipt_poll_interval_ms", 1000)?
            .set_default("proxy.mobile", false)?
            .set_default("paths.private_keys", "data/private_keys.txt")?
            .set_default("paths.proxies", "data/proxies.txt")?
            .set_default("paths.store", "data/database.json")?
            .set_default("airdrop.contract", DEFAULT_CLAIM_CONTRACT)?
            .set_default("airdrop.amount_url", DEFAULT_AMOUNT_URL)?
            .set_default("airdrop.proof_url", DEFAULT_PROOF_URL)?
            .set_default("airdrop.decimals", 18)?
            .set_default("airdrop.token_symbol", "ZKPEPE")?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Environment-specific overrides (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("CLAIMER_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // CLAIMER_GAS__THRESHOLD_GWEI, CLAIMER_RPC__ZKSYNC, ...
            .add_source(
                Environment::with_prefix("CLAIMER")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Built-in defaults with the given RPC endpoints
    pub fn default_config(zksync_rpc: &str, mainnet_rpc: &str) -> Self {
        use rust_decimal_macros::dec;

        Self {
            rpc: RpcConfig {
                zksync: zksync_rpc.to_string(),
                mainnet: mainnet_rpc.to_string(),
            },
            gas: GasConfig {
                threshold_gwei: dec!(70),
                recheck_delay: DEFAULT_GAS_RECHECK_DELAY,
            },
            pacing: PacingConfig {
                tx_delay: DelayRange::new(10, 15),
            },
            retry: RetryConfig {
                max_retries: DEFAULT_MAX_RETRIES,
                delay: DEFAULT_RETRY_DELAY,
                request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
                verify_timeout_secs: DEFAULT_VERIFY_TIMEOUT.as_secs(),
                receipt_poll_interval_ms: DEFAULT_RECEIPT_POLL_INTERVAL.as_millis() as u64,
            },
            proxy: ProxyConfig::default(),
            paths: PathsConfig {
                private_keys: PathBuf::from("data/private_keys.txt"),
                proxies: PathBuf::from("data/proxies.txt"),
                store: PathBuf::from("data/database.json"),
            },
            airdrop: AirdropConfig {
                contract: DEFAULT_CLAIM_CONTRACT.to_string(),
                amount_url: DEFAULT_AMOUNT_URL.to_string(),
                proof_url: DEFAULT_PROOF_URL.to_string(),
                decimals: 18,
                token_symbol: "ZKPEPE".to_string(),
            },
            logging: LoggingConfig::default(),
        }
    }

    pub fn zksync(&self) -> Chain {
        Chain::zksync_era(self.rpc.zksync.trim())
    }

    pub fn mainnet(&self) -> Chain {
        Chain::mainnet(self.rpc.mainnet.trim())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.rpc.zksync.trim().is_empty() {
            errors.push("rpc.zksync must be set".to_string());
        }
        if self.rpc.mainnet.trim().is_empty() {
            errors.push("rpc.mainnet must be set".to_string());
        }

        if self.gas.threshold_gwei <= Decimal::ZERO {
            errors.push("gas.threshold_gwei must be positive".to_string());
        }
        if self.gas.recheck_delay.max_secs == 0 {
            errors.push("gas.recheck_delay must be at least one second".to_string());
        }

        if self.retry.max_retries == 0 {
            errors.push("retry.max_retries must be at least 1".to_string());
        }
        if self.retry.request_timeout_secs == 0 || self.retry.verify_timeout_secs == 0 {
            errors.push("retry timeouts must be positive".to_string());
        }
        if self.retry.receipt_poll_interval_ms == 0 {
            errors.push("retry.receipt_poll_interval_ms must be positive".to_string());
        }

        if let Err(e) = self.airdrop.contract_address() {
            errors.push(e);
        }
        for (key, template) in [
            ("airdrop.amount_url", &self.airdrop.amount_url),
            ("airdrop.proof_url", &self.airdrop.proof_url),
        ] {
            if !template.contains("{}") {
                errors.push(format!("{key} must contain a `{{}}` address placeholder"));
            }
        }
        if self.airdrop.token_symbol.trim().is_empty() {
            errors.push("airdrop.token_symbol must be set".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
