use thiserror::Error;

/// Main error type for the claimer
#[derive(Error, Debug)]
pub enum ClaimerError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("No RPC endpoint specified for {chain}. Specify one in the config file.")]
    MissingRpcEndpoint { chain: String },

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid proxy format `{0}`. The correct format is 'username:password@ip_address:port'.")]
    InvalidProxy(String),

    #[error("Amount of proxies is greater than amount of private keys. Proxies count: `{proxies}`. Private keys count: `{keys}`")]
    ProxyCountExceedsKeys { proxies: usize, keys: usize },

    #[error("Failed to read `{path}`: {source}")]
    InputFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // Network errors
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Received non-success response {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Wrong URL format: {0}")]
    InvalidUrl(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    // Transaction errors
    #[error("Transaction estimate failed: {0}")]
    EstimateRejected(String),

    #[error("Error while sending transaction: {0}")]
    Broadcast(String),

    #[error("Signing error: {0}")]
    Signing(String),

    // Data errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Empty response: {0}")]
    EmptyResponse(String),

    #[error("Invalid claim data: {0}")]
    InvalidClaimData(String),

    #[error("{operation} failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        operation: String,
        attempts: u32,
        last_error: String,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl ClaimerError {
    /// Startup/configuration faults that should terminate the process.
    ///
    /// Everything else is a runtime condition: the current attempt is
    /// abandoned and the wallet stays pending.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::MissingRpcEndpoint { .. }
                | Self::InvalidPrivateKey(_)
                | Self::InvalidProxy(_)
                | Self::ProxyCountExceedsKeys { .. }
                | Self::InputFile { .. }
                | Self::Validation(_)
        )
    }

    pub(crate) fn rpc(err: impl std::fmt::Display) -> Self {
        Self::Rpc(err.to_string())
    }
}

/// Result type alias for ClaimerError
pub type Result<T> = std::result::Result<T, ClaimerError>;
