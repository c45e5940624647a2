use alloy::eips::eip2718::Encodable2718;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Bytes};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use zeroize::Zeroizing;

use crate::error::{ClaimerError, Result};

/// Local signer for one claim wallet
///
/// # Security
/// Only the parsed signing key is kept. The decoded key bytes handed to the
/// signer live in a buffer that is zeroized on drop, and the key never
/// appears in logs or error messages.
#[derive(Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex private key, with or without `0x`
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        let invalid = || {
            ClaimerError::InvalidPrivateKey("private key is not a valid 32-byte hex string".to_string())
        };

        let key_bytes = Zeroizing::new(
            hex::decode(private_key.trim().trim_start_matches("0x")).map_err(|_| invalid())?,
        );
        if key_bytes.len() != 32 {
            return Err(invalid());
        }

        let signer = PrivateKeySigner::from_slice(&key_bytes)
            .map_err(|e| ClaimerError::InvalidPrivateKey(e.to_string()))?;

        Ok(Self { signer })
    }

    /// Checksum-capable address derived from the key
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Sign a fully populated request and return the EIP-2718 encoded bytes
    /// ready for `eth_sendRawTransaction`.
    pub async fn sign_transaction(&self, request: TransactionRequest) -> Result<Bytes> {
        let wallet = EthereumWallet::from(self.signer.clone());
        let envelope = request
            .build(&wallet)
            .await
            .map_err(|e| ClaimerError::Signing(e.to_string()))?;
        Ok(Bytes::from(envelope.encoded_2718()))
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address())
            .finish()
    }
}
