use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;

/// Parameters of one legacy (gas price) transaction.
///
/// Built fresh for every submission attempt. `nonce` and `gas_price` are
/// read live right before signing; `gas_limit` stays `None` until an
/// estimate succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxParams {
    pub chain_id: u64,
    pub from: Address,
    pub nonce: u64,
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
    pub gas_price: u128,
    pub gas_limit: Option<u64>,
}

impl TxParams {
    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    pub fn to_request(&self) -> TransactionRequest {
        let request = TransactionRequest::default()
            .with_chain_id(self.chain_id)
            .with_from(self.from)
            .with_nonce(self.nonce)
            .with_to(self.to)
            .with_input(self.data.clone())
            .with_value(self.value)
            .with_gas_price(self.gas_price);

        match self.gas_limit {
            Some(gas_limit) => request.with_gas_limit(gas_limit),
            None => request,
        }
    }
}

/// Final state of a submitted transaction as seen by receipt polling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxStatus {
    Confirmed,
    Reverted,
    /// No receipt within the timeout, or polling itself failed
    Unknown(String),
}

impl TxStatus {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    fn params() -> TxParams {
        TxParams {
            chain_id: 324,
            from: address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
            nonce: 7,
            to: address!("95702a335e3349d197036Acb04BECA1b4997A91a"),
            data: Bytes::from_static(&[0xde, 0xad]),
            value: U256::ZERO,
            gas_price: 250_000_000,
            gas_limit: None,
        }
    }

    #[test]
    fn request_carries_every_field() {
        let request = params().with_gas_limit(21_000).to_request();
        assert_eq!(request.chain_id, Some(324));
        assert_eq!(request.nonce, Some(7));
        assert_eq!(request.gas_price, Some(250_000_000));
        assert_eq!(request.gas, Some(21_000));
        assert_eq!(
            request.from,
            Some(address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"))
        );
    }

    #[test]
    fn gas_limit_absent_until_estimated() {
        assert_eq!(params().to_request().gas, None);
    }
}
