use alloy::primitives::{TxHash, B256, U256};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{ClaimerError, Result};

/// What the off-chain service says a wallet may claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimData {
    /// Claimable amount in whole token units
    pub amount: Decimal,
    /// Merkle proof, leaf to root
    pub proof: Vec<B256>,
}

impl ClaimData {
    /// `None` unless both a positive amount and a non-empty proof are present
    pub fn new(amount: Decimal, proof: Vec<B256>) -> Option<Self> {
        if amount.is_zero() || proof.is_empty() {
            return None;
        }
        Some(Self { amount, proof })
    }

    /// Amount in base units (`amount * 10^decimals`, truncated)
    pub fn scaled_amount(&self, decimals: u32) -> Result<U256> {
        scale_amount(self.amount, decimals)
    }
}

/// Scale a decimal token amount to integer base units, truncating any
/// precision beyond `decimals`.
pub fn scale_amount(amount: Decimal, decimals: u32) -> Result<U256> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ClaimerError::InvalidClaimData(format!(
            "negative amount {}",
            amount
        )));
    }

    let mantissa = U256::from(amount.mantissa().unsigned_abs());
    let scale = amount.scale();
    let ten = U256::from(10u8);

    let scaled = if decimals >= scale {
        mantissa * ten.pow(U256::from(decimals - scale))
    } else {
        mantissa / ten.pow(U256::from(scale - decimals))
    };
    Ok(scaled)
}

/// Parse the amount service payload: a single-element array holding a
/// number (or numeric string).
pub fn parse_amount(payload: &serde_json::Value) -> Result<Decimal> {
    let first = match payload {
        serde_json::Value::Array(items) => items.first(),
        other => Some(other),
    }
    .ok_or_else(|| ClaimerError::InvalidClaimData("empty amount response".into()))?;

    let raw = match first {
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.trim().to_string(),
        serde_json::Value::Null => return Ok(Decimal::ZERO),
        other => {
            return Err(ClaimerError::InvalidClaimData(format!(
                "unexpected amount value {}",
                other
            )))
        }
    };

    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|e| ClaimerError::InvalidClaimData(format!("amount `{}`: {}", raw, e)))
}

/// Parse the proof service payload: an array of 32-byte hex strings
pub fn parse_proof(payload: &serde_json::Value) -> Result<Vec<B256>> {
    let items = payload
        .as_array()
        .ok_or_else(|| ClaimerError::InvalidClaimData("proof is not an array".into()))?;

    items
        .iter()
        .map(|item| {
            let s = item.as_str().ok_or_else(|| {
                ClaimerError::InvalidClaimData(format!("proof element {} is not a string", item))
            })?;
            B256::from_str(s.trim()).map_err(|e| {
                ClaimerError::InvalidClaimData(format!("proof element `{}`: {}", s, e))
            })
        })
        .collect()
}

/// Result of one claim attempt for one wallet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// Claim transaction confirmed on-chain
    Claimed { tx_hash: TxHash },
    /// Contract already records a claim for this address
    AlreadyClaimed,
    /// Service returned a zero amount or an empty proof
    NoAllocation,
    /// Definitely not claimed (lookup, build, estimate, broadcast failed, or reverted)
    Failed { reason: String },
    /// Broadcast succeeded but confirmation is unknown
    Unconfirmed { tx_hash: TxHash, reason: String },
}

impl ClaimOutcome {
    /// Whether the wallet can leave the store
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Claimed { .. } | Self::AlreadyClaimed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn scales_whole_and_fractional_amounts() {
        assert_eq!(
            scale_amount(dec!(1500), 18).unwrap(),
            U256::from(1500u64) * U256::from(10u64).pow(U256::from(18u64))
        );
        assert_eq!(
            scale_amount(dec!(0.5), 18).unwrap(),
            U256::from(500_000_000_000_000_000u64)
        );
    }

    #[test]
    fn scaling_truncates_excess_precision() {
        assert_eq!(scale_amount(dec!(1.239), 2).unwrap(), U256::from(123u64));
        assert_eq!(scale_amount(dec!(0.009), 2).unwrap(), U256::ZERO);
    }

    #[test]
    fn negative_amount_is_invalid() {
        assert!(scale_amount(dec!(-1), 18).is_err());
    }

    #[test]
    fn amount_payload_variants() {
        assert_eq!(parse_amount(&json!([123456.75])).unwrap(), dec!(123456.75));
        assert_eq!(parse_amount(&json!(["42"])).unwrap(), dec!(42));
        assert_eq!(parse_amount(&json!([1e3])).unwrap(), dec!(1000));
        assert!(parse_amount(&json!([])).is_err());
        assert!(parse_amount(&json!([{"a": 1}])).is_err());
    }

    #[test]
    fn proof_payload_parses_hashes() {
        let h = "0x".to_string() + &"ab".repeat(32);
        let proof = parse_proof(&json!([h, h])).unwrap();
        assert_eq!(proof.len(), 2);
        assert_eq!(proof[0], B256::repeat_byte(0xab));
        assert!(parse_proof(&json!(["0x1234"])).is_err());
        assert!(parse_proof(&json!({"proof": []})).is_err());
    }

    #[test]
    fn claim_data_requires_amount_and_proof() {
        assert!(ClaimData::new(Decimal::ZERO, vec![B256::ZERO]).is_none());
        assert!(ClaimData::new(dec!(1), vec![]).is_none());
        assert!(ClaimData::new(dec!(1), vec![B256::ZERO]).is_some());
    }

    #[test]
    fn only_claimed_and_already_claimed_resolve() {
        assert!(ClaimOutcome::AlreadyClaimed.is_resolved());
        assert!(ClaimOutcome::Claimed {
            tx_hash: TxHash::ZERO
        }
        .is_resolved());
        assert!(!ClaimOutcome::NoAllocation.is_resolved());
        assert!(!ClaimOutcome::Unconfirmed {
            tx_hash: TxHash::ZERO,
            reason: "timeout".into()
        }
        .is_resolved());
    }
}
