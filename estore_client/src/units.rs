//! Ether denomination conversion
//!
//! Prices are written as human amounts ("1" ether) and passed to the
//! contract in wei, the ledger's smallest unit.

use crate::error::{ClientError, Result};
use ethers::types::U256;
use ethers::utils::{format_units, parse_units, ParseUnits};
use serde::{Deserialize, Serialize};

/// Wei in one ether
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// Supported denominations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EtherUnit {
    Wei,
    Gwei,
    Ether,
}

impl EtherUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            EtherUnit::Wei => "wei",
            EtherUnit::Gwei => "gwei",
            EtherUnit::Ether => "ether",
        }
    }
}

/// Convert a decimal amount in `unit` to wei
pub fn to_wei(amount: &str, unit: EtherUnit) -> Result<U256> {
    match parse_units(amount.trim(), unit.as_str())? {
        ParseUnits::U256(value) => Ok(value),
        ParseUnits::I256(_) => Err(ClientError::Conversion(format!(
            "negative amount {} cannot be sent",
            amount
        ))),
    }
}

/// Convert wei to a decimal amount in `unit`, without trailing zeros
pub fn from_wei(value: U256, unit: EtherUnit) -> Result<String> {
    let formatted = format_units(value, unit.as_str())?;
    Ok(trim_decimal(&formatted))
}

/// One ether in wei
pub fn one_ether() -> U256 {
    U256::from(WEI_PER_ETHER)
}

fn trim_decimal(value: &str) -> String {
    if !value.contains('.') {
        return value.to_string();
    }
    let trimmed = value.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
