//! The parameters of the post-deployment initialization calls

use std::{fs, path::Path};

use alloy::primitives::{
    utils::{ParseUnits, Unit},
    Address, U256,
};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        DEFAULT_APPROVE_AMOUNT, DEFAULT_INIT_GAS_LIMIT, DEFAULT_INIT_NATIVE_VALUE,
        DEFAULT_INIT_TOKEN_AMOUNT, DEFAULT_RECIPIENT_ADDRESS, DEFAULT_REQUIRED_CONFIRMATIONS,
        DEFAULT_TRANSFER_AMOUNT,
    },
    errors::ScriptError,
};

/// Addresses, amounts and limits used by the deployment pipeline.
///
/// In a JSON config file, amounts are written as ether-denominated decimal
/// strings (`"0.1"`), and any omitted field takes its default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct DeployConfig {
    /// The address receiving the initial token transfer
    pub recipient_address: Address,
    /// The amount of tokens transferred to the recipient, in base units
    #[serde(with = "ether_amount")]
    pub transfer_amount: U256,
    /// The allowance granted to the exchange, in base units
    #[serde(with = "ether_amount")]
    pub approve_amount: U256,
    /// The token leg of the exchange's initial liquidity, in base units
    #[serde(with = "ether_amount")]
    pub init_token_amount: U256,
    /// The native-currency leg of the exchange's initial liquidity, in wei
    #[serde(with = "ether_amount")]
    pub init_native_value: U256,
    /// The gas limit of the exchange `init` transaction
    pub gas_limit: u64,
    /// The confirmations to wait for on the exchange deployment
    pub required_confirmations: u64,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            recipient_address: DEFAULT_RECIPIENT_ADDRESS,
            transfer_amount: U256::from(DEFAULT_TRANSFER_AMOUNT),
            approve_amount: U256::from(DEFAULT_APPROVE_AMOUNT),
            init_token_amount: U256::from(DEFAULT_INIT_TOKEN_AMOUNT),
            init_native_value: U256::from(DEFAULT_INIT_NATIVE_VALUE),
            gas_limit: DEFAULT_INIT_GAS_LIMIT,
            required_confirmations: DEFAULT_REQUIRED_CONFIRMATIONS,
        }
    }
}

impl DeployConfig {
    /// Read a config from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ScriptError::InvalidConfig(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&contents)
            .map_err(|e| ScriptError::InvalidConfig(format!("{}: {e}", path.display())))
    }

    /// Check the config before any transaction is sent
    pub fn validate(&self) -> Result<(), ScriptError> {
        if self.init_token_amount.is_zero() || self.init_native_value.is_zero() {
            return Err(ScriptError::InvalidConfig(
                "initial liquidity amounts must be non-zero".to_string(),
            ));
        }

        // The exchange pulls the token leg of `init` out of the allowance
        if self.approve_amount < self.init_token_amount {
            return Err(ScriptError::InvalidConfig(format!(
                "approve amount {} is below the init token amount {}",
                self.approve_amount, self.init_token_amount
            )));
        }

        if self.gas_limit == 0 {
            return Err(ScriptError::InvalidConfig("gas limit must be non-zero".to_string()));
        }

        Ok(())
    }
}

/// Parse a non-negative, ether-denominated decimal string into base units
pub fn parse_ether_amount(amount: &str) -> Result<U256, String> {
    let trimmed = amount.trim();
    if trimmed.starts_with('-') {
        return Err(format!("invalid amount `{amount}`: must not be negative"));
    }

    match ParseUnits::parse_units(trimmed, Unit::ETHER) {
        Ok(ParseUnits::U256(value)) => Ok(value),
        Ok(ParseUnits::I256(_)) => Err(format!("invalid amount `{amount}`: must not be negative")),
        Err(e) => Err(format!("invalid amount `{amount}`: {e}")),
    }
}

/// (De)serialization of base-unit amounts as ether-denominated decimal strings
mod ether_amount {
    use alloy::primitives::{utils::format_ether, U256};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use super::parse_ether_amount;

    pub fn serialize<S: Serializer>(amount: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_ether(*amount))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let amount = String::deserialize(deserializer)?;
        parse_ether_amount(&amount).map_err(D::Error::custom)
    }
}
