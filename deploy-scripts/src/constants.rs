//! Constants used in the deploy scripts

use alloy::primitives::{address, Address};

/// The name under which the token contract is deployed and looked up
pub const TOKEN_CONTRACT_NAME: &str = "Balloons";

/// The name under which the exchange contract is deployed and looked up
pub const EXCHANGE_CONTRACT_NAME: &str = "DEX";

/// The chain ID of a local Hardhat / Anvil dev node
pub const LOCAL_CHAIN_ID: u64 = 31337;

/// The default RPC URL, a local dev node
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// The default directory holding compiled contract artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The default directory under which deployment records are kept, one
/// subdirectory per chain ID
pub const DEFAULT_DEPLOYMENTS_DIR: &str = "deployments";

/// The extension of artifact and deployment record files
pub const JSON_EXTENSION: &str = "json";

/// The number of wei in one whole token / one ether (18 decimals)
pub const WEI_PER_UNIT: u128 = 1_000_000_000_000_000_000;

/// The address receiving the initial token transfer
pub const DEFAULT_RECIPIENT_ADDRESS: Address = address!("7e44ee3bfb3efb14f306aea9ea0088e8ce1d911c");

/// The amount of tokens sent to the recipient, in base units
pub const DEFAULT_TRANSFER_AMOUNT: u128 = 10 * WEI_PER_UNIT;

/// The allowance granted to the exchange, in base units
pub const DEFAULT_APPROVE_AMOUNT: u128 = 100 * WEI_PER_UNIT;

/// The token leg of the exchange's initial liquidity, in base units
pub const DEFAULT_INIT_TOKEN_AMOUNT: u128 = WEI_PER_UNIT / 10;

/// The native-currency leg of the exchange's initial liquidity, in wei
pub const DEFAULT_INIT_NATIVE_VALUE: u128 = WEI_PER_UNIT / 10;

/// The gas limit of the exchange `init` transaction
pub const DEFAULT_INIT_GAS_LIMIT: u64 = 200_000;

/// The number of confirmations to wait for the exchange deployment transaction
pub const DEFAULT_REQUIRED_CONFIRMATIONS: u64 = 5;

/// The minimum number of confirmations waited on for any deployment transaction
pub const MIN_DEPLOY_CONFIRMATIONS: u64 = 1;
