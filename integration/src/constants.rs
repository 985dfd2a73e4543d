//! Constants used in the integration tests

/// The first default account of an Anvil node
pub(crate) const DEFAULT_DEVNET_PKEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// The default Anvil RPC endpoint
pub(crate) const DEFAULT_DEVNET_RPC_URL: &str = "http://127.0.0.1:8545";
