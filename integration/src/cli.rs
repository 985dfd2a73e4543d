//! Definition of the CLI arguments for integration tests

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::constants::{DEFAULT_DEVNET_PKEY, DEFAULT_DEVNET_RPC_URL};

/// CLI tool for running integration tests against a running devnet node.
///
/// Expects `anvil --block-time 1` (or an equivalent auto-mining node) so that
/// the exchange deployment can collect its confirmations.
#[derive(Parser)]
pub(crate) struct Cli {
    /// Test to run
    #[arg(short, long, default_value = "all")]
    pub(crate) test: Tests,

    /// Directory holding the compiled contract artifacts
    #[arg(long, env = "ARTIFACTS_DIR", default_value = "artifacts")]
    pub(crate) artifacts: PathBuf,

    /// Directory under which the tests keep their deployment records
    #[arg(long, default_value = "target/integration-deployments")]
    pub(crate) deployments: PathBuf,

    /// Devnet private key, defaults to the first Anvil account
    #[arg(short, long, default_value = DEFAULT_DEVNET_PKEY)]
    pub(crate) priv_key: String,

    /// Devnet RPC URL
    #[arg(short, long, default_value = DEFAULT_DEVNET_RPC_URL)]
    pub(crate) rpc_url: String,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Tests {
    /// Run the fresh deployment, then the re-run against it
    All,
    FreshDeployment,
    Rerun,
}
