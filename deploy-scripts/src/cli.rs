//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use alloy::primitives::{Address, U256};
use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{deploy, list_deployments, ScriptContext},
    config::{parse_ether_amount, DeployConfig},
    constants::{DEFAULT_ARTIFACTS_DIR, DEFAULT_DEPLOYMENTS_DIR, DEFAULT_RPC_URL},
    errors::ScriptError,
};

/// Deploy and initialize the Balloons token and DEX contracts
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Private key of the deployer
    #[arg(short, long, env = "PKEY")]
    pub priv_key: String,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Directory holding the compiled contract artifacts
    #[arg(long, env = "ARTIFACTS_DIR", default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts: PathBuf,

    /// Directory under which deployment records are kept, per chain ID
    #[arg(long, env = "DEPLOYMENTS_DIR", default_value = DEFAULT_DEPLOYMENTS_DIR)]
    pub deployments: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// The commands supported by the scripts
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the token and exchange and run the initialization calls
    Deploy(DeployArgs),
    /// Print the deployments recorded for the connected chain
    Deployments,
}

impl Command {
    /// Run the command against the connected chain
    pub async fn run(self, ctx: ScriptContext) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => deploy(args, ctx).await,
            Command::Deployments => list_deployments(&ctx),
        }
    }
}

/// Overrides of the initialization parameters.
///
/// Amounts are ether-denominated decimals, e.g. `--init-value 0.1`.
#[derive(Args, Default)]
pub struct DeployArgs {
    /// JSON file with the initialization parameters; flags take precedence
    #[arg(short, long, env = "DEPLOY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address receiving the initial token transfer
    #[arg(long)]
    pub recipient: Option<Address>,

    /// Tokens transferred to the recipient
    #[arg(long, value_parser = parse_ether_amount)]
    pub transfer_amount: Option<U256>,

    /// Tokens the exchange is allowed to pull from the deployer
    #[arg(long, value_parser = parse_ether_amount)]
    pub approve_amount: Option<U256>,

    /// Tokens seeded into the exchange
    #[arg(long, value_parser = parse_ether_amount)]
    pub init_token_amount: Option<U256>,

    /// Native currency seeded into the exchange
    #[arg(long, value_parser = parse_ether_amount)]
    pub init_value: Option<U256>,

    /// Gas limit of the exchange `init` transaction
    #[arg(long)]
    pub gas_limit: Option<u64>,

    /// Confirmations to wait for on the exchange deployment
    #[arg(long)]
    pub confirmations: Option<u64>,
}

impl DeployArgs {
    /// Build the deploy config: defaults, then the config file, then flags
    pub fn into_config(self) -> Result<DeployConfig, ScriptError> {
        let mut config = match &self.config {
            Some(path) => DeployConfig::from_file(path)?,
            None => DeployConfig::default(),
        };

        if let Some(recipient) = self.recipient {
            config.recipient_address = recipient;
        }
        if let Some(amount) = self.transfer_amount {
            config.transfer_amount = amount;
        }
        if let Some(amount) = self.approve_amount {
            config.approve_amount = amount;
        }
        if let Some(amount) = self.init_token_amount {
            config.init_token_amount = amount;
        }
        if let Some(value) = self.init_value {
            config.init_native_value = value;
        }
        if let Some(gas_limit) = self.gas_limit {
            config.gas_limit = gas_limit;
        }
        if let Some(confirmations) = self.confirmations {
            config.required_confirmations = confirmations;
        }

        Ok(config)
    }
}
