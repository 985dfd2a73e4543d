//! Type definitions used throughout the scripts

use std::fmt::{self, Display};

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, TxHash},
};

/// The accounts the scripts act as, resolved by the chain client
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NamedAccounts {
    /// The account paying for and owning the deployments
    pub deployer: Address,
}

/// Options for a single contract deployment
#[derive(Clone, Debug, PartialEq)]
pub struct DeployOptions {
    /// The account sending the deployment transaction
    pub from: Address,
    /// The constructor arguments
    pub args: Vec<DynSolValue>,
    /// Whether to log the deployment at `info` level
    pub log: bool,
    /// The number of confirmations to wait for before the deployment is
    /// considered final, if more than the service's default
    pub wait_confirmations: Option<u64>,
}

impl DeployOptions {
    /// Deploy from the given account with no constructor arguments
    pub fn new(from: Address) -> Self {
        Self {
            from,
            args: Vec::new(),
            log: true,
            wait_confirmations: None,
        }
    }

    /// Set the constructor arguments
    pub fn with_args(mut self, args: Vec<DynSolValue>) -> Self {
        self.args = args;
        self
    }

    /// Require the given number of confirmations
    pub fn with_confirmations(mut self, confirmations: u64) -> Self {
        self.wait_confirmations = Some(confirmations);
        self
    }
}

/// A handle to a deployed contract instance
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deployment {
    /// The name the contract was deployed under
    pub name: String,
    /// The address of the contract
    pub address: Address,
    /// The constructor arguments, formatted for display
    pub args: Vec<String>,
    /// The hash of the deployment transaction, if known
    pub transaction_hash: Option<TxHash>,
    /// Whether this run created the contract, as opposed to reusing an
    /// existing deployment
    pub newly_deployed: bool,
}

/// The outcome of a mined, successful transaction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TxOutcome {
    /// The transaction hash
    pub tx_hash: TxHash,
    /// The block the transaction was included in
    pub block_number: Option<u64>,
    /// The gas used by the transaction
    pub gas_used: u64,
}

/// The named steps of the deployment pipeline, in execution order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeployStep {
    /// Deploy the token contract
    DeployToken,
    /// Bind a callable token handle to the deployer
    BindToken,
    /// Deploy the exchange contract against the token
    DeployExchange,
    /// Bind a callable exchange handle to the deployer
    BindExchange,
    /// Send tokens to the configured recipient
    TransferTokens,
    /// Allow the exchange to pull tokens from the deployer
    ApproveExchange,
    /// Seed the exchange's initial liquidity
    InitExchange,
}

impl DeployStep {
    /// Every step, in the order the pipeline runs them
    pub const ALL: [DeployStep; 7] = [
        DeployStep::DeployToken,
        DeployStep::BindToken,
        DeployStep::DeployExchange,
        DeployStep::BindExchange,
        DeployStep::TransferTokens,
        DeployStep::ApproveExchange,
        DeployStep::InitExchange,
    ];

    /// The 1-based position of the step in the pipeline
    pub fn number(self) -> usize {
        DeployStep::ALL.iter().position(|s| *s == self).map_or(0, |i| i + 1)
    }
}

impl Display for DeployStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployStep::DeployToken => write!(f, "deploy-token"),
            DeployStep::BindToken => write!(f, "bind-token"),
            DeployStep::DeployExchange => write!(f, "deploy-exchange"),
            DeployStep::BindExchange => write!(f, "bind-exchange"),
            DeployStep::TransferTokens => write!(f, "transfer-tokens"),
            DeployStep::ApproveExchange => write!(f, "approve-exchange"),
            DeployStep::InitExchange => write!(f, "init-exchange"),
        }
    }
}

/// The results of a complete pipeline run, one field per step that produces
/// something
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployReport {
    /// The chain the pipeline ran against
    pub chain_id: u64,
    /// The deploying account
    pub deployer: Address,
    /// The token deployment
    pub token: Deployment,
    /// The exchange deployment
    pub exchange: Deployment,
    /// The token transfer to the recipient
    pub transfer: TxOutcome,
    /// The allowance granted to the exchange
    pub approve: TxOutcome,
    /// The exchange liquidity initialization
    pub init: TxOutcome,
}

/// Format a constructor argument the way it is recorded in deployment records
pub fn format_arg(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Address(address) => address.to_string(),
        DynSolValue::Uint(value, _) => value.to_string(),
        DynSolValue::Int(value, _) => value.to_string(),
        DynSolValue::Bool(value) => value.to_string(),
        DynSolValue::String(value) => value.clone(),
        other => format!("{other:?}"),
    }
}
