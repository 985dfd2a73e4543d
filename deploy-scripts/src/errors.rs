//! Definitions of errors that can occur during deployment and initialization of the contracts

use alloy::primitives::{Address, TxHash};
use thiserror::Error;

use crate::types::DeployStep;

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug, Error)]
pub enum ScriptError {
    /// Error initializing the RPC client
    #[error("error initializing client: {0}")]
    ClientInitialization(String),
    /// The deploy configuration is unusable
    #[error("invalid deploy config: {0}")]
    InvalidConfig(String),
    /// Error reading a compilation artifact from disk
    #[error("error reading artifact: {0}")]
    ReadArtifact(String),
    /// Error parsing a compilation artifact
    #[error("error parsing artifact: {0}")]
    ArtifactParsing(String),
    /// Error reading a deployment record
    #[error("error reading deployments: {0}")]
    ReadDeployments(String),
    /// Error writing a deployment record
    #[error("error writing deployments: {0}")]
    WriteDeployments(String),
    /// No deployment is recorded under the given name
    #[error("no deployment recorded for `{0}`")]
    MissingDeployment(String),
    /// A transaction was requested from an account the client cannot sign for
    #[error("cannot sign as {requested}, the client signs as {available}")]
    SignerMismatch {
        /// The account the caller asked for
        requested: Address,
        /// The account the client holds a key for
        available: Address,
    },
    /// Error deploying a contract
    #[error("error deploying contract: {0}")]
    ContractDeployment(String),
    /// Error calling a contract method
    #[error("error interacting with contract: {0}")]
    ContractInteraction(String),
    /// A transaction was mined but reverted
    #[error("transaction {tx_hash} reverted")]
    TransactionReverted {
        /// The hash of the reverted transaction
        tx_hash: TxHash,
    },
    /// A step of the deployment pipeline failed, aborting the remaining steps
    #[error("step `{step}` failed: {source}")]
    Step {
        /// The step that failed
        step: DeployStep,
        /// The underlying failure
        #[source]
        source: Box<ScriptError>,
    },
}

impl ScriptError {
    /// Wrap this error as the failure of the given pipeline step
    pub fn at_step(self, step: DeployStep) -> Self {
        ScriptError::Step {
            step,
            source: Box::new(self),
        }
    }

    /// The pipeline step that failed, if this error came out of the pipeline
    pub fn failed_step(&self) -> Option<DeployStep> {
        match self {
            ScriptError::Step { step, .. } => Some(*step),
            _ => None,
        }
    }
}
