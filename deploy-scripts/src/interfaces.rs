//! The collaborators the deployment pipeline is written against.
//!
//! The pipeline only sequences calls; creating contracts, tracking their
//! records, signing and submitting transactions are all behind these traits.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use crate::{
    errors::ScriptError,
    types::{DeployOptions, Deployment, NamedAccounts, TxOutcome},
};

/// Creates or reuses on-chain contract instances and tracks their records
#[async_trait]
pub trait DeploymentService: Send + Sync {
    /// Deploy the named contract, or return the existing deployment if the
    /// service's reuse policy allows it
    async fn deploy(&self, name: &str, options: DeployOptions) -> Result<Deployment, ScriptError>;

    /// The existing deployment of the named contract
    async fn get(&self, name: &str) -> Result<Deployment, ScriptError>;
}

/// Resolves accounts and chain identity, and binds callable contract handles
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// The token handle type
    type Token: TokenContract;
    /// The exchange handle type
    type Exchange: ExchangeContract;

    /// The accounts available to the scripts
    async fn named_accounts(&self) -> Result<NamedAccounts, ScriptError>;

    /// The ID of the connected chain
    async fn chain_id(&self) -> Result<u64, ScriptError>;

    /// A handle to the deployed token contract of the given name, sending
    /// transactions as `signer`
    async fn token_contract(&self, name: &str, signer: Address)
        -> Result<Self::Token, ScriptError>;

    /// A handle to the deployed exchange contract of the given name, sending
    /// transactions as `signer`
    async fn exchange_contract(
        &self,
        name: &str,
        signer: Address,
    ) -> Result<Self::Exchange, ScriptError>;
}

/// The token surface used by the pipeline
#[async_trait]
pub trait TokenContract: Send + Sync {
    /// The address of the token contract
    fn address(&self) -> Address;

    /// Transfer `amount` base units to `to`
    async fn transfer(&self, to: Address, amount: U256) -> Result<TxOutcome, ScriptError>;

    /// Allow `spender` to transfer up to `amount` base units on the signer's behalf
    async fn approve(&self, spender: Address, amount: U256) -> Result<TxOutcome, ScriptError>;
}

/// The exchange surface used by the pipeline
#[async_trait]
pub trait ExchangeContract: Send + Sync {
    /// The address of the exchange contract
    fn address(&self) -> Address;

    /// Seed the exchange with `token_amount` tokens and `value` wei of native
    /// currency
    async fn init(
        &self,
        token_amount: U256,
        value: U256,
        gas_limit: u64,
    ) -> Result<TxOutcome, ScriptError>;
}
