//! The chain client and contract handles backed by an RPC provider

use alloy::{
    primitives::{Address, U256},
    providers::Provider,
};
use async_trait::async_trait;

use crate::{
    deployments::DeploymentStore,
    errors::ScriptError,
    interfaces::{ChainClient, ExchangeContract, TokenContract},
    solidity::{Balloons::BalloonsInstance, Dex::DexInstance},
    types::{NamedAccounts, TxOutcome},
    utils::{check_signer, send_tx, Wallet},
};

/// A token instance using the default generics
pub type TokenInstance = BalloonsInstance<Wallet>;
/// An exchange instance using the default generics
pub type ExchangeInstance = DexInstance<Wallet>;

/// A [`ChainClient`] over an RPC provider holding a single local key.
///
/// Contracts are looked up by name in the deployment records of the
/// connected chain.
#[derive(Clone)]
pub struct RpcChainClient {
    /// The provider used for reads and for signing transactions
    client: Wallet,
    /// The account the client signs as
    signer: Address,
    /// The deployment records of the connected chain
    deployments: DeploymentStore,
}

impl RpcChainClient {
    /// Create a chain client
    pub fn new(client: Wallet, signer: Address, deployments: DeploymentStore) -> Self {
        Self { client, signer, deployments }
    }

    /// Resolve a recorded deployment, checking the requested signer
    fn resolve(&self, name: &str, signer: Address) -> Result<Address, ScriptError> {
        check_signer(signer, self.signer)?;
        Ok(self.deployments.require(name)?.address)
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    type Token = RpcToken;
    type Exchange = RpcExchange;

    async fn named_accounts(&self) -> Result<NamedAccounts, ScriptError> {
        Ok(NamedAccounts { deployer: self.signer })
    }

    async fn chain_id(&self) -> Result<u64, ScriptError> {
        self.client
            .get_chain_id()
            .await
            .map_err(|e| ScriptError::ClientInitialization(e.to_string()))
    }

    async fn token_contract(&self, name: &str, signer: Address) -> Result<RpcToken, ScriptError> {
        let address = self.resolve(name, signer)?;
        Ok(RpcToken { instance: BalloonsInstance::new(address, self.client.clone()) })
    }

    async fn exchange_contract(
        &self,
        name: &str,
        signer: Address,
    ) -> Result<RpcExchange, ScriptError> {
        let address = self.resolve(name, signer)?;
        Ok(RpcExchange { instance: DexInstance::new(address, self.client.clone()) })
    }
}

/// A token handle sending transactions through the RPC provider
pub struct RpcToken {
    /// The contract bindings
    instance: TokenInstance,
}

impl RpcToken {
    /// The underlying contract bindings, for read calls
    pub fn instance(&self) -> &TokenInstance {
        &self.instance
    }
}

#[async_trait]
impl TokenContract for RpcToken {
    fn address(&self) -> Address {
        *self.instance.address()
    }

    async fn transfer(&self, to: Address, amount: U256) -> Result<TxOutcome, ScriptError> {
        send_tx(self.instance.transfer(to, amount)).await
    }

    async fn approve(&self, spender: Address, amount: U256) -> Result<TxOutcome, ScriptError> {
        send_tx(self.instance.approve(spender, amount)).await
    }
}

/// An exchange handle sending transactions through the RPC provider
pub struct RpcExchange {
    /// The contract bindings
    instance: ExchangeInstance,
}

impl RpcExchange {
    /// The underlying contract bindings, for read calls
    pub fn instance(&self) -> &ExchangeInstance {
        &self.instance
    }
}

#[async_trait]
impl ExchangeContract for RpcExchange {
    fn address(&self) -> Address {
        *self.instance.address()
    }

    async fn init(
        &self,
        token_amount: U256,
        value: U256,
        gas_limit: u64,
    ) -> Result<TxOutcome, ScriptError> {
        send_tx(self.instance.init(token_amount).value(value).gas(gas_limit)).await
    }
}
