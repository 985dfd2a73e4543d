//! Utilities for running the deployment pipeline from the integration tests

use std::{fs, io::ErrorKind};

use alloy::primitives::{Address, U256};
use deploy_scripts::{
    client::{RpcChainClient, RpcExchange, RpcToken},
    commands::ScriptContext,
    config::DeployConfig,
    constants::{EXCHANGE_CONTRACT_NAME, TOKEN_CONTRACT_NAME},
    deployer::RpcDeployer,
    errors::ScriptError,
    interfaces::ChainClient,
    pipeline::deploy_dex,
    types::DeployReport,
};
use eyre::Result;
use tracing::info;

/// The connected chain, plus the deployer and chain client the pipeline runs with
pub(crate) struct TestContext {
    /// The connection and stores of the scripts
    pub(crate) ctx: ScriptContext,
    /// The deployment service
    pub(crate) deployer: RpcDeployer,
    /// The chain client
    pub(crate) client: RpcChainClient,
}

impl TestContext {
    /// Wrap a connected script context
    pub(crate) fn new(ctx: ScriptContext) -> Self {
        let deployer = RpcDeployer::new(
            ctx.client.clone(),
            ctx.signer,
            ctx.artifacts.clone(),
            ctx.deployments.clone(),
        );
        let client = RpcChainClient::new(ctx.client.clone(), ctx.signer, ctx.deployments.clone());

        Self { ctx, deployer, client }
    }

    /// Run the pipeline with the default initialization parameters
    pub(crate) async fn run_pipeline(&self) -> Result<DeployReport, ScriptError> {
        deploy_dex(&self.deployer, &self.client, &DeployConfig::default()).await
    }

    /// Forget every deployment recorded for the chain, so the next run deploys
    /// fresh contracts
    pub(crate) fn clear_deployments(&self) -> Result<()> {
        let dir = self.ctx.deployments.dir();
        match fs::remove_dir_all(dir) {
            Ok(()) => {
                info!(dir = %dir.display(), "cleared deployment records");
                Ok(())
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether both contracts have a deployment record
    pub(crate) fn has_deployments(&self) -> Result<bool> {
        let store = &self.ctx.deployments;
        Ok(store.read(TOKEN_CONTRACT_NAME)?.is_some()
            && store.read(EXCHANGE_CONTRACT_NAME)?.is_some())
    }

    /// Bind the recorded token
    pub(crate) async fn token(&self) -> Result<RpcToken> {
        Ok(self.client.token_contract(TOKEN_CONTRACT_NAME, self.ctx.signer).await?)
    }

    /// Bind the recorded exchange
    pub(crate) async fn exchange(&self) -> Result<RpcExchange> {
        Ok(self.client.exchange_contract(EXCHANGE_CONTRACT_NAME, self.ctx.signer).await?)
    }

    /// The token balance of `account`
    pub(crate) async fn token_balance(&self, account: Address) -> Result<U256> {
        let token = self.token().await?;
        Ok(token.instance().balanceOf(account).call().await?)
    }
}
