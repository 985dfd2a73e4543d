//! Implementations of the deploy script commands

use std::path::PathBuf;

use alloy::{primitives::Address, providers::Provider};
use tracing::info;

use crate::{
    artifacts::ArtifactStore,
    cli::DeployArgs,
    client::RpcChainClient,
    deployer::RpcDeployer,
    deployments::DeploymentStore,
    errors::ScriptError,
    pipeline::deploy_dex,
    types::{DeployReport, Deployment},
    utils::{setup_client, Wallet},
};

/// Everything a command needs to talk to the chain and the local records
pub struct ScriptContext {
    /// The signing RPC client
    pub client: Wallet,
    /// The account the client signs as
    pub signer: Address,
    /// The ID of the connected chain
    pub chain_id: u64,
    /// The compiled contract artifacts
    pub artifacts: ArtifactStore,
    /// The deployment records of the connected chain
    pub deployments: DeploymentStore,
}

impl ScriptContext {
    /// Connect to the chain and open the stores for it
    pub async fn connect(
        priv_key: &str,
        rpc_url: &str,
        artifacts_dir: PathBuf,
        deployments_dir: PathBuf,
    ) -> Result<Self, ScriptError> {
        let (client, signer) = setup_client(priv_key, rpc_url)?;
        let chain_id = client
            .get_chain_id()
            .await
            .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

        Ok(Self {
            client,
            signer,
            chain_id,
            artifacts: ArtifactStore::new(artifacts_dir),
            deployments: DeploymentStore::for_chain(deployments_dir, chain_id),
        })
    }
}

/// Run the full deployment pipeline against the connected chain
pub async fn deploy(args: DeployArgs, ctx: ScriptContext) -> Result<(), ScriptError> {
    let config = args.into_config()?;

    let deployer = RpcDeployer::new(
        ctx.client.clone(),
        ctx.signer,
        ctx.artifacts,
        ctx.deployments.clone(),
    );
    let client = RpcChainClient::new(ctx.client, ctx.signer, ctx.deployments);

    let report = deploy_dex(&deployer, &client, &config).await?;
    log_report(&report);

    Ok(())
}

/// Log the recorded deployments of the connected chain
pub fn list_deployments(ctx: &ScriptContext) -> Result<(), ScriptError> {
    let records = ctx.deployments.list()?;
    if records.is_empty() {
        info!(chain_id = ctx.chain_id, "no deployments recorded");
    }

    for (name, record) in records {
        info!(
            contract = %name,
            address = %record.address,
            args = ?record.args,
            "recorded deployment"
        );
    }

    Ok(())
}

/// Log the outcome of a pipeline run
fn log_report(report: &DeployReport) {
    log_deployment(&report.token);
    log_deployment(&report.exchange);
    info!(
        chain_id = report.chain_id,
        transfer_tx = %report.transfer.tx_hash,
        approve_tx = %report.approve.tx_hash,
        init_tx = %report.init.tx_hash,
        "deployment and initialization complete"
    );
}

/// Log a single deployment
fn log_deployment(deployment: &Deployment) {
    let status = if deployment.newly_deployed { "deployed" } else { "reused" };
    info!(contract = %deployment.name, address = %deployment.address, status);
}
