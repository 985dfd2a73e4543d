//! Contract deployment over RPC, reusing earlier deployments recorded for the
//! same chain

use alloy::{
    dyn_abi::DynSolValue,
    network::TransactionBuilder,
    primitives::{keccak256, Address, Bytes, B256},
    providers::Provider,
    rpc::types::{TransactionReceipt, TransactionRequest},
};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::{
    artifacts::{ArtifactStore, ContractArtifact},
    constants::MIN_DEPLOY_CONFIRMATIONS,
    deployments::{DeploymentRecord, DeploymentStore},
    errors::ScriptError,
    interfaces::DeploymentService,
    types::{format_arg, DeployOptions, Deployment},
    utils::{check_signer, successful_outcome, Wallet},
};

/// A [`DeploymentService`] that sends creation transactions through an RPC
/// client and keeps deployment records on disk.
///
/// A recorded deployment is reused when it was created from the same init
/// code (bytecode and constructor arguments) and the chain still reports code
/// at its address.
#[derive(Clone)]
pub struct RpcDeployer {
    /// The client sending the deployment transactions
    client: Wallet,
    /// The account the client signs as
    signer: Address,
    /// Where compiled contracts are read from
    artifacts: ArtifactStore,
    /// Where deployments of the connected chain are recorded
    deployments: DeploymentStore,
}

impl RpcDeployer {
    /// Create a deployer
    pub fn new(
        client: Wallet,
        signer: Address,
        artifacts: ArtifactStore,
        deployments: DeploymentStore,
    ) -> Self {
        Self { client, signer, artifacts, deployments }
    }

    /// Return the recorded deployment if it can be reused for `init_code_hash`
    async fn reusable(
        &self,
        name: &str,
        init_code_hash: B256,
    ) -> Result<Option<DeploymentRecord>, ScriptError> {
        let Some(record) = self.deployments.read(name)? else {
            return Ok(None);
        };

        if record.init_code_hash != init_code_hash {
            debug!(contract = name, "init code changed since the recorded deployment");
            return Ok(None);
        }

        let code = self
            .client
            .get_code_at(record.address)
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;
        if code.is_empty() {
            debug!(contract = name, address = %record.address, "no code at the recorded address");
            return Ok(None);
        }

        Ok(Some(record))
    }

    /// Check the receipt of a creation transaction and record the deployment
    fn record_deployment(
        &self,
        name: &str,
        artifact: ContractArtifact,
        options: &DeployOptions,
        init_code_hash: B256,
        receipt: &TransactionReceipt,
    ) -> Result<Deployment, ScriptError> {
        let outcome = successful_outcome(receipt)?;
        let address = receipt.contract_address.ok_or_else(|| {
            ScriptError::ContractDeployment(format!(
                "receipt of {} has no contract address",
                outcome.tx_hash
            ))
        })?;

        if options.log {
            info!(
                contract = name,
                %address,
                tx_hash = %outcome.tx_hash,
                gas_used = outcome.gas_used,
                "deployed contract"
            );
        }

        let record = DeploymentRecord {
            address,
            args: options.args.iter().map(format_arg).collect(),
            init_code_hash,
            transaction_hash: Some(outcome.tx_hash),
            abi: artifact.abi,
        };
        self.deployments.write(name, &record)?;

        Ok(record.into_deployment(name, true /* newly_deployed */))
    }
}

/// Append the ABI-encoded constructor arguments to the creation bytecode
pub fn init_code(
    artifact: &ContractArtifact,
    args: &[DynSolValue],
) -> Result<Bytes, ScriptError> {
    let arity = artifact.constructor_arity();
    if arity != args.len() {
        return Err(ScriptError::ContractDeployment(format!(
            "{} takes {arity} constructor arguments, got {}",
            artifact.name,
            args.len()
        )));
    }

    let mut code = artifact.bytecode.to_vec();
    if !args.is_empty() {
        code.extend(DynSolValue::Tuple(args.to_vec()).abi_encode_params());
    }

    Ok(code.into())
}

#[async_trait]
impl DeploymentService for RpcDeployer {
    async fn deploy(&self, name: &str, options: DeployOptions) -> Result<Deployment, ScriptError> {
        check_signer(options.from, self.signer)?;

        let artifact = self.artifacts.load(name)?;
        let code = init_code(&artifact, &options.args)?;
        let init_code_hash = keccak256(&code);

        if let Some(record) = self.reusable(name, init_code_hash).await? {
            if options.log {
                info!(contract = name, address = %record.address, "reusing deployment");
            }
            return Ok(record.into_deployment(name, false /* newly_deployed */));
        }

        let confirmations = options
            .wait_confirmations
            .unwrap_or(MIN_DEPLOY_CONFIRMATIONS)
            .max(MIN_DEPLOY_CONFIRMATIONS);
        let tx = TransactionRequest::default()
            .with_from(options.from)
            .with_deploy_code(code);

        let pending_tx = self
            .client
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;
        debug!(contract = name, tx_hash = %pending_tx.tx_hash(), confirmations, "deployment submitted");

        let receipt = pending_tx
            .with_required_confirmations(confirmations)
            .get_receipt()
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;
        self.record_deployment(name, artifact, &options, init_code_hash, &receipt)
    }

    async fn get(&self, name: &str) -> Result<Deployment, ScriptError> {
        let record = self.deployments.require(name)?;
        Ok(record.into_deployment(name, false /* newly_deployed */))
    }
}
