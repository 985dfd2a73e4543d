//! The ordered deployment and initialization of the token and exchange.
//!
//! Each step waits for the previous one to be confirmed; the first failure
//! aborts the remaining steps and nothing already confirmed is rolled back.

use std::future::Future;

use alloy::dyn_abi::DynSolValue;
use tracing::{error, info, info_span, warn, Instrument};

use crate::{
    config::DeployConfig,
    constants::{EXCHANGE_CONTRACT_NAME, LOCAL_CHAIN_ID, TOKEN_CONTRACT_NAME},
    errors::ScriptError,
    interfaces::{ChainClient, DeploymentService, ExchangeContract, TokenContract},
    types::{DeployOptions, DeployReport, DeployStep, NamedAccounts},
};

/// Deploy the token and exchange, then fund the recipient, approve the
/// exchange and seed its liquidity.
///
/// Re-running against a chain where both contracts are already recorded
/// reuses them but still sends the transfer, approve and init transactions;
/// `init` reverts on an exchange that was already initialized.
pub async fn deploy_dex<D, C>(
    deployer: &D,
    client: &C,
    config: &DeployConfig,
) -> Result<DeployReport, ScriptError>
where
    D: DeploymentService,
    C: ChainClient,
{
    config.validate()?;

    let NamedAccounts { deployer: from } = client.named_accounts().await?;
    let chain_id = client.chain_id().await?;
    info!(chain_id, deployer = %from, "starting deployment");
    if chain_id != LOCAL_CHAIN_ID {
        warn!(
            chain_id,
            init_value = %config.init_native_value,
            "not a local dev chain, the deployer must hold enough native currency to seed the exchange"
        );
    }
    if config.init_token_amount != config.init_native_value {
        warn!("init token amount and native value differ, the exchange will not start at a 1:1 ratio");
    }

    let token_deployment = run_step(
        DeployStep::DeployToken,
        deployer.deploy(TOKEN_CONTRACT_NAME, DeployOptions::new(from)),
    )
    .await?;

    let token =
        run_step(DeployStep::BindToken, client.token_contract(TOKEN_CONTRACT_NAME, from)).await?;

    let exchange_options = DeployOptions::new(from)
        .with_args(vec![DynSolValue::Address(token_deployment.address)])
        .with_confirmations(config.required_confirmations);
    let exchange_deployment = run_step(
        DeployStep::DeployExchange,
        deployer.deploy(EXCHANGE_CONTRACT_NAME, exchange_options),
    )
    .await?;

    let exchange = run_step(
        DeployStep::BindExchange,
        client.exchange_contract(EXCHANGE_CONTRACT_NAME, from),
    )
    .await?;

    let transfer = run_step(
        DeployStep::TransferTokens,
        token.transfer(config.recipient_address, config.transfer_amount),
    )
    .await?;

    info!("approving DEX ({}) to take Balloons from the deployer", exchange.address());
    let approve = run_step(
        DeployStep::ApproveExchange,
        token.approve(exchange.address(), config.approve_amount),
    )
    .await?;

    info!("initializing exchange liquidity");
    let init = run_step(
        DeployStep::InitExchange,
        exchange.init(config.init_token_amount, config.init_native_value, config.gas_limit),
    )
    .await?;

    Ok(DeployReport {
        chain_id,
        deployer: from,
        token: token_deployment,
        exchange: exchange_deployment,
        transfer,
        approve,
        init,
    })
}

/// Run a single step inside a span named after it, tagging its failure with
/// the step
async fn run_step<T, F>(step: DeployStep, fut: F) -> Result<T, ScriptError>
where
    F: Future<Output = Result<T, ScriptError>>,
{
    let span = info_span!("step", %step, number = step.number(), of = DeployStep::ALL.len());
    async move {
        match fut.await {
            Ok(res) => {
                info!("step complete");
                Ok(res)
            },
            Err(e) => {
                error!(error = %e, "step failed, aborting");
                Err(e.at_step(step))
            },
        }
    }
    .instrument(span)
    .await
}
