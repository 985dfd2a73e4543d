//! Integration tests for the deployment scripts. These assume that a devnet is
//! already running locally and that the contract artifacts have been compiled.

use clap::Parser;
use cli::{Cli, Tests};
use deploy_scripts::commands::ScriptContext;
use eyre::Result;
use tests::{test_fresh_deployment, test_rerun};
use tracing::info;
use tracing_subscriber::EnvFilter;
use utils::TestContext;

mod cli;
mod constants;
mod utils;

#[tokio::main]
async fn main() -> Result<()> {
    let Cli {
        test,
        artifacts,
        deployments,
        priv_key,
        rpc_url,
    } = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let ctx = ScriptContext::connect(&priv_key, &rpc_url, artifacts, deployments).await?;
    let test_ctx = TestContext::new(ctx);

    if matches!(test, Tests::All | Tests::FreshDeployment) {
        test_fresh_deployment(&test_ctx).await?;
        info!("fresh-deployment passed");
    }
    if matches!(test, Tests::All | Tests::Rerun) {
        test_rerun(&test_ctx).await?;
        info!("rerun passed");
    }

    Ok(())
}
