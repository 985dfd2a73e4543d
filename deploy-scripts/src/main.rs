use clap::Parser;
use deploy_scripts::{cli::Cli, commands::ScriptContext, errors::ScriptError};
use tracing_subscriber::EnvFilter;

/// The log filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "info";

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    let Cli {
        priv_key,
        rpc_url,
        artifacts,
        deployments,
        command,
    } = Cli::parse();

    tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let ctx = ScriptContext::connect(&priv_key, &rpc_url, artifacts, deployments).await?;

    command.run(ctx).await
}
