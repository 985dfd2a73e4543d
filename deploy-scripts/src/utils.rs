//! Utilities for the deploy scripts.

use std::str::FromStr;

use alloy::{
    contract::{CallBuilder, CallDecoder},
    network::Ethereum,
    primitives::Address,
    providers::{DynProvider, ProviderBuilder},
    rpc::types::TransactionReceipt,
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use tracing::debug;

use crate::{errors::ScriptError, types::TxOutcome};

/// The provider type used by the scripts, signing with a local key
pub type Wallet = DynProvider<Ethereum>;

/// The call builder type produced by the contract bindings
pub type ScriptCallBuilder<'a, C> = CallBuilder<&'a Wallet, C, Ethereum>;

/// Sets up the client with which the scripts sign and send transactions,
/// returning it along with the address of the signing account
pub fn setup_client(priv_key: &str, rpc_url: &str) -> Result<(Wallet, Address), ScriptError> {
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let address = signer.address();

    let url = Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let provider = ProviderBuilder::new().wallet(signer).connect_http(url);

    Ok((DynProvider::new(provider), address))
}

/// Fail unless `requested` is the account the client signs as
pub fn check_signer(requested: Address, available: Address) -> Result<(), ScriptError> {
    if requested != available {
        return Err(ScriptError::SignerMismatch { requested, available });
    }

    Ok(())
}

/// Send a contract call, wait for its receipt, and ensure it was successful
pub async fn send_tx<C: CallDecoder>(tx: ScriptCallBuilder<'_, C>) -> Result<TxOutcome, ScriptError> {
    let pending_tx = tx
        .send()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    debug!(tx_hash = %pending_tx.tx_hash(), "transaction submitted");

    let receipt = pending_tx
        .get_receipt()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    successful_outcome(&receipt)
}

/// Convert a receipt into a [`TxOutcome`], failing if the transaction reverted
pub fn successful_outcome(receipt: &TransactionReceipt) -> Result<TxOutcome, ScriptError> {
    if !receipt.status() {
        return Err(ScriptError::TransactionReverted { tx_hash: receipt.transaction_hash });
    }

    Ok(TxOutcome {
        tx_hash: receipt.transaction_hash,
        block_number: receipt.block_number,
        gas_used: receipt.gas_used,
    })
}
