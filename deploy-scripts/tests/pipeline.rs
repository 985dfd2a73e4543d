//! Tests of the deployment pipeline against in-memory collaborators

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{utils::parse_ether, Address, TxHash, U256},
};
use async_trait::async_trait;
use deploy_scripts::{
    config::DeployConfig,
    constants::{EXCHANGE_CONTRACT_NAME, TOKEN_CONTRACT_NAME},
    errors::ScriptError,
    interfaces::{ChainClient, DeploymentService, ExchangeContract, TokenContract},
    pipeline::deploy_dex,
    types::{format_arg, DeployOptions, DeployStep, Deployment, NamedAccounts, TxOutcome},
};

/// The deploying account of the mock chain
const DEPLOYER: Address = Address::with_last_byte(0xde);
/// The chain ID of the mock chain
const CHAIN_ID: u64 = 31337;

// --------------
// | Mock Chain |
// --------------

/// A contract deployed on the mock chain
#[derive(Clone, Debug)]
struct MockDeployment {
    /// The contract address
    address: Address,
    /// The constructor arguments it was deployed with
    args: Vec<DynSolValue>,
    /// The options of the deploy call that created it
    options: DeployOptions,
}

/// The state shared by the mock collaborators
#[derive(Default)]
struct ChainState {
    /// Every collaborator call, in order
    calls: Vec<String>,
    /// Deployed contracts by name
    deployed: HashMap<String, MockDeployment>,
    /// The number of creation transactions sent
    creations: u8,
    /// The number of transactions sent
    txs: u8,
    /// Token balances
    balances: HashMap<Address, U256>,
    /// Token allowances, keyed by (owner, spender)
    allowances: HashMap<(Address, Address), U256>,
    /// The exchange's native-currency reserve
    exchange_native_reserve: U256,
    /// The exchange's total liquidity, zero until `init`
    total_liquidity: U256,
    /// A call that fails instead of executing
    fail_on: Option<&'static str>,
}

impl ChainState {
    /// Record a call, failing it if it is the configured failure
    fn record(&mut self, call: String) -> Result<(), ScriptError> {
        let fails = self.fail_on.is_some_and(|f| call.starts_with(f));
        self.calls.push(call.clone());
        if fails {
            return Err(ScriptError::ContractInteraction(format!("{call} failed")));
        }

        Ok(())
    }

    /// A successful outcome for a new transaction
    fn next_tx(&mut self) -> TxOutcome {
        self.txs += 1;
        TxOutcome {
            tx_hash: TxHash::with_last_byte(self.txs),
            block_number: Some(self.txs as u64),
            gas_used: 21_000,
        }
    }

    /// The token balance of an address
    fn balance(&self, address: Address) -> U256 {
        self.balances.get(&address).copied().unwrap_or_default()
    }

    /// The address of a deployed contract
    fn address_of(&self, name: &str) -> Address {
        self.deployed[name].address
    }
}

/// A handle to the mock chain
#[derive(Clone)]
struct MockChain {
    /// The shared state
    state: Arc<Mutex<ChainState>>,
}

impl MockChain {
    /// A fresh chain where the deployer holds 1000 tokens once the token exists
    fn new() -> Self {
        Self { state: Arc::new(Mutex::new(ChainState::default())) }
    }

    /// A chain where the given call fails
    fn failing_on(call: &'static str) -> Self {
        let chain = Self::new();
        chain.state().fail_on = Some(call);
        chain
    }

    /// Lock the state
    fn state(&self) -> std::sync::MutexGuard<'_, ChainState> {
        self.state.lock().unwrap()
    }
}

#[async_trait]
impl DeploymentService for MockChain {
    async fn deploy(&self, name: &str, options: DeployOptions) -> Result<Deployment, ScriptError> {
        let mut state = self.state();
        state.record(format!("deploy:{name}"))?;

        // Reuse when deployed with the same arguments, like the RPC deployer's init-code check
        if let Some(existing) = state.deployed.get(name) {
            if existing.args == options.args {
                return Ok(Deployment {
                    name: name.to_string(),
                    address: existing.address,
                    args: existing.args.iter().map(format_arg).collect(),
                    transaction_hash: None,
                    newly_deployed: false,
                });
            }
        }

        state.creations += 1;
        let address = Address::with_last_byte(state.creations);
        if name == TOKEN_CONTRACT_NAME {
            state.balances.insert(options.from, parse_ether("1000").unwrap());
        }
        let outcome = state.next_tx();
        state.deployed.insert(
            name.to_string(),
            MockDeployment { address, args: options.args.clone(), options: options.clone() },
        );

        Ok(Deployment {
            name: name.to_string(),
            address,
            args: options.args.iter().map(format_arg).collect(),
            transaction_hash: Some(outcome.tx_hash),
            newly_deployed: true,
        })
    }

    async fn get(&self, name: &str) -> Result<Deployment, ScriptError> {
        let mut state = self.state();
        state.record(format!("get:{name}"))?;
        let existing = state
            .deployed
            .get(name)
            .ok_or_else(|| ScriptError::MissingDeployment(name.to_string()))?;

        Ok(Deployment {
            name: name.to_string(),
            address: existing.address,
            args: existing.args.iter().map(format_arg).collect(),
            transaction_hash: None,
            newly_deployed: false,
        })
    }
}

#[async_trait]
impl ChainClient for MockChain {
    type Token = MockToken;
    type Exchange = MockExchange;

    async fn named_accounts(&self) -> Result<NamedAccounts, ScriptError> {
        self.state().record("named_accounts".to_string())?;
        Ok(NamedAccounts { deployer: DEPLOYER })
    }

    async fn chain_id(&self) -> Result<u64, ScriptError> {
        self.state().record("chain_id".to_string())?;
        Ok(CHAIN_ID)
    }

    async fn token_contract(&self, name: &str, signer: Address) -> Result<MockToken, ScriptError> {
        let mut state = self.state();
        state.record(format!("bind:{name}"))?;
        let address = state
            .deployed
            .get(name)
            .map(|d| d.address)
            .ok_or_else(|| ScriptError::MissingDeployment(name.to_string()))?;
        Ok(MockToken { chain: self.clone(), address, signer })
    }

    async fn exchange_contract(
        &self,
        name: &str,
        signer: Address,
    ) -> Result<MockExchange, ScriptError> {
        let mut state = self.state();
        state.record(format!("bind:{name}"))?;
        let address = state
            .deployed
            .get(name)
            .map(|d| d.address)
            .ok_or_else(|| ScriptError::MissingDeployment(name.to_string()))?;
        Ok(MockExchange { chain: self.clone(), address, signer })
    }
}

/// A token handle on the mock chain
struct MockToken {
    /// The chain the token lives on
    chain: MockChain,
    /// The token address
    address: Address,
    /// The account sending transactions
    signer: Address,
}

#[async_trait]
impl TokenContract for MockToken {
    fn address(&self) -> Address {
        self.address
    }

    async fn transfer(&self, to: Address, amount: U256) -> Result<TxOutcome, ScriptError> {
        let mut state = self.chain.state();
        state.record("transfer".to_string())?;

        let from_balance = state.balance(self.signer);
        if from_balance < amount {
            return Err(ScriptError::TransactionReverted { tx_hash: state.next_tx().tx_hash });
        }
        state.balances.insert(self.signer, from_balance - amount);
        let to_balance = state.balance(to);
        state.balances.insert(to, to_balance + amount);

        Ok(state.next_tx())
    }

    async fn approve(&self, spender: Address, amount: U256) -> Result<TxOutcome, ScriptError> {
        let mut state = self.chain.state();
        state.record("approve".to_string())?;
        state.allowances.insert((self.signer, spender), amount);
        Ok(state.next_tx())
    }
}

/// An exchange handle on the mock chain, modelled on the DEX `init`
struct MockExchange {
    /// The chain the exchange lives on
    chain: MockChain,
    /// The exchange address
    address: Address,
    /// The account sending transactions
    signer: Address,
}

#[async_trait]
impl ExchangeContract for MockExchange {
    fn address(&self) -> Address {
        self.address
    }

    async fn init(
        &self,
        token_amount: U256,
        value: U256,
        _gas_limit: u64,
    ) -> Result<TxOutcome, ScriptError> {
        let mut state = self.chain.state();
        state.record("init".to_string())?;

        // `require(totalLiquidity == 0)`
        if !state.total_liquidity.is_zero() {
            return Err(ScriptError::TransactionReverted { tx_hash: state.next_tx().tx_hash });
        }

        // `token.transferFrom(msg.sender, address(this), tokens)`
        let key = (self.signer, self.address);
        let allowance = state.allowances.get(&key).copied().unwrap_or_default();
        let balance = state.balance(self.signer);
        if allowance < token_amount || balance < token_amount {
            return Err(ScriptError::TransactionReverted { tx_hash: state.next_tx().tx_hash });
        }
        state.allowances.insert(key, allowance - token_amount);
        state.balances.insert(self.signer, balance - token_amount);
        let reserve = state.balance(self.address);
        state.balances.insert(self.address, reserve + token_amount);

        state.exchange_native_reserve = value;
        state.total_liquidity = value;
        Ok(state.next_tx())
    }
}

/// Assert that `err` is the failure of `step` caused by a reverted transaction
fn assert_reverted_at(err: &ScriptError, step: DeployStep) {
    match err {
        ScriptError::Step { step: failed, source } => {
            assert_eq!(*failed, step);
            assert!(
                matches!(**source, ScriptError::TransactionReverted { .. }),
                "unexpected cause: {source}"
            );
        },
        other => panic!("expected a step failure, got {other}"),
    }
}

// ---------
// | Tests |
// ---------

#[tokio::test]
async fn steps_run_in_order() {
    let chain = MockChain::new();
    deploy_dex(&chain, &chain, &DeployConfig::default()).await.unwrap();

    let calls = chain.state().calls.clone();
    assert_eq!(
        calls,
        [
            "named_accounts",
            "chain_id",
            "deploy:Balloons",
            "bind:Balloons",
            "deploy:DEX",
            "bind:DEX",
            "transfer",
            "approve",
            "init",
        ]
    );
}

#[tokio::test]
async fn exchange_is_constructed_with_the_token_address() {
    let chain = MockChain::new();
    let report = deploy_dex(&chain, &chain, &DeployConfig::default()).await.unwrap();

    assert_ne!(report.token.address, Address::ZERO);
    assert_eq!(report.exchange.args, [report.token.address.to_string()]);

    let state = chain.state();
    let exchange = &state.deployed[EXCHANGE_CONTRACT_NAME];
    assert_eq!(exchange.args, [DynSolValue::Address(report.token.address)]);
    assert_eq!(exchange.options.from, DEPLOYER);
    assert_eq!(exchange.options.wait_confirmations, Some(5));

    let token = &state.deployed[TOKEN_CONTRACT_NAME];
    assert!(token.args.is_empty());
    assert_eq!(token.options.wait_confirmations, None);
    assert!(token.options.log);
}

#[tokio::test]
async fn initialization_moves_the_configured_amounts() {
    let config = DeployConfig::default();
    let chain = MockChain::new();
    let report = deploy_dex(&chain, &chain, &config).await.unwrap();

    assert_eq!(report.chain_id, CHAIN_ID);
    assert_eq!(report.deployer, DEPLOYER);
    assert!(report.token.newly_deployed);
    assert!(report.exchange.newly_deployed);

    let state = chain.state();
    let exchange = state.address_of(EXCHANGE_CONTRACT_NAME);

    // Recipient receives exactly 10 tokens
    assert_eq!(state.balance(config.recipient_address), parse_ether("10").unwrap());

    // The exchange pulled its token leg out of the 100 token allowance
    let remaining = state.allowances[&(DEPLOYER, exchange)];
    assert_eq!(remaining, parse_ether("100").unwrap() - parse_ether("0.1").unwrap());

    // 1:1 starting ratio
    assert_eq!(state.balance(exchange), parse_ether("0.1").unwrap());
    assert_eq!(state.exchange_native_reserve, parse_ether("0.1").unwrap());
    assert_eq!(state.total_liquidity, parse_ether("0.1").unwrap());
}

#[tokio::test]
async fn failure_aborts_the_remaining_steps() {
    let chain = MockChain::failing_on("approve");
    let err = deploy_dex(&chain, &chain, &DeployConfig::default()).await.unwrap_err();

    assert_eq!(err.failed_step(), Some(DeployStep::ApproveExchange));
    let state = chain.state();
    assert_eq!(state.calls.last().map(String::as_str), Some("approve"));
    assert!(!state.calls.iter().any(|c| c == "init"));

    // No rollback: the transfer already happened
    assert_eq!(state.balance(DeployConfig::default().recipient_address), parse_ether("10").unwrap());
}

#[tokio::test]
async fn failed_token_deployment_stops_before_the_exchange() {
    let chain = MockChain::failing_on("deploy:Balloons");
    let err = deploy_dex(&chain, &chain, &DeployConfig::default()).await.unwrap_err();

    assert_eq!(err.failed_step(), Some(DeployStep::DeployToken));
    assert!(chain.state().deployed.is_empty());
}

#[tokio::test]
async fn rerun_reuses_deployments_and_init_reverts() {
    let config = DeployConfig::default();
    let chain = MockChain::new();
    let first = deploy_dex(&chain, &chain, &config).await.unwrap();

    // The second run reuses both contracts but still sends every transaction,
    // and the exchange rejects a second `init`
    let err = deploy_dex(&chain, &chain, &config).await.unwrap_err();
    assert_reverted_at(&err, DeployStep::InitExchange);

    let state = chain.state();
    assert_eq!(state.creations, 2);
    assert_eq!(state.address_of(TOKEN_CONTRACT_NAME), first.token.address);
    assert_eq!(state.address_of(EXCHANGE_CONTRACT_NAME), first.exchange.address);

    let second_run = &state.calls[9..];
    assert_eq!(
        second_run,
        [
            "named_accounts",
            "chain_id",
            "deploy:Balloons",
            "bind:Balloons",
            "deploy:DEX",
            "bind:DEX",
            "transfer",
            "approve",
            "init",
        ]
    );
    assert_eq!(state.balance(config.recipient_address), parse_ether("20").unwrap());
    assert_eq!(state.total_liquidity, parse_ether("0.1").unwrap());
}

#[tokio::test]
async fn deployments_are_retrievable_after_a_run() {
    let chain = MockChain::new();
    assert!(matches!(
        chain.get(TOKEN_CONTRACT_NAME).await,
        Err(ScriptError::MissingDeployment(_))
    ));

    let report = deploy_dex(&chain, &chain, &DeployConfig::default()).await.unwrap();
    let exchange = chain.get(EXCHANGE_CONTRACT_NAME).await.unwrap();
    assert_eq!(exchange.address, report.exchange.address);
    assert_eq!(exchange.args, report.exchange.args);
    assert!(!exchange.newly_deployed);
}

#[tokio::test]
async fn invalid_config_sends_nothing() {
    let config = DeployConfig {
        approve_amount: parse_ether("0.01").unwrap(),
        ..Default::default()
    };
    let chain = MockChain::new();
    let err = deploy_dex(&chain, &chain, &config).await.unwrap_err();

    assert!(matches!(err, ScriptError::InvalidConfig(_)));
    assert!(chain.state().calls.is_empty());
}

#[tokio::test]
async fn insufficient_balance_reverts_init() {
    // Passes validation, but after the transfer the deployer holds less than
    // the exchange pulls
    let config = DeployConfig {
        init_token_amount: parse_ether("995").unwrap(),
        approve_amount: parse_ether("995").unwrap(),
        ..Default::default()
    };
    let chain = MockChain::new();
    let err = deploy_dex(&chain, &chain, &config).await.unwrap_err();

    assert_reverted_at(&err, DeployStep::InitExchange);
    let state = chain.state();
    assert!(state.total_liquidity.is_zero());
}
