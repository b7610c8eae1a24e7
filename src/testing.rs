// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process doubles for the ledger and the price oracle.

use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use rust_decimal::Decimal;
use solana_sdk::{
    hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction,
};
use tokio::sync::Notify;

use crate::blockchain::{
    derive, Account, LedgerConnector, LedgerError, LedgerRpc, NetworkId, TokenAmount,
};
use crate::providers::{PriceError, PriceOracle};
use crate::wallet::MnemonicPhrase;

pub const TEST_MNEMONIC: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

pub const OTHER_MNEMONIC: &str =
    "legal winner thank year wave sausage worth useful legal winner thank yellow";

pub fn test_account() -> Account {
    derive(&MnemonicPhrase::parse(TEST_MNEMONIC).unwrap()).unwrap()
}

type Hook = Box<dyn Fn() + Send + Sync>;

/// How long a held balance query waits for the token query to start.
const OVERLAP_WAIT: Duration = Duration::from_millis(500);

struct LedgerState {
    balance: Result<u64, String>,
    token_accounts: Vec<Pubkey>,
    token_failure: Option<String>,
    token_balance: TokenAmount,
    existing_accounts: Vec<Pubkey>,
    send_failure: Option<String>,
    queried_mints: Vec<Pubkey>,
    sent: Vec<Transaction>,
}

/// Scripted ledger. Counts every call so tests can assert on network use.
pub struct MockLedger {
    state: Mutex<LedgerState>,
    on_balance: Mutex<Option<Hook>>,
    hold_balance: AtomicBool,
    token_query_started: Notify,
    calls: AtomicUsize,
    token_balance_calls: AtomicUsize,
}

impl MockLedger {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LedgerState {
                balance: Ok(0),
                token_accounts: Vec::new(),
                token_failure: None,
                token_balance: TokenAmount::zero(6),
                existing_accounts: Vec::new(),
                send_failure: None,
                queried_mints: Vec::new(),
                sent: Vec::new(),
            }),
            on_balance: Mutex::new(None),
            hold_balance: AtomicBool::new(false),
            token_query_started: Notify::new(),
            calls: AtomicUsize::new(0),
            token_balance_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_balance(self, lamports: u64) -> Self {
        self.state.lock().unwrap().balance = Ok(lamports);
        self
    }

    pub fn with_token_accounts(self, accounts: Vec<Pubkey>) -> Self {
        self.state.lock().unwrap().token_accounts = accounts;
        self
    }

    pub fn with_token_balance(self, amount: TokenAmount) -> Self {
        self.state.lock().unwrap().token_balance = amount;
        self
    }

    pub fn with_existing_account(self, address: Pubkey) -> Self {
        self.state.lock().unwrap().existing_accounts.push(address);
        self
    }

    pub fn with_send_failure(self, reason: &str) -> Self {
        self.state.lock().unwrap().send_failure = Some(reason.to_string());
        self
    }

    /// Make subsequent native balance queries fail.
    pub fn fail_balance(&self, reason: &str) {
        self.state.lock().unwrap().balance = Err(reason.to_string());
    }

    /// Make subsequent token account lookups fail.
    pub fn fail_token(&self, reason: &str) {
        self.state.lock().unwrap().token_failure = Some(reason.to_string());
    }

    /// Hold native balance queries until a token account lookup has started.
    ///
    /// A held query that sees no token lookup within 500 ms fails, so a
    /// caller issuing the two one after the other gets a native failure.
    pub fn hold_balance_until_token_query(&self) {
        self.hold_balance.store(true, Ordering::SeqCst);
    }

    /// Run `hook` inside every native balance query, before it answers.
    pub fn on_balance_query(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.on_balance.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn total_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn token_balance_calls(&self) -> usize {
        self.token_balance_calls.load(Ordering::SeqCst)
    }

    pub fn queried_mints(&self) -> Vec<Pubkey> {
        self.state.lock().unwrap().queried_mints.clone()
    }

    pub fn sent_transactions(&self) -> Vec<Transaction> {
        self.state.lock().unwrap().sent.clone()
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerRpc for MockLedger {
    async fn get_balance(&self, _address: &Pubkey) -> Result<u64, LedgerError> {
        self.record_call();
        if self.hold_balance.load(Ordering::SeqCst)
            && tokio::time::timeout(OVERLAP_WAIT, self.token_query_started.notified())
                .await
                .is_err()
        {
            return Err(LedgerError::RpcError(
                "token query did not start while the balance query was pending".to_string(),
            ));
        }
        if let Some(hook) = self.on_balance.lock().unwrap().as_ref() {
            hook();
        }
        self.state
            .lock()
            .unwrap()
            .balance
            .clone()
            .map_err(LedgerError::RpcError)
    }

    async fn get_token_accounts_by_owner(
        &self,
        _owner: &Pubkey,
        mint: &Pubkey,
    ) -> Result<Vec<Pubkey>, LedgerError> {
        self.record_call();
        self.token_query_started.notify_one();
        let mut state = self.state.lock().unwrap();
        state.queried_mints.push(*mint);
        match &state.token_failure {
            Some(reason) => Err(LedgerError::RpcError(reason.clone())),
            None => Ok(state.token_accounts.clone()),
        }
    }

    async fn get_token_account_balance(
        &self,
        _account: &Pubkey,
    ) -> Result<TokenAmount, LedgerError> {
        self.record_call();
        self.token_balance_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.state.lock().unwrap().token_balance)
    }

    async fn account_exists(&self, address: &Pubkey) -> Result<bool, LedgerError> {
        self.record_call();
        Ok(self.state.lock().unwrap().existing_accounts.contains(address))
    }

    async fn latest_blockhash(&self) -> Result<Hash, LedgerError> {
        self.record_call();
        Ok(Hash::new_unique())
    }

    async fn send_and_confirm_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<Signature, LedgerError> {
        self.record_call();
        let mut state = self.state.lock().unwrap();
        if let Some(reason) = &state.send_failure {
            return Err(LedgerError::TransactionFailed(reason.clone()));
        }
        state.sent.push(transaction.clone());
        Ok(transaction.signatures[0])
    }
}

/// Serves the same ledger for every network.
pub struct MockConnector {
    ledger: Arc<MockLedger>,
}

impl MockConnector {
    pub fn single(ledger: Arc<MockLedger>) -> Self {
        Self { ledger }
    }
}

impl LedgerConnector for MockConnector {
    fn connect(&self, _network: NetworkId) -> Arc<dyn LedgerRpc> {
        self.ledger.clone()
    }
}

/// Price oracle answering with a fixed price, or failing when unset.
#[derive(Clone)]
pub struct MockOracle {
    price: Arc<Mutex<Option<Decimal>>>,
}

impl MockOracle {
    pub fn with_price(price: Decimal) -> Self {
        Self {
            price: Arc::new(Mutex::new(Some(price))),
        }
    }

    pub fn failing() -> Self {
        Self {
            price: Arc::new(Mutex::new(None)),
        }
    }

    pub fn set_price(&self, price: Option<Decimal>) {
        *self.price.lock().unwrap() = price;
    }
}

#[async_trait]
impl PriceOracle for MockOracle {
    async fn get_price(&self, _asset: &str) -> Result<Decimal, PriceError> {
        let price = *self.price.lock().unwrap();
        price.ok_or_else(|| PriceError::Request("price service unavailable".to_string()))
    }
}
