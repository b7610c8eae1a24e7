// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Balance Aggregation
//!
//! A refresh issues three independent queries concurrently:
//!
//! 1. native SOL balance of the account,
//! 2. SOL price quote from the price oracle,
//! 3. USDC balance, via the token accounts the account holds for the
//!    network's USDC mint.
//!
//! Each query may fail on its own. A failed balance keeps the last value
//! refreshed on the same network (otherwise zero); a failed price keeps the
//! previous quote. Failures are returned in the report, never escalated.
//!
//! Every refresh is tagged with the network and account it was issued for.
//! Results that complete after either has changed are discarded.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use crate::{
    blockchain::{
        spl, Account, AssetKind, LedgerConnector, LedgerRpc, NetworkId, TokenAmount,
        NATIVE_DECIMALS, USDC_TOKEN, WRAPPED_SOL_MINT,
    },
    network::NetworkSelector,
    providers::PriceOracle,
};

/// USDC is valued 1:1 in the reference currency.
const TOKEN_REFERENCE_PRICE: Decimal = Decimal::ONE;

/// Balance of one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AssetBalance {
    pub kind: AssetKind,
    /// Balance in smallest units
    pub raw_amount: u64,
    /// Balance in display units
    pub display_amount: Decimal,
    /// Network the balance was last refreshed on, `None` if never
    pub last_refreshed_network: Option<NetworkId>,
}

impl AssetBalance {
    pub fn empty(kind: AssetKind) -> Self {
        Self {
            kind,
            raw_amount: 0,
            display_amount: Decimal::ZERO,
            last_refreshed_network: None,
        }
    }

    fn refreshed(kind: AssetKind, amount: TokenAmount, network: NetworkId) -> Self {
        Self {
            kind,
            raw_amount: amount.raw,
            display_amount: amount.ui_amount(),
            last_refreshed_network: Some(network),
        }
    }

    pub fn is_trusted_for(&self, network: NetworkId) -> bool {
        self.last_refreshed_network == Some(network)
    }

    /// This balance if it belongs to `network`, zero otherwise.
    pub fn view_for(&self, network: NetworkId) -> AssetBalance {
        if self.is_trusted_for(network) {
            self.clone()
        } else {
            AssetBalance::empty(self.kind)
        }
    }
}

/// Unit price of an asset in USD.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PriceQuote {
    pub asset: String,
    pub unit_price: Decimal,
    /// When the quote was fetched, `None` if never
    pub as_of: Option<DateTime<Utc>>,
}

impl PriceQuote {
    fn missing() -> Self {
        Self {
            asset: WRAPPED_SOL_MINT.to_string(),
            unit_price: Decimal::ZERO,
            as_of: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BalanceQuery {
    Native,
    Token,
    Price,
}

/// A query that failed during one refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema, thiserror::Error)]
#[error("{query:?} query failed on {network}: {reason}")]
pub struct BalanceQueryFailure {
    pub query: BalanceQuery,
    pub network: NetworkId,
    pub reason: String,
}

/// Balances and price as seen on one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BalanceReport {
    pub network: NetworkId,
    pub native: AssetBalance,
    pub token: AssetBalance,
    pub price: PriceQuote,
    /// Native value plus token value, in USD
    pub total_value: Decimal,
    pub failures: Vec<BalanceQueryFailure>,
}

impl BalanceReport {
    pub fn native_value(&self) -> Decimal {
        self.native.display_amount * self.price.unit_price
    }

    pub fn token_value(&self) -> Decimal {
        self.token.display_amount * TOKEN_REFERENCE_PRICE
    }
}

/// Why a refresh result was thrown away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
    NetworkChanged {
        issued_for: NetworkId,
        current: NetworkId,
    },
    AccountChanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied(BalanceReport),
    Stale(StaleReason),
}

struct CachedBalances {
    owner: Option<Pubkey>,
    native: AssetBalance,
    token: AssetBalance,
    price: PriceQuote,
}

impl CachedBalances {
    fn new(owner: Option<Pubkey>) -> Self {
        Self {
            owner,
            native: AssetBalance::empty(AssetKind::Native),
            token: AssetBalance::empty(AssetKind::Token),
            price: PriceQuote::missing(),
        }
    }

    fn report(&self, network: NetworkId, failures: Vec<BalanceQueryFailure>) -> BalanceReport {
        let mut report = BalanceReport {
            network,
            native: self.native.view_for(network),
            token: self.token.view_for(network),
            price: self.price.clone(),
            total_value: Decimal::ZERO,
            failures,
        };
        report.total_value = report.native_value() + report.token_value();
        report
    }
}

/// Queries and caches the account's balances.
pub struct BalanceAggregator {
    connector: Arc<dyn LedgerConnector>,
    oracle: Arc<dyn PriceOracle>,
    selector: Arc<NetworkSelector>,
    cache: Mutex<CachedBalances>,
}

impl BalanceAggregator {
    pub fn new(
        connector: Arc<dyn LedgerConnector>,
        oracle: Arc<dyn PriceOracle>,
        selector: Arc<NetworkSelector>,
    ) -> Self {
        Self {
            connector,
            oracle,
            selector,
            cache: Mutex::new(CachedBalances::new(None)),
        }
    }

    /// Forget cached balances and track `owner` from now on.
    ///
    /// The price quote is account independent and survives.
    pub fn reset(&self, owner: Pubkey) {
        let mut cache = self.lock();
        let price = cache.price.clone();
        *cache = CachedBalances::new(Some(owner));
        cache.price = price;
    }

    /// Cached view for the currently selected network.
    pub fn snapshot(&self) -> BalanceReport {
        self.lock().report(self.selector.current(), Vec::new())
    }

    /// Query all sources for `account` on `network` and apply the results.
    pub async fn refresh(&self, account: &Account, network: NetworkId) -> RefreshOutcome {
        let owner = account.address();
        let ledger = self.connector.connect(network);

        let (native, price, token) = tokio::join!(
            query_native(ledger.as_ref(), &owner),
            self.oracle.get_price(WRAPPED_SOL_MINT),
            query_token(ledger.as_ref(), &owner, network),
        );

        let current = self.selector.current();
        if current != network {
            debug!(issued_for = %network, %current, "Discarding stale balance refresh");
            return RefreshOutcome::Stale(StaleReason::NetworkChanged {
                issued_for: network,
                current,
            });
        }

        let mut cache = self.lock();
        if cache.owner.is_some_and(|tracked| tracked != owner) {
            debug!(%owner, "Discarding balance refresh for replaced account");
            return RefreshOutcome::Stale(StaleReason::AccountChanged);
        }
        cache.owner = Some(owner);

        let mut failures = Vec::new();

        match native {
            Ok(amount) => cache.native = AssetBalance::refreshed(AssetKind::Native, amount, network),
            Err(reason) => {
                if !cache.native.is_trusted_for(network) {
                    cache.native = AssetBalance::empty(AssetKind::Native);
                }
                failures.push(failure(BalanceQuery::Native, network, reason));
            }
        }

        match token {
            Ok(amount) => cache.token = AssetBalance::refreshed(AssetKind::Token, amount, network),
            Err(reason) => {
                if !cache.token.is_trusted_for(network) {
                    cache.token = AssetBalance::empty(AssetKind::Token);
                }
                failures.push(failure(BalanceQuery::Token, network, reason));
            }
        }

        match price {
            Ok(unit_price) => {
                cache.price = PriceQuote {
                    asset: WRAPPED_SOL_MINT.to_string(),
                    unit_price,
                    as_of: Some(Utc::now()),
                }
            }
            Err(e) => failures.push(failure(BalanceQuery::Price, network, e.to_string())),
        }

        let report = cache.report(network, failures);
        info!(
            network = %network,
            native = %report.native.display_amount,
            token = %report.token.display_amount,
            total_value = %report.total_value,
            failures = report.failures.len(),
            "Balances refreshed"
        );
        RefreshOutcome::Applied(report)
    }

    fn lock(&self) -> MutexGuard<'_, CachedBalances> {
        // The guarded data stays consistent even if a holder panicked.
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

async fn query_native(ledger: &dyn LedgerRpc, owner: &Pubkey) -> Result<TokenAmount, String> {
    ledger
        .get_balance(owner)
        .await
        .map(|lamports| TokenAmount {
            raw: lamports,
            decimals: NATIVE_DECIMALS,
        })
        .map_err(|e| e.to_string())
}

async fn query_token(
    ledger: &dyn LedgerRpc,
    owner: &Pubkey,
    network: NetworkId,
) -> Result<TokenAmount, String> {
    let mint = spl::token_mint(&USDC_TOKEN, network).map_err(|e| e.to_string())?;
    spl::token_balance(ledger, owner, &mint, USDC_TOKEN.decimals)
        .await
        .map_err(|e| e.to_string())
}

fn failure(query: BalanceQuery, network: NetworkId, reason: String) -> BalanceQueryFailure {
    warn!(?query, network = %network, error = %reason, "Balance query failed");
    BalanceQueryFailure {
        query,
        network,
        reason,
    }
}
