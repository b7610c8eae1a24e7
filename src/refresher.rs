// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Balance Refresher
//!
//! Background task keeping the cached balances current.
//!
//! ## Strategy
//!
//! The refresher refreshes once on start, then again whenever:
//! 1. the selected network changes (pushed through the selector's watch
//!    channel), or
//! 2. the optional periodic interval elapses.
//!
//! Refreshes issued for a network that was deselected before they completed
//! are discarded by the aggregator.
//!
//! ## Shutdown
//!
//! Uses `tokio_util::sync::CancellationToken` for graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::balances::RefreshOutcome;
use crate::session::WalletSession;

pub struct BalanceRefresher {
    session: Arc<WalletSession>,
    interval: Option<Duration>,
}

impl BalanceRefresher {
    pub fn new(session: Arc<WalletSession>) -> Self {
        Self {
            session,
            interval: None,
        }
    }

    /// Also refresh every `interval`.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Run the refresh loop until the cancellation token is triggered.
    ///
    /// Should be spawned as a background task:
    /// ```rust,ignore
    /// tokio::spawn(refresher.run(shutdown.clone()));
    /// ```
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_secs = self.interval.map(|i| i.as_secs()),
            "Balance refresher starting"
        );

        let mut network_rx = self.session.selector().subscribe();
        network_rx.borrow_and_update();

        loop {
            if shutdown.is_cancelled() {
                info!("Balance refresher shutting down");
                return;
            }

            self.refresh_step().await;

            tokio::select! {
                changed = network_rx.changed() => {
                    if changed.is_err() {
                        info!("Network selector dropped, balance refresher stopping");
                        return;
                    }
                },
                _ = sleep_or_pending(self.interval) => {},
                _ = shutdown.cancelled() => {
                    info!("Balance refresher shutting down");
                    return;
                }
            }
        }
    }

    async fn refresh_step(&self) {
        match self.session.refresh_balances().await {
            RefreshOutcome::Applied(report) => {
                debug!(
                    network = %report.network,
                    failures = report.failures.len(),
                    "Background refresh applied"
                );
            }
            RefreshOutcome::Stale(reason) => {
                debug!(?reason, "Background refresh discarded");
            }
        }
    }
}

async fn sleep_or_pending(interval: Option<Duration>) {
    match interval {
        Some(interval) => tokio::time::sleep(interval).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::NetworkId;
    use crate::network::NetworkSelector;
    use crate::testing::{MockConnector, MockLedger, MockOracle, TEST_MNEMONIC};
    use crate::wallet::{InMemorySeedPersistence, SeedStore};
    use rust_decimal::Decimal;

    fn session(ledger: Arc<MockLedger>) -> Arc<WalletSession> {
        Arc::new(
            WalletSession::start(
                SeedStore::new(Arc::new(InMemorySeedPersistence::with_value(TEST_MNEMONIC))),
                Arc::new(MockConnector::single(ledger)),
                Arc::new(MockOracle::with_price(Decimal::ONE)),
                Arc::new(NetworkSelector::new(NetworkId::Devnet)),
                "https://tempwallet.xyz",
                None,
            )
            .unwrap(),
        )
    }

    async fn wait_for(mut condition: impl FnMut() -> bool) {
        for _ in 0..200 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached");
    }

    #[tokio::test]
    async fn refreshes_on_start_and_on_network_change() {
        let ledger = Arc::new(MockLedger::new().with_balance(7));
        let session = session(ledger.clone());
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(BalanceRefresher::new(session.clone()).run(shutdown.clone()));

        wait_for(|| session.balances().native.is_trusted_for(NetworkId::Devnet)).await;

        session.set_network(NetworkId::Testnet);
        wait_for(|| session.balances().native.is_trusted_for(NetworkId::Testnet)).await;
        assert_eq!(session.balances().native.raw_amount, 7);

        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn stops_when_cancelled() {
        let session = session(Arc::new(MockLedger::new()));
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        tokio::time::timeout(
            Duration::from_secs(1),
            BalanceRefresher::new(session).with_interval(Duration::from_secs(60)).run(shutdown),
        )
        .await
        .unwrap();
    }
}
