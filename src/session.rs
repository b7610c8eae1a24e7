// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The running wallet session.
//!
//! Owns the active mnemonic and account together with the components that
//! depend on them. The account is replaced only at startup, on import and on
//! regenerate; each replacement resets the cached balances.

use std::sync::Arc;

use solana_sdk::pubkey::Pubkey;
use tokio::sync::RwLock;
use tracing::info;

use crate::{
    balances::{BalanceAggregator, BalanceReport, RefreshOutcome},
    blockchain::{
        derive, Account, DerivationError, LedgerConnector, NetworkId, TransferEngine,
        TransferReceipt, TransferRequest, TransferSubmissionFailure,
    },
    network::NetworkSelector,
    providers::PriceOracle,
    wallet::{share_link, MnemonicPhrase, SeedError, SeedStore},
};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Seed(#[from] SeedError),

    #[error("Account derivation failed: {0}")]
    Derivation(#[from] DerivationError),
}

struct ActiveWallet {
    mnemonic: MnemonicPhrase,
    account: Arc<Account>,
}

impl ActiveWallet {
    fn from_mnemonic(mnemonic: MnemonicPhrase) -> Result<Self, DerivationError> {
        let account = Arc::new(derive(&mnemonic)?);
        Ok(Self { mnemonic, account })
    }
}

pub struct WalletSession {
    seeds: SeedStore,
    selector: Arc<NetworkSelector>,
    balances: Arc<BalanceAggregator>,
    transfers: TransferEngine,
    base_url: String,
    active: RwLock<ActiveWallet>,
}

impl WalletSession {
    /// Resolve the seed, derive the account and wire up the components.
    pub fn start(
        seeds: SeedStore,
        connector: Arc<dyn LedgerConnector>,
        oracle: Arc<dyn PriceOracle>,
        selector: Arc<NetworkSelector>,
        base_url: impl Into<String>,
        link_param: Option<&str>,
    ) -> Result<Self, SessionError> {
        let resolved = seeds.resolve(link_param)?;
        let active = ActiveWallet::from_mnemonic(resolved.mnemonic)?;

        let balances = Arc::new(BalanceAggregator::new(
            connector.clone(),
            oracle,
            selector.clone(),
        ));
        balances.reset(active.account.address());

        info!(
            address = %active.account.address(),
            source = ?resolved.source,
            network = %selector.current(),
            "Wallet session started"
        );

        Ok(Self {
            seeds,
            selector,
            balances,
            transfers: TransferEngine::new(connector),
            base_url: base_url.into(),
            active: RwLock::new(active),
        })
    }

    pub async fn address(&self) -> Pubkey {
        self.active.read().await.account.address()
    }

    pub async fn account(&self) -> Arc<Account> {
        self.active.read().await.account.clone()
    }

    /// The active mnemonic. Reveals the secret; callers decide who sees it.
    pub async fn mnemonic(&self) -> MnemonicPhrase {
        self.active.read().await.mnemonic.clone()
    }

    pub async fn share_link(&self) -> Result<String, SessionError> {
        let active = self.active.read().await;
        Ok(share_link(&self.base_url, &active.mnemonic)?)
    }

    /// Replace the seed with `phrase`. The previous seed is lost.
    pub async fn import(&self, phrase: &str) -> Result<Pubkey, SessionError> {
        let mnemonic = self.seeds.import(phrase)?;
        self.replace(mnemonic).await
    }

    /// Replace the seed with a freshly generated one. The previous seed is lost.
    pub async fn regenerate(&self) -> Result<Pubkey, SessionError> {
        let mnemonic = self.seeds.regenerate()?;
        self.replace(mnemonic).await
    }

    async fn replace(&self, mnemonic: MnemonicPhrase) -> Result<Pubkey, SessionError> {
        let next = ActiveWallet::from_mnemonic(mnemonic)?;
        let address = next.account.address();

        let mut active = self.active.write().await;
        *active = next;
        self.balances.reset(address);
        drop(active);

        info!(%address, "Wallet account replaced");
        Ok(address)
    }

    pub fn network(&self) -> NetworkId {
        self.selector.current()
    }

    pub fn set_network(&self, network: NetworkId) -> bool {
        self.selector.set_network(network)
    }

    pub fn selector(&self) -> &Arc<NetworkSelector> {
        &self.selector
    }

    /// Refresh balances for the active account on the selected network.
    pub async fn refresh_balances(&self) -> RefreshOutcome {
        let account = self.account().await;
        self.balances.refresh(&account, self.selector.current()).await
    }

    /// Cached balances for the selected network.
    pub fn balances(&self) -> BalanceReport {
        self.balances.snapshot()
    }

    /// Submit a transfer from the active account. Balances are refreshed
    /// after a confirmed transfer.
    pub async fn transfer(
        &self,
        request: &TransferRequest,
    ) -> Result<Option<TransferReceipt>, TransferSubmissionFailure> {
        let account = self.account().await;
        let network = self.selector.current();
        let receipt = self.transfers.transfer(Some(&account), network, request).await?;

        if receipt.is_some() {
            self.balances.refresh(&account, network).await;
        }
        Ok(receipt)
    }
}
