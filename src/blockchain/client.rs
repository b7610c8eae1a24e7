// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Solana RPC client for ledger interactions.
//!
//! The engine talks to the ledger only through [`LedgerRpc`]; the production
//! implementation wraps the nonblocking `solana-client` RPC client.

use std::{str::FromStr, sync::Arc};

use async_trait::async_trait;
use rust_decimal::Decimal;
use solana_client::{nonblocking::rpc_client::RpcClient, rpc_request::TokenAccountsFilter};
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey, signature::Signature,
    transaction::Transaction,
};

use super::types::NetworkId;

/// Token account balance in smallest units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAmount {
    pub raw: u64,
    pub decimals: u8,
}

impl TokenAmount {
    pub fn zero(decimals: u8) -> Self {
        Self { raw: 0, decimals }
    }

    /// Amount in display units.
    pub fn ui_amount(&self) -> Decimal {
        units_to_decimal(self.raw, self.decimals)
    }
}

/// Remote ledger operations for one network.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Native balance in lamports.
    async fn get_balance(&self, address: &Pubkey) -> Result<u64, LedgerError>;

    /// Token accounts held by `owner` for `mint`.
    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> Result<Vec<Pubkey>, LedgerError>;

    async fn get_token_account_balance(&self, account: &Pubkey)
        -> Result<TokenAmount, LedgerError>;

    async fn account_exists(&self, address: &Pubkey) -> Result<bool, LedgerError>;

    async fn latest_blockhash(&self) -> Result<Hash, LedgerError>;

    /// Broadcast a signed transaction and wait until it is confirmed.
    async fn send_and_confirm_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<Signature, LedgerError>;
}

/// Hands out the ledger client for a given network.
pub trait LedgerConnector: Send + Sync {
    fn connect(&self, network: NetworkId) -> Arc<dyn LedgerRpc>;
}

/// Solana JSON-RPC client bound to one cluster.
pub struct SolanaRpcClient {
    network: NetworkId,
    rpc: RpcClient,
}

impl SolanaRpcClient {
    /// Create a client for `network` at `rpc_url`, using `confirmed` commitment.
    pub fn new(network: NetworkId, rpc_url: &str) -> Result<Self, LedgerError> {
        url::Url::parse(rpc_url).map_err(|e| LedgerError::InvalidRpcUrl(e.to_string()))?;

        let rpc = RpcClient::new_with_commitment(rpc_url.to_string(), CommitmentConfig::confirmed());

        Ok(Self { network, rpc })
    }

    pub fn network(&self) -> NetworkId {
        self.network
    }
}

#[async_trait]
impl LedgerRpc for SolanaRpcClient {
    async fn get_balance(&self, address: &Pubkey) -> Result<u64, LedgerError> {
        self.rpc
            .get_balance(address)
            .await
            .map_err(|e| LedgerError::RpcError(e.to_string()))
    }

    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> Result<Vec<Pubkey>, LedgerError> {
        let accounts = self
            .rpc
            .get_token_accounts_by_owner(owner, TokenAccountsFilter::Mint(*mint))
            .await
            .map_err(|e| LedgerError::RpcError(e.to_string()))?;

        accounts
            .iter()
            .map(|keyed| {
                Pubkey::from_str(&keyed.pubkey)
                    .map_err(|e| LedgerError::InvalidResponse(format!("token account key: {e}")))
            })
            .collect()
    }

    async fn get_token_account_balance(
        &self,
        account: &Pubkey,
    ) -> Result<TokenAmount, LedgerError> {
        let amount = self
            .rpc
            .get_token_account_balance(account)
            .await
            .map_err(|e| LedgerError::RpcError(e.to_string()))?;

        let raw = amount
            .amount
            .parse::<u64>()
            .map_err(|e| LedgerError::InvalidResponse(format!("token amount: {e}")))?;

        Ok(TokenAmount {
            raw,
            decimals: amount.decimals,
        })
    }

    async fn account_exists(&self, address: &Pubkey) -> Result<bool, LedgerError> {
        let response = self
            .rpc
            .get_account_with_commitment(address, self.rpc.commitment())
            .await
            .map_err(|e| LedgerError::RpcError(e.to_string()))?;
        Ok(response.value.is_some())
    }

    async fn latest_blockhash(&self) -> Result<Hash, LedgerError> {
        self.rpc
            .get_latest_blockhash()
            .await
            .map_err(|e| LedgerError::RpcError(format!("Failed to get blockhash: {e}")))
    }

    async fn send_and_confirm_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<Signature, LedgerError> {
        self.rpc
            .send_and_confirm_transaction(transaction)
            .await
            .map_err(|e| LedgerError::TransactionFailed(e.to_string()))
    }
}

/// RPC endpoint per network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcEndpoints {
    pub mainnet: String,
    pub devnet: String,
    pub testnet: String,
}

impl Default for RpcEndpoints {
    fn default() -> Self {
        Self {
            mainnet: NetworkId::MainnetBeta.config().rpc_url.to_string(),
            devnet: NetworkId::Devnet.config().rpc_url.to_string(),
            testnet: NetworkId::Testnet.config().rpc_url.to_string(),
        }
    }
}

/// Connector holding one RPC client per cluster.
pub struct SolanaConnector {
    mainnet: Arc<SolanaRpcClient>,
    devnet: Arc<SolanaRpcClient>,
    testnet: Arc<SolanaRpcClient>,
}

impl SolanaConnector {
    pub fn new(endpoints: &RpcEndpoints) -> Result<Self, LedgerError> {
        Ok(Self {
            mainnet: Arc::new(SolanaRpcClient::new(NetworkId::MainnetBeta, &endpoints.mainnet)?),
            devnet: Arc::new(SolanaRpcClient::new(NetworkId::Devnet, &endpoints.devnet)?),
            testnet: Arc::new(SolanaRpcClient::new(NetworkId::Testnet, &endpoints.testnet)?),
        })
    }
}

impl LedgerConnector for SolanaConnector {
    fn connect(&self, network: NetworkId) -> Arc<dyn LedgerRpc> {
        match network {
            NetworkId::MainnetBeta => self.mainnet.clone(),
            NetworkId::Devnet => self.devnet.clone(),
            NetworkId::Testnet => self.testnet.clone(),
        }
    }
}

/// Convert smallest units to display units.
pub fn units_to_decimal(raw: u64, decimals: u8) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(raw), u32::from(decimals)).normalize()
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LedgerError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid instruction: {0}")]
    InvalidInstruction(String),

    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),
}
