// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. Domain types that cross the
//! boundary unchanged (`BalanceReport`, `TransferReceipt`) are documented where
//! they are defined.
//!
//! ## Destructive Requests
//!
//! Import and regenerate replace the only copy of the seed. Both bodies carry
//! a `confirm` flag that must be `true`; it defaults to `false` when omitted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    balances::BalanceReport,
    blockchain::{AssetKind, NetworkId, TransferReceipt, TransferRequest, USDC_TOKEN},
};

// =============================================================================
// Wallet
// =============================================================================

/// The active account.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct WalletResponse {
    /// Base58 public address
    pub address: String,
    pub network: NetworkId,
}

/// The revealed seed.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SeedResponse {
    pub mnemonic: String,
    pub word_count: usize,
    /// Link that restores this wallet on another device
    pub share_link: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ImportWalletRequest {
    pub mnemonic: String,
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RegenerateWalletRequest {
    #[serde(default)]
    pub confirm: bool,
}

// =============================================================================
// Network
// =============================================================================

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct NetworkResponse {
    pub network: NetworkId,
    /// Human-readable cluster name
    pub name: String,
    /// Tracked token, e.g. `USDC`
    pub token_symbol: String,
    pub token_name: String,
    /// Mint of the tracked token on this network
    pub token_mint: String,
}

impl From<NetworkId> for NetworkResponse {
    fn from(network: NetworkId) -> Self {
        Self {
            network,
            name: network.config().name.to_string(),
            token_symbol: USDC_TOKEN.symbol.to_string(),
            token_name: USDC_TOKEN.name.to_string(),
            token_mint: USDC_TOKEN.mint_for(network).to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetNetworkRequest {
    pub network: NetworkId,
}

// =============================================================================
// Balances
// =============================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RefreshResponse {
    /// `false` when the refresh completed after a network or account change
    /// and its results were discarded
    pub applied: bool,
    pub balances: BalanceReport,
}

// =============================================================================
// Transfers
// =============================================================================

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateTransferRequest {
    pub asset: AssetKind,
    /// Destination address
    pub to: String,
    /// Amount in display units, e.g. `"1.5"`
    #[schema(value_type = String)]
    pub amount: Decimal,
}

impl From<CreateTransferRequest> for TransferRequest {
    fn from(request: CreateTransferRequest) -> Self {
        TransferRequest {
            asset: request.asset,
            destination: request.to,
            amount: request.amount,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TransferResponse {
    /// `false` when the request was skipped without contacting the network
    pub submitted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<TransferReceipt>,
}
