// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Solana integration.
//!
//! This module provides functionality for:
//! - Deriving the signing account from a mnemonic
//! - Querying native SOL and SPL token balances
//! - Building, signing and broadcasting transfers

pub mod client;
pub mod signing;
pub mod spl;
pub mod transactions;
pub mod types;

pub use client::{
    units_to_decimal, LedgerConnector, LedgerError, LedgerRpc, RpcEndpoints, SolanaConnector,
    SolanaRpcClient, TokenAmount,
};
pub use signing::{account_from_seed, derive, Account, DerivationError};
pub use transactions::{
    to_smallest_units, TransferEngine, TransferFailureReason, TransferReceipt, TransferRequest,
    TransferSubmissionFailure,
};
pub use types::*;
