// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Burner Wallet - Hot Solana Wallet Engine
//!
//! A single account derived from a BIP-39 mnemonic, SOL and USDC balances
//! across the selectable Solana clusters, and native and SPL token transfers.
//!
//! ## Modules
//!
//! - `wallet` - Mnemonic parsing, generation, precedence and shareable links
//! - `storage` - Seed persistence (redb)
//! - `blockchain` - Account derivation, ledger RPC, SPL tokens, transfers
//! - `network` - Active network selection with change notification
//! - `providers` - Price oracle (Solscan)
//! - `balances` - Concurrent balance aggregation with a stale-response guard
//! - `session` - The running wallet session
//! - `refresher` - Background balance refresh
//! - `api` - HTTP API handlers (Axum)

pub mod api;
pub mod balances;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod network;
pub mod providers;
pub mod refresher;
pub mod session;
pub mod state;
pub mod storage;
pub mod wallet;

#[cfg(test)]
pub(crate) mod testing;
