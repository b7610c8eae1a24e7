// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! External price providers.

pub mod solscan;

use async_trait::async_trait;
use rust_decimal::Decimal;

pub use solscan::{SolscanClient, DEFAULT_PRICE_API_BASE_URL};

/// Best-effort unit price source, quoted in USD.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// Unit price of the asset identified by `asset` (a mint address).
    async fn get_price(&self, asset: &str) -> Result<Decimal, PriceError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PriceError {
    #[error("Price request failed: {0}")]
    Request(String),

    #[error("Price response was invalid: {0}")]
    InvalidResponse(String),
}
