// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Solscan public market API as a price oracle.
//!
//! Unauthenticated and rate-unbounded from our side; failures are expected
//! and callers fall back to the last known quote.

use std::{str::FromStr, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{PriceError, PriceOracle};

pub const DEFAULT_PRICE_API_BASE_URL: &str = "https://public-api.solscan.io";

#[derive(Debug, Clone)]
pub struct SolscanClient {
    base_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct MarketTokenResponse {
    #[serde(rename = "priceUsdt")]
    price_usdt: Option<Value>,
}

impl SolscanClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, PriceError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| PriceError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    fn market_url(&self, asset: &str) -> String {
        format!("{}/market/token/{asset}", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl PriceOracle for SolscanClient {
    async fn get_price(&self, asset: &str) -> Result<Decimal, PriceError> {
        let url = self.market_url(asset);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| PriceError::Request(format!("GET {url} failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PriceError::Request(format!(
                "GET {url} returned {status}: {body}"
            )));
        }

        let body: MarketTokenResponse = response
            .json()
            .await
            .map_err(|e| PriceError::InvalidResponse(format!("GET {url} invalid JSON: {e}")))?;

        let price = body
            .price_usdt
            .as_ref()
            .and_then(parse_price)
            .ok_or_else(|| PriceError::InvalidResponse("missing priceUsdt".to_string()))?;

        debug!(asset, %price, "Fetched price quote");
        Ok(price)
    }
}

/// Accepts `priceUsdt` as a JSON number or numeric string.
fn parse_price(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
        .filter(|price| !price.is_sign_negative())
}
