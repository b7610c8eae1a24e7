// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet seed endpoints.

use axum::{extract::State, Json};
use tracing::warn;

use crate::{
    error::ApiError,
    models::{ImportWalletRequest, RegenerateWalletRequest, SeedResponse, WalletResponse},
    state::AppState,
};

async fn wallet_response(state: &AppState) -> WalletResponse {
    WalletResponse {
        address: state.session.address().await.to_string(),
        network: state.session.network(),
    }
}

/// Get the active account address and selected network.
#[utoipa::path(
    get,
    path = "/v1/wallet",
    tag = "Wallet",
    responses((status = 200, description = "Active account", body = WalletResponse))
)]
pub async fn get_wallet(State(state): State<AppState>) -> Json<WalletResponse> {
    Json(wallet_response(&state).await)
}

/// Reveal the mnemonic and its shareable link.
#[utoipa::path(
    get,
    path = "/v1/wallet/seed",
    tag = "Wallet",
    responses(
        (status = 200, description = "Seed revealed", body = SeedResponse),
        (status = 500, description = "Configured link base is not a URL")
    )
)]
pub async fn reveal_seed(State(state): State<AppState>) -> Result<Json<SeedResponse>, ApiError> {
    let mnemonic = state.session.mnemonic().await;
    let share_link = state.session.share_link().await?;
    warn!("Wallet seed revealed");
    Ok(Json(SeedResponse {
        mnemonic: mnemonic.phrase(),
        word_count: mnemonic.word_count(),
        share_link,
    }))
}

/// Replace the seed with an imported mnemonic.
///
/// The current seed is destroyed; requires `confirm: true`.
#[utoipa::path(
    post,
    path = "/v1/wallet/import",
    request_body = ImportWalletRequest,
    tag = "Wallet",
    responses(
        (status = 200, description = "Seed imported", body = WalletResponse),
        (status = 400, description = "Invalid mnemonic"),
        (status = 409, description = "Confirmation missing")
    )
)]
pub async fn import_wallet(
    State(state): State<AppState>,
    Json(request): Json<ImportWalletRequest>,
) -> Result<Json<WalletResponse>, ApiError> {
    if !request.confirm {
        return Err(ApiError::confirmation_required("Import"));
    }
    state.session.import(&request.mnemonic).await?;
    Ok(Json(wallet_response(&state).await))
}

/// Replace the seed with a freshly generated one.
///
/// The current seed is destroyed; requires `confirm: true`.
#[utoipa::path(
    post,
    path = "/v1/wallet/regenerate",
    request_body = RegenerateWalletRequest,
    tag = "Wallet",
    responses(
        (status = 200, description = "Seed regenerated", body = WalletResponse),
        (status = 409, description = "Confirmation missing")
    )
)]
pub async fn regenerate_wallet(
    State(state): State<AppState>,
    Json(request): Json<RegenerateWalletRequest>,
) -> Result<Json<WalletResponse>, ApiError> {
    if !request.confirm {
        return Err(ApiError::confirmation_required("Regenerate"));
    }
    state.session.regenerate().await?;
    Ok(Json(wallet_response(&state).await))
}
