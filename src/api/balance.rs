// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Balance endpoints.

use axum::{extract::State, Json};

use crate::{
    balances::{BalanceReport, RefreshOutcome},
    models::RefreshResponse,
    state::AppState,
};

/// Cached balances for the selected network.
///
/// Balances not yet refreshed on this network are reported as zero.
#[utoipa::path(
    get,
    path = "/v1/balances",
    tag = "Balances",
    responses((status = 200, description = "Cached balances", body = BalanceReport))
)]
pub async fn get_balances(State(state): State<AppState>) -> Json<BalanceReport> {
    Json(state.session.balances())
}

/// Query balances and price now.
///
/// Individual query failures are listed in `failures`; the request itself
/// always succeeds.
#[utoipa::path(
    post,
    path = "/v1/balances/refresh",
    tag = "Balances",
    responses((status = 200, description = "Refresh result", body = RefreshResponse))
)]
pub async fn refresh_balances(State(state): State<AppState>) -> Json<RefreshResponse> {
    let response = match state.session.refresh_balances().await {
        RefreshOutcome::Applied(balances) => RefreshResponse {
            applied: true,
            balances,
        },
        RefreshOutcome::Stale(_) => RefreshResponse {
            applied: false,
            balances: state.session.balances(),
        },
    };
    Json(response)
}
