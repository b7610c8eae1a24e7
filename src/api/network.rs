// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use crate::{
    models::{NetworkResponse, SetNetworkRequest},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/v1/network",
    tag = "Network",
    responses((status = 200, description = "Selected network", body = NetworkResponse))
)]
pub async fn get_network(State(state): State<AppState>) -> Json<NetworkResponse> {
    Json(state.session.network().into())
}

/// Select the active network. Cached balances of other networks are no
/// longer reported; the background refresher picks up the change.
#[utoipa::path(
    put,
    path = "/v1/network",
    request_body = SetNetworkRequest,
    tag = "Network",
    responses((status = 200, description = "Network selected", body = NetworkResponse))
)]
pub async fn set_network(
    State(state): State<AppState>,
    Json(request): Json<SetNetworkRequest>,
) -> Json<NetworkResponse> {
    state.session.set_network(request.network);
    Json(state.session.network().into())
}
