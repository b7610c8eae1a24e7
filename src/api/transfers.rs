// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transfer submission endpoint.

use axum::{extract::State, Json};

use crate::{
    error::ApiError,
    models::{CreateTransferRequest, TransferResponse},
    state::AppState,
};

/// Send SOL or USDC from the active account on the selected network.
///
/// Requests with an empty destination or a non-positive amount (or one below
/// the asset's smallest unit) are skipped and return `submitted: false`.
/// Submission failures are reported with the asset, amount and destination.
#[utoipa::path(
    post,
    path = "/v1/transfers",
    request_body = CreateTransferRequest,
    tag = "Transfers",
    responses(
        (status = 200, description = "Transfer confirmed or skipped", body = TransferResponse),
        (status = 502, description = "Transfer failed")
    )
)]
pub async fn create_transfer(
    State(state): State<AppState>,
    Json(request): Json<CreateTransferRequest>,
) -> Result<Json<TransferResponse>, ApiError> {
    let receipt = state.session.transfer(&request.into()).await?;
    Ok(Json(TransferResponse {
        submitted: receipt.is_some(),
        receipt,
    }))
}
