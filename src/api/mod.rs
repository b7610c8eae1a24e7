// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    balances::{AssetBalance, BalanceQuery, BalanceQueryFailure, BalanceReport, PriceQuote},
    blockchain::{AssetKind, NetworkId, TransferReceipt},
    models::{
        CreateTransferRequest, ImportWalletRequest, NetworkResponse, RefreshResponse,
        RegenerateWalletRequest, SeedResponse, SetNetworkRequest, TransferResponse,
        WalletResponse,
    },
    state::AppState,
};

pub mod balance;
pub mod health;
pub mod network;
pub mod transfers;
pub mod wallet;

/// CORS restricted to the given origins.
///
/// The API hands out the seed and signs transfers without further
/// authentication, so other origins must never read its responses.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter(|origin| origin.as_str() != "*")
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn router(state: AppState, cors: CorsLayer) -> Router {
    let v1_routes = Router::new()
        .route("/wallet", get(wallet::get_wallet))
        .route("/wallet/seed", get(wallet::reveal_seed))
        .route("/wallet/import", post(wallet::import_wallet))
        .route("/wallet/regenerate", post(wallet::regenerate_wallet))
        .route(
            "/network",
            get(network::get_network).put(network::set_network),
        )
        .route("/balances", get(balance::get_balances))
        .route("/balances/refresh", post(balance::refresh_balances))
        .route("/transfers", post(transfers::create_transfer));

    Router::new()
        .route("/health", get(health::health))
        .nest("/v1", v1_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        wallet::get_wallet,
        wallet::reveal_seed,
        wallet::import_wallet,
        wallet::regenerate_wallet,
        network::get_network,
        network::set_network,
        balance::get_balances,
        balance::refresh_balances,
        transfers::create_transfer
    ),
    components(
        schemas(
            health::HealthResponse,
            WalletResponse,
            SeedResponse,
            ImportWalletRequest,
            RegenerateWalletRequest,
            NetworkId,
            NetworkResponse,
            SetNetworkRequest,
            AssetKind,
            AssetBalance,
            PriceQuote,
            BalanceQuery,
            BalanceQueryFailure,
            BalanceReport,
            RefreshResponse,
            CreateTransferRequest,
            TransferReceipt,
            TransferResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Wallet", description = "Seed and account management"),
        (name = "Network", description = "Network selection"),
        (name = "Balances", description = "SOL and USDC balances"),
        (name = "Transfers", description = "SOL and USDC transfers")
    )
)]
pub struct ApiDoc;
