// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use burner_wallet::{
    api::{cors_layer, router},
    blockchain::SolanaConnector,
    config::WalletConfig,
    logging,
    network::NetworkSelector,
    providers::SolscanClient,
    refresher::BalanceRefresher,
    session::WalletSession,
    state::AppState,
    storage::{SeedDatabase, SEED_DB_FILE},
    wallet::{link_parameter, SeedStore},
};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() {
    let config = WalletConfig::from_env().expect("Invalid configuration");
    logging::init(config.log_format);

    let db_path = config.data_dir.join(SEED_DB_FILE);
    let seeds = SeedStore::new(Arc::new(
        SeedDatabase::open(&db_path).expect("Failed to open seed database"),
    ));

    let connector = Arc::new(SolanaConnector::new(&config.rpc).expect("Invalid RPC endpoint"));
    let oracle = Arc::new(
        SolscanClient::new(config.price_api_base_url.clone())
            .expect("Failed to build price client"),
    );
    let selector = Arc::new(NetworkSelector::new(config.network));

    let link_param = config.link.as_deref().and_then(link_parameter);
    let session = Arc::new(
        WalletSession::start(
            seeds,
            connector,
            oracle,
            selector,
            config.base_url.clone(),
            link_param.as_deref(),
        )
        .expect("Failed to start wallet session"),
    );

    let shutdown = CancellationToken::new();
    let mut refresher = BalanceRefresher::new(session.clone());
    if let Some(interval) = config.refresh_interval {
        refresher = refresher.with_interval(interval);
    }
    let refresher_handle = tokio::spawn(refresher.run(shutdown.clone()));

    let app = router(AppState::new(session), cors_layer(&config.cors_origins));

    let addr = config.bind_addr().expect("Failed to parse bind address");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    info!(
        %addr,
        data_dir = %config.data_dir.display(),
        cors_origins = ?config.cors_origins,
        "Burner wallet listening (docs at /docs)"
    );

    let signal = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
            signal.cancel();
        })
        .await
        .expect("HTTP server failed");

    shutdown.cancel();
    let _ = refresher_handle.await;
}
