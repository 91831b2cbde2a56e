// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use paystream_node::clock::MonotonicClock;
use paystream_node::config::NodeConfig;
use paystream_node::errors::EngineError;
use paystream_node::ledger::HttpLedgerClient;
use paystream_node::server::build_router;
use paystream_node::session::Session;
use paystream_node::telemetry;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), EngineError> {
    telemetry::init_telemetry()?;

    let cfg = NodeConfig::from_env()?;
    tracing::info!(
        account = %cfg.account,
        streams = cfg.streams.len(),
        auth = cfg.auth_token.is_some(),
        "Initializing Paystream Node"
    );

    let ledger_url = cfg
        .ledger_url
        .clone()
        .ok_or_else(|| EngineError::InvalidInput("PAYSTREAM_LEDGER_URL is required".into()))?;
    let ledger = HttpLedgerClient::new(ledger_url, cfg.poll_timeout)?;

    let session = Arc::new(Session::login(&cfg, Arc::new(ledger), Arc::new(MonotonicClock::new()))?);

    let app = build_router(session.clone(), cfg.auth_token.clone());

    let addr = cfg.bind_addr;
    tracing::info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    let served = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await;

    // Tear the session down even when serving failed.
    session.logout().await?;
    served?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {:?}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
