//! Application builder and server wiring.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::middleware as axum_middleware;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

use slotbot_chat::{NoopNotifier, PusherFeed, notifier_from_config, outbound_from_config};
use slotbot_core::config::AppConfig;
use slotbot_core::error::AppError;
use slotbot_core::result::AppResult;
use slotbot_core::traits::{Notifier, SystemClock};
use slotbot_database::Stores;
use slotbot_realtime::BroadcastHub;
use slotbot_service::{ChatIngest, Services};
use slotbot_worker::{ReplyQueue, ReplyRunner};

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    build_router(state)
        .layer(axum_middleware::from_fn(request_logging))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Runs SlotBot: stores, services, reply runner, chat feed and HTTP server.
///
/// Returns after a shutdown signal once background tasks have drained or the
/// grace period has passed.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    tracing::info!("Starting SlotBot server...");
    let config = Arc::new(config);

    // ── Step 1: Stores ───────────────────────────────────────────
    tracing::info!(provider = %config.database.provider, "Initializing stores");
    let stores = Stores::from_config(&config.database).await?;
    let pool = stores.pool.clone();

    // ── Step 2: Services ─────────────────────────────────────────
    let hub = BroadcastHub::from_config(&config.realtime);
    let notifier: Arc<dyn Notifier> =
        notifier_from_config(&config.notify).unwrap_or_else(|| Arc::new(NoopNotifier));
    let services = Services::build(&config, stores, hub, Arc::new(SystemClock), Some(notifier)).await?;

    // ── Step 3: Reply runner ─────────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let channel = outbound_from_config(
        &config.chat,
        Duration::from_millis(config.reply.send_timeout_ms),
    )?;
    tracing::info!(channel = channel.name(), "Outbound reply channel selected");

    let (replies, reply_rx) = ReplyQueue::new(config.reply.queue_capacity);
    let runner = ReplyRunner::new(channel, &config.reply);
    let reply_stats = runner.stats();
    let mut tasks: Vec<JoinHandle<()>> = vec![tokio::spawn(runner.run(reply_rx, shutdown_rx.clone()))];

    // ── Step 4: Chat feed + ingest ───────────────────────────────
    if !config.chat.feed_enabled {
        tracing::info!("Chat feed disabled by configuration");
    } else if config.chat.channel.is_empty() {
        tracing::warn!("chat.channel is empty, chat feed not started");
    } else {
        let (events_tx, events_rx) = mpsc::channel(config.chat.inbound_buffer_size);
        let feed = PusherFeed::new(&config.chat, events_tx);
        let ingest = ChatIngest::new(Arc::clone(&services.engine), replies);
        tasks.push(tokio::spawn(feed.run(shutdown_rx.clone())));
        tasks.push(tokio::spawn(ingest.run(events_rx, shutdown_rx.clone())));
    }

    // ── Step 5: HTTP server ──────────────────────────────────────
    let state = AppState::new(Arc::clone(&config), services, reply_stats);
    let app = build_app(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(addr = %addr, "SlotBot server listening");

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });
    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 6: Drain ────────────────────────────────────────────
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let drain = futures::future::join_all(tasks);
    if tokio::time::timeout(grace, drain).await.is_err() {
        tracing::warn!(grace_seconds = grace.as_secs(), "Background tasks did not stop in time");
    }
    if let Some(pool) = pool {
        pool.close().await;
    }

    tracing::info!("SlotBot server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("Shutdown signal received");
}
