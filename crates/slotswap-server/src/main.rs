mod config;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use slotswap_api::auth::{self, AppState, AppStateInner, AuthConfig};
use slotswap_api::events;
use slotswap_api::middleware::require_auth;
use slotswap_api::swaps;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slotswap=debug,tower_http=debug".into()),
        )
        .init();

    let config = config::Config::from_env()?;

    // Init database
    let db = slotswap_db::Database::open(&PathBuf::from(&config.db_path))?;

    // Shared state
    let state: AppState = Arc::new(AppStateInner {
        db,
        auth: AuthConfig {
            access_secret: config.access_secret.clone(),
            refresh_secret: config.refresh_secret.clone(),
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
        },
    });

    // Routes
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/events", post(events::create_event))
        .route("/events", get(events::list_own_events))
        .route("/events/all", get(events::list_all_events))
        .route("/events/{event_id}", put(events::update_event))
        .route("/events/{event_id}", delete(events::delete_event))
        .route("/events/{event_id}/enable-swap", put(events::enable_swap))
        .route("/events/{event_id}/disable-swap", put(events::disable_swap))
        .route("/swaps/request", post(swaps::request_swap))
        .route("/swaps/{swap_id}/respond", put(swaps::respond_swap))
        .route("/swaps/swappable", get(swaps::list_swappable))
        .route("/swaps/incoming", get(swaps::list_incoming))
        .route("/swaps/outgoing", get(swaps::list_outgoing))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Slotswap server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> &'static str {
    "Server is healthy"
}
