mod game;

pub use game::core::{catalog, choice, clock, messages, random, rules, session, snapshot};
pub use game::engine::arena;
pub use game::{ArenaConfig, ArenaState};

use axum::{
    Json, Router,
    extract::{State, WebSocketUpgrade, ws::WebSocket},
    response::Response,
    routing::get,
};
use game::core::catalog::Catalog;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

async fn health() -> &'static str {
    "ok"
}

#[derive(Clone)]
pub struct AppState {
    pub arena: Arc<ArenaState>,
}

/// Body of `GET /catalog`
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogResponse {
    #[serde(flatten)]
    pub catalog: Catalog,
    pub live_sessions: usize,
}

async fn catalog_handler(State(state): State<AppState>) -> Json<CatalogResponse> {
    Json(CatalogResponse {
        catalog: state.arena.catalog().clone(),
        live_sessions: state.arena.live_sessions(),
    })
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    game::handle_connection(socket, state.arena).await;
}

pub fn app() -> Router {
    app_with_config(ArenaConfig::default())
}

pub fn app_with_config(config: ArenaConfig) -> Router {
    let state = AppState {
        arena: Arc::new(ArenaState::new(config)),
    };

    Router::new()
        .route("/health", get(health))
        .route("/catalog", get(catalog_handler))
        .route("/ws", get(ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
