//! HTTP gateway exposing a paginated view of upstream connection records.
//!
//! # Design
//! `AppState` is built once at startup: the upstream adapter owns the
//! `SessionCache`, and both sit behind `Arc`s shared by every handler. No I/O
//! happens until the first request needs a transport.
//!
//! Handlers are the error boundary. Every failure becomes a `GatewayError`,
//! which renders as a status code plus an `ErrorPayload`, so callers never see
//! a plain-text body from this crate's routes. Query strings are read
//! leniently: the first value of each key wins and anything unparsable falls
//! back to the defaults.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod listing;
pub mod session;
pub mod upstream;

use std::{future::Future, sync::Arc};

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use conngate_core::{ConnectionsClient, Credentials, ListingResponse, PageRequest};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::diagnostics::DebugReport;
use crate::error::GatewayError;
use crate::session::SessionCache;
use crate::upstream::Upstream;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub upstream: Arc<Upstream>,
}

impl AppState {
    /// Wire the upstream adapter and its session cache. No I/O happens here;
    /// the first transport is built by the first request that needs it.
    pub fn new(config: Config) -> Self {
        let client = ConnectionsClient::new(
            &config.base_url,
            Credentials::new(config.auth_user.clone(), config.auth_pass.clone()),
        );
        let upstream = Upstream::new(client, SessionCache::for_upstream());
        Self {
            config: Arc::new(config),
            upstream: Arc::new(upstream),
        }
    }
}

/// Raw query values; anything unparsable falls back to the defaults.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ListParams {
    pub page: Option<String>,
    pub items_per_page: Option<String>,
}

impl ListParams {
    /// Keep the first occurrence of each key, ignoring unknown keys.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut params.page,
                "itemsPerPage" => &mut params.items_per_page,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        params
    }

    pub fn to_page_request(&self) -> PageRequest {
        PageRequest::from_query(self.page.as_deref(), self.items_per_page.as_deref())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/connections",
            get(list_connections)
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        )
        .route("/api/debug", get(debug_report))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn list_connections(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ListingResponse>, GatewayError> {
    let request = ListParams::from_pairs(pairs).to_page_request();
    listing::handle_list_request(&state, request).await.map(Json)
}

async fn method_not_allowed() -> GatewayError {
    GatewayError::MethodNotAllowed
}

async fn debug_report(State(state): State<AppState>) -> Result<Json<DebugReport>, GatewayError> {
    diagnostics::build_report(&state.config, &state.upstream).await.map(Json)
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
    })
}
