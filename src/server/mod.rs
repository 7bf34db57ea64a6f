//! Site server with the admin content API
//!
//! Serves the static site directory and a small JSON API over the content
//! store. Mutating routes require the admin password in the
//! `X-Admin-Password` header.

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::admin::AdminGate;
use crate::commands::edit::{remove_item, save_item};
use crate::config::MapConfig;
use crate::content::{Document, ItemForm, ListName, ValidationError};
use crate::store::StoreError;
use crate::{Paintyard, SiteStore};

/// Header carrying the admin password on mutating requests
pub const ADMIN_HEADER: &str = "x-admin-password";

/// Server state
pub struct ServerState {
    store: Mutex<SiteStore>,
    gate: AdminGate,
    map: MapConfig,
}

impl ServerState {
    pub fn new(store: SiteStore, gate: AdminGate, map: MapConfig) -> Self {
        Self {
            store: Mutex::new(store),
            gate,
            map,
        }
    }
}

/// API errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Admin password required")]
    Unauthorized,

    #[error("Removal must be confirmed with ?confirm=true")]
    ConfirmationRequired,

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Unknown list: {0}")]
    UnknownList(String),

    #[error("Field not set: {0}")]
    FieldNotFound(String),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ValidationError>() {
            Ok(e) => ApiError::Validation(e),
            Err(err) => match err.downcast::<StoreError>() {
                Ok(e) => ApiError::Store(e),
                Err(err) => ApiError::Internal(err),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::ConfirmationRequired => StatusCode::PRECONDITION_REQUIRED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::UnknownList(_) | ApiError::FieldNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::InvalidPath(_)) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    password: String,
}

#[derive(Debug, Default, Deserialize)]
struct RemoveQuery {
    #[serde(default)]
    confirm: bool,
}

#[derive(Debug, Serialize)]
struct SavedResponse {
    id: u64,
    list: String,
}

/// Build the router for a site directory
pub fn router(state: Arc<ServerState>, site_dir: &std::path::Path) -> Router {
    Router::new()
        .route("/api/login", post(login_handler))
        .route("/api/content", get(content_handler))
        .route(
            "/api/field/*path",
            get(get_field_handler).put(set_field_handler),
        )
        .route("/api/lists/:list", post(save_item_handler))
        .route("/api/lists/:list/:id", delete(remove_item_handler))
        .route("/api/export", get(export_handler))
        .route("/api/map-config", get(map_config_handler))
        .fallback_service(ServeDir::new(site_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(site: &Paintyard, ip: &str, port: u16) -> Result<()> {
    let store = site.load_store().await?;
    let state = Arc::new(ServerState::new(
        store,
        AdminGate::new(site.config.admin_password.clone()),
        site.config.map.clone(),
    ));
    let app = router(state, &site.site_dir);

    for private in [site.base_dir.join("_config.yml"), site.data_dir.clone()] {
        if private.starts_with(&site.site_dir) {
            tracing::warn!(
                "{:?} is inside the served directory {:?} and can be downloaded",
                private,
                site.site_dir
            );
        }
    }

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn require_admin(state: &ServerState, headers: &HeaderMap) -> Result<(), ApiError> {
    let attempt = headers
        .get(ADMIN_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if state.gate.check(attempt) {
        Ok(())
    } else {
        tracing::warn!("Rejected unauthenticated admin request");
        Err(ApiError::Unauthorized)
    }
}

fn parse_list(list: &str) -> Result<ListName, ApiError> {
    list.parse()
        .map_err(|_| ApiError::UnknownList(list.to_string()))
}

async fn login_handler(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    if state.gate.check(&request.password) {
        Ok(Json(json!({ "ok": true })))
    } else {
        tracing::warn!("Rejected admin login attempt");
        Err(ApiError::Unauthorized)
    }
}

async fn content_handler(State(state): State<Arc<ServerState>>) -> Json<Document> {
    let mut store = state.store.lock().await;
    Json(store.load().await.clone())
}

async fn get_field_handler(
    State(state): State<Arc<ServerState>>,
    Path(path): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let field = path.trim_matches('/').replace('/', ".");
    let store = state.store.lock().await;
    store
        .get_field(&field)?
        .map(Json)
        .ok_or(ApiError::FieldNotFound(field))
}

async fn set_field_handler(
    State(state): State<Arc<ServerState>>,
    Path(path): Path<String>,
    headers: HeaderMap,
    Json(value): Json<Value>,
) -> Result<Json<Document>, ApiError> {
    require_admin(&state, &headers)?;

    let field = path.trim_matches('/').replace('/', ".");
    let mut store = state.store.lock().await;
    let doc = store.set_field(&field, value)?;
    Ok(Json(doc.clone()))
}

async fn save_item_handler(
    State(state): State<Arc<ServerState>>,
    Path(list): Path<String>,
    headers: HeaderMap,
    Json(form): Json<ItemForm>,
) -> Result<Json<SavedResponse>, ApiError> {
    require_admin(&state, &headers)?;
    let list = parse_list(&list)?;

    let mut store = state.store.lock().await;
    let id = save_item(&mut store, list, &form)?;
    Ok(Json(SavedResponse {
        id,
        list: list.to_string(),
    }))
}

async fn remove_item_handler(
    State(state): State<Arc<ServerState>>,
    Path((list, id)): Path<(String, u64)>,
    Query(query): Query<RemoveQuery>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, &headers)?;
    let list = parse_list(&list)?;
    if !query.confirm {
        return Err(ApiError::ConfirmationRequired);
    }

    let mut store = state.store.lock().await;
    remove_item(&mut store, list, id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn export_handler(State(state): State<Arc<ServerState>>) -> Result<Response, ApiError> {
    let store = state.store.lock().await;
    let snapshot = store.export_snapshot()?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"data.json\"",
            ),
        ],
        snapshot,
    )
        .into_response())
}

async fn map_config_handler(State(state): State<Arc<ServerState>>) -> Json<MapConfig> {
    Json(state.map.clone())
}
