//! HTTP API module - REST endpoints over the live encounter

mod characters;
mod dice;
mod effects;
mod encounter;

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::error;

use crate::characters::CharacterStore;
use crate::combat::EncounterError;
use crate::config::Config;
use crate::db::{Database, StoreError};
use crate::encounters::{EncounterService, EncounterStore, ServiceError};
use crate::presets::EffectPresetStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub encounters: Arc<EncounterService>,
    pub characters: Arc<CharacterStore>,
    pub presets: Arc<EffectPresetStore>,
}

impl AppState {
    pub fn new(db: Arc<Database>, config: &Config) -> Self {
        let characters = Arc::new(CharacterStore::new(db.pool().clone()));
        let presets = Arc::new(EffectPresetStore::new(db.pool().clone()));
        let encounters = Arc::new(EncounterService::new(
            EncounterStore::new(db.pool().clone()),
            characters.clone(),
            presets.clone(),
            config.dice(),
            config.rules(),
        ));

        Self {
            db,
            encounters,
            characters,
            presets,
        }
    }
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/", get(root))
        .merge(encounter::router())
        .merge(characters::router())
        .merge(effects::router())
        .merge(dice::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: impl ToString) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

impl ServiceError {
    fn status(&self) -> StatusCode {
        match self {
            ServiceError::Encounter(e) => match e {
                EncounterError::CombatantNotFound(_) => StatusCode::NOT_FOUND,
                EncounterError::NoCombatants
                | EncounterError::CombatNotActive
                | EncounterError::NoDeathSaves(_) => StatusCode::CONFLICT,
                EncounterError::IndexOutOfRange { .. } | EncounterError::IncompleteOrder => {
                    StatusCode::BAD_REQUEST
                }
            },
            ServiceError::Dice(_) | ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        error_response(status, self)
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        ServiceError::Store(self).into_response()
    }
}

/// Root endpoint
async fn root() -> impl IntoResponse {
    Json(RootResponse {
        name: "combatd",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct RootResponse {
    name: &'static str,
    version: &'static str,
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                database: "ok",
            }),
        ),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unhealthy",
                database: "error",
            }),
        ),
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
}
