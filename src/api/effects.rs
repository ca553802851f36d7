//! Effect preset API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};

use super::{error_response, AppState};
use crate::combat::StatusEffect;
use crate::db::StoreError;

/// Build effect preset router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/effects", get(list).post(upsert))
        .route("/effects/{name}", delete(remove))
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<StatusEffect>>, StoreError> {
    Ok(Json(state.presets.list().await?))
}

/// Store a preset under the effect's name, replacing any earlier one
async fn upsert(State(state): State<AppState>, Json(effect): Json<StatusEffect>) -> Response {
    if effect.name.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "effect preset needs a name");
    }
    match state.presets.upsert(&effect).await {
        Ok(()) => (StatusCode::CREATED, Json(effect)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn remove(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    match state.presets.delete(&name).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => error_response(
            StatusCode::NOT_FOUND,
            format!("effect preset {} not found", name),
        ),
        Err(e) => e.into_response(),
    }
}
