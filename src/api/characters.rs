//! Character profile API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::{error_response, AppState};
use crate::characters::CharacterProfile;
use crate::db::StoreError;

/// Build character router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/characters", get(list).post(create))
        .route("/characters/{id}", get(fetch).put(update).delete(remove))
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<CharacterProfile>>, StoreError> {
    Ok(Json(state.characters.list().await?))
}

async fn create(
    State(state): State<AppState>,
    Json(profile): Json<CharacterProfile>,
) -> Result<impl IntoResponse, StoreError> {
    let created = state.characters.create(profile).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn fetch(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.characters.get(&id).await {
        Ok(Some(profile)) => Json(profile).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, format!("character {} not found", id)),
        Err(e) => e.into_response(),
    }
}

/// Replace a profile; the id in the path wins over any id in the body
async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut profile): Json<CharacterProfile>,
) -> Response {
    profile.id = id;
    match state.characters.update(&profile).await {
        Ok(true) => Json(profile).into_response(),
        Ok(false) => error_response(
            StatusCode::NOT_FOUND,
            format!("character {} not found", profile.id),
        ),
        Err(e) => e.into_response(),
    }
}

async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.characters.delete(&id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => error_response(StatusCode::NOT_FOUND, format!("character {} not found", id)),
        Err(e) => e.into_response(),
    }
}
