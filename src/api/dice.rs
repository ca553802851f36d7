//! Stateless dice and attack endpoints

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;

use super::AppState;
use crate::combat::{AttackOutcome, AttackProfile};
use crate::encounters::{DiceReport, ServiceError};

/// Build dice router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dice/roll", post(roll))
        .route("/dice/attack", post(attack))
}

#[derive(Debug, Deserialize)]
pub struct RollRequest {
    pub expression: String,
    #[serde(default)]
    pub critical: bool,
}

async fn roll(
    State(state): State<AppState>,
    Json(req): Json<RollRequest>,
) -> Result<Json<DiceReport>, ServiceError> {
    Ok(Json(state.encounters.roll_dice(&req.expression, req.critical)?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackRequest {
    pub attack: AttackProfile,
    pub target_ac: u32,
}

async fn attack(
    State(state): State<AppState>,
    Json(req): Json<AttackRequest>,
) -> Result<Json<AttackOutcome>, ServiceError> {
    Ok(Json(state.encounters.resolve_attack(&req.attack, req.target_ac)?))
}
