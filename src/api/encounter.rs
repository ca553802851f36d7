//! Encounter API endpoints
//!
//! Every mutating endpoint answers with the complete encounter as it
//! stands after the change.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::combat::{
    AttackOutcome, AttackProfile, CombatantPatch, DamageApplied, DeathSaveKind, DeathSaveRoll,
    Encounter, NewCombatant, StatusEffect,
};
use crate::encounters::{SavedEncounter, ServiceError};

type ApiResult<T> = Result<Json<T>, ServiceError>;

/// Build encounter router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/encounter", get(current))
        .route("/encounter/new", post(new_encounter))
        .route("/encounter/start", post(start))
        .route("/encounter/end", post(end))
        .route("/encounter/next", post(next_turn))
        .route("/encounter/reorder", post(reorder))
        .route("/encounter/save", post(save))
        .route("/encounter/combatants", post(add_combatant))
        .route(
            "/encounter/combatants/{id}",
            patch(update_combatant).delete(remove_combatant),
        )
        .route("/encounter/combatants/{id}/initiative", post(set_initiative))
        .route("/encounter/combatants/{id}/damage", post(damage))
        .route("/encounter/combatants/{id}/heal", post(heal))
        .route("/encounter/combatants/{id}/temp", post(set_temp))
        .route("/encounter/combatants/{id}/death-saves", post(record_death_save))
        .route("/encounter/combatants/{id}/death-saves/roll", post(roll_death_save))
        .route("/encounter/combatants/{id}/effects", post(add_effect))
        .route(
            "/encounter/combatants/{id}/effects/{index}",
            delete(remove_effect),
        )
        .route(
            "/encounter/combatants/{id}/effects/preset/{name}",
            post(apply_preset),
        )
        .route("/encounter/combatants/{id}/loot", post(add_loot))
        .route("/encounter/combatants/{id}/loot/{index}", delete(remove_loot))
        .route("/encounter/combatants/{id}/attack", post(attack))
        .route("/encounters", get(list_saved))
        .route("/encounters/latest/load", post(load_latest))
        .route("/encounters/{id}/load", post(load))
        .route("/encounters/{id}", delete(delete_saved))
}

async fn current(State(state): State<AppState>) -> Json<Encounter> {
    Json(state.encounters.snapshot().await)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewEncounterRequest {
    pub name: Option<String>,
}

async fn new_encounter(
    State(state): State<AppState>,
    Json(req): Json<NewEncounterRequest>,
) -> ApiResult<Encounter> {
    Ok(Json(state.encounters.new_encounter(req.name).await?))
}

async fn start(State(state): State<AppState>) -> ApiResult<Encounter> {
    Ok(Json(state.encounters.start_combat().await?))
}

async fn end(State(state): State<AppState>) -> ApiResult<Encounter> {
    Ok(Json(state.encounters.end_combat().await?))
}

async fn next_turn(State(state): State<AppState>) -> ApiResult<Encounter> {
    Ok(Json(state.encounters.next_turn().await?))
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub order: Vec<String>,
}

async fn reorder(
    State(state): State<AppState>,
    Json(req): Json<ReorderRequest>,
) -> ApiResult<Encounter> {
    Ok(Json(state.encounters.reorder_initiative(&req.order).await?))
}

async fn save(State(state): State<AppState>) -> ApiResult<Encounter> {
    Ok(Json(state.encounters.save().await?))
}

/// Response for a newly added combatant
#[derive(Debug, Serialize)]
pub struct AddedResponse {
    pub id: String,
    pub encounter: Encounter,
}

async fn add_combatant(
    State(state): State<AppState>,
    Json(req): Json<NewCombatant>,
) -> Result<impl IntoResponse, ServiceError> {
    let (id, encounter) = state.encounters.add_combatant(req).await?;
    Ok((StatusCode::CREATED, Json(AddedResponse { id, encounter })))
}

async fn update_combatant(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CombatantPatch>,
) -> ApiResult<Encounter> {
    Ok(Json(state.encounters.update_combatant(&id, req).await?))
}

async fn remove_combatant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Encounter> {
    Ok(Json(state.encounters.remove_combatant(&id).await?))
}

#[derive(Debug, Deserialize)]
pub struct InitiativeRequest {
    pub value: i32,
}

async fn set_initiative(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<InitiativeRequest>,
) -> ApiResult<Encounter> {
    Ok(Json(state.encounters.set_initiative(&id, req.value).await?))
}

/// Body for damage, heal and temp HP
#[derive(Debug, Deserialize)]
pub struct AmountRequest {
    pub amount: u32,
}

#[derive(Debug, Serialize)]
pub struct DamageResponse {
    pub applied: DamageApplied,
    pub encounter: Encounter,
}

async fn damage(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AmountRequest>,
) -> ApiResult<DamageResponse> {
    let (applied, encounter) = state.encounters.damage(&id, req.amount).await?;
    Ok(Json(DamageResponse { applied, encounter }))
}

async fn heal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AmountRequest>,
) -> ApiResult<Encounter> {
    Ok(Json(state.encounters.heal(&id, req.amount).await?))
}

async fn set_temp(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AmountRequest>,
) -> ApiResult<Encounter> {
    Ok(Json(state.encounters.set_temp(&id, req.amount).await?))
}

#[derive(Debug, Deserialize)]
pub struct DeathSaveRequest {
    #[serde(rename = "type")]
    pub kind: DeathSaveKind,
    pub value: i32,
}

async fn record_death_save(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<DeathSaveRequest>,
) -> ApiResult<Encounter> {
    Ok(Json(
        state
            .encounters
            .record_death_save(&id, req.kind, req.value)
            .await?,
    ))
}

#[derive(Debug, Serialize)]
pub struct DeathSaveResponse {
    pub roll: DeathSaveRoll,
    pub encounter: Encounter,
}

async fn roll_death_save(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<DeathSaveResponse> {
    let (roll, encounter) = state.encounters.roll_death_save(&id).await?;
    Ok(Json(DeathSaveResponse { roll, encounter }))
}

async fn add_effect(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(effect): Json<StatusEffect>,
) -> ApiResult<Encounter> {
    Ok(Json(state.encounters.add_status_effect(&id, effect).await?))
}

async fn remove_effect(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, usize)>,
) -> ApiResult<Encounter> {
    Ok(Json(state.encounters.remove_status_effect(&id, index).await?))
}

async fn apply_preset(
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
) -> ApiResult<Encounter> {
    Ok(Json(state.encounters.apply_preset(&id, &name).await?))
}

#[derive(Debug, Deserialize)]
pub struct LootRequest {
    pub item: String,
}

async fn add_loot(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<LootRequest>,
) -> ApiResult<Encounter> {
    Ok(Json(state.encounters.add_loot(&id, req.item).await?))
}

async fn remove_loot(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, usize)>,
) -> ApiResult<Encounter> {
    Ok(Json(state.encounters.remove_loot(&id, index).await?))
}

#[derive(Debug, Deserialize)]
pub struct AttackRequest {
    /// Name of an attack on the attacker's character profile
    pub attack: String,
    /// Target combatant id
    pub target: String,
}

#[derive(Debug, Serialize)]
pub struct AttackResponse {
    pub attack: AttackProfile,
    pub outcome: AttackOutcome,
}

/// Roll one stored attack; the encounter is not changed
async fn attack(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AttackRequest>,
) -> ApiResult<AttackResponse> {
    let (attack, outcome) = state
        .encounters
        .resolve_combatant_attack(&id, &req.attack, &req.target)
        .await?;
    Ok(Json(AttackResponse { attack, outcome }))
}

async fn list_saved(State(state): State<AppState>) -> ApiResult<Vec<SavedEncounter>> {
    Ok(Json(state.encounters.list_saved().await?))
}

async fn load(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Encounter> {
    Ok(Json(state.encounters.load(&id).await?))
}

async fn load_latest(State(state): State<AppState>) -> ApiResult<Encounter> {
    Ok(Json(state.encounters.load_latest().await?))
}

async fn delete_saved(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    state.encounters.delete_saved(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
