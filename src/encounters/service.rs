//! Encounter service
//!
//! Owns the single live encounter. Every mutation runs under one async
//! lock, and after a successful mutation the new snapshot is written to
//! the store. A failed autosave is logged and otherwise ignored; the
//! mutation has already happened and is returned to the caller.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::store::{EncounterStore, SavedEncounter};
use crate::characters::CharacterStore;
use crate::combat::{
    parse_dice, resolve_attack_with, AttackOutcome, AttackProfile, CombatantPatch, DamageApplied,
    DeathSaveKind, DeathSaveRoll, DiceError, DiceMode, DiceSource, Encounter, EncounterError,
    NewCombatant, StatusEffect,
};
use crate::db::StoreError;
use crate::presets::EffectPresetStore;

/// Service-level failures
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Encounter(#[from] EncounterError),

    #[error(transparent)]
    Dice(#[from] DiceError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Strictness switches for behaviors that are lenient by default
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rules {
    pub dice_mode: DiceMode,
    pub strict_reorder: bool,
}

/// Result of a free-form dice roll
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceReport {
    pub expression: String,
    pub critical: bool,
    /// Individual die results; empty when the expression did not parse
    pub rolls: Vec<u32>,
    pub total: i32,
}

/// The live encounter plus the collaborators it needs
pub struct EncounterService {
    encounter: tokio::sync::Mutex<Encounter>,
    dice: Mutex<Box<dyn DiceSource>>,
    rules: Rules,
    store: EncounterStore,
    characters: Arc<CharacterStore>,
    presets: Arc<EffectPresetStore>,
}

impl EncounterService {
    pub fn new(
        store: EncounterStore,
        characters: Arc<CharacterStore>,
        presets: Arc<EffectPresetStore>,
        dice: Box<dyn DiceSource>,
        rules: Rules,
    ) -> Self {
        Self {
            encounter: tokio::sync::Mutex::new(Encounter::new()),
            dice: Mutex::new(dice),
            rules,
            store,
            characters,
            presets,
        }
    }

    pub fn rules(&self) -> Rules {
        self.rules
    }

    /// Copy of the current encounter
    pub async fn snapshot(&self) -> Encounter {
        self.encounter.lock().await.clone()
    }

    /// Run one operation against the encounter, then autosave
    ///
    /// The operation must check its preconditions before changing
    /// anything; an error is returned with the encounter untouched.
    async fn mutate<T, F>(&self, op: F) -> Result<(T, Encounter)>
    where
        F: FnOnce(&mut Encounter, &mut dyn DiceSource) -> Result<T>,
    {
        let mut encounter = self.encounter.lock().await;
        let value = {
            let mut dice = self.dice.lock();
            op(&mut *encounter, dice.as_mut())?
        };

        let snapshot = encounter.clone();
        self.autosave(&snapshot).await;
        Ok((value, snapshot))
    }

    async fn autosave(&self, encounter: &Encounter) {
        let Some(id) = encounter.encounter_id.as_deref() else {
            return;
        };
        match self.store.save(id, encounter).await {
            Ok(()) => debug!("Autosaved encounter {}", id),
            Err(e) => warn!("Autosave of encounter {} failed: {}", id, e),
        }
    }

    pub async fn new_encounter(&self, name: Option<String>) -> Result<Encounter> {
        let ((), encounter) = self
            .mutate(|e, _| {
                e.reset(name);
                Ok(())
            })
            .await?;
        info!("Started a new encounter");
        Ok(encounter)
    }

    /// Add a combatant, linking it to a stored character of the same
    /// name when no character id was given
    pub async fn add_combatant(&self, mut new: NewCombatant) -> Result<(String, Encounter)> {
        if let Some(id) = new.character_id.as_deref() {
            if self.characters.get(id).await?.is_none() {
                return Err(ServiceError::NotFound(format!("character {}", id)));
            }
        } else if !new.name.trim().is_empty() {
            let linked = self.characters.find_by_name(new.name.trim()).await?;
            if let Some(profile) = linked.into_iter().next() {
                debug!("Linked {} to character {}", profile.name, profile.id);
                new.character_id = Some(profile.id);
            }
        }

        let combatant = new.into_combatant();
        self.mutate(move |e, _| Ok(e.add_combatant(combatant))).await
    }

    pub async fn update_combatant(&self, id: &str, patch: CombatantPatch) -> Result<Encounter> {
        if let Some(character_id) = patch.character_id.as_deref() {
            if self.characters.get(character_id).await?.is_none() {
                return Err(ServiceError::NotFound(format!("character {}", character_id)));
            }
        }
        let ((), encounter) = self
            .mutate(|e, _| Ok(e.update_combatant(id, patch)?))
            .await?;
        Ok(encounter)
    }

    pub async fn remove_combatant(&self, id: &str) -> Result<Encounter> {
        let (removed, encounter) = self.mutate(|e, _| Ok(e.remove_combatant(id)?)).await?;
        debug!("Removed combatant {}", removed.name);
        Ok(encounter)
    }

    pub async fn set_initiative(&self, id: &str, value: i32) -> Result<Encounter> {
        let ((), encounter) = self
            .mutate(|e, _| Ok(e.set_initiative(id, value)?))
            .await?;
        Ok(encounter)
    }

    pub async fn reorder_initiative(&self, ids: &[String]) -> Result<Encounter> {
        let strict = self.rules.strict_reorder;
        let ((), encounter) = self
            .mutate(|e, _| {
                if strict {
                    e.reorder_initiative_strict(ids)?;
                } else {
                    e.reorder_initiative(ids);
                }
                Ok(())
            })
            .await?;
        Ok(encounter)
    }

    pub async fn start_combat(&self) -> Result<Encounter> {
        let ((), encounter) = self.mutate(|e, dice| Ok(e.start_combat(dice)?)).await?;
        Ok(encounter)
    }

    pub async fn end_combat(&self) -> Result<Encounter> {
        let ((), encounter) = self
            .mutate(|e, _| {
                e.end_combat();
                Ok(())
            })
            .await?;
        Ok(encounter)
    }

    pub async fn next_turn(&self) -> Result<Encounter> {
        let (advance, encounter) = self.mutate(|e, _| Ok(e.next_turn()?)).await?;
        for expired in &advance.expired {
            debug!("{} expired on {}", expired.effect, expired.combatant);
        }
        Ok(encounter)
    }

    pub async fn damage(&self, id: &str, amount: u32) -> Result<(DamageApplied, Encounter)> {
        self.mutate(|e, _| Ok(e.damage(id, amount)?)).await
    }

    pub async fn heal(&self, id: &str, amount: u32) -> Result<Encounter> {
        let (_, encounter) = self.mutate(|e, _| Ok(e.heal(id, amount)?)).await?;
        Ok(encounter)
    }

    pub async fn set_temp(&self, id: &str, amount: u32) -> Result<Encounter> {
        let ((), encounter) = self.mutate(|e, _| Ok(e.set_temp(id, amount)?)).await?;
        Ok(encounter)
    }

    pub async fn record_death_save(
        &self,
        id: &str,
        kind: DeathSaveKind,
        value: i32,
    ) -> Result<Encounter> {
        let ((), encounter) = self
            .mutate(|e, _| Ok(e.record_death_save(id, kind, value)?))
            .await?;
        Ok(encounter)
    }

    pub async fn roll_death_save(&self, id: &str) -> Result<(DeathSaveRoll, Encounter)> {
        self.mutate(|e, dice| Ok(e.roll_death_save(id, dice)?)).await
    }

    pub async fn add_status_effect(&self, id: &str, effect: StatusEffect) -> Result<Encounter> {
        let ((), encounter) = self
            .mutate(|e, _| Ok(e.add_status_effect(id, effect)?))
            .await?;
        Ok(encounter)
    }

    /// Copy a stored preset onto a combatant
    pub async fn apply_preset(&self, id: &str, preset: &str) -> Result<Encounter> {
        let effect = self
            .presets
            .get(preset)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("effect preset {}", preset)))?;
        self.add_status_effect(id, effect).await
    }

    pub async fn remove_status_effect(&self, id: &str, index: usize) -> Result<Encounter> {
        let (_, encounter) = self
            .mutate(|e, _| Ok(e.remove_status_effect(id, index)?))
            .await?;
        Ok(encounter)
    }

    pub async fn add_loot(&self, id: &str, item: String) -> Result<Encounter> {
        let ((), encounter) = self.mutate(|e, _| Ok(e.add_loot(id, item)?)).await?;
        Ok(encounter)
    }

    pub async fn remove_loot(&self, id: &str, index: usize) -> Result<Encounter> {
        let (_, encounter) = self.mutate(|e, _| Ok(e.remove_loot(id, index)?)).await?;
        Ok(encounter)
    }

    /// Explicit save; unlike autosave, failures reach the caller
    pub async fn save(&self) -> Result<Encounter> {
        let mut encounter = self.encounter.lock().await;
        let id = encounter.ensure_encounter_id();
        self.store.save(&id, &encounter).await?;
        info!("Saved encounter {}", id);
        Ok(encounter.clone())
    }

    /// Replace the live encounter with a saved one
    pub async fn load(&self, id: &str) -> Result<Encounter> {
        let loaded = self
            .store
            .load(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("encounter {}", id)))?;
        Ok(self.replace(loaded).await)
    }

    pub async fn load_latest(&self) -> Result<Encounter> {
        let loaded = self
            .store
            .load_latest()
            .await?
            .ok_or_else(|| ServiceError::NotFound("saved encounter".to_string()))?;
        Ok(self.replace(loaded).await)
    }

    async fn replace(&self, loaded: Encounter) -> Encounter {
        let mut encounter = self.encounter.lock().await;
        *encounter = loaded;
        info!(
            "Loaded encounter {} ({} combatants, round {})",
            encounter.encounter_id.as_deref().unwrap_or("-"),
            encounter.combatants.len(),
            encounter.round_number
        );
        encounter.clone()
    }

    pub async fn list_saved(&self) -> Result<Vec<SavedEncounter>> {
        Ok(self.store.list().await?)
    }

    pub async fn delete_saved(&self, id: &str) -> Result<()> {
        if !self.store.delete(id).await? {
            return Err(ServiceError::NotFound(format!("encounter {}", id)));
        }
        Ok(())
    }

    /// Roll a free-form expression
    ///
    /// Malformed expressions total 0 unless dice are strict.
    pub fn roll_dice(&self, expression: &str, critical: bool) -> Result<DiceReport> {
        let (rolls, total) = match parse_dice(expression) {
            Ok(roll) => roll.roll_detailed(self.dice.lock().as_mut(), critical),
            Err(e) if self.rules.dice_mode == DiceMode::Strict => return Err(e.into()),
            Err(e) => {
                debug!("Treating {:?} as 0: {}", expression, e);
                (Vec::new(), 0)
            }
        };

        Ok(DiceReport {
            expression: expression.to_string(),
            critical,
            rolls,
            total,
        })
    }

    /// Resolve an ad-hoc attack profile against an AC
    pub fn resolve_attack(&self, attack: &AttackProfile, target_ac: u32) -> Result<AttackOutcome> {
        let mut dice = self.dice.lock();
        Ok(resolve_attack_with(
            attack,
            target_ac,
            self.rules.dice_mode,
            dice.as_mut(),
        )?)
    }

    /// Resolve one of the attacker's stored attacks against a target
    ///
    /// Nothing is changed; the caller applies the damage separately.
    pub async fn resolve_combatant_attack(
        &self,
        attacker_id: &str,
        attack_name: &str,
        target_id: &str,
    ) -> Result<(AttackProfile, AttackOutcome)> {
        let (attacker, target_ac) = {
            let encounter = self.encounter.lock().await;
            let attacker = encounter.combatant(attacker_id)?.clone();
            (attacker, encounter.combatant(target_id)?.ac)
        };

        if !attacker.kind.has_attacks() {
            return Err(ServiceError::BadRequest(format!(
                "{} combatants have no stored attacks",
                attacker.kind
            )));
        }
        let character_id = attacker.character_id.as_deref().ok_or_else(|| {
            ServiceError::BadRequest(format!("{} is not linked to a character", attacker.name))
        })?;
        let profile = self
            .characters
            .get(character_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("character {}", character_id)))?;
        let attack = profile
            .attack(attack_name)
            .cloned()
            .ok_or_else(|| {
                ServiceError::NotFound(format!("attack {} for {}", attack_name, profile.name))
            })?;

        let outcome = self.resolve_attack(&attack, target_ac)?;
        debug!(
            "{} attacks with {}: d20 {} total {} vs AC {} -> {} damage",
            attacker.name, attack.name, outcome.d20, outcome.total, target_ac, outcome.damage
        );
        Ok((attack, outcome))
    }
}
