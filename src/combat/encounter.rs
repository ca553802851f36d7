//! Initiative order and turn engine
//!
//! The encounter is the aggregate root: an ordered list of combatants plus
//! the turn pointer, round counter and combat-active flag. Every operation
//! checks its preconditions before touching any state, so a failed call
//! leaves the encounter exactly as it was.
//!
//! Two behaviors are kept for compatibility even though they can surprise:
//! `reorder_initiative` drops combatants missing from the given order, and
//! removing a combatant only resets an out-of-range turn pointer to 0
//! rather than re-targeting the "next" combatant.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::combatant::{Combatant, CombatantPatch, CombatantType};
use super::dice::DiceSource;
use super::effects::{advance_round, apply_timing, ExpiredEffect, HpTiming, StatusEffect};
use super::hp::{DamageApplied, DeathSaveKind, DeathSaveRoll};

/// Encounter precondition failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncounterError {
    #[error("encounter has no combatants")]
    NoCombatants,

    #[error("combat is not active")]
    CombatNotActive,

    #[error("combatant not found: {0}")]
    CombatantNotFound(String),

    #[error("{what} index {index} out of range")]
    IndexOutOfRange { what: &'static str, index: usize },

    #[error("{0} combatants do not make death saves")]
    NoDeathSaves(CombatantType),

    #[error("new order must list every combatant exactly once")]
    IncompleteOrder,
}

/// What happened during a turn advance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnAdvance {
    pub round_wrapped: bool,
    pub expired: Vec<ExpiredEffect>,
}

/// An encounter and its turn bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encounter {
    /// Persistence key; assigned on first combat start or explicit save
    #[serde(default)]
    pub encounter_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub combatants: Vec<Combatant>,
    #[serde(default)]
    pub current_turn_index: usize,
    #[serde(default = "first_round")]
    pub round_number: u32,
    #[serde(default)]
    pub combat_active: bool,
}

fn first_round() -> u32 {
    1
}

impl Default for Encounter {
    fn default() -> Self {
        Self {
            encounter_id: None,
            name: None,
            combatants: Vec::new(),
            current_turn_index: 0,
            round_number: first_round(),
            combat_active: false,
        }
    }
}

impl Encounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start over: no combatants, round 1, idle, unsaved
    pub fn reset(&mut self, name: Option<String>) {
        *self = Self {
            name,
            ..Self::default()
        };
    }

    /// Sort by descending initiative, ties by descending dex modifier
    ///
    /// `sort_by` is stable, so exact ties keep their insertion order.
    pub fn sort_initiative(&mut self) {
        self.combatants.sort_by(|a, b| {
            b.initiative
                .cmp(&a.initiative)
                .then_with(|| b.dex_modifier.cmp(&a.dex_modifier))
        });
    }

    /// Get a combatant by ID
    pub fn combatant(&self, id: &str) -> Result<&Combatant, EncounterError> {
        self.combatants
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| EncounterError::CombatantNotFound(id.to_string()))
    }

    /// Get mutable reference to a combatant by ID
    pub fn combatant_mut(&mut self, id: &str) -> Result<&mut Combatant, EncounterError> {
        self.combatants
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| EncounterError::CombatantNotFound(id.to_string()))
    }

    /// The combatant whose turn it is, while combat is active
    pub fn current_combatant(&self) -> Option<&Combatant> {
        if !self.combat_active {
            return None;
        }
        self.combatants.get(self.current_turn_index)
    }

    /// Add a combatant and re-sort; returns its id
    pub fn add_combatant(&mut self, combatant: Combatant) -> String {
        let id = combatant.id.clone();
        debug!("Adding combatant {} ({})", combatant.name, id);
        self.combatants.push(combatant);
        self.sort_initiative();
        id
    }

    /// Remove a combatant by ID
    pub fn remove_combatant(&mut self, id: &str) -> Result<Combatant, EncounterError> {
        let pos = self
            .combatants
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| EncounterError::CombatantNotFound(id.to_string()))?;

        let removed = self.combatants.remove(pos);
        self.clamp_turn_index();
        Ok(removed)
    }

    /// Edit descriptive fields; re-sorts only when the tiebreaker changed
    pub fn update_combatant(
        &mut self,
        id: &str,
        patch: CombatantPatch,
    ) -> Result<(), EncounterError> {
        let combatant = self.combatant_mut(id)?;
        if patch.apply(combatant) {
            self.sort_initiative();
        }
        Ok(())
    }

    pub fn set_initiative(&mut self, id: &str, value: i32) -> Result<(), EncounterError> {
        self.combatant_mut(id)?.initiative = value;
        self.sort_initiative();
        Ok(())
    }

    /// Replace the turn order with exactly the given sequence
    ///
    /// Unknown ids are skipped. Combatants missing from `ids` are dropped
    /// from the encounter; callers must send the full set.
    pub fn reorder_initiative(&mut self, ids: &[String]) {
        let mut by_id: HashMap<String, Combatant> = self
            .combatants
            .drain(..)
            .map(|c| (c.id.clone(), c))
            .collect();

        self.combatants = ids.iter().filter_map(|id| by_id.remove(id)).collect();

        if !by_id.is_empty() {
            let mut dropped: Vec<&str> = by_id.values().map(|c| c.name.as_str()).collect();
            dropped.sort_unstable();
            warn!("Reorder omitted {} combatant(s), dropping: {}", dropped.len(), dropped.join(", "));
        }
        self.clamp_turn_index();
    }

    /// Reorder, rejecting anything but a permutation of the current ids
    pub fn reorder_initiative_strict(&mut self, ids: &[String]) -> Result<(), EncounterError> {
        let current: HashSet<&str> = self.combatants.iter().map(|c| c.id.as_str()).collect();
        let given: HashSet<&str> = ids.iter().map(String::as_str).collect();

        if ids.len() != self.combatants.len() || given != current {
            return Err(EncounterError::IncompleteOrder);
        }
        self.reorder_initiative(ids);
        Ok(())
    }

    /// Begin combat: roll missing initiatives, sort, first turn of round 1
    pub fn start_combat(&mut self, dice: &mut dyn DiceSource) -> Result<(), EncounterError> {
        if self.combatants.is_empty() {
            return Err(EncounterError::NoCombatants);
        }

        for combatant in self.combatants.iter_mut().filter(|c| c.initiative == 0) {
            combatant.initiative = dice.d20() as i32 + combatant.dex_modifier;
            debug!("Rolled initiative {} for {}", combatant.initiative, combatant.name);
        }
        self.sort_initiative();

        self.current_turn_index = 0;
        self.round_number = 1;
        self.combat_active = true;
        let id = self.ensure_encounter_id();

        info!("Combat started in encounter {} with {} combatants", id, self.combatants.len());
        Ok(())
    }

    /// Stop combat; the turn pointer and round are left where they were
    pub fn end_combat(&mut self) {
        self.combat_active = false;
        info!("Combat ended in round {}", self.round_number);
    }

    /// Advance to the next turn
    ///
    /// End-of-turn effects hit the departing combatant, the pointer moves,
    /// and start-of-turn effects hit the arriving one. Wrapping back to the
    /// top of the order starts a new round and ages every effect once.
    pub fn next_turn(&mut self) -> Result<TurnAdvance, EncounterError> {
        if !self.combat_active {
            return Err(EncounterError::CombatNotActive);
        }
        if self.combatants.is_empty() {
            return Err(EncounterError::NoCombatants);
        }
        self.clamp_turn_index();

        let mut advance = TurnAdvance::default();

        apply_timing(&mut self.combatants[self.current_turn_index], HpTiming::End);

        self.current_turn_index += 1;
        if self.current_turn_index == self.combatants.len() {
            self.current_turn_index = 0;
            self.round_number += 1;
            advance.round_wrapped = true;
            advance.expired = advance_round(&mut self.combatants);
            info!("Round {} begins", self.round_number);
        }

        apply_timing(&mut self.combatants[self.current_turn_index], HpTiming::Start);

        Ok(advance)
    }

    pub fn damage(&mut self, id: &str, amount: u32) -> Result<DamageApplied, EncounterError> {
        Ok(self.combatant_mut(id)?.ledger().damage(amount))
    }

    pub fn heal(&mut self, id: &str, amount: u32) -> Result<u32, EncounterError> {
        Ok(self.combatant_mut(id)?.ledger().heal(amount))
    }

    pub fn set_temp(&mut self, id: &str, amount: u32) -> Result<(), EncounterError> {
        self.combatant_mut(id)?.ledger().set_temp(amount);
        Ok(())
    }

    pub fn record_death_save(
        &mut self,
        id: &str,
        kind: DeathSaveKind,
        value: i32,
    ) -> Result<(), EncounterError> {
        let combatant = self.death_save_target(id)?;
        combatant.ledger().record_death_save(kind, value);
        Ok(())
    }

    pub fn roll_death_save(
        &mut self,
        id: &str,
        dice: &mut dyn DiceSource,
    ) -> Result<DeathSaveRoll, EncounterError> {
        let combatant = self.death_save_target(id)?;
        let roll = combatant.ledger().roll_death_save(dice);
        debug!("{} rolled death save {}: {}", combatant.name, roll.roll, roll.result);
        Ok(roll)
    }

    fn death_save_target(&mut self, id: &str) -> Result<&mut Combatant, EncounterError> {
        let combatant = self.combatant_mut(id)?;
        if !combatant.kind.makes_death_saves() {
            return Err(EncounterError::NoDeathSaves(combatant.kind));
        }
        Ok(combatant)
    }

    pub fn add_status_effect(
        &mut self,
        id: &str,
        effect: StatusEffect,
    ) -> Result<(), EncounterError> {
        self.combatant_mut(id)?.status_effects.push(effect);
        Ok(())
    }

    /// Remove an effect by its position in the stored order
    pub fn remove_status_effect(
        &mut self,
        id: &str,
        index: usize,
    ) -> Result<StatusEffect, EncounterError> {
        let effects = &mut self.combatant_mut(id)?.status_effects;
        if index >= effects.len() {
            return Err(EncounterError::IndexOutOfRange {
                what: "status effect",
                index,
            });
        }
        Ok(effects.remove(index))
    }

    pub fn add_loot(&mut self, id: &str, item: String) -> Result<(), EncounterError> {
        self.combatant_mut(id)?.loot.push(item);
        Ok(())
    }

    pub fn remove_loot(&mut self, id: &str, index: usize) -> Result<String, EncounterError> {
        let loot = &mut self.combatant_mut(id)?.loot;
        if index >= loot.len() {
            return Err(EncounterError::IndexOutOfRange { what: "loot", index });
        }
        Ok(loot.remove(index))
    }

    /// Persistence key, generated on first use
    pub fn ensure_encounter_id(&mut self) -> String {
        self.encounter_id
            .get_or_insert_with(|| uuid::Uuid::new_v4().to_string())
            .clone()
    }

    /// Restore invariants on a snapshot loaded from storage
    pub fn normalize(&mut self) {
        for combatant in &mut self.combatants {
            combatant.normalize();
        }
        if self.round_number == 0 {
            self.round_number = 1;
        }
        self.clamp_turn_index();
    }

    /// An out-of-range pointer goes back to the top of the order
    fn clamp_turn_index(&mut self) {
        if self.current_turn_index >= self.combatants.len() {
            self.current_turn_index = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::combatant::NewCombatant;
    use crate::combat::dice::ScriptedDice;
    use crate::combat::hp::HitPoints;

    fn fighter(name: &str, kind: CombatantType, initiative: i32, dex: i32) -> Combatant {
        NewCombatant {
            name: name.to_string(),
            kind,
            initiative,
            dex_modifier: dex,
            max_hp: 20,
            ..NewCombatant::default()
        }
        .into_combatant()
    }

    fn names(encounter: &Encounter) -> Vec<&str> {
        encounter.combatants.iter().map(|c| c.name.as_str()).collect()
    }

    fn party() -> Encounter {
        let mut encounter = Encounter::new();
        encounter.add_combatant(fighter("Aria", CombatantType::Player, 18, 3));
        encounter.add_combatant(fighter("Goblin", CombatantType::Enemy, 12, 2));
        encounter.add_combatant(fighter("Brother Tom", CombatantType::Npc, 7, 0));
        encounter
    }

    #[test]
    fn test_initiative_tiebreak() {
        let mut encounter = Encounter::new();
        encounter.add_combatant(fighter("A", CombatantType::Enemy, 10, 2));
        encounter.add_combatant(fighter("B", CombatantType::Enemy, 10, 1));
        encounter.add_combatant(fighter("C", CombatantType::Enemy, 15, 0));

        assert_eq!(names(&encounter), ["C", "A", "B"]);
    }

    #[test]
    fn test_exact_ties_keep_insertion_order() {
        let mut encounter = Encounter::new();
        for name in ["First", "Second", "Third"] {
            encounter.add_combatant(fighter(name, CombatantType::Enemy, 10, 1));
        }
        encounter.add_combatant(fighter("Fast", CombatantType::Enemy, 11, 0));

        assert_eq!(names(&encounter), ["Fast", "First", "Second", "Third"]);
    }

    #[test]
    fn test_set_initiative_resorts() {
        let mut encounter = party();
        let tom = encounter.combatants[2].id.clone();
        encounter.set_initiative(&tom, 25).unwrap();
        assert_eq!(names(&encounter), ["Brother Tom", "Aria", "Goblin"]);
    }

    #[test]
    fn test_start_combat_requires_combatants() {
        let mut encounter = Encounter::new();
        let mut dice = ScriptedDice::new([]);
        assert_eq!(encounter.start_combat(&mut dice), Err(EncounterError::NoCombatants));
        assert!(!encounter.combat_active);
        assert!(encounter.encounter_id.is_none());
    }

    #[test]
    fn test_start_combat_rolls_missing_initiative() {
        let mut encounter = party();
        encounter.add_combatant(fighter("Wolf", CombatantType::Enemy, 0, 2));
        encounter.current_turn_index = 2;
        encounter.round_number = 4;

        let mut dice = ScriptedDice::new([17]);
        encounter.start_combat(&mut dice).unwrap();

        // Wolf rolls 17 + 2 = 19 and jumps to the top
        assert_eq!(names(&encounter), ["Wolf", "Aria", "Goblin", "Brother Tom"]);
        assert_eq!(encounter.combatants[0].initiative, 19);
        assert_eq!(encounter.current_turn_index, 0);
        assert_eq!(encounter.round_number, 1);
        assert!(encounter.combat_active);
        assert!(encounter.encounter_id.is_some());
    }

    #[test]
    fn test_start_combat_keeps_existing_id() {
        let mut encounter = party();
        encounter.encounter_id = Some("saved-earlier".to_string());
        encounter.start_combat(&mut ScriptedDice::new([])).unwrap();
        assert_eq!(encounter.encounter_id.as_deref(), Some("saved-earlier"));
    }

    #[test]
    fn test_next_turn_requires_active_combat() {
        let mut encounter = party();
        assert_eq!(encounter.next_turn(), Err(EncounterError::CombatNotActive));

        let mut empty = Encounter::new();
        empty.combat_active = true;
        assert_eq!(empty.next_turn(), Err(EncounterError::NoCombatants));
    }

    #[test]
    fn test_full_round_wraps_and_ages_effects() {
        let mut encounter = party();
        encounter.start_combat(&mut ScriptedDice::new([])).unwrap();
        encounter.combatants[0].status_effects.push(StatusEffect::new("Blessed", 3));
        encounter.combatants[1].status_effects.push(StatusEffect::new("Frightened", 1));
        encounter.combatants[2].status_effects.push(StatusEffect::new("Hasted", 2));

        for step in 1..encounter.combatants.len() {
            let advance = encounter.next_turn().unwrap();
            assert!(!advance.round_wrapped);
            assert_eq!(encounter.current_turn_index, step);
            assert_eq!(encounter.combatants[0].status_effects[0].duration, 3);
        }

        let advance = encounter.next_turn().unwrap();
        assert!(advance.round_wrapped);
        assert_eq!(encounter.current_turn_index, 0);
        assert_eq!(encounter.round_number, 2);
        assert_eq!(advance.expired.len(), 1);
        assert_eq!(advance.expired[0].effect, "Frightened");

        assert_eq!(encounter.combatants[0].status_effects[0].duration, 2);
        assert!(encounter.combatants[1].status_effects.is_empty());
        assert_eq!(encounter.combatants[2].status_effects[0].duration, 1);
    }

    #[test]
    fn test_turn_boundaries_apply_effects() {
        let mut encounter = party();
        encounter.start_combat(&mut ScriptedDice::new([])).unwrap();

        let aria = encounter.combatants[0].id.clone();
        let goblin = encounter.combatants[1].id.clone();
        encounter
            .add_status_effect(&aria, StatusEffect::new("Burning", 5).with_hp_change(-3, HpTiming::End))
            .unwrap();
        encounter
            .add_status_effect(&goblin, StatusEffect::new("Poison", 5).with_hp_change(-4, HpTiming::Start))
            .unwrap();

        encounter.next_turn().unwrap();

        assert_eq!(encounter.combatant(&aria).unwrap().hp.current, 17);
        assert_eq!(encounter.combatant(&goblin).unwrap().hp.current, 16);
    }

    #[test]
    fn test_start_effect_on_downed_player_stays_at_zero() {
        let mut encounter = Encounter::new();
        let mut hero = fighter("Hero", CombatantType::Player, 5, 0);
        hero.hp = HitPoints::full(10);
        let hero_id = encounter.add_combatant(hero);
        encounter.add_combatant(fighter("Ogre", CombatantType::Enemy, 15, 0));
        encounter.start_combat(&mut ScriptedDice::new([])).unwrap();

        encounter.damage(&hero_id, 15).unwrap();
        assert_eq!(encounter.combatant(&hero_id).unwrap().hp.current, 0);

        encounter
            .add_status_effect(&hero_id, StatusEffect::new("Bleeding", 3).with_hp_change(-5, HpTiming::Start))
            .unwrap();
        encounter.next_turn().unwrap();

        assert_eq!(encounter.current_combatant().unwrap().id, hero_id);
        assert_eq!(encounter.combatant(&hero_id).unwrap().hp.current, 0);
    }

    #[test]
    fn test_end_combat_keeps_pointer() {
        let mut encounter = party();
        encounter.start_combat(&mut ScriptedDice::new([])).unwrap();
        encounter.next_turn().unwrap();
        encounter.end_combat();

        assert!(!encounter.combat_active);
        assert_eq!(encounter.current_turn_index, 1);
        assert_eq!(encounter.round_number, 1);
        assert!(encounter.current_combatant().is_none());
    }

    #[test]
    fn test_reorder_with_subset_drops_omitted() {
        let mut encounter = party();
        let order = vec![
            encounter.combatants[2].id.clone(),
            "no-such-id".to_string(),
            encounter.combatants[0].id.clone(),
        ];

        encounter.reorder_initiative(&order);

        // Goblin was not listed, so it is gone from the encounter
        assert_eq!(names(&encounter), ["Brother Tom", "Aria"]);
    }

    #[test]
    fn test_reorder_bypasses_sort_rule() {
        let mut encounter = party();
        let reversed: Vec<String> = encounter.combatants.iter().rev().map(|c| c.id.clone()).collect();
        encounter.reorder_initiative(&reversed);
        assert_eq!(names(&encounter), ["Brother Tom", "Goblin", "Aria"]);
    }

    #[test]
    fn test_strict_reorder_rejects_subset() {
        let mut encounter = party();
        let before = encounter.clone();
        let subset = vec![encounter.combatants[0].id.clone()];

        assert_eq!(
            encounter.reorder_initiative_strict(&subset),
            Err(EncounterError::IncompleteOrder)
        );
        assert_eq!(encounter, before);

        let duplicated = vec![
            encounter.combatants[0].id.clone(),
            encounter.combatants[0].id.clone(),
            encounter.combatants[1].id.clone(),
        ];
        assert!(encounter.reorder_initiative_strict(&duplicated).is_err());
    }

    #[test]
    fn test_remove_clamps_turn_pointer() {
        let mut encounter = party();
        encounter.start_combat(&mut ScriptedDice::new([])).unwrap();
        encounter.next_turn().unwrap();
        encounter.next_turn().unwrap();
        assert_eq!(encounter.current_turn_index, 2);

        let last = encounter.combatants[2].id.clone();
        encounter.remove_combatant(&last).unwrap();
        assert_eq!(encounter.current_turn_index, 0);
    }

    #[test]
    fn test_remove_before_pointer_does_not_retarget() {
        let mut encounter = party();
        encounter.start_combat(&mut ScriptedDice::new([])).unwrap();
        encounter.next_turn().unwrap();
        assert_eq!(encounter.current_combatant().unwrap().name, "Goblin");

        let first = encounter.combatants[0].id.clone();
        encounter.remove_combatant(&first).unwrap();

        // Pointer still says 1, which is now the NPC: the goblin's turn is skipped
        assert_eq!(encounter.current_turn_index, 1);
        assert_eq!(encounter.current_combatant().unwrap().name, "Brother Tom");
    }

    #[test]
    fn test_unknown_combatant_is_error() {
        let mut encounter = party();
        let before = encounter.clone();
        assert!(matches!(
            encounter.damage("ghost", 5),
            Err(EncounterError::CombatantNotFound(_))
        ));
        assert!(encounter.remove_combatant("ghost").is_err());
        assert_eq!(encounter, before);
    }

    #[test]
    fn test_enemies_do_not_roll_death_saves() {
        let mut encounter = party();
        let goblin = encounter.combatants[1].id.clone();
        let result = encounter.roll_death_save(&goblin, &mut ScriptedDice::new([]));
        assert_eq!(result, Err(EncounterError::NoDeathSaves(CombatantType::Enemy)));
    }

    #[test]
    fn test_death_saves_by_id() {
        let mut encounter = party();
        let tom = encounter.combatants[2].id.clone();
        encounter.damage(&tom, 50).unwrap();

        encounter.record_death_save(&tom, DeathSaveKind::Failures, 2).unwrap();
        let roll = encounter.roll_death_save(&tom, &mut ScriptedDice::new([20])).unwrap();
        assert!(roll.result.contains("critical success"));

        let tom = encounter.combatant(&tom).unwrap();
        assert_eq!(tom.hp.current, 1);
        assert_eq!(tom.death_saves.failures, 0);
    }

    #[test]
    fn test_effect_and_loot_indices() {
        let mut encounter = party();
        let aria = encounter.combatants[0].id.clone();
        encounter.add_status_effect(&aria, StatusEffect::new("Prone", 1)).unwrap();
        encounter.add_loot(&aria, "Potion of Healing".to_string()).unwrap();

        assert!(encounter.remove_status_effect(&aria, 3).is_err());
        assert_eq!(encounter.remove_status_effect(&aria, 0).unwrap().name, "Prone");
        assert!(encounter.remove_loot(&aria, 1).is_err());
        assert_eq!(encounter.remove_loot(&aria, 0).unwrap(), "Potion of Healing");
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut encounter = party();
        encounter.start_combat(&mut ScriptedDice::new([])).unwrap();
        encounter.next_turn().unwrap();

        encounter.reset(Some("Ambush".to_string()));
        assert_eq!(encounter.name.as_deref(), Some("Ambush"));
        assert!(encounter.combatants.is_empty());
        assert_eq!(encounter.round_number, 1);
        assert!(!encounter.combat_active);
        assert!(encounter.encounter_id.is_none());
    }

    #[test]
    fn test_snapshot_round_trip_and_normalize() {
        let mut encounter = party();
        encounter.start_combat(&mut ScriptedDice::new([])).unwrap();

        let json = serde_json::to_value(&encounter).unwrap();
        assert_eq!(json["roundNumber"], 1);
        assert_eq!(json["combatants"][0]["type"], "player");

        let mut loaded: Encounter = serde_json::from_value(json).unwrap();
        assert_eq!(loaded, encounter);

        loaded.current_turn_index = 40;
        loaded.combatants[0].hp.current = 500;
        loaded.normalize();
        assert_eq!(loaded.current_turn_index, 0);
        assert_eq!(loaded.combatants[0].hp.current, 20);
    }
}
