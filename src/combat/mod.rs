//! Combat engine
//!
//! Implements tabletop combat tracking with:
//! - Dice rolling (e.g., "2d6+3")
//! - Attack resolution with to-hit, criticals and damage
//! - Hit points, temporary hit points and death saves
//! - Timed status effects with start/end-of-turn HP deltas
//! - Initiative order and turn/round advancement

mod attack;
mod combatant;
mod dice;
mod effects;
mod encounter;
mod hp;

pub use attack::{resolve_attack, resolve_attack_with, AttackOutcome, AttackProfile};
pub use combatant::{Combatant, CombatantPatch, CombatantType, NewCombatant, UnknownCombatantType};
pub use dice::{
    evaluate, evaluate_strict, parse_dice, DiceError, DiceMode, DiceRoll, DiceSource, RngDice,
};
#[cfg(test)]
pub(crate) use dice::ScriptedDice;
pub use effects::{advance_round, apply_timing, AppliedEffect, ExpiredEffect, HpTiming, StatusEffect};
pub use encounter::{Encounter, EncounterError, TurnAdvance};
pub use hp::{
    DamageApplied, DeathSaveKind, DeathSaveOutcome, DeathSaveRoll, DeathSaves, HitPoints, Ledger,
};
