//! Status effects system
//!
//! Timed conditions attached to a combatant. An effect may carry a hit
//! point delta applied at the start or end of its owner's turn; every
//! effect ages by one round when the turn order wraps.
//!
//! Modifiers other than the HP delta (AC, speed, advantage tags, boolean
//! conditions) are carried as data for display only and round-trip
//! unchanged, including any fields this server does not know about.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::combatant::Combatant;
use super::hp::Ledger;

/// Which turn boundary applies an effect's HP delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HpTiming {
    #[default]
    Start,
    End,
}

impl std::fmt::Display for HpTiming {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HpTiming::Start => write!(f, "start"),
            HpTiming::End => write!(f, "end"),
        }
    }
}

/// A status effect instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEffect {
    pub name: String,
    /// Rounds remaining
    pub duration: i32,
    /// Signed HP delta: positive heals, negative damages
    #[serde(default)]
    pub hp_change: i32,
    #[serde(default)]
    pub hp_timing: HpTiming,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ac_modifier: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_modifier: Option<i32>,
    /// Rolls made with advantage, e.g. "attack", "dex saves"
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advantage: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disadvantage: Vec<String>,
    /// Boolean conditions such as `incapacitated`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub conditions: BTreeMap<String, bool>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl StatusEffect {
    /// Create a new status effect with no HP delta
    pub fn new(name: impl Into<String>, duration: i32) -> Self {
        Self {
            name: name.into(),
            duration,
            hp_change: 0,
            hp_timing: HpTiming::default(),
            ac_modifier: None,
            speed_modifier: None,
            advantage: Vec::new(),
            disadvantage: Vec::new(),
            conditions: BTreeMap::new(),
            extra: serde_json::Map::new(),
        }
    }

    /// Attach an HP delta applied at the given boundary
    pub fn with_hp_change(mut self, hp_change: i32, timing: HpTiming) -> Self {
        self.hp_change = hp_change;
        self.hp_timing = timing;
        self
    }

    /// Check if effect has expired
    pub fn is_expired(&self) -> bool {
        self.duration <= 0
    }

    /// Age by one round
    pub fn tick(&mut self) {
        self.duration = self.duration.saturating_sub(1);
    }
}

/// One HP delta applied by an effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedEffect {
    pub effect: String,
    pub hp_change: i32,
}

/// An effect that ran out during a round wrap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiredEffect {
    pub combatant: String,
    pub effect: String,
}

/// Apply every effect whose timing matches, in stored order
///
/// Positive deltas heal (capped at max), negative deltas damage (temporary
/// hit points first, floored at 0).
pub fn apply_timing(combatant: &mut Combatant, timing: HpTiming) -> Vec<AppliedEffect> {
    let Combatant {
        hp,
        death_saves,
        status_effects,
        ..
    } = combatant;
    let mut ledger = Ledger::new(hp, death_saves);
    let mut applied = Vec::new();

    for effect in status_effects
        .iter()
        .filter(|e| e.hp_timing == timing && e.hp_change != 0)
    {
        if effect.hp_change > 0 {
            ledger.heal(effect.hp_change.unsigned_abs());
        } else {
            ledger.damage(effect.hp_change.unsigned_abs());
        }
        applied.push(AppliedEffect {
            effect: effect.name.clone(),
            hp_change: effect.hp_change,
        });
    }

    applied
}

/// Age every effect on every combatant by one round, dropping expired ones
pub fn advance_round(combatants: &mut [Combatant]) -> Vec<ExpiredEffect> {
    let mut expired = Vec::new();

    for combatant in combatants.iter_mut() {
        for effect in &mut combatant.status_effects {
            effect.tick();
        }

        let name = &combatant.name;
        combatant.status_effects.retain(|effect| {
            if effect.is_expired() {
                expired.push(ExpiredEffect {
                    combatant: name.clone(),
                    effect: effect.name.clone(),
                });
                false
            } else {
                true
            }
        });
    }

    expired
}
