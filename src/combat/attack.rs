//! Attack resolution
//!
//! A pure to-hit and damage computation. Resolving an attack never touches
//! encounter state: the caller stages the outcome and commits the damage as
//! a separate hit point transaction.

use serde::{Deserialize, Serialize};

use super::dice::{evaluate, parse_dice, DiceError, DiceMode, DiceSource};

/// An attack from a character profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackProfile {
    pub name: String,
    #[serde(default)]
    pub attack_bonus: i32,
    pub damage_dice: String,
    #[serde(default)]
    pub damage_type: String,
}

/// Result of an attack roll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackOutcome {
    /// The natural d20
    pub d20: u32,
    /// d20 plus attack bonus
    pub total: i32,
    pub target_ac: u32,
    pub critical: bool,
    pub critical_miss: bool,
    pub hit: bool,
    /// Damage to commit if the caller accepts the hit; 0 on a miss
    pub damage: u32,
}

impl AttackOutcome {
    /// Evaluate the to-hit roll, with no damage yet
    pub fn from_roll(d20: u32, attack_bonus: i32, target_ac: u32) -> Self {
        let critical = d20 == 20;
        let critical_miss = d20 == 1;
        let total = d20 as i32 + attack_bonus;

        // Natural 20 always hits, natural 1 always misses
        let hit = critical || (!critical_miss && i64::from(total) >= i64::from(target_ac));

        Self {
            d20,
            total,
            target_ac,
            critical,
            critical_miss,
            hit,
            damage: 0,
        }
    }

    /// Record rolled damage; negative rolls count as no damage
    pub fn with_damage(mut self, rolled: i32) -> Self {
        self.damage = if self.hit { rolled.max(0) as u32 } else { 0 };
        self
    }
}

/// Resolve an attack against a target AC (malformed damage dice deal 0)
pub fn resolve_attack(
    attack: &AttackProfile,
    target_ac: u32,
    dice: &mut dyn DiceSource,
) -> AttackOutcome {
    let outcome = AttackOutcome::from_roll(dice.d20(), attack.attack_bonus, target_ac);
    if !outcome.hit {
        return outcome;
    }

    let rolled = evaluate(&attack.damage_dice, outcome.critical, dice);
    outcome.with_damage(rolled)
}

/// Resolve an attack under the given dice mode
///
/// In strict mode the damage expression is validated before anything is
/// rolled, so a bad profile fails the same way on a hit or a miss.
pub fn resolve_attack_with(
    attack: &AttackProfile,
    target_ac: u32,
    mode: DiceMode,
    dice: &mut dyn DiceSource,
) -> Result<AttackOutcome, DiceError> {
    if mode == DiceMode::Strict {
        parse_dice(&attack.damage_dice)?;
    }

    let outcome = AttackOutcome::from_roll(dice.d20(), attack.attack_bonus, target_ac);
    if !outcome.hit {
        return Ok(outcome);
    }

    let rolled = mode.evaluate(&attack.damage_dice, outcome.critical, dice)?;
    Ok(outcome.with_damage(rolled))
}
