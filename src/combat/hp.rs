//! Hit point ledger
//!
//! Current/max/temporary hit points and death-save counters for a single
//! combatant. All transitions keep `current <= max` and both death-save
//! counters within `[0, 3]`.

use serde::{Deserialize, Serialize};

use super::dice::DiceSource;

/// Death-save counters saturate at this value
pub const MAX_DEATH_SAVES: u8 = 3;

/// Hit point pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HitPoints {
    pub current: u32,
    pub max: u32,
    #[serde(default)]
    pub temp: u32,
}

impl HitPoints {
    /// A full pool with no temporary hit points
    pub fn full(max: u32) -> Self {
        Self {
            current: max,
            max,
            temp: 0,
        }
    }

    /// Down means zero current hit points
    pub fn is_down(&self) -> bool {
        self.current == 0
    }
}

/// Death-save tallies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeathSaves {
    pub successes: u8,
    pub failures: u8,
}

impl DeathSaves {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Clamp both counters into range (used after loading a snapshot)
    pub fn clamp(&mut self) {
        self.successes = self.successes.min(MAX_DEATH_SAVES);
        self.failures = self.failures.min(MAX_DEATH_SAVES);
    }
}

/// Which death-save counter to set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeathSaveKind {
    #[serde(alias = "success")]
    Successes,
    #[serde(alias = "failure")]
    Failures,
}

/// Category of a rolled death save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathSaveOutcome {
    CriticalFailure,
    Failure,
    Success,
    CriticalSuccess,
}

impl DeathSaveOutcome {
    fn from_roll(roll: u32) -> Self {
        match roll {
            1 => DeathSaveOutcome::CriticalFailure,
            20.. => DeathSaveOutcome::CriticalSuccess,
            10..=19 => DeathSaveOutcome::Success,
            _ => DeathSaveOutcome::Failure,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            DeathSaveOutcome::CriticalFailure => "critical failure (2 failures)",
            DeathSaveOutcome::Failure => "failure",
            DeathSaveOutcome::Success => "success",
            DeathSaveOutcome::CriticalSuccess => "critical success (regains 1 HP)",
        }
    }
}

/// Result of rolling a death save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathSaveRoll {
    pub roll: u32,
    pub outcome: DeathSaveOutcome,
    pub stabilized: bool,
    /// Human-readable summary, e.g. "success, stabilized"
    pub result: String,
}

/// How a damage transaction was absorbed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageApplied {
    pub temp_absorbed: u32,
    pub hp_lost: u32,
}

/// Mutable view over one combatant's hit points and death saves
pub struct Ledger<'a> {
    hp: &'a mut HitPoints,
    saves: &'a mut DeathSaves,
}

impl<'a> Ledger<'a> {
    pub fn new(hp: &'a mut HitPoints, saves: &'a mut DeathSaves) -> Self {
        Self { hp, saves }
    }

    /// Take damage: temporary hit points absorb first, then current (floored at 0)
    pub fn damage(&mut self, amount: u32) -> DamageApplied {
        let temp_absorbed = amount.min(self.hp.temp);
        self.hp.temp -= temp_absorbed;

        let hp_lost = (amount - temp_absorbed).min(self.hp.current);
        self.hp.current -= hp_lost;

        DamageApplied {
            temp_absorbed,
            hp_lost,
        }
    }

    /// Heal up to max; coming back from 0 clears the death saves
    pub fn heal(&mut self, amount: u32) -> u32 {
        let was_down = self.hp.is_down();
        let healed = amount.min(self.hp.max.saturating_sub(self.hp.current));
        self.hp.current += healed;

        if was_down && !self.hp.is_down() {
            self.saves.clear();
        }
        healed
    }

    /// Temporary hit points do not stack; the larger pool wins
    pub fn set_temp(&mut self, amount: u32) {
        self.hp.temp = self.hp.temp.max(amount);
    }

    /// Change the maximum, pulling current down if needed
    pub fn set_max(&mut self, max: u32) {
        self.hp.max = max;
        self.hp.current = self.hp.current.min(max);
    }

    /// Set a counter directly (the click-a-pip pattern), clamped to `[0, 3]`
    pub fn record_death_save(&mut self, kind: DeathSaveKind, value: i32) {
        let value = value.clamp(0, MAX_DEATH_SAVES as i32) as u8;
        match kind {
            DeathSaveKind::Successes => self.saves.successes = value,
            DeathSaveKind::Failures => self.saves.failures = value,
        }
    }

    /// Roll a d20 death save and apply it
    pub fn roll_death_save(&mut self, dice: &mut dyn DiceSource) -> DeathSaveRoll {
        let roll = dice.d20();
        let outcome = DeathSaveOutcome::from_roll(roll);

        match outcome {
            DeathSaveOutcome::CriticalFailure => {
                self.saves.failures = (self.saves.failures + 2).min(MAX_DEATH_SAVES);
            }
            DeathSaveOutcome::Failure => {
                self.saves.failures = (self.saves.failures + 1).min(MAX_DEATH_SAVES);
            }
            DeathSaveOutcome::Success => {
                self.saves.successes = (self.saves.successes + 1).min(MAX_DEATH_SAVES);
            }
            DeathSaveOutcome::CriticalSuccess => self.revive(),
        }

        let stabilized = self.saves.successes >= MAX_DEATH_SAVES;
        if stabilized {
            self.revive();
        }

        let mut result = outcome.describe().to_string();
        if stabilized {
            result.push_str(", stabilized");
        }

        DeathSaveRoll {
            roll,
            outcome,
            stabilized,
            result,
        }
    }

    /// Back to 1 HP (never above max) with a clean slate
    fn revive(&mut self) {
        self.hp.current = self.hp.max.min(1);
        self.saves.clear();
    }
}
