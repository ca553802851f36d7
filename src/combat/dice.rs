//! Dice rolling system
//!
//! Parses and rolls compact dice notation: `[count]d<size>[+|-mod]`, e.g.
//! "2d6+3", "d20", "4D8-2".
//!
//! Two evaluation modes exist. [`DiceMode::Lenient`] treats anything that
//! does not match the grammar as a roll of `0` (a valid "no damage" result,
//! not an error), which is what clients of the tracker have always relied
//! on. [`DiceMode::Strict`] surfaces the parse error instead.

use std::str::FromStr;
use std::sync::LazyLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Largest die count accepted in one expression (before critical doubling)
pub const MAX_DICE: u32 = 1000;

/// Largest die size accepted
pub const MAX_SIDES: u32 = 10_000;

static DICE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d*)d(\d+)(?:([+-])(\d+))?$").expect("dice pattern compiles")
});

/// Dice expression errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("malformed dice expression: {0:?}")]
    Malformed(String),

    #[error("dice count must be between 1 and {MAX_DICE}")]
    BadCount,

    #[error("die sides must be between 1 and {MAX_SIDES}")]
    BadSides,
}

/// Source of uniform die rolls
///
/// Every random draw in the engine goes through this trait so tests (and
/// replays) can substitute a deterministic source.
pub trait DiceSource: Send {
    /// Roll one die, uniform in `[1, sides]`
    fn roll_die(&mut self, sides: u32) -> u32;

    /// Roll a single d20
    fn d20(&mut self) -> u32 {
        self.roll_die(20)
    }
}

/// Dice source backed by a `rand` generator
#[derive(Debug, Clone)]
pub struct RngDice<R = StdRng> {
    rng: R,
}

impl RngDice<StdRng> {
    /// Seed from the operating system
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic generator for reproducible sessions
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng + Send> DiceSource for RngDice<R> {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.rng.random_range(1..=sides.max(1))
    }
}

/// A parsed dice roll specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    /// Number of dice to roll
    pub count: u32,
    /// Number of sides per die
    pub sides: u32,
    /// Flat modifier, added once
    pub modifier: i32,
}

impl DiceRoll {
    /// Create a new dice roll
    pub fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self {
            count,
            sides,
            modifier,
        }
    }

    /// Number of dice actually rolled; a critical doubles the count
    pub fn dice_rolled(&self, critical: bool) -> u32 {
        if critical {
            self.count * 2
        } else {
            self.count
        }
    }

    /// Roll the dice and return the total
    pub fn roll(&self, dice: &mut dyn DiceSource, critical: bool) -> i32 {
        self.roll_detailed(dice, critical).1
    }

    /// Roll and return individual die results plus total
    pub fn roll_detailed(&self, dice: &mut dyn DiceSource, critical: bool) -> (Vec<u32>, i32) {
        let results: Vec<u32> = (0..self.dice_rolled(critical))
            .map(|_| dice.roll_die(self.sides))
            .collect();

        let sum: u32 = results.iter().sum();
        let total = (sum as i32).saturating_add(self.modifier);

        (results, total)
    }

    /// Minimum possible result
    pub fn min(&self, critical: bool) -> i32 {
        (self.dice_rolled(critical) as i32).saturating_add(self.modifier)
    }

    /// Maximum possible result
    pub fn max(&self, critical: bool) -> i32 {
        ((self.dice_rolled(critical) * self.sides) as i32).saturating_add(self.modifier)
    }
}

impl FromStr for DiceRoll {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_dice(s)
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.modifier > 0 {
            write!(f, "{}d{}+{}", self.count, self.sides, self.modifier)
        } else if self.modifier < 0 {
            write!(f, "{}d{}{}", self.count, self.sides, self.modifier)
        } else {
            write!(f, "{}d{}", self.count, self.sides)
        }
    }
}

/// Parse a dice notation string like "2d6+3"
pub fn parse_dice(notation: &str) -> Result<DiceRoll, DiceError> {
    let notation = notation.trim();
    let malformed = || DiceError::Malformed(notation.to_string());

    let caps = DICE_PATTERN.captures(notation).ok_or_else(malformed)?;

    // "d6" means "1d6"
    let count: u32 = match &caps[1] {
        "" => 1,
        digits => digits.parse().map_err(|_| DiceError::BadCount)?,
    };
    if count == 0 || count > MAX_DICE {
        return Err(DiceError::BadCount);
    }

    let sides: u32 = caps[2].parse().map_err(|_| DiceError::BadSides)?;
    if sides == 0 || sides > MAX_SIDES {
        return Err(DiceError::BadSides);
    }

    let modifier = match (caps.get(3), caps.get(4)) {
        (Some(sign), Some(amount)) => {
            let amount: i32 = amount.as_str().parse().map_err(|_| malformed())?;
            if sign.as_str() == "-" {
                -amount
            } else {
                amount
            }
        }
        _ => 0,
    };

    Ok(DiceRoll {
        count,
        sides,
        modifier,
    })
}

/// Evaluate an expression, yielding `0` for anything that does not parse
pub fn evaluate(expression: &str, critical: bool, dice: &mut dyn DiceSource) -> i32 {
    match parse_dice(expression) {
        Ok(roll) => roll.roll(dice, critical),
        Err(e) => {
            debug!("Treating dice expression {:?} as 0: {}", expression, e);
            0
        }
    }
}

/// Evaluate an expression, reporting parse failures
pub fn evaluate_strict(
    expression: &str,
    critical: bool,
    dice: &mut dyn DiceSource,
) -> Result<i32, DiceError> {
    Ok(parse_dice(expression)?.roll(dice, critical))
}

/// How malformed dice expressions are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiceMode {
    /// Malformed expressions roll `0`
    #[default]
    Lenient,
    /// Malformed expressions are an error
    Strict,
}

impl DiceMode {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            DiceMode::Strict
        } else {
            DiceMode::Lenient
        }
    }

    /// Evaluate an expression under this mode; lenient evaluation never fails
    pub fn evaluate(
        self,
        expression: &str,
        critical: bool,
        dice: &mut dyn DiceSource,
    ) -> Result<i32, DiceError> {
        match self {
            DiceMode::Lenient => Ok(evaluate(expression, critical, dice)),
            DiceMode::Strict => evaluate_strict(expression, critical, dice),
        }
    }
}

/// Dice source that replays a fixed sequence of results
#[cfg(test)]
pub(crate) struct ScriptedDice {
    rolls: std::collections::VecDeque<u32>,
}

#[cfg(test)]
impl ScriptedDice {
    pub(crate) fn new(rolls: impl IntoIterator<Item = u32>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
        }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

#[cfg(test)]
impl DiceSource for ScriptedDice {
    fn roll_die(&mut self, sides: u32) -> u32 {
        let roll = self.rolls.pop_front().expect("scripted dice exhausted");
        assert!(roll >= 1 && roll <= sides, "scripted roll {roll} is not a d{sides} result");
        roll
    }
}
