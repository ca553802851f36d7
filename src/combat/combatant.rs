//! Combatants and their role tags

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::effects::StatusEffect;
use super::hp::{DeathSaves, HitPoints, Ledger};

/// Unrecognized combatant type tag
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown combatant type: {0:?}")]
pub struct UnknownCombatantType(pub String);

/// Role of a combatant in the encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum CombatantType {
    Player,
    Npc,
    #[default]
    Enemy,
}

impl CombatantType {
    /// Only non-player combatants expose an attack list
    pub fn has_attacks(&self) -> bool {
        !matches!(self, CombatantType::Player)
    }

    /// Players and NPCs roll death saves; enemies simply drop
    pub fn makes_death_saves(&self) -> bool {
        matches!(self, CombatantType::Player | CombatantType::Npc)
    }
}

impl FromStr for CombatantType {
    type Err = UnknownCombatantType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "p" | "player" | "pc" => Ok(CombatantType::Player),
            "n" | "npc" => Ok(CombatantType::Npc),
            "e" | "enemy" | "monster" => Ok(CombatantType::Enemy),
            _ => Err(UnknownCombatantType(s.to_string())),
        }
    }
}

impl TryFrom<String> for CombatantType {
    type Error = UnknownCombatantType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for CombatantType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CombatantType::Player => "player",
            CombatantType::Npc => "npc",
            CombatantType::Enemy => "enemy",
        };
        write!(f, "{}", s)
    }
}

/// One participant in an encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combatant {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CombatantType,
    #[serde(default)]
    pub initiative: i32,
    #[serde(default)]
    pub dex_modifier: i32,
    #[serde(default)]
    pub ac: u32,
    pub hp: HitPoints,
    #[serde(default)]
    pub status_effects: Vec<StatusEffect>,
    #[serde(default)]
    pub death_saves: DeathSaves,
    #[serde(default)]
    pub loot: Vec<String>,
    /// Stored character profile this combatant was created from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_id: Option<String>,
}

impl Combatant {
    /// Ledger over this combatant's hit points and death saves
    pub fn ledger(&mut self) -> Ledger<'_> {
        Ledger::new(&mut self.hp, &mut self.death_saves)
    }

    pub fn is_down(&self) -> bool {
        self.hp.is_down()
    }

    /// Restore invariants on data that did not come through the ledger
    pub fn normalize(&mut self) {
        self.hp.current = self.hp.current.min(self.hp.max);
        self.death_saves.clamp();
    }
}

/// Fields accepted when adding a combatant; anything omitted is defaulted
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewCombatant {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CombatantType,
    pub initiative: i32,
    pub dex_modifier: i32,
    pub ac: u32,
    pub max_hp: u32,
    /// Starting HP if not at full health
    pub current_hp: Option<u32>,
    pub temp_hp: u32,
    pub loot: Vec<String>,
    pub character_id: Option<String>,
}

impl Default for NewCombatant {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: CombatantType::default(),
            initiative: 0,
            dex_modifier: 0,
            ac: 10,
            max_hp: 10,
            current_hp: None,
            temp_hp: 0,
            loot: Vec::new(),
            character_id: None,
        }
    }
}

impl NewCombatant {
    /// Build the combatant, assigning a fresh id
    pub fn into_combatant(self) -> Combatant {
        let name = match self.name.trim() {
            "" => "Unnamed".to_string(),
            name => name.to_string(),
        };
        let hp = HitPoints {
            current: self.current_hp.unwrap_or(self.max_hp).min(self.max_hp),
            max: self.max_hp,
            temp: self.temp_hp,
        };

        Combatant {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            kind: self.kind,
            initiative: self.initiative,
            dex_modifier: self.dex_modifier,
            ac: self.ac,
            hp,
            status_effects: Vec::new(),
            death_saves: DeathSaves::default(),
            loot: self.loot,
            character_id: self.character_id,
        }
    }
}

/// Partial edit of a combatant's descriptive fields
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CombatantPatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<CombatantType>,
    pub ac: Option<u32>,
    pub dex_modifier: Option<i32>,
    pub max_hp: Option<u32>,
    pub character_id: Option<String>,
}

impl CombatantPatch {
    /// Apply to a combatant; returns whether the sort key changed
    pub fn apply(self, combatant: &mut Combatant) -> bool {
        if let Some(name) = self.name {
            combatant.name = name;
        }
        if let Some(kind) = self.kind {
            combatant.kind = kind;
        }
        if let Some(ac) = self.ac {
            combatant.ac = ac;
        }
        if let Some(max_hp) = self.max_hp {
            combatant.ledger().set_max(max_hp);
        }
        if let Some(character_id) = self.character_id {
            combatant.character_id = Some(character_id);
        }
        match self.dex_modifier {
            Some(dex) if dex != combatant.dex_modifier => {
                combatant.dex_modifier = dex;
                true
            }
            _ => false,
        }
    }
}
