//! Character profile type

use serde::{Deserialize, Serialize};

use crate::combat::{AttackProfile, CombatantType, NewCombatant};

fn default_ac() -> u32 {
    10
}

/// A stored character or monster stat block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterProfile {
    /// Assigned by the store on create
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: CombatantType,
    #[serde(default = "default_ac")]
    pub ac: u32,
    #[serde(default)]
    pub max_hp: u32,
    #[serde(default)]
    pub dex_modifier: i32,
    #[serde(default)]
    pub attacks: Vec<AttackProfile>,
    #[serde(default)]
    pub notes: String,
}

impl CharacterProfile {
    /// Find an attack by name (case-insensitive)
    pub fn attack(&self, name: &str) -> Option<&AttackProfile> {
        self.attacks
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Combatant fields pre-filled from this profile and linked back to it
    pub fn to_new_combatant(&self) -> NewCombatant {
        NewCombatant {
            name: self.name.clone(),
            kind: self.kind,
            dex_modifier: self.dex_modifier,
            ac: self.ac,
            max_hp: self.max_hp,
            character_id: Some(self.id.clone()),
            ..NewCombatant::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ogre() -> CharacterProfile {
        serde_json::from_value(serde_json::json!({
            "name": "Ogre",
            "type": "monster",
            "ac": 11,
            "maxHp": 59,
            "dexModifier": -1,
            "attacks": [
                {"name": "Greatclub", "attackBonus": 6, "damageDice": "2d8+4", "damageType": "bludgeoning"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_attack_lookup_ignores_case() {
        let profile = ogre();
        assert_eq!(profile.attack("greatclub").unwrap().attack_bonus, 6);
        assert!(profile.attack("Javelin").is_none());
    }

    #[test]
    fn test_new_combatant_from_profile() {
        let mut profile = ogre();
        profile.id = "char-1".to_string();

        let combatant = profile.to_new_combatant().into_combatant();
        assert_eq!(combatant.kind, CombatantType::Enemy);
        assert_eq!(combatant.hp.max, 59);
        assert_eq!(combatant.ac, 11);
        assert_eq!(combatant.character_id.as_deref(), Some("char-1"));
    }
}
