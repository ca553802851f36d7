//! Encounter snapshot persistence

use chrono::SecondsFormat;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::combat::Encounter;
use crate::db::StoreResult as Result;

/// Listing entry for a saved encounter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SavedEncounter {
    pub id: String,
    pub name: Option<String>,
    pub saved_at: String,
}

/// Snapshot storage keyed by encounter id
pub struct EncounterStore {
    pool: SqlitePool,
}

impl EncounterStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Write a snapshot under `id`, replacing any earlier one
    pub async fn save(&self, id: &str, encounter: &Encounter) -> Result<()> {
        let json = serde_json::to_string(encounter)?;
        // Fixed-width timestamps sort correctly as text
        let now = chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

        sqlx::query(
            r#"
            INSERT INTO encounters (id, name, snapshot, saved_at) VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                snapshot = excluded.snapshot,
                saved_at = excluded.saved_at
            "#,
        )
        .bind(id)
        .bind(&encounter.name)
        .bind(&json)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Load a snapshot by id
    pub async fn load(&self, id: &str) -> Result<Option<Encounter>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT snapshot FROM encounters WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|(json,)| decode(&json)).transpose()
    }

    /// Load the most recently saved snapshot
    pub async fn load_latest(&self) -> Result<Option<Encounter>> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT snapshot FROM encounters ORDER BY saved_at DESC, rowid DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(json,)| decode(&json)).transpose()
    }

    /// Saved encounters, newest first
    pub async fn list(&self) -> Result<Vec<SavedEncounter>> {
        let rows = sqlx::query_as::<_, SavedEncounter>(
            "SELECT id, name, saved_at FROM encounters ORDER BY saved_at DESC, rowid DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM encounters WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn decode(json: &str) -> Result<Encounter> {
    let mut encounter: Encounter = serde_json::from_str(json)?;
    encounter.normalize();
    Ok(encounter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::NewCombatant;
    use crate::db::test_utils::test_pool;

    fn encounter(name: &str) -> Encounter {
        let mut encounter = Encounter::new();
        encounter.reset(Some(name.to_string()));
        encounter.add_combatant(
            NewCombatant {
                name: "Goblin".to_string(),
                max_hp: 7,
                ..NewCombatant::default()
            }
            .into_combatant(),
        );
        encounter
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let store = EncounterStore::new(test_pool().await);
        let mut saved = encounter("Ambush");
        let id = saved.ensure_encounter_id();

        store.save(&id, &saved).await.unwrap();

        let loaded = store.load(&id).await.unwrap().unwrap();
        assert_eq!(loaded, saved);
        assert!(store.load("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites_same_id() {
        let store = EncounterStore::new(test_pool().await);
        let mut saved = encounter("Ambush");
        let id = saved.ensure_encounter_id();
        store.save(&id, &saved).await.unwrap();

        saved.round_number = 4;
        store.save(&id, &saved).await.unwrap();

        assert_eq!(store.list().await.unwrap().len(), 1);
        assert_eq!(store.load(&id).await.unwrap().unwrap().round_number, 4);
    }

    #[tokio::test]
    async fn test_latest_and_list_order() {
        let store = EncounterStore::new(test_pool().await);
        assert!(store.load_latest().await.unwrap().is_none());

        let mut first = encounter("First");
        let first_id = first.ensure_encounter_id();
        store.save(&first_id, &first).await.unwrap();

        let mut second = encounter("Second");
        let second_id = second.ensure_encounter_id();
        store.save(&second_id, &second).await.unwrap();

        let latest = store.load_latest().await.unwrap().unwrap();
        assert_eq!(latest.encounter_id.as_deref(), Some(second_id.as_str()));

        let names: Vec<Option<String>> =
            store.list().await.unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, [Some("Second".to_string()), Some("First".to_string())]);

        // Re-saving moves an encounter back to the top
        store.save(&first_id, &first).await.unwrap();
        let latest = store.load_latest().await.unwrap().unwrap();
        assert_eq!(latest.encounter_id.as_deref(), Some(first_id.as_str()));
    }

    #[tokio::test]
    async fn test_load_normalizes_snapshot() {
        let store = EncounterStore::new(test_pool().await);
        let mut saved = encounter("Broken");
        let id = saved.ensure_encounter_id();
        saved.current_turn_index = 9;
        saved.combatants[0].death_saves.failures = 7;
        store.save(&id, &saved).await.unwrap();

        let loaded = store.load(&id).await.unwrap().unwrap();
        assert_eq!(loaded.current_turn_index, 0);
        assert_eq!(loaded.combatants[0].death_saves.failures, 3);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = EncounterStore::new(test_pool().await);
        let mut saved = encounter("Gone");
        let id = saved.ensure_encounter_id();
        store.save(&id, &saved).await.unwrap();

        assert!(store.delete(&id).await.unwrap());
        assert!(!store.delete(&id).await.unwrap());
        assert!(store.list().await.unwrap().is_empty());
    }
}
