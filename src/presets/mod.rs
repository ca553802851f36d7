//! Effect presets - named status effect templates kept for reuse

use sqlx::SqlitePool;

use crate::combat::StatusEffect;
use crate::db::StoreResult as Result;

/// Preset storage with database backing
pub struct EffectPresetStore {
    pool: SqlitePool,
}

impl EffectPresetStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert or replace the preset stored under the effect's name
    pub async fn upsert(&self, effect: &StatusEffect) -> Result<()> {
        let json = serde_json::to_string(effect)?;
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO effect_presets (name, effect, updated_at) VALUES (?, ?, ?)
            ON CONFLICT(name) DO UPDATE SET effect = excluded.effect, updated_at = excluded.updated_at
            "#,
        )
        .bind(&effect.name)
        .bind(&json)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get(&self, name: &str) -> Result<Option<StatusEffect>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT effect FROM effect_presets WHERE name = ?")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some((json,)) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self) -> Result<Vec<StatusEffect>> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT effect FROM effect_presets ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|(json,)| Ok(serde_json::from_str(&json)?))
            .collect()
    }

    pub async fn delete(&self, name: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM effect_presets WHERE name = ?")
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
