//! Character profile persistence and CRUD operations

use sqlx::SqlitePool;

use super::CharacterProfile;
use crate::db::StoreResult as Result;

/// Character storage with database backing
pub struct CharacterStore {
    pool: SqlitePool,
}

impl CharacterStore {
    /// Create a new character store with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a new profile, assigning its id
    pub async fn create(&self, mut profile: CharacterProfile) -> Result<CharacterProfile> {
        profile.id = uuid::Uuid::new_v4().to_string();
        let json = serde_json::to_string(&profile)?;
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query("INSERT INTO characters (id, name, profile, updated_at) VALUES (?, ?, ?, ?)")
            .bind(&profile.id)
            .bind(&profile.name)
            .bind(&json)
            .bind(&now)
            .execute(&self.pool)
            .await?;

        Ok(profile)
    }

    /// Get a profile by ID
    pub async fn get(&self, id: &str) -> Result<Option<CharacterProfile>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT profile FROM characters WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some((json,)) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Replace an existing profile; returns false if the id is unknown
    pub async fn update(&self, profile: &CharacterProfile) -> Result<bool> {
        let json = serde_json::to_string(profile)?;
        let now = chrono::Utc::now().to_rfc3339();

        let result =
            sqlx::query("UPDATE characters SET name = ?, profile = ?, updated_at = ? WHERE id = ?")
                .bind(&profile.name)
                .bind(&json)
                .bind(&now)
                .bind(&profile.id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a profile
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM characters WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All profiles, by name
    pub async fn list(&self) -> Result<Vec<CharacterProfile>> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT profile FROM characters ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|(json,)| Ok(serde_json::from_str(&json)?))
            .collect()
    }

    /// Profiles with exactly this name
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<CharacterProfile>> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT profile FROM characters WHERE name = ?")
            .bind(name)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|(json,)| Ok(serde_json::from_str(&json)?))
            .collect()
    }
}
