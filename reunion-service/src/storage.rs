//! Storage layer for the reunion service.
//!
//! `ReunionStorage` is the seam between the gRPC service and the store.
//! Each operation is exactly one SQL statement in the Postgres
//! implementation; participant add/remove update the comma-joined
//! `user_ids` column in place.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::participants::{join_ids, split_ids};
use crate::proto::Reunion;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("connection error: {0}")]
    Connection(sqlx::Error),
    #[error("statement rejected: {0}")]
    Statement(sqlx::Error),
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(_) => StorageError::Statement(e),
            _ => StorageError::Connection(e),
        }
    }
}

impl From<StorageError> for tonic::Status {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(msg) => tonic::Status::not_found(msg),
            StorageError::Connection(err) => {
                tracing::error!("database connection error: {err}");
                tonic::Status::unavailable(err.to_string())
            }
            StorageError::Statement(err) => {
                tracing::error!("statement error: {err}");
                tonic::Status::internal(err.to_string())
            }
        }
    }
}

#[async_trait]
pub trait ReunionStorage: Send + Sync + 'static {
    async fn list_reunions(&self) -> Result<Vec<Reunion>, StorageError>;
    async fn get_reunion(&self, id: &str) -> Result<Reunion, StorageError>;
    /// Insert-or-update keyed by id; echoes the supplied value rather
    /// than re-reading the row.
    async fn upsert_reunion(&self, reunion: Reunion) -> Result<Reunion, StorageError>;
    async fn delete_reunion(&self, id: &str) -> Result<(), StorageError>;
    /// Append a participant. No duplicate check: adding twice stores the
    /// id twice.
    async fn add_participant(&self, reunion_id: &str, user_id: &str) -> Result<(), StorageError>;
    /// Remove every occurrence of a participant, wherever it sits in the
    /// list. Removal is delimiter-aware, so an id that is a substring of
    /// another id is never clipped.
    async fn remove_participant(&self, reunion_id: &str, user_id: &str)
        -> Result<(), StorageError>;
}

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS reunions (
    id       TEXT PRIMARY KEY,
    sujet    TEXT NOT NULL,
    date     TEXT NOT NULL,
    location TEXT NOT NULL,
    user_ids TEXT NOT NULL DEFAULT ''
)";

#[derive(sqlx::FromRow)]
struct ReunionRow {
    id: String,
    sujet: String,
    date: String,
    location: String,
    user_ids: String,
}

impl From<ReunionRow> for Reunion {
    fn from(row: ReunionRow) -> Self {
        Self {
            id: row.id,
            sujet: row.sujet,
            date: row.date,
            location: row.location,
            user_ids: split_ids(&row.user_ids),
        }
    }
}

/// Postgres-backed storage. One pooled connection per service process.
#[derive(Clone)]
pub struct PgReunionStorage {
    pool: PgPool,
}

impl PgReunionStorage {
    /// Connect and bootstrap the `reunions` table.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await?;
        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReunionStorage for PgReunionStorage {
    async fn list_reunions(&self) -> Result<Vec<Reunion>, StorageError> {
        let rows = sqlx::query_as::<_, ReunionRow>(
            "SELECT id, sujet, date, location, user_ids FROM reunions",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Reunion::from).collect())
    }

    async fn get_reunion(&self, id: &str) -> Result<Reunion, StorageError> {
        let row = sqlx::query_as::<_, ReunionRow>(
            "SELECT id, sujet, date, location, user_ids FROM reunions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Reunion::from)
            .ok_or_else(|| StorageError::NotFound(format!("reunion {id} not found")))
    }

    async fn upsert_reunion(&self, reunion: Reunion) -> Result<Reunion, StorageError> {
        sqlx::query(
            "INSERT INTO reunions (id, sujet, date, location, user_ids) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (id) DO UPDATE SET sujet = EXCLUDED.sujet, date = EXCLUDED.date, \
             location = EXCLUDED.location, user_ids = EXCLUDED.user_ids",
        )
        .bind(&reunion.id)
        .bind(&reunion.sujet)
        .bind(&reunion.date)
        .bind(&reunion.location)
        .bind(join_ids(&reunion.user_ids))
        .execute(&self.pool)
        .await?;
        Ok(reunion)
    }

    async fn delete_reunion(&self, id: &str) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM reunions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("reunion {id} not found")));
        }
        Ok(())
    }

    async fn add_participant(&self, reunion_id: &str, user_id: &str) -> Result<(), StorageError> {
        // nullif collapses an empty column so the first participant does
        // not pick up a leading comma.
        let result = sqlx::query(
            "UPDATE reunions \
             SET user_ids = concat_ws(',', nullif(user_ids, ''), $2::text) \
             WHERE id = $1",
        )
        .bind(reunion_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!(
                "reunion {reunion_id} not found"
            )));
        }
        Ok(())
    }

    async fn remove_participant(
        &self,
        reunion_id: &str,
        user_id: &str,
    ) -> Result<(), StorageError> {
        // Token-level removal: split on the delimiter, drop matching
        // tokens (and empty ones), re-join. Substrings of longer ids are
        // untouched.
        let result = sqlx::query(
            "UPDATE reunions \
             SET user_ids = array_to_string(\
                 array_remove(array_remove(string_to_array(user_ids, ','), $2::text), ''), ',') \
             WHERE id = $1",
        )
        .bind(reunion_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!(
                "reunion {reunion_id} not found"
            )));
        }
        Ok(())
    }
}

/// In-memory storage for tests and local demos.
#[derive(Clone, Default)]
pub struct MemoryReunionStorage {
    reunions: Arc<Mutex<Vec<Reunion>>>,
}

#[async_trait]
impl ReunionStorage for MemoryReunionStorage {
    async fn list_reunions(&self) -> Result<Vec<Reunion>, StorageError> {
        Ok(self.reunions.lock().unwrap().clone())
    }

    async fn get_reunion(&self, id: &str) -> Result<Reunion, StorageError> {
        self.reunions
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("reunion {id} not found")))
    }

    async fn upsert_reunion(&self, reunion: Reunion) -> Result<Reunion, StorageError> {
        let mut reunions = self.reunions.lock().unwrap();
        match reunions.iter_mut().find(|r| r.id == reunion.id) {
            Some(existing) => *existing = reunion.clone(),
            None => reunions.push(reunion.clone()),
        }
        Ok(reunion)
    }

    async fn delete_reunion(&self, id: &str) -> Result<(), StorageError> {
        let mut reunions = self.reunions.lock().unwrap();
        let before = reunions.len();
        reunions.retain(|r| r.id != id);
        if reunions.len() == before {
            return Err(StorageError::NotFound(format!("reunion {id} not found")));
        }
        Ok(())
    }

    async fn add_participant(&self, reunion_id: &str, user_id: &str) -> Result<(), StorageError> {
        let mut reunions = self.reunions.lock().unwrap();
        let reunion = reunions
            .iter_mut()
            .find(|r| r.id == reunion_id)
            .ok_or_else(|| StorageError::NotFound(format!("reunion {reunion_id} not found")))?;
        reunion.user_ids.push(user_id.to_owned());
        Ok(())
    }

    async fn remove_participant(
        &self,
        reunion_id: &str,
        user_id: &str,
    ) -> Result<(), StorageError> {
        let mut reunions = self.reunions.lock().unwrap();
        let reunion = reunions
            .iter_mut()
            .find(|r| r.id == reunion_id)
            .ok_or_else(|| StorageError::NotFound(format!("reunion {reunion_id} not found")))?;
        reunion.user_ids.retain(|u| u != user_id);
        Ok(())
    }
}
