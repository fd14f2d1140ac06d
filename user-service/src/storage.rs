//! Storage layer for the user service.
//!
//! `UserStorage` is the seam between the gRPC service and the store.
//! `PgUserStorage` is the production implementation (sqlx, one pooled
//! connection); `MemoryUserStorage` backs tests and local demos.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::proto::User;

/// Storage error taxonomy: a keyed lookup that matched nothing, a store
/// that cannot be reached, or a statement the store rejected.
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
pub trait UserStorage: Send + Sync + 'static {
    async fn list_users(&self) -> Result<Vec<User>, StorageError>;
    async fn get_user(&self, id: &str) -> Result<User, StorageError>;
    /// Insert-or-update keyed by id; echoes the supplied value rather
    /// than re-reading the row.
    async fn upsert_user(&self, user: User) -> Result<User, StorageError>;
    async fn delete_user(&self, id: &str) -> Result<(), StorageError>;
}

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS users (
    id    TEXT PRIMARY KEY,
    name  TEXT NOT NULL,
    email TEXT NOT NULL
)";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
        }
    }
}

/// Postgres-backed storage. One pooled connection per service process.
#[derive(Clone)]
pub struct PgUserStorage {
    pool: PgPool,
}

impl PgUserStorage {
    /// Connect and bootstrap the `users` table.
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
impl UserStorage for PgUserStorage {
    async fn list_users(&self) -> Result<Vec<User>, StorageError> {
        let rows = sqlx::query_as::<_, UserRow>("SELECT id, name, email FROM users")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn get_user(&self, id: &str) -> Result<User, StorageError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT id, name, email FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(User::from)
            .ok_or_else(|| StorageError::NotFound(format!("user {id} not found")))
    }

    async fn upsert_user(&self, user: User) -> Result<User, StorageError> {
        sqlx::query(
            "INSERT INTO users (id, name, email) VALUES ($1, $2, $3) \
             ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, email = EXCLUDED.email",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .execute(&self.pool)
        .await?;
        Ok(user)
    }

    async fn delete_user(&self, id: &str) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("user {id} not found")));
        }
        Ok(())
    }
}

/// In-memory storage for tests and local demos. Preserves insertion
/// order so list results are deterministic.
#[derive(Clone, Default)]
pub struct MemoryUserStorage {
    users: Arc<Mutex<Vec<User>>>,
}

#[async_trait]
impl UserStorage for MemoryUserStorage {
    async fn list_users(&self) -> Result<Vec<User>, StorageError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn get_user(&self, id: &str) -> Result<User, StorageError> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("user {id} not found")))
    }

    async fn upsert_user(&self, user: User) -> Result<User, StorageError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user.clone(),
            None => users.push(user.clone()),
        }
        Ok(user)
    }

    async fn delete_user(&self, id: &str) -> Result<(), StorageError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(StorageError::NotFound(format!("user {id} not found")));
        }
        Ok(())
    }
}
