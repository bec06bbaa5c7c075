//! SQLite-backed registry implementation.
//!
//! The schema is created on connect; there is no migration history to
//! manage because the registry owns exactly two tables. The pending
//! queue enforces plate uniqueness at the database level, which is the
//! final word on dedup even if two decision cycles ever raced.

#![allow(async_fn_in_trait)]

use crate::error::{RegistryError, RegistryResult};
use crate::models::{AuthorizedPlate, PendingPlate};
use plategate_core::PlateNumber;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Registry store abstraction consumed by the decision core.
///
/// Reads are point-in-time snapshots. Removing a pending entry is the
/// external-approval signal, so implementations must publish every
/// removal on the channel returned by
/// [`subscribe_removals`](Registry::subscribe_removals).
pub trait Registry: Send + Sync {
    /// Snapshot of the authorized plate set.
    async fn authorized_plates(&self) -> RegistryResult<Vec<AuthorizedPlate>>;

    /// Snapshot of the pending (unknown plate) queue.
    async fn pending_plates(&self) -> RegistryResult<Vec<PendingPlate>>;

    /// Append a new pending entry, returning its row id.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicatePending` if the plate is
    /// already queued.
    async fn append_pending(&self, entry: &PendingPlate) -> RegistryResult<i64>;

    /// Remove a pending entry by plate and notify subscribers.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if no entry matches.
    async fn remove_pending(&self, plate: &str) -> RegistryResult<()>;

    /// Enroll a plate into the authorized set, returning its row id.
    async fn add_authorized(
        &self,
        plate: &PlateNumber,
        owner: Option<&str>,
    ) -> RegistryResult<i64>;

    /// Subscribe to pending-entry removal notifications.
    ///
    /// Each notification carries the removed plate string.
    fn subscribe_removals(&self) -> broadcast::Receiver<String>;
}

/// SQLite implementation of [`Registry`].
#[derive(Debug, Clone)]
pub struct SqliteRegistry {
    pool: SqlitePool,
    removal_tx: broadcast::Sender<String>,
}

impl SqliteRegistry {
    /// Open (or create) the registry database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database directory cannot be created,
    /// the file cannot be opened, or schema creation fails.
    pub async fn connect(database_path: &str) -> RegistryResult<Self> {
        if let Some(parent) = Path::new(database_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                RegistryError::Configuration(format!(
                    "Failed to create database directory: {e}"
                ))
            })?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite://{database_path}"))
            .map_err(|e| RegistryError::Configuration(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(10));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let registry = Self::from_pool(pool);
        registry.create_schema().await?;
        info!(path = database_path, "registry database ready");
        Ok(registry)
    }

    /// Create an in-memory registry (primarily for testing).
    pub async fn in_memory() -> RegistryResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        // In-memory databases live per connection.
        //
        // Skip the pre-acquire liveness ping: an in-memory connection cannot be
        // dropped underneath us, so the ping is pure overhead. It also matters for
        // tests running under `tokio`'s `start_paused` clock — the ping is an async
        // round-trip that would park and arm the acquire-timeout timer, which the
        // paused clock then auto-advances past, spuriously yielding `PoolTimedOut`.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            // Keep the single connection alive for the pool's lifetime: an
            // in-memory database only exists as long as its connection does, and
            // retaining it means no query ever has to re-establish a connection
            // (which would park and, under a paused test clock, spuriously trip the
            // acquire-timeout timer).
            .min_connections(1)
            .test_before_acquire(false)
            .connect_with(options)
            .await?;

        let registry = Self::from_pool(pool);
        registry.create_schema().await?;
        Ok(registry)
    }

    fn from_pool(pool: SqlitePool) -> Self {
        let (removal_tx, _) = broadcast::channel(32);
        Self { pool, removal_tx }
    }

    async fn create_schema(&self) -> RegistryResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS authorized_plates (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                plate TEXT NOT NULL UNIQUE,
                owner TEXT,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS pending_plates (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                plate TEXT NOT NULL UNIQUE,
                color TEXT,
                make TEXT,
                model TEXT,
                image_key TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl Registry for SqliteRegistry {
    async fn authorized_plates(&self) -> RegistryResult<Vec<AuthorizedPlate>> {
        let plates = sqlx::query_as::<_, AuthorizedPlate>(
            r#"
            SELECT id, plate, owner, created_at
            FROM authorized_plates
            ORDER BY plate
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(plates)
    }

    async fn pending_plates(&self) -> RegistryResult<Vec<PendingPlate>> {
        let plates = sqlx::query_as::<_, PendingPlate>(
            r#"
            SELECT id, plate, color, make, model, image_key, created_at
            FROM pending_plates
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(plates)
    }

    async fn append_pending(&self, entry: &PendingPlate) -> RegistryResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO pending_plates (plate, color, make, model, image_key)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.plate)
        .bind(&entry.color)
        .bind(&entry.make)
        .bind(&entry.model)
        .bind(&entry.image_key)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
                RegistryError::duplicate_pending(&entry.plate)
            } else {
                RegistryError::Database(e)
            }
        })?;

        debug!(plate = %entry.plate, "pending entry appended");
        Ok(result.last_insert_rowid())
    }

    async fn remove_pending(&self, plate: &str) -> RegistryResult<()> {
        let result = sqlx::query("DELETE FROM pending_plates WHERE plate = ?")
            .bind(plate)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RegistryError::not_found(plate));
        }

        info!(plate, "pending entry removed");
        // No receivers is fine; nobody is watching yet.
        let _ = self.removal_tx.send(plate.to_string());
        Ok(())
    }

    async fn add_authorized(
        &self,
        plate: &PlateNumber,
        owner: Option<&str>,
    ) -> RegistryResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO authorized_plates (plate, owner)
            VALUES (?, ?)
            "#,
        )
        .bind(plate.as_str())
        .bind(owner)
        .execute(&self.pool)
        .await?;

        info!(plate = %plate, "plate enrolled as authorized");
        Ok(result.last_insert_rowid())
    }

    fn subscribe_removals(&self) -> broadcast::Receiver<String> {
        self.removal_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup() -> SqliteRegistry {
        SqliteRegistry::in_memory().await.unwrap()
    }

    fn pending_entry(plate: &str) -> PendingPlate {
        let plate = PlateNumber::new(plate).unwrap();
        let key = plate.as_str().to_string();
        PendingPlate::new(&plate, key)
    }

    #[tokio::test]
    async fn test_add_and_read_authorized() {
        let registry = setup().await;

        let plate = PlateNumber::new("ABC123").unwrap();
        let id = registry.add_authorized(&plate, Some("alice")).await.unwrap();
        assert!(id > 0);

        let plates = registry.authorized_plates().await.unwrap();
        assert_eq!(plates.len(), 1);
        assert_eq!(plates[0].plate, "ABC123");
        assert_eq!(plates[0].owner.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_authorized_snapshot_is_empty_initially() {
        let registry = setup().await;
        assert!(registry.authorized_plates().await.unwrap().is_empty());
        assert!(registry.pending_plates().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_pending_round_trip() {
        let registry = setup().await;

        let entry = pending_entry("XYZ999").with_vehicle(
            Some("silver".to_string()),
            Some("toyota".to_string()),
            Some("toyota_corolla".to_string()),
        );
        registry.append_pending(&entry).await.unwrap();

        let pending = registry.pending_plates().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].plate, "XYZ999");
        assert_eq!(pending[0].image_key, "XYZ999");
        assert_eq!(pending[0].color.as_deref(), Some("silver"));
    }

    #[tokio::test]
    async fn test_append_pending_duplicate_rejected() {
        let registry = setup().await;

        registry.append_pending(&pending_entry("XYZ999")).await.unwrap();
        let error = registry
            .append_pending(&pending_entry("XYZ999"))
            .await
            .unwrap_err();

        assert!(error.is_duplicate_pending());
        assert_eq!(registry.pending_plates().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_pending_notifies_subscribers() {
        let registry = setup().await;
        let mut removals = registry.subscribe_removals();

        registry.append_pending(&pending_entry("XYZ999")).await.unwrap();
        registry.remove_pending("XYZ999").await.unwrap();

        assert_eq!(removals.recv().await.unwrap(), "XYZ999");
        assert!(registry.pending_plates().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_pending_missing_is_not_found() {
        let registry = setup().await;

        let error = registry.remove_pending("NOPE99").await.unwrap_err();
        assert!(matches!(error, RegistryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_remove_without_subscribers_succeeds() {
        let registry = setup().await;

        registry.append_pending(&pending_entry("XYZ999")).await.unwrap();
        registry.remove_pending("XYZ999").await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_creates_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plates.db");

        let registry = SqliteRegistry::connect(path.to_str().unwrap()).await.unwrap();
        let plate = PlateNumber::new("ABC123").unwrap();
        registry.add_authorized(&plate, None).await.unwrap();
        registry.close().await;

        assert!(path.exists());

        // Reopen and confirm the row survived.
        let reopened = SqliteRegistry::connect(path.to_str().unwrap()).await.unwrap();
        assert_eq!(reopened.authorized_plates().await.unwrap().len(), 1);
    }
}
