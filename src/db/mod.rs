//! Database module providing connection management, migrations, and repositories.
//!
//! Repository functions are generic over [`ConnectionTrait`] so they run either
//! on the pool or inside a transaction. Operations that touch several tables
//! are `DbPool` methods that open their own transaction.

pub mod api_keys;
pub mod catalog;
pub mod feedbacks;
pub mod job_records;
pub mod stats;

use std::path::Path;
use std::time::Duration;

use sea_orm::sea_query::{Expr, ExprTrait, Func, LikeExpr};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DatabaseTransaction, DbBackend,
    DbErr, TransactionTrait,
};
use sea_orm_migration::MigratorTrait;

use crate::config::{Config, DatabaseSettings};
use crate::error::{AppError, AppResult};
use crate::migration::Migrator;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct DbPool {
    conn: DatabaseConnection,
}

impl DbPool {
    /// Create a new database pool from configuration.
    pub async fn new(config: &Config) -> AppResult<Self> {
        Self::connect(&config.database).await
    }

    /// Connect with explicit settings.
    pub async fn connect(settings: &DatabaseSettings) -> AppResult<Self> {
        if let Some(path) = sqlite_file_path(&settings.url) {
            // Ensure parent directory exists
            if let Some(parent) = Path::new(path).parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Database(format!("Failed to create database directory: {}", e))
                })?;
            }
        }

        let mut opt = ConnectOptions::new(settings.url.clone());
        opt.max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .connect_timeout(Duration::from_secs(8))
            .acquire_timeout(Duration::from_secs(8))
            .sqlx_logging(false);

        let conn = Database::connect(opt)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to database: {}", e)))?;

        if conn.get_database_backend() == DbBackend::Sqlite && !settings.is_in_memory() {
            // pragma returns the resulting mode, so query instead of execute
            conn.query_one_raw(sea_orm::Statement::from_string(
                DbBackend::Sqlite,
                "PRAGMA journal_mode = WAL;".to_owned(),
            ))
            .await
            .map_err(|e| AppError::Database(format!("Failed to set journal_mode pragma: {}", e)))?;
        }

        Ok(DbPool { conn })
    }

    /// In-memory SQLite database, already migrated.
    pub async fn in_memory() -> AppResult<Self> {
        let pool = Self::connect(&DatabaseSettings::in_memory()).await?;
        pool.run_migrations().await?;
        Ok(pool)
    }

    /// Get access to the connection for executing queries.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Apply all pending migrations.
    pub async fn run_migrations(&self) -> AppResult<()> {
        Migrator::up(&self.conn, None)
            .await
            .map_err(|e| AppError::Database(format!("Failed to run migrations: {}", e)))
    }

    /// Round trip to the database.
    pub async fn ping(&self) -> AppResult<()> {
        self.conn
            .ping()
            .await
            .map_err(|e| AppError::Database(format!("Database ping failed: {}", e)))
    }

    /// Start a transaction. Everything inside must go through the returned handle.
    pub async fn begin(&self) -> AppResult<DatabaseTransaction> {
        self.conn
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))
    }
}

/// Commit, mapping the driver error.
pub(crate) async fn commit(txn: DatabaseTransaction) -> AppResult<()> {
    txn.commit()
        .await
        .map_err(|e| AppError::Database(format!("Failed to commit transaction: {}", e)))
}

/// Map a write error, replacing the driver text of a unique violation.
pub(crate) fn write_error<'a>(
    context: &'a str,
    conflict: &'a str,
) -> impl FnOnce(DbErr) -> AppError + 'a {
    move |err| match AppError::from(err) {
        AppError::Conflict(_) => AppError::Conflict(conflict.to_string()),
        AppError::Database(detail) => AppError::Database(format!("{}: {}", context, detail)),
        other => other,
    }
}

/// `LOWER(expr) LIKE '%needle%'`, wildcards in `needle` matched literally.
pub(crate) fn contains_ignore_case(expr: impl Into<Expr>, needle: &str) -> Expr {
    Expr::from(Func::lower(expr.into()))
        .like(LikeExpr::new(crate::services::listing::like_pattern(needle)).escape('!'))
}

/// File path of a SQLite URL, `None` for other backends and in-memory databases.
fn sqlite_file_path(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path.contains(":memory:") {
        None
    } else {
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_file_path() {
        assert_eq!(
            sqlite_file_path("sqlite://data/job_catalog.db?mode=rwc"),
            Some("data/job_catalog.db")
        );
        assert_eq!(sqlite_file_path("sqlite:jobs.db"), Some("jobs.db"));
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("postgres://localhost/jobs"), None);
    }

    #[actix_rt::test]
    async fn test_in_memory_pool_migrates_and_pings() {
        let pool = DbPool::in_memory().await.unwrap();
        pool.ping().await.unwrap();
    }
}
