//! SQLite connection pool wrapper for the storage crate.

use std::path::Path;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::Result;

/// Manages a single SQLite pool; creates the DB file (and its directory) if missing.
#[derive(Clone)]
pub struct SqlitePoolManager {
    pool: SqlitePool,
}

impl SqlitePoolManager {
    /// Creates a pool for `database_url`: `sqlite::memory:`, `sqlite:<path>`, `sqlite://<path>`,
    /// `file:<path>` or a bare path.
    ///
    /// In-memory databases get a single connection so every query sees the same database.
    pub async fn new(database_url: &str) -> Result<Self> {
        info!("Initializing SQLite pool: {}", database_url);

        if is_memory_url(database_url) {
            let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .connect_with(options)
                .await?;
            return Ok(Self { pool });
        }

        let path = file_path(database_url);
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Returns the underlying pool for running queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn is_memory_url(url: &str) -> bool {
    matches!(url, "sqlite::memory:" | ":memory:" | "sqlite://:memory:")
}

fn file_path(url: &str) -> &str {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .or_else(|| url.strip_prefix("file:"))
        .unwrap_or(url);
    path.split('?').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::{file_path, is_memory_url};

    #[test]
    fn test_file_path_strips_scheme_and_query() {
        assert_eq!(file_path("sqlite://db/stats.sqlite"), "db/stats.sqlite");
        assert_eq!(file_path("sqlite:db/stats.sqlite?mode=rwc"), "db/stats.sqlite");
        assert_eq!(file_path("file:./stats.db"), "./stats.db");
        assert_eq!(file_path("stats.db"), "stats.db");
    }

    #[test]
    fn test_memory_urls() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url(":memory:"));
        assert!(!is_memory_url("sqlite:memory.db"));
    }
}
