//! Picks a store adapter from the database URL.

use std::sync::Arc;

use tracing::info;
use url::Url;

use crate::error::Result;
use crate::mysql_store::MySqlStatsStore;
use crate::sqlite_store::SqliteStatsStore;
use crate::store::{Backend, StatsStore};

/// Which backend `database_url` selects: `mysql://` and `mariadb://` go to MySQL, anything else
/// (including bare paths) is SQLite.
pub fn backend_for_url(database_url: &str) -> Backend {
    match Url::parse(database_url) {
        Ok(url) if matches!(url.scheme(), "mysql" | "mariadb") => Backend::MySql,
        _ => Backend::Sqlite,
    }
}

/// Connects, creates the schema and returns the store behind the port.
pub async fn connect(database_url: &str) -> Result<Arc<dyn StatsStore>> {
    let backend = backend_for_url(database_url);
    info!(?backend, "Connecting stats store");
    let store: Arc<dyn StatsStore> = match backend {
        Backend::MySql => Arc::new(MySqlStatsStore::new(database_url).await?),
        Backend::Sqlite => Arc::new(SqliteStatsStore::new(database_url).await?),
    };
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_for_url() {
        assert_eq!(backend_for_url("mysql://root:pw@localhost:3306/stats"), Backend::MySql);
        assert_eq!(backend_for_url("mariadb://db/stats"), Backend::MySql);
        assert_eq!(backend_for_url("sqlite::memory:"), Backend::Sqlite);
        assert_eq!(backend_for_url("sqlite:db/stats.sqlite"), Backend::Sqlite);
        assert_eq!(backend_for_url("db/stats.sqlite"), Backend::Sqlite);
    }

    #[tokio::test]
    async fn test_connect_memory_sqlite() {
        let store = connect("sqlite::memory:").await.unwrap();
        assert_eq!(store.backend(), Backend::Sqlite);
        store.ping().await.unwrap();
    }
}
