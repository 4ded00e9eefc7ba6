//! Storage crate: counter tables behind the [`StatsStore`] port.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – Row models, [`StatDelta`] and write identities
//! - [`store`] – [`StatsStore`] trait
//! - [`sqlite_store`] / [`mysql_store`] – Adapters
//! - [`connect`] – Adapter selection by URL

mod connect;
mod error;
mod models;
mod mysql_pool;
mod mysql_store;
mod sqlite_pool;
mod sqlite_store;
mod store;


pub use connect::{backend_for_url, connect};
pub use error::{Result, StorageError};
pub use models::{
    average_words, AggregatedUserStat, BanEntry, BanSubject, GroupAggregate, GroupInfo,
    GroupStatIdentity, GroupSummary, ProfileUpdate, StatDelta, UserGroupStat, UserProfile,
};
pub use mysql_pool::MySqlPoolManager;
pub use mysql_store::MySqlStatsStore;
pub use sqlite_pool::SqlitePoolManager;
pub use sqlite_store::SqliteStatsStore;
pub use store::{Backend, StatsStore};
