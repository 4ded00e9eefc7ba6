//! # stats-engine
//!
//! Turns chat events into counter writes and serves the read side:
//!
//! - [`classifier`] – decides whether a message counts and what it contributes
//! - [`ban_gate`] – rejects banned users and groups before anything is written
//! - [`aggregator`] – applies events, edits and deletes to the store
//! - [`query`] – read-only leaderboards, per-user stats and pagination

pub mod aggregator;
pub mod ban_gate;
pub mod classifier;
pub mod error;
pub mod query;

pub use aggregator::{Aggregator, Outcome, DEFAULT_ACTIVE_WINDOW_DAYS};
pub use ban_gate::{BanGate, Verdict};
pub use classifier::{classify, classify_content, count_words, ClassifiedEvent};
pub use error::{EngineError, Result};
pub use query::{page_offset, total_pages, Page, StatsQuery, DEFAULT_PAGE_SIZE};
