//! API request handlers.

pub mod admin;
pub mod health;
pub mod public;
pub mod stats;

pub use admin::*;
pub use health::*;
pub use public::*;
pub use stats::*;
