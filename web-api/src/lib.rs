//! HTTP surface for the Mini-App.
//!
//! - `GET /health` and `GET /public/info` are open
//! - everything under `/api` requires a signed `Telegram-Data` header (see [`auth`])
//! - unmatched paths fall through to the static Mini-App files when a directory is configured

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
pub mod types;

pub use auth::{verify_init_data, AuthError, InitData, WebAppAuth, WebAppUser, TELEGRAM_DATA_HEADER};
pub use config::{ApiConfig, DEFAULT_TIMEZONE};
pub use error::{ApiError, Result};
pub use router::{create_router, serve};
pub use state::AppState;
