//! Mini-App request signing.
//!
//! The client sends its `initData` query string in the `Telegram-Data` header. The `hash` field
//! is removed, the remaining `key=value` pairs are sorted by key and joined with `\n`, and the
//! result is signed with `HMAC-SHA256(key = HMAC-SHA256("WebAppData", bot_token))`.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use url::form_urlencoded;

use crate::error::ApiError;
use crate::state::AppState;

pub const TELEGRAM_DATA_HEADER: &str = "Telegram-Data";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing Telegram-Data header")]
    Missing,
    #[error("invalid hash")]
    InvalidHash,
}

/// The `user` object of the signed payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebAppUser {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub language_code: Option<String>,
}

/// Verified payload fields the handlers use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitData {
    pub user: Option<WebAppUser>,
    pub auth_date: Option<i64>,
    /// `startapp` parameter of a group-context launch.
    pub start_param: Option<String>,
}

/// `key=value` lines sorted by key (stable, so repeated keys keep their order).
pub fn data_check_string(pairs: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = pairs.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("\n")
}

fn keyed_mac(bot_token: &str) -> Result<HmacSha256, AuthError> {
    let mut secret =
        HmacSha256::new_from_slice(b"WebAppData").map_err(|_| AuthError::InvalidHash)?;
    secret.update(bot_token.as_bytes());
    let secret_key = secret.finalize().into_bytes();
    HmacSha256::new_from_slice(&secret_key).map_err(|_| AuthError::InvalidHash)
}

/// Hex-encoded signature of `data_check_string` for `bot_token`.
pub fn compute_hash(data_check_string: &str, bot_token: &str) -> Result<String, AuthError> {
    let mut mac = keyed_mac(bot_token)?;
    mac.update(data_check_string.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Checks the signature of a raw `initData` string and extracts its fields.
pub fn verify_init_data(raw: &str, bot_token: &str) -> Result<InitData, AuthError> {
    if raw.is_empty() {
        return Err(AuthError::Missing);
    }

    let mut pairs: Vec<(String, String)> = form_urlencoded::parse(raw.as_bytes())
        .into_owned()
        .collect();
    let hash = pairs
        .iter()
        .find(|(k, _)| k == "hash")
        .map(|(_, v)| v.clone())
        .ok_or(AuthError::InvalidHash)?;
    pairs.retain(|(k, _)| k != "hash");

    let expected = hex::decode(hash).map_err(|_| AuthError::InvalidHash)?;
    let mut mac = keyed_mac(bot_token)?;
    mac.update(data_check_string(&pairs).as_bytes());
    mac.verify_slice(&expected)
        .map_err(|_| AuthError::InvalidHash)?;

    let field = |name: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    };

    Ok(InitData {
        user: field("user").and_then(|u| serde_json::from_str(u).ok()),
        auth_date: field("auth_date").and_then(|d| d.parse().ok()),
        start_param: field("start_param").map(str::to_string),
    })
}

/// Extractor for routes that require a verified Mini-App payload.
#[derive(Debug, Clone)]
pub struct WebAppAuth(pub InitData);

impl WebAppAuth {
    /// The sender's id; 401 `User not identified` when the payload carries none.
    pub fn user_id(&self) -> Result<i64, ApiError> {
        self.0
            .user
            .as_ref()
            .and_then(|u| u.id)
            .ok_or(ApiError::Unauthorized("User not identified"))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for WebAppAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(TELEGRAM_DATA_HEADER)
            .ok_or(AuthError::Missing)?;
        let raw = header.to_str().map_err(|_| AuthError::InvalidHash)?;
        let data = verify_init_data(raw, &state.config.bot_token)?;
        Ok(Self(data))
    }
}

/// Builds a signed `initData` string, as the Telegram client would.
#[cfg(test)]
pub(crate) fn sign_init_data(pairs: &[(&str, &str)], bot_token: &str) -> String {
    let owned: Vec<(String, String)> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let hash = compute_hash(&data_check_string(&owned), bot_token).unwrap();
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (k, v) in pairs {
        serializer.append_pair(k, v);
    }
    serializer.append_pair("hash", &hash);
    serializer.finish()
}
