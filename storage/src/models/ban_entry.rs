//! Ban list rows (`banned` table): one per banned user or group id.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a ban entry applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BanSubject {
    User,
    Group,
}

impl BanSubject {
    pub fn as_str(&self) -> &'static str {
        match self {
            BanSubject::User => "user",
            BanSubject::Group => "group",
        }
    }
}

impl fmt::Display for BanSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown ban subject type: {0}")]
pub struct UnknownBanSubject(String);

impl TryFrom<String> for BanSubject {
    type Error = UnknownBanSubject;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "user" | "private" => Ok(BanSubject::User),
            "group" | "supergroup" | "channel" => Ok(BanSubject::Group),
            _ => Err(UnknownBanSubject(value)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct BanEntry {
    pub subject_id: i64,
    #[sqlx(try_from = "String")]
    pub subject_type: BanSubject,
    pub spammer: bool,
    pub reason: Option<String>,
}

impl BanEntry {
    pub fn user(user_id: i64, reason: Option<String>) -> Self {
        Self {
            subject_id: user_id,
            subject_type: BanSubject::User,
            spammer: false,
            reason,
        }
    }

    pub fn group(group_id: i64, reason: Option<String>) -> Self {
        Self {
            subject_id: group_id,
            subject_type: BanSubject::Group,
            spammer: false,
            reason,
        }
    }
}
