//! Increment vector applied as `column = column + delta` by every store adapter.

use serde::{Deserialize, Serialize};

/// Per-event counter increments. All fields are non-negative; counters never go down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatDelta {
    pub messages: i64,
    pub words: i64,
    pub stickers: i64,
    pub media: i64,
    pub edited: i64,
    pub deleted: i64,
}

impl StatDelta {
    /// One counted message with the given classification.
    pub fn message(words: i64, sticker: bool, media: bool) -> Self {
        Self {
            messages: 1,
            words: words.max(0),
            stickers: i64::from(sticker),
            media: i64::from(media),
            ..Self::default()
        }
    }

    /// One edited message; leaves every message counter alone.
    pub fn edit() -> Self {
        Self {
            edited: 1,
            ..Self::default()
        }
    }

    /// One deleted message; tracked separately, never an undo.
    pub fn delete() -> Self {
        Self {
            deleted: 1,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
