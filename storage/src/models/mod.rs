//! Row models for the counter tables plus the write-side inputs (identities, deltas).

mod average;
mod ban_entry;
mod group;
mod stat_delta;
mod user_group_stat;
mod user_profile;

pub use average::average_words;
pub use ban_entry::{BanEntry, BanSubject};
pub use group::{GroupAggregate, GroupInfo, GroupSummary};
pub use stat_delta::StatDelta;
pub use user_group_stat::{AggregatedUserStat, GroupStatIdentity, UserGroupStat};
pub use user_profile::{ProfileUpdate, UserProfile};
