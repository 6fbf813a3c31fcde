// Leveling domain models - the records the tracker keeps per guild member.
//
// Like every core model these are plain data with no Discord types. The serde
// attributes describe the snapshot file layout, which has to stay readable by
// (and for) older snapshots, so the field names are fixed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// XP needed to leave `level`: `floor(10 * 1.5^(level - 1))`.
///
/// Shared by the tracker and by anything that renders progress bars, so the
/// two can never disagree. Level 1 needs 10 XP, level 2 needs 15, level 3 needs 22.
pub fn required_xp(level: u32) -> u64 {
    let exponent = level.saturating_sub(1).min(i32::MAX as u32) as i32;
    (10.0 * 1.5f64.powi(exponent)).floor() as u64
}

/// XP earned for a single message: one point per started ten characters, capped at 10.
pub fn xp_for_message(message_length: usize) -> u64 {
    ((message_length / 10) as u64 + 1).min(10)
}

/// Composite identity of a progression record.
///
/// Users can be in several guilds and progress separately in each one.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProgressionKey {
    pub guild_id: u64,
    pub user_id: u64,
}

impl ProgressionKey {
    pub fn new(guild_id: u64, user_id: u64) -> Self {
        Self { guild_id, user_id }
    }
}

/// XP and level data for one member of one guild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionRecord {
    /// Points within the current level, always below `required_xp(level)` after an award.
    pub xp: u64,
    pub level: u32,
    /// When this member last earned message XP. Starts at the Unix epoch.
    #[serde(rename = "lastXP", with = "chrono::serde::ts_milliseconds")]
    pub last_award_at: DateTime<Utc>,
    /// Kept for snapshot compatibility only; `last_daily` decides repeat claims.
    #[serde(rename = "dailyBonusClaimed", default)]
    pub daily_bonus_claimed: bool,
    #[serde(
        rename = "lastDaily",
        default,
        skip_serializing_if = "Option::is_none",
        with = "day_string"
    )]
    pub last_daily: Option<NaiveDate>,
}

impl Default for ProgressionRecord {
    fn default() -> Self {
        Self {
            xp: 0,
            level: 1,
            last_award_at: DateTime::<Utc>::default(),
            daily_bonus_claimed: false,
            last_daily: None,
        }
    }
}

impl ProgressionRecord {
    /// Single, non-cascading level-up check.
    ///
    /// Crossing the threshold bumps the level by exactly one and drops the
    /// overflow: XP restarts at zero for the new level.
    pub(crate) fn apply_level_up(&mut self) -> bool {
        if self.xp >= required_xp(self.level) {
            self.level = self.level.saturating_add(1);
            self.xp = 0;
            true
        } else {
            false
        }
    }
}

/// Read-only view returned by status queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressionStatus {
    pub level: u32,
    pub xp: u64,
    pub required_xp: u64,
}

/// One leaderboard row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub user_id: u64,
    pub level: u32,
    pub xp: u64,
}

/// Emitted when a message pushed a member into a new level.
/// The Discord layer turns this into an announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUpEvent {
    pub guild_id: u64,
    pub user_id: u64,
    pub old_level: u32,
    pub new_level: u32,
}

/// Everything a single qualifying message changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityOutcome {
    /// `None` when the member was still on cooldown.
    pub xp_gained: Option<u64>,
    pub level_up: Option<LevelUpEvent>,
    pub daily_bonus_awarded: bool,
}

/// Result of a reset request. A missing record is a normal answer, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    Reset,
    NotFound,
}

/// Every progression record the bot knows about.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressionStore {
    records: HashMap<ProgressionKey, ProgressionRecord>,
}

impl ProgressionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ProgressionKey) -> Option<&ProgressionRecord> {
        self.records.get(key)
    }

    pub fn get_mut(&mut self, key: &ProgressionKey) -> Option<&mut ProgressionRecord> {
        self.records.get_mut(key)
    }

    /// Fetch a record, creating a fresh one on first sight.
    pub fn get_or_create(&mut self, key: ProgressionKey) -> &mut ProgressionRecord {
        self.records.entry(key).or_default()
    }

    #[cfg(test)]
    pub fn insert(&mut self, key: ProgressionKey, record: ProgressionRecord) {
        self.records.insert(key, record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProgressionKey, &ProgressionRecord)> {
        self.records.iter()
    }
}

impl FromIterator<(ProgressionKey, ProgressionRecord)> for ProgressionStore {
    fn from_iter<I: IntoIterator<Item = (ProgressionKey, ProgressionRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

/// `lastDaily` is stored the way the first version of the bot wrote it,
/// e.g. `"Mon Oct 19 2026"`. Anything unreadable loads as "never claimed".
mod day_string {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%a %b %d %Y";

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|value| NaiveDate::parse_from_str(value.trim(), FORMAT).ok()))
    }
}
