// The progression tracker - ALL of the XP rules live here.
//
// This is synchronous, in-memory bookkeeping with no knowledge of Discord,
// timers or files. The caller passes `now` in, which keeps every rule
// testable without sleeping or mocking clocks.

use super::progression_models::{
    required_xp, xp_for_message, ActivityOutcome, LeaderboardEntry, LevelUpEvent,
    ProgressionKey, ProgressionStatus, ProgressionStore, ResetOutcome,
};
use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, Utc};

/// Minimum time between two message XP awards for the same member.
pub const XP_COOLDOWN_SECS: i64 = 5 * 60;

/// XP granted once per calendar day on the first qualifying message.
pub const DAILY_BONUS_XP: u64 = 100;

/// Default number of rows shown on the leaderboard.
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

/// Where one calendar day ends and the next begins for the daily bonus.
///
/// Snapshots written so far hold the host's local date in `lastDaily`, so
/// production keeps `Local`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayBoundary {
    Local,
    Fixed(FixedOffset),
}

impl DayBoundary {
    pub fn date_of(self, now: DateTime<Utc>) -> NaiveDate {
        match self {
            DayBoundary::Local => now.with_timezone(&Local).date_naive(),
            DayBoundary::Fixed(offset) => now.with_timezone(&offset).date_naive(),
        }
    }
}

pub struct ProgressionTracker {
    store: ProgressionStore,
    cooldown: Duration,
    daily_bonus: u64,
    day_boundary: DayBoundary,
}

impl ProgressionTracker {
    /// Start with an empty store.
    pub fn new() -> Self {
        Self::from_store(ProgressionStore::new())
    }

    /// Take ownership of a store rehydrated from a snapshot.
    pub fn from_store(store: ProgressionStore) -> Self {
        Self {
            store,
            cooldown: Duration::seconds(XP_COOLDOWN_SECS),
            daily_bonus: DAILY_BONUS_XP,
            day_boundary: DayBoundary::Local,
        }
    }

    /// Count calendar days in another zone than the host's.
    pub fn with_day_boundary(mut self, day_boundary: DayBoundary) -> Self {
        self.day_boundary = day_boundary;
        self
    }

    /// Apply the XP rules for one qualifying message.
    ///
    /// The caller has already filtered out bots and command messages.
    /// In order:
    /// 1. award message XP if the cooldown has passed,
    /// 2. run one level-up check (even when step 1 was skipped),
    /// 3. grant the daily bonus if today's has not been claimed, then check
    ///    for a level-up once more.
    pub fn record_activity(
        &mut self,
        guild_id: u64,
        user_id: u64,
        message_length: usize,
        now: DateTime<Utc>,
    ) -> ActivityOutcome {
        let cooldown = self.cooldown;
        let daily_bonus = self.daily_bonus;
        let today = self.day_boundary.date_of(now);
        let record = self
            .store
            .get_or_create(ProgressionKey::new(guild_id, user_id));
        let old_level = record.level;
        let mut outcome = ActivityOutcome::default();

        if now.signed_duration_since(record.last_award_at) > cooldown {
            let gained = xp_for_message(message_length);
            record.xp = record.xp.saturating_add(gained);
            record.last_award_at = now;
            outcome.xp_gained = Some(gained);
        }
        record.apply_level_up();

        if record.last_daily != Some(today) {
            record.xp = record.xp.saturating_add(daily_bonus);
            record.daily_bonus_claimed = true;
            record.last_daily = Some(today);
            outcome.daily_bonus_awarded = true;
            record.apply_level_up();
        }

        if record.level > old_level {
            outcome.level_up = Some(LevelUpEvent {
                guild_id,
                user_id,
                old_level,
                new_level: record.level,
            });
        }

        outcome
    }

    pub fn status(&self, guild_id: u64, user_id: u64) -> Option<ProgressionStatus> {
        self.store
            .get(&ProgressionKey::new(guild_id, user_id))
            .map(|record| ProgressionStatus {
                level: record.level,
                xp: record.xp,
                required_xp: required_xp(record.level),
            })
    }

    /// Put an existing record back to level 1 with no XP.
    /// Unknown members are reported, never created.
    pub fn reset_progression(&mut self, guild_id: u64, user_id: u64) -> ResetOutcome {
        match self.store.get_mut(&ProgressionKey::new(guild_id, user_id)) {
            Some(record) => {
                record.xp = 0;
                record.level = 1;
                ResetOutcome::Reset
            }
            None => ResetOutcome::NotFound,
        }
    }

    /// Top members of one guild by XP within their current level.
    ///
    /// Equal XP is ordered by user id so the output is stable between calls.
    pub fn leaderboard(&self, guild_id: u64, limit: usize) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = self
            .store
            .iter()
            .filter(|(key, _)| key.guild_id == guild_id)
            .map(|(key, record)| LeaderboardEntry {
                user_id: key.user_id,
                level: record.level,
                xp: record.xp,
            })
            .collect();

        entries.sort_by(|a, b| b.xp.cmp(&a.xp).then_with(|| a.user_id.cmp(&b.user_id)));
        entries.truncate(limit);
        entries
    }

    /// Copy of the whole store for the persistence layer.
    pub fn snapshot(&self) -> ProgressionStore {
        self.store.clone()
    }
}

impl Default for ProgressionTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::leveling::ProgressionRecord;
    use chrono::TimeZone;

    const GUILD: u64 = 100;
    const USER: u64 = 7;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, hour, minute, 0).unwrap()
    }

    fn utc_days() -> DayBoundary {
        DayBoundary::Fixed(FixedOffset::east_opt(0).unwrap())
    }

    fn tracker_with(records: &[(u64, u64, ProgressionRecord)]) -> ProgressionTracker {
        ProgressionTracker::from_store(
            records
                .iter()
                .map(|(guild, user, record)| (ProgressionKey::new(*guild, *user), record.clone()))
                .collect(),
        )
        .with_day_boundary(utc_days())
    }

    /// A record that already claimed today's bonus, so only message XP moves.
    fn claimed_today(xp: u64, level: u32) -> ProgressionRecord {
        ProgressionRecord {
            xp,
            level,
            daily_bonus_claimed: true,
            last_daily: Some(at(0, 0).date_naive()),
            ..ProgressionRecord::default()
        }
    }

    #[test]
    fn first_message_creates_record_with_award_and_bonus() {
        let mut tracker = ProgressionTracker::new().with_day_boundary(utc_days());

        let outcome = tracker.record_activity(GUILD, USER, 5, at(12, 0));

        assert_eq!(outcome.xp_gained, Some(1));
        assert!(outcome.daily_bonus_awarded);
        // 1 + 100 crosses level 1's threshold once; the rest is discarded.
        let event = outcome.level_up.unwrap();
        assert_eq!(event.old_level, 1);
        assert_eq!(event.new_level, 2);
        assert_eq!(
            tracker.status(GUILD, USER),
            Some(ProgressionStatus {
                level: 2,
                xp: 0,
                required_xp: 15
            })
        );
    }

    #[test]
    fn cooldown_allows_only_one_award() {
        let mut tracker = tracker_with(&[(GUILD, USER, claimed_today(0, 3))]);

        let first = tracker.record_activity(GUILD, USER, 40, at(12, 0));
        let second = tracker.record_activity(GUILD, USER, 40, at(12, 4));

        assert_eq!(first.xp_gained, Some(5));
        assert_eq!(second.xp_gained, None);
        assert_eq!(tracker.status(GUILD, USER).unwrap().xp, 5);
    }

    #[test]
    fn cooldown_must_be_strictly_exceeded() {
        let mut tracker = tracker_with(&[(GUILD, USER, claimed_today(0, 3))]);

        tracker.record_activity(GUILD, USER, 0, at(12, 0));
        let at_boundary = tracker.record_activity(GUILD, USER, 0, at(12, 5));
        let after = tracker.record_activity(GUILD, USER, 0, at(12, 6));

        assert_eq!(at_boundary.xp_gained, None);
        assert_eq!(after.xp_gained, Some(1));
        assert_eq!(tracker.status(GUILD, USER).unwrap().xp, 2);
    }

    #[test]
    fn crossing_threshold_levels_up_and_resets_xp() {
        let mut tracker = tracker_with(&[(GUILD, USER, claimed_today(9, 1))]);

        let outcome = tracker.record_activity(GUILD, USER, 3, at(12, 0));

        assert!(outcome.level_up.is_some());
        assert!(!outcome.daily_bonus_awarded);
        assert_eq!(
            tracker.status(GUILD, USER),
            Some(ProgressionStatus {
                level: 2,
                xp: 0,
                required_xp: 15
            })
        );
    }

    #[test]
    fn level_check_runs_even_while_on_cooldown() {
        // A snapshot can hold a record already at its threshold.
        let mut record = claimed_today(10, 1);
        record.last_award_at = at(11, 58);
        let mut tracker = tracker_with(&[(GUILD, USER, record)]);

        let outcome = tracker.record_activity(GUILD, USER, 3, at(12, 0));

        assert_eq!(outcome.xp_gained, None);
        assert_eq!(outcome.level_up.map(|e| e.new_level), Some(2));
    }

    #[test]
    fn daily_bonus_is_granted_once_per_day() {
        let unclaimed = ProgressionRecord {
            level: 20,
            ..ProgressionRecord::default()
        };
        let mut tracker = tracker_with(&[(GUILD, USER, unclaimed)]);

        let morning = tracker.record_activity(GUILD, USER, 0, at(8, 0));
        let evening = tracker.record_activity(GUILD, USER, 0, at(20, 0));

        assert!(morning.daily_bonus_awarded);
        assert!(!evening.daily_bonus_awarded);
        // two message awards of 1 XP plus a single bonus
        assert_eq!(tracker.status(GUILD, USER).unwrap().xp, 102);
    }

    #[test]
    fn daily_bonus_ignores_cooldown_state() {
        let mut tracker = tracker_with(&[(GUILD, USER, claimed_today(0, 20))]);

        let first = tracker.record_activity(GUILD, USER, 0, at(9, 0));
        let second = tracker.record_activity(GUILD, USER, 0, at(9, 1));

        assert!(!first.daily_bonus_awarded);
        assert!(!second.daily_bonus_awarded);
        assert_eq!(tracker.status(GUILD, USER).unwrap().xp, 1);
    }

    #[test]
    fn daily_bonus_returns_on_the_next_day() {
        let mut tracker = tracker_with(&[(GUILD, USER, claimed_today(0, 20))]);
        let tomorrow = Utc.with_ymd_and_hms(2026, 10, 20, 0, 1, 0).unwrap();

        let outcome = tracker.record_activity(GUILD, USER, 0, tomorrow);

        assert!(outcome.daily_bonus_awarded);
        assert_eq!(tracker.status(GUILD, USER).unwrap().xp, 101);
        assert_eq!(
            tracker.snapshot().get(&ProgressionKey::new(GUILD, USER)).unwrap().last_daily,
            Some(tomorrow.date_naive())
        );
    }

    #[test]
    fn days_follow_the_configured_boundary() {
        // 21:00 on Oct 19 at UTC-4 is already Oct 20 in UTC.
        let eastern = DayBoundary::Fixed(FixedOffset::west_opt(4 * 3600).unwrap());
        let late_evening = Utc.with_ymd_and_hms(2026, 10, 20, 1, 0, 0).unwrap();
        let mut tracker = tracker_with(&[(GUILD, USER, claimed_today(0, 20))])
            .with_day_boundary(eastern);

        let outcome = tracker.record_activity(GUILD, USER, 0, late_evening);

        assert!(!outcome.daily_bonus_awarded);
        assert_eq!(tracker.status(GUILD, USER).unwrap().xp, 1);
        assert_eq!(eastern.date_of(late_evening), at(0, 0).date_naive());
        assert_eq!(utc_days().date_of(late_evening), late_evening.date_naive());
    }

    #[test]
    fn one_local_day_pays_one_bonus_across_utc_midnight() {
        let eastern = DayBoundary::Fixed(FixedOffset::west_opt(4 * 3600).unwrap());
        let mut tracker = ProgressionTracker::new().with_day_boundary(eastern);
        let afternoon = Utc.with_ymd_and_hms(2026, 10, 19, 18, 0, 0).unwrap();
        let late_evening = Utc.with_ymd_and_hms(2026, 10, 20, 1, 0, 0).unwrap();

        let first = tracker.record_activity(GUILD, USER, 0, afternoon);
        let second = tracker.record_activity(GUILD, USER, 0, late_evening);

        assert!(first.daily_bonus_awarded);
        assert!(!second.daily_bonus_awarded);
    }

    #[test]
    fn award_and_bonus_can_both_level_up_in_one_message() {
        let unclaimed = ProgressionRecord {
            xp: 9,
            level: 1,
            ..ProgressionRecord::default()
        };
        let mut tracker = tracker_with(&[(GUILD, USER, unclaimed)]);

        let outcome = tracker.record_activity(GUILD, USER, 0, at(12, 0));

        assert_eq!(outcome.xp_gained, Some(1));
        assert!(outcome.daily_bonus_awarded);
        assert_eq!(
            outcome.level_up,
            Some(LevelUpEvent {
                guild_id: GUILD,
                user_id: USER,
                old_level: 1,
                new_level: 3,
            })
        );
        assert_eq!(
            tracker.status(GUILD, USER),
            Some(ProgressionStatus {
                level: 3,
                xp: 0,
                required_xp: 22
            })
        );
    }

    #[test]
    fn status_of_unknown_member_is_none() {
        let tracker = ProgressionTracker::new();
        assert_eq!(tracker.status(GUILD, USER), None);
    }

    #[test]
    fn reset_restores_baseline() {
        let mut tracker = tracker_with(&[(GUILD, USER, claimed_today(12, 6))]);

        assert_eq!(tracker.reset_progression(GUILD, USER), ResetOutcome::Reset);

        let status = tracker.status(GUILD, USER).unwrap();
        assert_eq!((status.level, status.xp), (1, 0));
    }

    #[test]
    fn reset_of_unknown_member_creates_nothing() {
        let mut tracker = ProgressionTracker::new();

        assert_eq!(tracker.reset_progression(GUILD, USER), ResetOutcome::NotFound);
        assert!(tracker.snapshot().is_empty());
    }

    #[test]
    fn leaderboard_is_scoped_to_guild_and_sorted() {
        let tracker = tracker_with(&[
            (1, 10, claimed_today(50, 10)),
            (1, 20, claimed_today(80, 10)),
            (1, 30, claimed_today(10, 10)),
            (2, 40, claimed_today(999, 20)),
        ]);

        let users: Vec<u64> = tracker
            .leaderboard(1, DEFAULT_LEADERBOARD_LIMIT)
            .iter()
            .map(|entry| entry.user_id)
            .collect();

        assert_eq!(users, vec![20, 10, 30]);
    }

    #[test]
    fn leaderboard_truncates_to_limit() {
        let records: Vec<_> = (1..=15)
            .map(|user| (GUILD, user, claimed_today(user, 5)))
            .collect();
        let tracker = tracker_with(&records);

        let board = tracker.leaderboard(GUILD, DEFAULT_LEADERBOARD_LIMIT);

        assert_eq!(board.len(), 10);
        assert_eq!(board[0].user_id, 15);
        assert_eq!(board[9].user_id, 6);
    }
}
