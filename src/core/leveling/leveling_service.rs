// This is the leveling service - the async face of the progression tracker.
// Notice how this module has NO Discord-specific code (no serenity, no poise imports).
// It works with primitive types (u64, usize) so it could theoretically be used
// in a web app, CLI tool, or any other frontend.

use super::progression_models::{
    ActivityOutcome, LeaderboardEntry, ProgressionStatus, ProgressionStore, ResetOutcome,
};
use super::progression_tracker::{DayBoundary, ProgressionTracker};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::RwLock;

// ============================================================================
// ERRORS
// ============================================================================

/// What can go wrong while reading or writing a snapshot.
///
/// These never reach the message flow: the snapshot store logs them and
/// falls back (empty store on load, old file kept on save).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================
// The core defines WHAT it needs from persistence, the infra layer decides HOW.

/// Whole-store snapshot persistence.
///
/// Both operations are infallible from the caller's point of view.
#[async_trait]
pub trait ProgressionSnapshotStore: Send + Sync {
    /// Read the last snapshot. Missing or unreadable snapshots yield an empty store.
    async fn load(&self) -> ProgressionStore;

    /// Overwrite the snapshot. On failure the previous one must stay intact.
    async fn save(&self, snapshot: &ProgressionStore);
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// Shared entry point for everything leveling related.
///
/// **Generic over S: ProgressionSnapshotStore**
/// The service doesn't care where snapshots go. It owns the one tracker
/// instance and serializes every mutation behind a single lock, since
/// Discord events arrive on many tasks at once.
pub struct LevelingService<S: ProgressionSnapshotStore> {
    tracker: RwLock<ProgressionTracker>,
    store: S,
}

impl<S: ProgressionSnapshotStore> LevelingService<S> {
    /// Rehydrate the tracker from the last snapshot.
    pub async fn load(store: S, day_boundary: DayBoundary) -> Self {
        let snapshot = store.load().await;
        tracing::info!(entries = snapshot.len(), "Loaded progression snapshot");

        Self {
            tracker: RwLock::new(
                ProgressionTracker::from_store(snapshot).with_day_boundary(day_boundary),
            ),
            store,
        }
    }

    /// Apply the XP rules to a qualifying message sent right now.
    pub async fn process_message(
        &self,
        guild_id: u64,
        user_id: u64,
        message_length: usize,
    ) -> ActivityOutcome {
        self.process_message_at(guild_id, user_id, message_length, Utc::now())
            .await
    }

    pub async fn process_message_at(
        &self,
        guild_id: u64,
        user_id: u64,
        message_length: usize,
        now: DateTime<Utc>,
    ) -> ActivityOutcome {
        let mut tracker = self.tracker.write().await;
        tracker.record_activity(guild_id, user_id, message_length, now)
    }

    pub async fn status(&self, guild_id: u64, user_id: u64) -> Option<ProgressionStatus> {
        self.tracker.read().await.status(guild_id, user_id)
    }

    pub async fn reset(&self, guild_id: u64, user_id: u64) -> ResetOutcome {
        self.tracker
            .write()
            .await
            .reset_progression(guild_id, user_id)
    }

    pub async fn leaderboard(&self, guild_id: u64, limit: usize) -> Vec<LeaderboardEntry> {
        self.tracker.read().await.leaderboard(guild_id, limit)
    }

    /// Write the current state out. The lock is released before any I/O.
    pub async fn flush(&self) {
        let snapshot = self.tracker.read().await.snapshot();
        self.store.save(&snapshot).await;
        tracing::debug!(entries = snapshot.len(), "Flushed progression snapshot");
    }
}

// ============================================================================
// TESTS
// ============================================================================
