use crate::core::leveling::{
    ProgressionKey, ProgressionRecord, ProgressionSnapshotStore, ProgressionStore, StoreError,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// JSON-based snapshot store. The whole progression store lives in one file
/// as a flat map: { "guildId-userId": ProgressionRecord }
///
/// The layout is shared with snapshots written by earlier versions of the bot,
/// so keys and field names must not change.
pub struct JsonProgressionStore {
    path: PathBuf,
}

impl JsonProgressionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn read_snapshot(&self) -> Result<Option<ProgressionStore>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let file = File::open(&self.path)?;
        let raw: BTreeMap<String, ProgressionRecord> =
            serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(decode_snapshot(raw)))
    }

    /// Serialize first, then write a sibling file and rename it over the old
    /// snapshot, so a failure at any step leaves the previous file as it was.
    fn write_snapshot(&self, snapshot: &ProgressionStore) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(&encode_snapshot(snapshot))?;
        let temp = self.temp_path();

        std::fs::write(&temp, json)?;
        if let Err(e) = std::fs::rename(&temp, &self.path) {
            let _ = std::fs::remove_file(&temp);
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait]
impl ProgressionSnapshotStore for JsonProgressionStore {
    async fn load(&self) -> ProgressionStore {
        match self.read_snapshot() {
            Ok(Some(store)) => store,
            Ok(None) => {
                tracing::info!(path = %self.path.display(), "No progression snapshot yet, starting empty");
                ProgressionStore::new()
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Failed to load progression snapshot: {}", e);
                ProgressionStore::new()
            }
        }
    }

    async fn save(&self, snapshot: &ProgressionStore) {
        if let Err(e) = self.write_snapshot(snapshot) {
            tracing::warn!(path = %self.path.display(), "Failed to save progression snapshot: {}", e);
        }
    }
}

fn snapshot_key(key: &ProgressionKey) -> String {
    format!("{}-{}", key.guild_id, key.user_id)
}

fn parse_snapshot_key(raw: &str) -> Option<ProgressionKey> {
    let (guild, user) = raw.split_once('-')?;
    Some(ProgressionKey::new(guild.parse().ok()?, user.parse().ok()?))
}

fn encode_snapshot(snapshot: &ProgressionStore) -> BTreeMap<String, &ProgressionRecord> {
    snapshot
        .iter()
        .map(|(key, record)| (snapshot_key(key), record))
        .collect()
}

fn decode_snapshot(raw: BTreeMap<String, ProgressionRecord>) -> ProgressionStore {
    raw.into_iter()
        .filter_map(|(raw_key, mut record)| match parse_snapshot_key(&raw_key) {
            Some(key) => {
                record.level = record.level.max(1);
                Some((key, record))
            }
            None => {
                tracing::warn!(key = %raw_key, "Skipping malformed progression key");
                None
            }
        })
        .collect()
}
