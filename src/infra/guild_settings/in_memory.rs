// In-memory implementation of GuildSettingsStore.
//
// Guild settings are not part of the progression snapshot: they live for the
// lifetime of the process, the same way the first version of the bot kept them.

use crate::core::guild_settings::{GuildSettings, GuildSettingsError, GuildSettingsStore};
use async_trait::async_trait;
use dashmap::DashMap;

/// **DashMap:**
/// A concurrent HashMap that's safe to use across multiple async tasks, so
/// two admins configuring different guilds never wait on each other.
pub struct InMemoryGuildSettingsStore {
    /// Maps guild_id -> settings
    data: DashMap<u64, GuildSettings>,
}

impl InMemoryGuildSettingsStore {
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }
}

#[async_trait]
impl GuildSettingsStore for InMemoryGuildSettingsStore {
    async fn get_settings(&self, guild_id: u64) -> Result<Option<GuildSettings>, GuildSettingsError> {
        Ok(self.data.get(&guild_id).map(|entry| *entry))
    }

    async fn save_settings(
        &self,
        guild_id: u64,
        settings: GuildSettings,
    ) -> Result<(), GuildSettingsError> {
        self.data.insert(guild_id, settings);
        Ok(())
    }
}

impl Default for InMemoryGuildSettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = InMemoryGuildSettingsStore::new();

        assert_eq!(store.get_settings(456).await.unwrap(), None);

        let settings = GuildSettings {
            welcome_channel_id: Some(1),
            moderator_role_id: None,
        };
        store.save_settings(456, settings).await.unwrap();
        assert_eq!(store.get_settings(456).await.unwrap(), Some(settings));

        // Other guilds stay untouched
        assert_eq!(store.get_settings(789).await.unwrap(), None);
    }
}
