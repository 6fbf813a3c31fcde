use super::guild_settings_models::GuildSettings;
use super::guild_settings_service::GuildSettingsError;
use async_trait::async_trait;

#[async_trait]
pub trait GuildSettingsStore: Send + Sync {
    async fn get_settings(&self, guild_id: u64) -> Result<Option<GuildSettings>, GuildSettingsError>;
    async fn save_settings(
        &self,
        guild_id: u64,
        settings: GuildSettings,
    ) -> Result<(), GuildSettingsError>;
}
