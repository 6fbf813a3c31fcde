use super::guild_settings_models::GuildSettings;
use super::guild_settings_store::GuildSettingsStore;

#[derive(Debug, thiserror::Error)]
pub enum GuildSettingsError {
    #[error("Invalid guild, channel or role ID")]
    InvalidId,
}

pub struct GuildSettingsService<S: GuildSettingsStore> {
    store: S,
}

impl<S: GuildSettingsStore> GuildSettingsService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn validate_ids(guild_id: u64, target_id: u64) -> Result<(), GuildSettingsError> {
        if guild_id == 0 || target_id == 0 {
            Err(GuildSettingsError::InvalidId)
        } else {
            Ok(())
        }
    }

    pub async fn settings(&self, guild_id: u64) -> Result<GuildSettings, GuildSettingsError> {
        Ok(self.store.get_settings(guild_id).await?.unwrap_or_default())
    }

    pub async fn set_welcome_channel(
        &self,
        guild_id: u64,
        channel_id: u64,
    ) -> Result<(), GuildSettingsError> {
        Self::validate_ids(guild_id, channel_id)?;

        let mut settings = self.settings(guild_id).await?;
        settings.welcome_channel_id = Some(channel_id);
        self.store.save_settings(guild_id, settings).await
    }

    pub async fn welcome_channel(&self, guild_id: u64) -> Result<Option<u64>, GuildSettingsError> {
        Ok(self.settings(guild_id).await?.welcome_channel_id)
    }

    pub async fn set_moderator_role(
        &self,
        guild_id: u64,
        role_id: u64,
    ) -> Result<(), GuildSettingsError> {
        Self::validate_ids(guild_id, role_id)?;

        let mut settings = self.settings(guild_id).await?;
        settings.moderator_role_id = Some(role_id);
        self.store.save_settings(guild_id, settings).await
    }

    pub async fn moderator_role(&self, guild_id: u64) -> Result<Option<u64>, GuildSettingsError> {
        Ok(self.settings(guild_id).await?.moderator_role_id)
    }
}
