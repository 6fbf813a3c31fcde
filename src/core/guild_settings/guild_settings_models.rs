/// Per-guild configuration set by administrators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuildSettings {
    /// Channel that greets new members.
    pub welcome_channel_id: Option<u64>,
    /// Role whose holders may use the moderation commands.
    pub moderator_role_id: Option<u64>,
}
