use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

/// What the invoking member is allowed to do in a guild.
pub struct MemberAccess {
    permissions: serenity::Permissions,
    roles: Vec<serenity::RoleId>,
}

impl MemberAccess {
    pub fn new(permissions: serenity::Permissions, roles: Vec<serenity::RoleId>) -> Self {
        Self { permissions, roles }
    }

    /// `ADMINISTRATOR` implicitly grants everything.
    pub fn allows(&self, required: serenity::Permissions) -> bool {
        self.permissions.contains(serenity::Permissions::ADMINISTRATOR)
            || self.permissions.contains(required)
    }

    pub fn has_role(&self, role_id: serenity::RoleId) -> bool {
        self.roles.contains(&role_id)
    }
}

/// Resolve the author's effective guild permissions.
///
/// Prefix commands don't carry resolved permissions, so we fold the member's
/// roles (plus @everyone) ourselves. The guild owner gets everything.
pub async fn resolve_member_access(
    ctx: Context<'_>,
    guild_id: serenity::GuildId,
) -> Result<MemberAccess, Error> {
    let user_id = ctx.author().id;
    let guild = guild_id.to_partial_guild(ctx.http()).await?;
    let member = guild_id.member(ctx.http(), user_id).await?;

    Ok(fold_access(&guild, user_id, member.roles))
}

fn fold_access(
    guild: &serenity::PartialGuild,
    user_id: serenity::UserId,
    roles: Vec<serenity::RoleId>,
) -> MemberAccess {
    if guild.owner_id == user_id {
        return MemberAccess::new(serenity::Permissions::all(), roles);
    }

    let everyone_role_id = serenity::RoleId::new(guild.id.get());
    let mut resolved = serenity::Permissions::empty();
    for role in guild.roles.values() {
        if role.id == everyone_role_id || roles.contains(&role.id) {
            resolved |= role.permissions;
        }
    }

    MemberAccess::new(resolved, roles)
}

/// A member's place in the role hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rank {
    pub is_owner: bool,
    /// Position of the member's highest role, 0 with only @everyone.
    pub top_position: u16,
}

impl Rank {
    fn of(
        guild: &serenity::PartialGuild,
        user_id: serenity::UserId,
        roles: &[serenity::RoleId],
    ) -> Self {
        let top_position = roles
            .iter()
            .filter_map(|id| guild.roles.get(id))
            .map(|role| role.position)
            .max()
            .unwrap_or(0);

        Self {
            is_owner: guild.owner_id == user_id,
            top_position,
        }
    }

    /// Nobody outranks the owner, and equal positions don't count.
    pub fn outranks(&self, other: &Rank) -> bool {
        !other.is_owner && (self.is_owner || self.top_position > other.top_position)
    }
}

/// Whether the bot itself may act on `target_id`: it needs `required` and
/// a highest role above the target's.
pub async fn bot_can_act_on(
    ctx: Context<'_>,
    guild_id: serenity::GuildId,
    target_id: serenity::UserId,
    required: serenity::Permissions,
) -> Result<bool, Error> {
    let bot_id = ctx.framework().bot_id;
    if target_id == bot_id {
        return Ok(false);
    }

    let guild = guild_id.to_partial_guild(ctx.http()).await?;
    let bot = guild_id.member(ctx.http(), bot_id).await?;
    let target = guild_id.member(ctx.http(), target_id).await?;

    let bot_rank = Rank::of(&guild, bot_id, &bot.roles);
    let target_rank = Rank::of(&guild, target_id, &target.roles);

    let bot_access = fold_access(&guild, bot_id, bot.roles);
    Ok(bot_access.allows(required) && bot_rank.outranks(&target_rank))
}

/// Plain Discord permission check.
pub async fn has_permission(
    ctx: Context<'_>,
    guild_id: serenity::GuildId,
    required: serenity::Permissions,
) -> Result<bool, Error> {
    Ok(resolve_member_access(ctx, guild_id).await?.allows(required))
}

/// Discord permission, or the guild's configured moderator role.
pub async fn can_moderate(
    ctx: Context<'_>,
    guild_id: serenity::GuildId,
    required: serenity::Permissions,
) -> Result<bool, Error> {
    let access = resolve_member_access(ctx, guild_id).await?;
    if access.allows(required) {
        return Ok(true);
    }

    let moderator_role = ctx
        .data()
        .guild_settings
        .moderator_role(guild_id.get())
        .await?;
    Ok(moderator_role.is_some_and(|role_id| access.has_role(serenity::RoleId::new(role_id))))
}
