// Moderation commands. The actions themselves (kick, ban, timeout) are
// performed by Discord; this module only decides who may ask for them.

pub mod commands;
pub mod permissions;
