pub mod introduction;

use std::sync::Arc;

use arc_swap::ArcSwap;
use serenity::all::{Member, Permissions, RoleId, UserId};
use snafu::OptionExt;
use tracing::warn;

use crate::{config::BotCfg, database::BotDatabase, error::BotError};

pub type Context<'a> = poise::Context<'a, Data, BotError>;

pub struct Data {
    pub db: Arc<BotDatabase>,
    pub cfg: ArcSwap<BotCfg>,
}

impl Data {
    pub fn new(db: BotDatabase, cfg: BotCfg) -> Self {
        Self {
            db: Arc::new(db),
            cfg: ArcSwap::from_pointee(cfg),
        }
    }
}

/// Configured moderators, plus managers and administrators of the guild.
pub(crate) fn is_moderator(
    cfg: &BotCfg,
    user_id: UserId,
    roles: &[RoleId],
    permissions: Option<Permissions>,
) -> bool {
    cfg.is_moderator(user_id, roles)
        || permissions
            .is_some_and(|p| p.intersects(Permissions::ADMINISTRATOR | Permissions::MANAGE_GUILD))
}

fn member_permissions(ctx: Context<'_>, member: &Member) -> Option<Permissions> {
    member
        .permissions
        .or_else(|| ctx.guild().map(|guild| guild.member_permissions(member)))
}

pub async fn check_moderator(ctx: Context<'_>) -> Result<bool, BotError> {
    let member = ctx
        .author_member()
        .await
        .whatever_context::<&str, BotError>("Failed to get member information")?;
    let is_moderator = is_moderator(
        &ctx.data().cfg.load(),
        member.user.id,
        &member.roles,
        member_permissions(ctx, &member),
    );
    if !is_moderator {
        warn!(
            "{} tried to use `{}` without moderator permissions",
            ctx.author().name,
            ctx.command().name
        );
        ctx.say("❌ You need moderator permissions to use this command.")
            .await?;
    }
    Ok(is_moderator)
}
