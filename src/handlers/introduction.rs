use serenity::all::{Context, GuildMemberUpdateEvent, Member};
use tracing::{debug, error};

use crate::{
    commands::Data,
    services::introduction::{ReactionOutcome, RoleChange, react_to_introduction},
};

/// Without the cached member there is nothing to diff the roles against.
fn role_change(old: Option<&Member>, event: &GuildMemberUpdateEvent) -> Option<RoleChange> {
    let old = old?;
    Some(RoleChange {
        guild_id: event.guild_id,
        user_id: event.user.id,
        previous: old.roles.iter().copied().collect(),
        current: event.roles.iter().copied().collect(),
    })
}

/// Reacts to a member's introduction after a monitored role was added.
///
/// Errors are logged and dropped here: the update came from the gateway, so
/// nobody is waiting for a reply.
pub async fn on_member_update(
    ctx: &Context,
    data: &Data,
    old: Option<&Member>,
    event: &GuildMemberUpdateEvent,
) {
    let Some(change) = role_change(old, event) else {
        debug!(
            "Member {} of guild {} was not cached, skipping role change",
            event.user.id, event.guild_id
        );
        return;
    };
    match react_to_introduction(&data.db.guild_config(), ctx, &change).await {
        Ok(ReactionOutcome::NoMonitoredRoleAdded) => {}
        Ok(outcome) => debug!(
            "Role change of member {} in guild {}: {outcome:?}",
            change.user_id, change.guild_id
        ),
        Err(e) => error!(
            "Failed to react to the introduction of member {} in guild {}: {e}",
            change.user_id, change.guild_id
        ),
    }
}
