use itertools::Itertools;
use poise::{CreateReply, command};
use serenity::all::*;
use snafu::OptionExt;
use tracing::info;

use super::{Context, check_moderator};
use crate::{
    error::BotError,
    services::{GuildConfigService, GuildSettings, MonitorToggle, introduction::parse_emote},
};

fn command_guild(ctx: Context<'_>) -> Result<GuildId, BotError> {
    ctx.guild_id()
        .whatever_context::<&str, BotError>("This command can only be used in a guild")
}

fn toggle_reply(toggle: MonitorToggle, role_name: &str, role_id: RoleId) -> String {
    let state = match toggle {
        MonitorToggle::Enabled => "enabled",
        MonitorToggle::Disabled => "disabled",
    };
    format!("✅ Monitoring {state} for role `{role_name}` (id: `{role_id}`)")
}

fn settings_embed(settings: &GuildSettings) -> CreateEmbed {
    const NOT_SET: &str = "Not set";
    let roles = if settings.monitored_roles.is_empty() {
        NOT_SET.to_owned()
    } else {
        settings
            .monitored_roles
            .iter()
            .map(|role| format!("{} (`{role}`)", role.mention()))
            .join("\n")
    };
    CreateEmbed::new()
        .title("Introduction settings")
        .field(
            "Emote",
            settings
                .introduction_emote
                .to_owned()
                .unwrap_or_else(|| NOT_SET.into()),
            true,
        )
        .field(
            "Channel",
            settings
                .introduction_channel
                .map(|c| c.mention().to_string())
                .unwrap_or_else(|| NOT_SET.into()),
            true,
        )
        .field("Monitored roles", roles, false)
        .color(0x00FF00)
}

/// Sets the introduction emote to react with
#[command(
    prefix_command,
    slash_command,
    guild_only,
    check = "check_moderator"
)]
pub async fn introemote(
    ctx: Context<'_>,
    #[description = "Unicode emoji or custom emote"] emoji: String,
) -> Result<(), BotError> {
    let guild_id = command_guild(ctx)?;
    if let Err(why) = parse_emote(&emoji) {
        ctx.say(format!("❌ {why}")).await?;
        return Ok(());
    }
    if let Err(why) = ctx
        .data()
        .db
        .guild_config()
        .set_introduction_emote(guild_id, &emoji)
        .await
    {
        ctx.say(format!("❌ Failed to change the introduction emote: {why}"))
            .await?;
        return Err(why.into());
    }
    info!("Introduction emote of guild {guild_id} set to {emoji}");
    ctx.say(format!("✅ Changed introduction emote to '{emoji}'"))
        .await?;
    Ok(())
}

/// Sets the introduction channel
#[command(
    prefix_command,
    slash_command,
    guild_only,
    check = "check_moderator"
)]
pub async fn introchannel(
    ctx: Context<'_>,
    #[description = "Channel members post their introductions in"] channel: GuildChannel,
) -> Result<(), BotError> {
    let guild_id = command_guild(ctx)?;
    if channel.guild_id != guild_id {
        ctx.say("❌ The introduction channel must be in this server.")
            .await?;
        return Ok(());
    }
    if !matches!(channel.kind, ChannelType::Text | ChannelType::News) {
        ctx.say("❌ The introduction channel must be a text channel.")
            .await?;
        return Ok(());
    }
    if let Err(why) = ctx
        .data()
        .db
        .guild_config()
        .set_introduction_channel(guild_id, channel.id)
        .await
    {
        ctx.say(format!("❌ Failed to change the introduction channel: {why}"))
            .await?;
        return Err(why.into());
    }
    info!(
        "Introduction channel of guild {guild_id} set to {}",
        channel.id
    );
    ctx.say(format!(
        "✅ Changed introduction channel to {}",
        channel.mention()
    ))
    .await?;
    Ok(())
}

/// Toggles whether a role is considered a base role
#[command(
    prefix_command,
    slash_command,
    guild_only,
    check = "check_moderator"
)]
pub async fn baserole(
    ctx: Context<'_>,
    #[description = "Role to start or stop monitoring"] role: Role,
) -> Result<(), BotError> {
    let guild_id = command_guild(ctx)?;
    let toggle = match ctx
        .data()
        .db
        .guild_config()
        .toggle_monitored_role(guild_id, role.id)
        .await
    {
        Ok(toggle) => toggle,
        Err(why) => {
            ctx.say(format!(
                "❌ Failed to change monitoring for role `{}`: {why}",
                role.name
            ))
            .await?;
            return Err(why.into());
        }
    };
    info!("Monitoring of role {} in guild {guild_id}: {toggle:?}", role.id);
    ctx.say(toggle_reply(toggle, &role.name, role.id)).await?;
    Ok(())
}

/// Clears the list of base roles
#[command(
    prefix_command,
    slash_command,
    guild_only,
    check = "check_moderator"
)]
pub async fn clearbaseroles(ctx: Context<'_>) -> Result<(), BotError> {
    let guild_id = command_guild(ctx)?;
    if let Err(why) = ctx
        .data()
        .db
        .guild_config()
        .clear_monitored_roles(guild_id)
        .await
    {
        ctx.say(format!("❌ Failed to clear the monitored roles: {why}"))
            .await?;
        return Err(why.into());
    }
    info!("Cleared monitored roles of guild {guild_id}");
    ctx.say("✅ Cleared all base/monitored roles").await?;
    Ok(())
}

/// Shows the introduction emote, channel and monitored roles of this server
#[command(
    prefix_command,
    slash_command,
    guild_only,
    check = "check_moderator",
    ephemeral
)]
pub async fn introconfig(ctx: Context<'_>) -> Result<(), BotError> {
    let guild_id = command_guild(ctx)?;
    let settings = match ctx.data().db.guild_config().snapshot(guild_id).await {
        Ok(settings) => settings,
        Err(why) => {
            ctx.say(format!("❌ Failed to read the introduction settings: {why}"))
                .await?;
            return Err(why.into());
        }
    };
    ctx.send(CreateReply::default().embed(settings_embed(&settings)))
        .await?;
    Ok(())
}
