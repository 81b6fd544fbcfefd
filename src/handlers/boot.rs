use owo_colors::OwoColorize as _;
use serenity::all::{Context, GuildId, Ready};
use tracing::info;

pub fn on_cache_ready(ctx: &Context, guilds: &[GuildId]) {
    info!(
        "Cache is ready! Bot is in {} guilds.",
        guilds.len().to_string().green()
    );
    for guild in guilds {
        let guild_name = ctx
            .cache
            .guild(*guild)
            .map(|g| g.name.to_owned())
            .unwrap_or_else(|| "Uncached Guild".to_string());
        info!("Watching role changes in: {} ({})", guild_name.green(), guild);
    }
}

pub fn on_ready(ready: &Ready) {
    info!("{} is connected!", ready.user.name.green());
}
