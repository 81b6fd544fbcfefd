pub mod guild_config;
pub mod introduction;
pub mod platform;

pub(crate) use guild_config::GuildConfigService;
pub use guild_config::{DbGuildConfig, GuildSettings, MonitorToggle};
pub(crate) use platform::ChatPlatform;
pub use platform::HistoryMessage;
