use serenity::model::id::{ChannelId, RoleId};

use crate::guild_config::Model as GuildConfig;
impl GuildConfig {
    pub fn introduction_channel(&self) -> Option<ChannelId> {
        self.introduction_channel
            .map(|id| ChannelId::new(id as u64))
    }
}

use crate::monitored_roles::Model as MonitoredRole;
impl MonitoredRole {
    pub fn role_id(&self) -> RoleId {
        RoleId::new(self.role_id as u64)
    }
}
