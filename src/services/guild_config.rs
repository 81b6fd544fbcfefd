use std::collections::BTreeSet;

use entities::{guild_config, monitored_roles};
use sea_orm::{
    ColumnTrait, DbErr, EntityTrait, QueryFilter, Set, TransactionTrait, sea_query::OnConflict,
};
use serenity::all::*;

use crate::database::BotDatabase;

/// Result of flipping a role's monitored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorToggle {
    Enabled,
    Disabled,
}

/// Everything configured for one guild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuildSettings {
    pub introduction_emote: Option<String>,
    pub introduction_channel: Option<ChannelId>,
    pub monitored_roles: BTreeSet<RoleId>,
}

/// Per-guild introduction configuration.
///
/// Writes are upserts: the guild's row is created by the first write and never
/// removed. Reading a guild that was never written yields empty values.
pub(crate) trait GuildConfigService {
    async fn set_introduction_emote(&self, guild_id: GuildId, emote: &str) -> Result<(), DbErr>;

    async fn set_introduction_channel(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<(), DbErr>;

    async fn introduction_emote(&self, guild_id: GuildId) -> Result<Option<String>, DbErr>;

    async fn introduction_channel(&self, guild_id: GuildId) -> Result<Option<ChannelId>, DbErr>;

    async fn monitored_roles(&self, guild_id: GuildId) -> Result<BTreeSet<RoleId>, DbErr>;

    #[allow(dead_code)]
    async fn is_monitored_role(&self, guild_id: GuildId, role_id: RoleId) -> Result<bool, DbErr>;

    /// Removes the role if it is monitored, adds it otherwise.
    async fn toggle_monitored_role(
        &self,
        guild_id: GuildId,
        role_id: RoleId,
    ) -> Result<MonitorToggle, DbErr>;

    async fn clear_monitored_roles(&self, guild_id: GuildId) -> Result<(), DbErr>;

    async fn snapshot(&self, guild_id: GuildId) -> Result<GuildSettings, DbErr>;
}

pub struct DbGuildConfig<'a>(&'a BotDatabase);

impl BotDatabase {
    pub fn guild_config(&self) -> DbGuildConfig<'_> {
        DbGuildConfig(self)
    }
}

impl DbGuildConfig<'_> {
    async fn find(&self, guild_id: GuildId) -> Result<Option<guild_config::Model>, DbErr> {
        guild_config::Entity::find_by_id(guild_id.get() as i64)
            .one(self.0.inner())
            .await
    }

    /// Inserts the guild row or, if it exists, overwrites only `column` from `model`.
    async fn upsert(
        &self,
        model: guild_config::ActiveModel,
        column: guild_config::Column,
    ) -> Result<(), DbErr> {
        guild_config::Entity::insert(model)
            .on_conflict(
                OnConflict::column(guild_config::Column::GuildId)
                    .update_column(column)
                    .to_owned(),
            )
            .exec_without_returning(self.0.inner())
            .await?;
        Ok(())
    }
}

impl GuildConfigService for DbGuildConfig<'_> {
    async fn set_introduction_emote(&self, guild_id: GuildId, emote: &str) -> Result<(), DbErr> {
        let model = guild_config::ActiveModel {
            guild_id: Set(guild_id.get() as i64),
            introduction_emote: Set(Some(emote.to_owned())),
            ..Default::default()
        };
        self.upsert(model, guild_config::Column::IntroductionEmote)
            .await
    }

    async fn set_introduction_channel(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<(), DbErr> {
        let model = guild_config::ActiveModel {
            guild_id: Set(guild_id.get() as i64),
            introduction_channel: Set(Some(channel_id.get() as i64)),
            ..Default::default()
        };
        self.upsert(model, guild_config::Column::IntroductionChannel)
            .await
    }

    async fn introduction_emote(&self, guild_id: GuildId) -> Result<Option<String>, DbErr> {
        Ok(self
            .find(guild_id)
            .await?
            .and_then(|cfg| cfg.introduction_emote))
    }

    async fn introduction_channel(&self, guild_id: GuildId) -> Result<Option<ChannelId>, DbErr> {
        Ok(self
            .find(guild_id)
            .await?
            .and_then(|cfg| cfg.introduction_channel()))
    }

    async fn monitored_roles(&self, guild_id: GuildId) -> Result<BTreeSet<RoleId>, DbErr> {
        Ok(monitored_roles::Entity::find()
            .filter(monitored_roles::Column::GuildId.eq(guild_id.get() as i64))
            .all(self.0.inner())
            .await?
            .into_iter()
            .map(|m| m.role_id())
            .collect())
    }

    async fn is_monitored_role(&self, guild_id: GuildId, role_id: RoleId) -> Result<bool, DbErr> {
        Ok(
            monitored_roles::Entity::find_by_id((guild_id.get() as i64, role_id.get() as i64))
                .one(self.0.inner())
                .await?
                .is_some(),
        )
    }

    async fn toggle_monitored_role(
        &self,
        guild_id: GuildId,
        role_id: RoleId,
    ) -> Result<MonitorToggle, DbErr> {
        let key = (guild_id.get() as i64, role_id.get() as i64);
        // The delete takes the write lock, so a concurrent toggle of the same
        // role waits for this transaction and observes its result.
        let txn = self.0.inner().begin().await?;
        let removed = monitored_roles::Entity::delete_by_id(key)
            .exec(&txn)
            .await?
            .rows_affected;
        let toggle = if removed > 0 {
            MonitorToggle::Disabled
        } else {
            monitored_roles::Entity::insert(monitored_roles::ActiveModel {
                guild_id: Set(key.0),
                role_id: Set(key.1),
            })
            .exec_without_returning(&txn)
            .await?;
            MonitorToggle::Enabled
        };
        txn.commit().await?;
        Ok(toggle)
    }

    async fn clear_monitored_roles(&self, guild_id: GuildId) -> Result<(), DbErr> {
        monitored_roles::Entity::delete_many()
            .filter(monitored_roles::Column::GuildId.eq(guild_id.get() as i64))
            .exec(self.0.inner())
            .await?;
        Ok(())
    }

    async fn snapshot(&self, guild_id: GuildId) -> Result<GuildSettings, DbErr> {
        let cfg = self.find(guild_id).await?;
        Ok(GuildSettings {
            introduction_channel: cfg.as_ref().and_then(|c| c.introduction_channel()),
            introduction_emote: cfg.and_then(|c| c.introduction_emote),
            monitored_roles: self.monitored_roles(guild_id).await?,
        })
    }
}
