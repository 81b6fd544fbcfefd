use chrono::{DateTime, Utc};
use futures::{StreamExt, TryStreamExt};
use serenity::all::*;

use crate::error::BotError;

/// The parts of a channel message the introduction lookup needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryMessage {
    pub id: MessageId,
    pub author_id: UserId,
    pub timestamp: DateTime<Utc>,
}

impl From<&Message> for HistoryMessage {
    fn from(msg: &Message) -> Self {
        Self {
            id: msg.id,
            author_id: msg.author.id,
            timestamp: *msg.timestamp,
        }
    }
}

/// Calls the reaction path makes against the chat platform.
pub(crate) trait ChatPlatform {
    /// Up to `limit` of the most recent messages in `channel_id`, in no guaranteed order.
    async fn recent_messages(
        &self,
        channel_id: ChannelId,
        limit: usize,
    ) -> Result<Vec<HistoryMessage>, BotError>;

    async fn add_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        reaction: &ReactionType,
    ) -> Result<(), BotError>;
}

impl ChatPlatform for Context {
    async fn recent_messages(
        &self,
        channel_id: ChannelId,
        limit: usize,
    ) -> Result<Vec<HistoryMessage>, BotError> {
        Ok(channel_id
            .messages_iter(self.to_owned())
            .take(limit)
            .map_ok(|msg| HistoryMessage::from(&msg))
            .try_collect::<Vec<_>>()
            .await?)
    }

    async fn add_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        reaction: &ReactionType,
    ) -> Result<(), BotError> {
        Ok(self
            .http
            .create_reaction(channel_id, message_id, reaction)
            .await?)
    }
}
