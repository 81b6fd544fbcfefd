use std::collections::BTreeSet;

use serenity::all::*;
use snafu::ensure;
use tracing::info;

use super::{ChatPlatform, GuildConfigService, HistoryMessage};
use crate::error::{BotError, InvalidEmoteSnafu};

/// How many recent messages of the introduction channel are searched for the member's post.
pub const INTRODUCTION_LOOKBACK: usize = 200;

/// A member's roles before and after a guild member update.
#[derive(Debug, Clone)]
pub struct RoleChange {
    pub guild_id: GuildId,
    pub user_id: UserId,
    pub previous: BTreeSet<RoleId>,
    pub current: BTreeSet<RoleId>,
}

impl RoleChange {
    pub fn added_roles(&self) -> impl Iterator<Item = &RoleId> {
        self.current.difference(&self.previous)
    }
}

/// What handling a role change ended with. Everything but `Reacted` leaves the platform untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionOutcome {
    NoMonitoredRoleAdded,
    ChannelNotConfigured,
    MessageNotFound,
    EmoteNotConfigured,
    Reacted {
        channel_id: ChannelId,
        message_id: MessageId,
    },
}

/// Turns a stored emote into a reaction: `<:name:id>` / `<a:name:id>` for
/// custom emotes, anything else is sent as a unicode emoji.
pub fn parse_emote(emote: &str) -> Result<ReactionType, BotError> {
    ensure!(!emote.trim().is_empty(), InvalidEmoteSnafu { emote });
    ReactionType::try_from(emote.trim()).map_err(|_| InvalidEmoteSnafu { emote }.build())
}

/// The newest message written by `author`, compared by timestamp and then by id.
pub fn latest_message_by(
    messages: impl IntoIterator<Item = HistoryMessage>,
    author: UserId,
) -> Option<HistoryMessage> {
    messages
        .into_iter()
        .filter(|m| m.author_id == author)
        .max_by_key(|m| (m.timestamp, m.id))
}

/// Reacts to the member's introduction when the change added a monitored role.
pub(crate) async fn react_to_introduction(
    store: &impl GuildConfigService,
    platform: &impl ChatPlatform,
    change: &RoleChange,
) -> Result<ReactionOutcome, BotError> {
    let guild_id = change.guild_id;
    let user_id = change.user_id;
    if change.added_roles().next().is_none() {
        return Ok(ReactionOutcome::NoMonitoredRoleAdded);
    }
    let monitored = store.monitored_roles(guild_id).await?;
    if !change.added_roles().any(|r| monitored.contains(r)) {
        return Ok(ReactionOutcome::NoMonitoredRoleAdded);
    }

    let Some(channel_id) = store.introduction_channel(guild_id).await? else {
        info!("Introduction channel not configured in guild {guild_id}, set it with `introchannel`");
        return Ok(ReactionOutcome::ChannelNotConfigured);
    };

    let history = platform
        .recent_messages(channel_id, INTRODUCTION_LOOKBACK)
        .await?;
    let Some(message) = latest_message_by(history, user_id) else {
        info!(
            "Could not find an introduction message for user {user_id} in the last {INTRODUCTION_LOOKBACK} messages of channel {channel_id}"
        );
        return Ok(ReactionOutcome::MessageNotFound);
    };

    let Some(emote) = store.introduction_emote(guild_id).await? else {
        info!("Introduction emote not configured in guild {guild_id}, set it with `introemote`");
        return Ok(ReactionOutcome::EmoteNotConfigured);
    };
    let reaction = parse_emote(&emote)?;

    platform
        .add_reaction(channel_id, message.id, &reaction)
        .await?;
    info!(
        "Reacted with {emote} to introduction {} of user {user_id} in guild {guild_id}",
        message.id
    );
    Ok(ReactionOutcome::Reacted {
        channel_id,
        message_id: message.id,
    })
}

#[cfg(test)]
mod test {
    use std::sync::Mutex;

    use chrono::{DateTime, Duration, Utc};

    use super::*;
    use crate::{database::BotDatabase, services::MonitorToggle};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        History(ChannelId, usize),
        React(ChannelId, MessageId, ReactionType),
    }

    #[derive(Default)]
    struct FakePlatform {
        history: Vec<HistoryMessage>,
        calls: Mutex<Vec<Call>>,
    }

    impl FakePlatform {
        fn with_history(history: Vec<HistoryMessage>) -> Self {
            Self {
                history,
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ChatPlatform for FakePlatform {
        async fn recent_messages(
            &self,
            channel_id: ChannelId,
            limit: usize,
        ) -> Result<Vec<HistoryMessage>, BotError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::History(channel_id, limit));
            Ok(self.history.iter().take(limit).cloned().collect())
        }

        async fn add_reaction(
            &self,
            channel_id: ChannelId,
            message_id: MessageId,
            reaction: &ReactionType,
        ) -> Result<(), BotError> {
            self.calls.lock().unwrap().push(Call::React(
                channel_id,
                message_id,
                reaction.to_owned(),
            ));
            Ok(())
        }
    }

    const GUILD: GuildId = GuildId::new(456);
    const MEMBER: UserId = UserId::new(123);
    const CHANNEL: ChannelId = ChannelId::new(42);

    fn base_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn message(id: u64, author: UserId, minutes: i64) -> HistoryMessage {
        HistoryMessage {
            id: MessageId::new(id),
            author_id: author,
            timestamp: base_time() + Duration::minutes(minutes),
        }
    }

    fn roles(ids: &[u64]) -> BTreeSet<RoleId> {
        ids.iter().copied().map(RoleId::new).collect()
    }

    fn change(previous: &[u64], current: &[u64]) -> RoleChange {
        RoleChange {
            guild_id: GUILD,
            user_id: MEMBER,
            previous: roles(previous),
            current: roles(current),
        }
    }

    async fn configured_db(monitored: &[u64], emote: Option<&str>) -> BotDatabase {
        let db = BotDatabase::new_memory().await.unwrap();
        let service = db.guild_config();
        for role in monitored {
            assert_eq!(
                service
                    .toggle_monitored_role(GUILD, RoleId::new(*role))
                    .await
                    .unwrap(),
                MonitorToggle::Enabled
            );
        }
        service.set_introduction_channel(GUILD, CHANNEL).await.unwrap();
        if let Some(emote) = emote {
            service.set_introduction_emote(GUILD, emote).await.unwrap();
        }
        db
    }

    #[tokio::test]
    async fn test_reacts_to_latest_introduction() {
        let db = configured_db(&[10], Some("🎉")).await;
        let platform = FakePlatform::with_history(vec![
            message(900, MEMBER, 5),
            message(901, UserId::new(999), 6),
            message(800, MEMBER, 1),
        ]);

        let outcome = react_to_introduction(&db.guild_config(), &platform, &change(&[], &[10]))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ReactionOutcome::Reacted {
                channel_id: CHANNEL,
                message_id: MessageId::new(900),
            }
        );
        assert_eq!(
            platform.calls(),
            vec![
                Call::History(CHANNEL, INTRODUCTION_LOOKBACK),
                Call::React(
                    CHANNEL,
                    MessageId::new(900),
                    ReactionType::Unicode("🎉".into())
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_added_monitored_role_triggers() {
        let db = configured_db(&[3], Some("✅")).await;
        let platform = FakePlatform::with_history(vec![message(1, MEMBER, 0)]);

        let outcome =
            react_to_introduction(&db.guild_config(), &platform, &change(&[1, 2], &[1, 2, 3]))
                .await
                .unwrap();
        assert!(matches!(outcome, ReactionOutcome::Reacted { .. }));
        assert_eq!(platform.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_unmonitored_role_is_ignored() {
        let db = configured_db(&[5], Some("✅")).await;
        let platform = FakePlatform::with_history(vec![message(1, MEMBER, 0)]);

        let outcome =
            react_to_introduction(&db.guild_config(), &platform, &change(&[1, 2], &[1, 2, 3]))
                .await
                .unwrap();
        assert_eq!(outcome, ReactionOutcome::NoMonitoredRoleAdded);
        assert!(platform.calls().is_empty());
    }

    #[tokio::test]
    async fn test_removed_monitored_role_is_ignored() {
        let db = configured_db(&[3], Some("✅")).await;
        let platform = FakePlatform::with_history(vec![message(1, MEMBER, 0)]);

        let outcome =
            react_to_introduction(&db.guild_config(), &platform, &change(&[1, 2, 3], &[1, 2]))
                .await
                .unwrap();
        assert_eq!(outcome, ReactionOutcome::NoMonitoredRoleAdded);
        assert!(platform.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_channel_stops_silently() {
        let db = BotDatabase::new_memory().await.unwrap();
        let service = db.guild_config();
        service
            .toggle_monitored_role(GUILD, RoleId::new(10))
            .await
            .unwrap();
        service.set_introduction_emote(GUILD, "🎉").await.unwrap();
        let platform = FakePlatform::with_history(vec![message(1, MEMBER, 0)]);

        let outcome = react_to_introduction(&service, &platform, &change(&[], &[10]))
            .await
            .unwrap();
        assert_eq!(outcome, ReactionOutcome::ChannelNotConfigured);
        assert!(platform.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_message() {
        let db = configured_db(&[10], Some("🎉")).await;
        let platform = FakePlatform::with_history(vec![message(1, UserId::new(999), 0)]);

        let outcome = react_to_introduction(&db.guild_config(), &platform, &change(&[], &[10]))
            .await
            .unwrap();
        assert_eq!(outcome, ReactionOutcome::MessageNotFound);
        assert_eq!(
            platform.calls(),
            vec![Call::History(CHANNEL, INTRODUCTION_LOOKBACK)]
        );
    }

    #[tokio::test]
    async fn test_message_outside_lookback_is_not_found() {
        let db = configured_db(&[10], Some("🎉")).await;
        let mut history = (0..INTRODUCTION_LOOKBACK as u64)
            .map(|i| message(1000 + i, UserId::new(999), 100 - i as i64))
            .collect::<Vec<_>>();
        history.push(message(1, MEMBER, -1000));
        let platform = FakePlatform::with_history(history);

        let outcome = react_to_introduction(&db.guild_config(), &platform, &change(&[], &[10]))
            .await
            .unwrap();
        assert_eq!(outcome, ReactionOutcome::MessageNotFound);
    }

    #[tokio::test]
    async fn test_missing_emote() {
        let db = configured_db(&[10], None).await;
        let platform = FakePlatform::with_history(vec![message(1, MEMBER, 0)]);

        let outcome = react_to_introduction(&db.guild_config(), &platform, &change(&[], &[10]))
            .await
            .unwrap();
        assert_eq!(outcome, ReactionOutcome::EmoteNotConfigured);
        assert_eq!(
            platform.calls(),
            vec![Call::History(CHANNEL, INTRODUCTION_LOOKBACK)]
        );
    }

    #[tokio::test]
    async fn test_invalid_emote_is_an_error() {
        let db = configured_db(&[10], Some("<:broken")).await;
        let platform = FakePlatform::with_history(vec![message(1, MEMBER, 0)]);

        let result =
            react_to_introduction(&db.guild_config(), &platform, &change(&[], &[10])).await;
        assert!(matches!(result, Err(BotError::InvalidEmote { .. })));
        assert_eq!(
            platform.calls(),
            vec![Call::History(CHANNEL, INTRODUCTION_LOOKBACK)]
        );
    }

    #[test]
    fn test_latest_message_by() {
        let member = UserId::new(1);
        let other = UserId::new(2);
        // oldest first, the newest of the member's messages must still win
        let history = vec![
            message(10, member, 0),
            message(11, member, 3),
            message(12, other, 9),
        ];
        assert_eq!(
            latest_message_by(history.clone(), member).map(|m| m.id),
            Some(MessageId::new(11))
        );
        assert_eq!(
            latest_message_by(history.into_iter().rev(), member).map(|m| m.id),
            Some(MessageId::new(11))
        );
        // same second: the later snowflake wins
        let tied = vec![message(21, member, 0), message(20, member, 0)];
        assert_eq!(
            latest_message_by(tied, member).map(|m| m.id),
            Some(MessageId::new(21))
        );
        assert_eq!(latest_message_by(Vec::new(), member), None);
    }

    #[test]
    fn test_parse_emote() {
        assert_eq!(
            parse_emote("🎉").unwrap(),
            ReactionType::Unicode("🎉".into())
        );
        assert!(matches!(
            parse_emote("<:wave:123456789>").unwrap(),
            ReactionType::Custom { id, .. } if id == EmojiId::new(123456789)
        ));
        assert!(parse_emote("").is_err());
        assert!(parse_emote("   ").is_err());
        assert!(parse_emote("<:wave>").is_err());
    }
}
