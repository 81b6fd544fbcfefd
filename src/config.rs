use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use figment::{
    Figment,
    providers::{Env, Format, Json},
};
use serde::{Deserialize, Serialize};
use serenity::all::{RoleId, UserId};
use snafu::ResultExt;

use crate::error::BotError;

pub const DEFAULT_PREFIX: &str = "?";

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BotCfg {
    pub token: String,
    /// Prefix for text commands, `?` when unset
    #[serde(default)]
    pub prefix: Option<String>,
    /// Holders of any of these roles may change the introduction settings
    #[serde(default)]
    pub moderator_role_ids: HashSet<RoleId>,
    #[serde(default)]
    pub extra_moderator_user_ids: HashSet<UserId>,
    #[serde(default)]
    pub owners: HashSet<UserId>,
    #[serde(skip)]
    pub path: PathBuf,
}

impl BotCfg {
    pub fn read(path: impl AsRef<Path>) -> Result<Self, BotError> {
        Ok(Self {
            path: path.as_ref().to_owned(),
            ..Figment::new()
                .merge(Json::file(path))
                .merge(Env::prefixed("REACT_ON_ROLE_"))
                .extract_lossy()
                .whatever_context::<&str, BotError>("Failed to read bot configuration")?
        })
    }

    pub fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or(DEFAULT_PREFIX)
    }

    pub fn is_moderator(&self, user_id: UserId, roles: &[RoleId]) -> bool {
        self.extra_moderator_user_ids.contains(&user_id)
            || roles.iter().any(|r| self.moderator_role_ids.contains(r))
    }
}
