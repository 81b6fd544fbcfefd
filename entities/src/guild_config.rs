use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-guild introduction settings. A missing row reads as "nothing configured".
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "guild_config")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub guild_id: i64,
    pub introduction_emote: Option<String>,
    pub introduction_channel: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
