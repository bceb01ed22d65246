//! Subreddit entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use agora_core::domain::Subreddit;
use agora_core::error::RepoError;

use super::{from_json, to_json};
use crate::database::postgres_base::DocumentEntity;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "subreddits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub bio: String,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub subscriptions: i32,
    #[sea_orm(column_type = "JsonBinary")]
    pub subscribers: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub posts_published: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl DocumentEntity for Entity {
    type Doc = Subreddit;

    fn decode(model: Model) -> Result<Subreddit, RepoError> {
        let subscribers: Vec<Uuid> = from_json("subscribers", model.subscribers)?;
        Ok(Subreddit {
            id: model.id,
            name: model.name,
            bio: model.bio,
            created_by: model.created_by,
            created_at: model.created_at.into(),
            // Derived from the set, never trusted from the column.
            subscriptions: subscribers.len() as u32,
            subscribers,
            posts_published: from_json("posts_published", model.posts_published)?,
        })
    }

    fn encode(subreddit: &Subreddit) -> Result<ActiveModel, RepoError> {
        Ok(ActiveModel {
            id: Set(subreddit.id),
            name: Set(subreddit.name.clone()),
            bio: Set(subreddit.bio.clone()),
            created_by: Set(subreddit.created_by),
            created_at: Set(subreddit.created_at.into()),
            subscriptions: Set(subreddit.subscribers.len() as i32),
            subscribers: Set(to_json(&subreddit.subscribers)?),
            posts_published: Set(to_json(&subreddit.posts_published)?),
        })
    }
}
