//! User entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use agora_core::domain::User;
use agora_core::error::RepoError;

use super::{from_json, to_json};
use crate::database::postgres_base::DocumentEntity;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub karma: i64,
    pub joined: DateTimeWithTimeZone,
    #[sea_orm(column_type = "JsonBinary")]
    pub subscribed_to: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub posts_published: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl DocumentEntity for Entity {
    type Doc = User;

    fn decode(model: Model) -> Result<User, RepoError> {
        Ok(User {
            id: model.id,
            name: model.name,
            email: model.email,
            password_hash: model.password_hash,
            karma: model.karma,
            joined: model.joined.into(),
            subscribed_to: from_json("subscribed_to", model.subscribed_to)?,
            posts_published: from_json("posts_published", model.posts_published)?,
        })
    }

    fn encode(user: &User) -> Result<ActiveModel, RepoError> {
        Ok(ActiveModel {
            id: Set(user.id),
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            karma: Set(user.karma),
            joined: Set(user.joined.into()),
            subscribed_to: Set(to_json(&user.subscribed_to)?),
            posts_published: Set(to_json(&user.posts_published)?),
        })
    }
}
