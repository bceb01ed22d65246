//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use agora_core::domain::{Subreddit, User};
use agora_core::error::RepoError;
use agora_core::ports::{SubredditRepository, SubscriptionChange, UserRepository};

use super::entity::subreddit::{self, Entity as SubredditEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{DocumentEntity, PostgresCollection, query_err};

/// PostgreSQL user collection.
pub type PostgresUserRepository = PostgresCollection<UserEntity>;

/// PostgreSQL subreddit collection.
pub type PostgresSubredditRepository = PostgresCollection<SubredditEntity>;

fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if local.len() > 1 => format!("{}***@{}", &local[..1], domain),
        Some((_, domain)) => format!("***@{domain}"),
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        UserEntity::find()
            .filter(user::Column::Email.eq(email.to_lowercase()))
            .one(&self.db)
            .await
            .map_err(query_err)?
            .map(UserEntity::decode)
            .transpose()
    }

    async fn create(&self, user: User) -> Result<Option<User>, RepoError> {
        // The unique index on `email` settles concurrent registrations.
        match UserEntity::encode(&user)?.insert(&self.db).await.map_err(query_err) {
            Ok(model) => UserEntity::decode(model).map(Some),
            Err(RepoError::Constraint(msg)) => {
                tracing::debug!(user_email = %mask_email(&user.email), %msg, "Email already registered");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn add_subscription(&self, user_id: Uuid, subreddit_id: Uuid) -> Result<bool, RepoError> {
        let found = self
            .modify(user_id, |user| {
                if user.subscribed_to.contains(&subreddit_id) {
                    return ((), false);
                }
                user.subscribed_to.push(subreddit_id);
                ((), true)
            })
            .await?;
        Ok(found.is_some())
    }

    async fn remove_subscription(
        &self,
        user_id: Uuid,
        subreddit_id: Uuid,
    ) -> Result<bool, RepoError> {
        let found = self
            .modify(user_id, |user| {
                let before = user.subscribed_to.len();
                user.subscribed_to.retain(|s| *s != subreddit_id);
                ((), user.subscribed_to.len() != before)
            })
            .await?;
        Ok(found.is_some())
    }
}

impl PostgresSubredditRepository {
    async fn change_subscription(
        &self,
        id: Uuid,
        change: impl FnOnce(&mut Subreddit) -> bool + Send,
    ) -> Result<SubscriptionChange, RepoError> {
        let outcome = self
            .modify(id, |subreddit| {
                let changed = change(subreddit);
                ((changed, subreddit.clone()), changed)
            })
            .await?;

        Ok(match outcome {
            Some((true, subreddit)) => SubscriptionChange::Changed(subreddit),
            Some((false, subreddit)) => SubscriptionChange::Unchanged(subreddit),
            None => SubscriptionChange::Missing,
        })
    }
}

#[async_trait]
impl SubredditRepository for PostgresSubredditRepository {
    async fn list(&self, skip: usize, limit: usize) -> Result<(Vec<Subreddit>, usize), RepoError> {
        let total = SubredditEntity::find()
            .count(&self.db)
            .await
            .map_err(query_err)?;

        let rows = SubredditEntity::find()
            .order_by_asc(subreddit::Column::CreatedAt)
            .offset(skip as u64)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        let page = rows
            .into_iter()
            .map(SubredditEntity::decode)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((page, total as usize))
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Subreddit>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        SubredditEntity::find()
            .filter(subreddit::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(subreddit::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?
            .into_iter()
            .map(SubredditEntity::decode)
            .collect()
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: String,
        bio: String,
    ) -> Result<Option<Subreddit>, RepoError> {
        self.modify(id, move |subreddit| {
            subreddit.name = name;
            subreddit.bio = bio;
            (subreddit.clone(), true)
        })
        .await
    }

    async fn subscribe(&self, id: Uuid, user_id: Uuid) -> Result<SubscriptionChange, RepoError> {
        self.change_subscription(id, |s| s.add_subscriber(user_id))
            .await
    }

    async fn unsubscribe(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<SubscriptionChange, RepoError> {
        self.change_subscription(id, |s| s.remove_subscriber(user_id))
            .await
    }
}
