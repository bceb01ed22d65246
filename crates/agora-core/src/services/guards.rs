//! Existence and ownership checks run before any mutation.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Comment, Post};
use crate::error::DomainError;
use crate::ports::PostCollection;

/// An entity found under its claimed parent, with its author.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    pub entity: T,
    pub author: Uuid,
}

/// Entities that record who published them.
pub trait Authored {
    const ENTITY_TYPE: &'static str;

    fn author(&self) -> Uuid;
}

impl Authored for Post {
    const ENTITY_TYPE: &'static str = "Post";

    fn author(&self) -> Uuid {
        self.publisher
    }
}

impl Authored for Comment {
    const ENTITY_TYPE: &'static str = "Comment";

    fn author(&self) -> Uuid {
        self.publisher
    }
}

/// Require that `requester` authored `entity`.
pub fn authorize<T: Authored>(entity: &T, requester: Uuid) -> Result<(), DomainError> {
    if entity.author() == requester {
        Ok(())
    } else {
        Err(DomainError::Forbidden {
            entity_type: T::ENTITY_TYPE,
        })
    }
}

/// Resolves posts and comments parent-to-child, reporting the first missing
/// level as its own not-found case.
pub struct Guards {
    users: Arc<dyn PostCollection>,
    subreddits: Arc<dyn PostCollection>,
}

impl Guards {
    pub fn new(users: Arc<dyn PostCollection>, subreddits: Arc<dyn PostCollection>) -> Self {
        Self { users, subreddits }
    }

    /// Subreddit must exist.
    pub async fn subreddit_exists(&self, subreddit_id: Uuid) -> Result<(), DomainError> {
        if self.subreddits.parent_exists(subreddit_id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("Subreddit", subreddit_id))
        }
    }

    /// User must exist.
    pub async fn user_exists(&self, user_id: Uuid) -> Result<(), DomainError> {
        if self.users.parent_exists(user_id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("User", user_id))
        }
    }

    /// The subreddit copy of a post.
    pub async fn post_in_subreddit(
        &self,
        subreddit_id: Uuid,
        post_id: Uuid,
    ) -> Result<Resolved<Post>, DomainError> {
        self.subreddit_exists(subreddit_id).await?;
        self.post_in(self.subreddits.as_ref(), subreddit_id, post_id)
            .await
    }

    /// The user copy of a post.
    pub async fn post_of_user(
        &self,
        user_id: Uuid,
        post_id: Uuid,
    ) -> Result<Resolved<Post>, DomainError> {
        self.user_exists(user_id).await?;
        self.post_in(self.users.as_ref(), user_id, post_id).await
    }

    async fn post_in(
        &self,
        collection: &dyn PostCollection,
        parent_id: Uuid,
        post_id: Uuid,
    ) -> Result<Resolved<Post>, DomainError> {
        let post = collection
            .find_post(parent_id, post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))?;

        Ok(Resolved {
            author: post.publisher,
            entity: post,
        })
    }

    /// A comment of an already resolved post.
    pub fn comment_in(post: &Post, comment_id: Uuid) -> Result<Resolved<Comment>, DomainError> {
        let comment = post
            .comment(comment_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Comment", comment_id))?;

        Ok(Resolved {
            author: comment.publisher,
            entity: comment,
        })
    }
}
