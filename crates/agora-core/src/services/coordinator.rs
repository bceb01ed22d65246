//! Dual-write propagation between the two copies of a post.
//!
//! Every write goes to the primary copy first. The mirror's parent key is
//! then read off the record the primary write returned, and the identical
//! change is repeated there. The two writes are separate single-document
//! operations; if the second one cannot be made the caller receives
//! `DomainError::PartialPropagation` and the primary write stands.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{ParentKind, Post, PostUpdate};
use crate::error::{DomainError, RepoError};
use crate::ports::PostCollection;

pub struct DualWriteCoordinator {
    users: Arc<dyn PostCollection>,
    subreddits: Arc<dyn PostCollection>,
}

impl DualWriteCoordinator {
    pub fn new(users: Arc<dyn PostCollection>, subreddits: Arc<dyn PostCollection>) -> Self {
        Self { users, subreddits }
    }

    fn collection(&self, kind: ParentKind) -> &dyn PostCollection {
        match kind {
            ParentKind::User => self.users.as_ref(),
            ParentKind::Subreddit => self.subreddits.as_ref(),
        }
    }

    /// Apply `update` to the copy under `primary`/`parent_id`, then to the mirror.
    pub async fn update(
        &self,
        primary: ParentKind,
        parent_id: Uuid,
        post_id: Uuid,
        update: &PostUpdate,
    ) -> Result<Post, DomainError> {
        let updated = self
            .collection(primary)
            .update_post(parent_id, post_id, update)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))?;

        let mirror = primary.mirror();
        let mirror_parent = mirror.parent_of(&updated);
        let outcome = self
            .collection(mirror)
            .update_post(mirror_parent, post_id, update)
            .await;
        self.settle(outcome.map(|copy| copy.is_some()), mirror, mirror_parent, post_id)?;

        tracing::debug!(
            post_id = %post_id,
            primary = %primary,
            update = update.label(),
            "Post update propagated"
        );
        Ok(updated)
    }

    /// Add a new post to `primary`, then to the mirror keyed by the post itself.
    pub async fn insert(&self, primary: ParentKind, post: Post) -> Result<Post, DomainError> {
        let parent_id = primary.parent_of(&post);
        if !self.collection(primary).push_post(parent_id, post.clone()).await? {
            return Err(DomainError::not_found(primary.entity_type(), parent_id));
        }

        let mirror = primary.mirror();
        let mirror_parent = mirror.parent_of(&post);
        let outcome = self
            .collection(mirror)
            .push_post(mirror_parent, post.clone())
            .await;
        self.settle(outcome, mirror, mirror_parent, post.id)?;

        tracing::info!(post_id = %post.id, subreddit_id = %post.published_to, "Post published");
        Ok(post)
    }

    /// Remove a post from `primary`, then from the mirror.
    pub async fn remove(
        &self,
        primary: ParentKind,
        parent_id: Uuid,
        post_id: Uuid,
    ) -> Result<Post, DomainError> {
        let removed = self
            .collection(primary)
            .pull_post(parent_id, post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))?;

        let mirror = primary.mirror();
        let mirror_parent = mirror.parent_of(&removed);
        let outcome = self
            .collection(mirror)
            .pull_post(mirror_parent, post_id)
            .await;
        self.settle(outcome.map(|copy| copy.is_some()), mirror, mirror_parent, post_id)?;

        tracing::info!(post_id = %post_id, "Post removed");
        Ok(removed)
    }

    fn settle(
        &self,
        outcome: Result<bool, RepoError>,
        mirror: ParentKind,
        mirror_parent: Uuid,
        post_id: Uuid,
    ) -> Result<(), DomainError> {
        let reason = match outcome {
            Ok(true) => return Ok(()),
            Ok(false) => format!("no copy under {mirror} {mirror_parent}"),
            Err(e) => e.to_string(),
        };

        tracing::error!(
            post_id = %post_id,
            mirror = %mirror,
            mirror_parent = %mirror_parent,
            reason = %reason,
            "Mirror copy diverged from primary"
        );

        Err(DomainError::PartialPropagation {
            entity_type: "Post",
            id: post_id,
            mirror,
            reason,
        })
    }
}
