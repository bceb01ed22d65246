//! Post and comment interactions: publish, edit, delete, vote.
//!
//! Every mutation of an existing post runs under the post's entity lock:
//! guards resolve the target, the vote state machine (for votes) computes the
//! transition from the primary copy, and the coordinator writes primary then
//! mirror before the lock is released.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{
    AlreadyVoted, Comment, ParentKind, Post, PostUpdate, VoteDirection, validate_content,
};
use crate::error::DomainError;
use crate::ports::{PostCollection, PostPage};

use super::coordinator::DualWriteCoordinator;
use super::guards::{Guards, Resolved, authorize};
use super::locks::EntityLocks;

pub struct InteractionEngine {
    users: Arc<dyn PostCollection>,
    subreddits: Arc<dyn PostCollection>,
    guards: Guards,
    coordinator: DualWriteCoordinator,
    locks: EntityLocks,
}

impl InteractionEngine {
    pub fn new(users: Arc<dyn PostCollection>, subreddits: Arc<dyn PostCollection>) -> Self {
        Self {
            guards: Guards::new(users.clone(), subreddits.clone()),
            coordinator: DualWriteCoordinator::new(users.clone(), subreddits.clone()),
            locks: EntityLocks::new(),
            users,
            subreddits,
        }
    }

    pub fn guards(&self) -> &Guards {
        &self.guards
    }

    // ── Reads ───────────────────────────────────────────────────────────────

    pub async fn user_posts(
        &self,
        user_id: Uuid,
        skip: usize,
        limit: usize,
    ) -> Result<PostPage, DomainError> {
        self.users
            .posts_page(user_id, skip, limit)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))
    }

    pub async fn user_post(&self, user_id: Uuid, post_id: Uuid) -> Result<Post, DomainError> {
        Ok(self.guards.post_of_user(user_id, post_id).await?.entity)
    }

    pub async fn subreddit_posts(
        &self,
        subreddit_id: Uuid,
        skip: usize,
        limit: usize,
    ) -> Result<PostPage, DomainError> {
        self.subreddits
            .posts_page(subreddit_id, skip, limit)
            .await?
            .ok_or_else(|| DomainError::not_found("Subreddit", subreddit_id))
    }

    pub async fn subreddit_post(
        &self,
        subreddit_id: Uuid,
        post_id: Uuid,
    ) -> Result<Post, DomainError> {
        Ok(self
            .guards
            .post_in_subreddit(subreddit_id, post_id)
            .await?
            .entity)
    }

    pub async fn comments(
        &self,
        subreddit_id: Uuid,
        post_id: Uuid,
    ) -> Result<Vec<Comment>, DomainError> {
        Ok(self.subreddit_post(subreddit_id, post_id).await?.comments)
    }

    // ── Posts ───────────────────────────────────────────────────────────────

    /// Publish a post to a subreddit and to the author's profile.
    pub async fn publish_post(
        &self,
        author: Uuid,
        subreddit_id: Uuid,
        content: Option<&str>,
    ) -> Result<Post, DomainError> {
        let content = validate_content(content, "post")?;
        self.guards.subreddit_exists(subreddit_id).await?;
        self.guards.user_exists(author).await?;

        let post = Post::new(author, subreddit_id, content);
        self.coordinator.insert(ParentKind::Subreddit, post).await
    }

    /// Edit the content of one of the caller's own posts.
    pub async fn edit_post(
        &self,
        author: Uuid,
        post_id: Uuid,
        content: Option<&str>,
    ) -> Result<Post, DomainError> {
        let content = validate_content(content, "post")?;
        let _lock = self.locks.acquire(post_id).await;

        self.guards.post_of_user(author, post_id).await?;
        self.coordinator
            .update(
                ParentKind::User,
                author,
                post_id,
                &PostUpdate::SetContent(content),
            )
            .await
    }

    /// Delete one of the caller's own posts from both collections.
    pub async fn delete_post(&self, author: Uuid, post_id: Uuid) -> Result<Post, DomainError> {
        let _lock = self.locks.acquire(post_id).await;

        self.guards.post_of_user(author, post_id).await?;
        self.coordinator
            .remove(ParentKind::User, author, post_id)
            .await
    }

    /// Vote on a post addressed through its subreddit.
    pub async fn vote_post(
        &self,
        voter: Uuid,
        subreddit_id: Uuid,
        post_id: Uuid,
        direction: VoteDirection,
    ) -> Result<Post, DomainError> {
        let _lock = self.locks.acquire(post_id).await;

        let Resolved { entity: post, .. } = self
            .guards
            .post_in_subreddit(subreddit_id, post_id)
            .await?;
        let transition = post
            .votes
            .transition(voter, direction)
            .map_err(|AlreadyVoted(direction)| DomainError::AlreadyVoted {
                entity_type: "Post",
                direction,
            })?;

        let updated = self
            .coordinator
            .update(
                ParentKind::Subreddit,
                subreddit_id,
                post_id,
                &PostUpdate::Vote(transition),
            )
            .await?;

        tracing::info!(
            post_id = %post_id,
            user_id = %voter,
            direction = %direction,
            up_votes = updated.votes.up_votes(),
            down_votes = updated.votes.down_votes(),
            "Post voted"
        );
        Ok(updated)
    }

    // ── Comments ────────────────────────────────────────────────────────────

    /// Add a comment to a post; returns the stored comment.
    pub async fn add_comment(
        &self,
        author: Uuid,
        subreddit_id: Uuid,
        post_id: Uuid,
        content: Option<&str>,
    ) -> Result<Comment, DomainError> {
        let content = validate_content(content, "comment")?;
        let _lock = self.locks.acquire(post_id).await;

        self.guards
            .post_in_subreddit(subreddit_id, post_id)
            .await?;

        let comment = Comment::new(author, content);
        let updated = self
            .coordinator
            .update(
                ParentKind::Subreddit,
                subreddit_id,
                post_id,
                &PostUpdate::PushComment(comment.clone()),
            )
            .await?;

        tracing::info!(post_id = %post_id, comment_id = %comment.id, "Comment added");
        Ok(updated.comment(comment.id).cloned().unwrap_or(comment))
    }

    /// Edit the caller's own comment; returns the updated post.
    pub async fn edit_comment(
        &self,
        requester: Uuid,
        subreddit_id: Uuid,
        post_id: Uuid,
        comment_id: Uuid,
        content: Option<&str>,
    ) -> Result<Post, DomainError> {
        let content = validate_content(content, "comment")?;

        self.rewrite_comments(subreddit_id, post_id, comment_id, |comments| {
            let comment = find_comment(comments, comment_id)?;
            authorize(comment, requester)?;
            comment.content = content;
            comment.published_at = Utc::now();
            Ok(())
        })
        .await
    }

    /// Delete the caller's own comment; returns the updated post.
    pub async fn delete_comment(
        &self,
        requester: Uuid,
        subreddit_id: Uuid,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Post, DomainError> {
        self.rewrite_comments(subreddit_id, post_id, comment_id, |comments| {
            authorize(find_comment(comments, comment_id)?, requester)?;
            comments.retain(|c| c.id != comment_id);
            Ok(())
        })
        .await
    }

    /// Vote on a comment; returns the updated post.
    pub async fn vote_comment(
        &self,
        voter: Uuid,
        subreddit_id: Uuid,
        post_id: Uuid,
        comment_id: Uuid,
        direction: VoteDirection,
    ) -> Result<Post, DomainError> {
        let updated = self
            .rewrite_comments(subreddit_id, post_id, comment_id, |comments| {
                let comment = find_comment(comments, comment_id)?;
                let transition = comment.votes.transition(voter, direction).map_err(
                    |AlreadyVoted(direction)| DomainError::AlreadyVoted {
                        entity_type: "Comment",
                        direction,
                    },
                )?;
                comment.votes.apply(&transition);
                Ok(())
            })
            .await?;

        tracing::info!(
            post_id = %post_id,
            comment_id = %comment_id,
            user_id = %voter,
            direction = %direction,
            "Comment voted"
        );
        Ok(updated)
    }

    /// Load the subreddit copy of a post, let `change` rewrite its comment
    /// list, and write the whole list back to both copies.
    async fn rewrite_comments<F>(
        &self,
        subreddit_id: Uuid,
        post_id: Uuid,
        comment_id: Uuid,
        change: F,
    ) -> Result<Post, DomainError>
    where
        F: FnOnce(&mut Vec<Comment>) -> Result<(), DomainError>,
    {
        let _lock = self.locks.acquire(post_id).await;

        let Resolved { entity: post, .. } = self
            .guards
            .post_in_subreddit(subreddit_id, post_id)
            .await?;
        Guards::comment_in(&post, comment_id)?;

        let mut comments = post.comments;
        change(&mut comments)?;

        self.coordinator
            .update(
                ParentKind::Subreddit,
                subreddit_id,
                post_id,
                &PostUpdate::SetComments(comments),
            )
            .await
    }
}

fn find_comment(comments: &mut [Comment], comment_id: Uuid) -> Result<&mut Comment, DomainError> {
    comments
        .iter_mut()
        .find(|c| c.id == comment_id)
        .ok_or_else(|| DomainError::not_found("Comment", comment_id))
}
