//! Transitions applied to an embedded post copy.
//!
//! A `PostUpdate` is data rather than a closure so that the exact same
//! change can be handed to the primary and then the mirror collection, and
//! so that stores can apply it while holding their per-document lock.

use serde::{Deserialize, Serialize};

use super::comment::Comment;
use super::post::Post;
use super::votes::VoteTransition;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PostUpdate {
    /// Vote on the post itself.
    Vote(VoteTransition),
    /// Replace the post content.
    SetContent(String),
    /// Append a new comment.
    PushComment(Comment),
    /// Replace the whole comment list, computed from a loaded copy.
    SetComments(Vec<Comment>),
}

impl PostUpdate {
    pub fn apply(&self, post: &mut Post) {
        match self {
            PostUpdate::Vote(transition) => post.votes.apply(transition),
            PostUpdate::SetContent(content) => post.content.clone_from(content),
            PostUpdate::PushComment(comment) => {
                if post.comment(comment.id).is_none() {
                    post.comments.push(comment.clone());
                }
            }
            PostUpdate::SetComments(comments) => post.comments.clone_from(comments),
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            PostUpdate::Vote(_) => "vote",
            PostUpdate::SetContent(_) => "set_content",
            PostUpdate::PushComment(_) => "push_comment",
            PostUpdate::SetComments(_) => "set_comments",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VoteDirection;
    use uuid::Uuid;

    #[test]
    fn test_push_comment_is_add_to_set() {
        let mut post = Post::new(Uuid::new_v4(), Uuid::new_v4(), "hello".into());
        let update = PostUpdate::PushComment(Comment::new(Uuid::new_v4(), "hi".into()));

        update.apply(&mut post);
        update.apply(&mut post);

        assert_eq!(post.comments.len(), 1);
    }

    #[test]
    fn test_same_update_yields_same_copies() {
        let original = Post::new(Uuid::new_v4(), Uuid::new_v4(), "hello".into());
        let mut primary = original.clone();
        let mut mirror = original;

        let transition = primary
            .votes
            .transition(Uuid::new_v4(), VoteDirection::Up)
            .unwrap();
        let update = PostUpdate::Vote(transition);
        update.apply(&mut primary);
        update.apply(&mut mirror);

        assert_eq!(primary, mirror);
        assert_eq!(primary.votes.up_votes(), 1);
    }
}
