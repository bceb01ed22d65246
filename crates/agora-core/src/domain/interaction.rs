//! Read-side projection of a viewer's votes.
//!
//! Interaction flags are never stored. They are derived from voter-set
//! membership every time records are returned to a viewer.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::comment::Comment;
use super::post::Post;
use super::votes::Votes;

/// Whether the viewer currently up- or downvotes a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub is_up_voted: bool,
    pub is_down_voted: bool,
}

impl Interaction {
    pub fn of(votes: &Votes, viewer: Uuid) -> Self {
        Self {
            is_up_voted: votes.has_up_voted(viewer),
            is_down_voted: votes.has_down_voted(viewer),
        }
    }
}

/// A comment as seen by one viewer.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub interaction: Interaction,
}

/// A post as seen by one viewer; embedded comments are projected too.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: Uuid,
    pub content: String,
    pub publisher: Uuid,
    pub published_to: Uuid,
    pub published_at: DateTime<Utc>,
    #[serde(flatten)]
    pub votes: Votes,
    pub comments: Vec<CommentView>,
    pub interaction: Interaction,
}

/// Records that can be annotated for a viewer.
pub trait Project {
    type View: Serialize;

    fn project(self, viewer: Uuid) -> Self::View;
}

impl Project for Comment {
    type View = CommentView;

    fn project(self, viewer: Uuid) -> CommentView {
        let interaction = Interaction::of(&self.votes, viewer);
        CommentView {
            comment: self,
            interaction,
        }
    }
}

impl Project for Post {
    type View = PostView;

    fn project(self, viewer: Uuid) -> PostView {
        let interaction = Interaction::of(&self.votes, viewer);
        PostView {
            id: self.id,
            content: self.content,
            publisher: self.publisher,
            published_to: self.published_to,
            published_at: self.published_at,
            votes: self.votes,
            comments: self
                .comments
                .into_iter()
                .map(|c| c.project(viewer))
                .collect(),
            interaction,
        }
    }
}

/// One record or many; the projector always returns a sequence.
#[derive(Debug, Clone)]
pub enum Records<T> {
    One(T),
    Many(Vec<T>),
}

impl From<Post> for Records<Post> {
    fn from(post: Post) -> Self {
        Records::One(post)
    }
}

impl From<Vec<Post>> for Records<Post> {
    fn from(posts: Vec<Post>) -> Self {
        Records::Many(posts)
    }
}

impl From<Comment> for Records<Comment> {
    fn from(comment: Comment) -> Self {
        Records::One(comment)
    }
}

impl From<Vec<Comment>> for Records<Comment> {
    fn from(comments: Vec<Comment>) -> Self {
        Records::Many(comments)
    }
}

/// Annotate `records` with the interaction of `viewer`.
pub fn project<T: Project>(records: impl Into<Records<T>>, viewer: Uuid) -> Vec<T::View> {
    let records = match records.into() {
        Records::One(record) => vec![record],
        Records::Many(records) => records,
    };

    records.into_iter().map(|r| r.project(viewer)).collect()
}
