use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::comment::Comment;
use super::votes::Votes;

/// A post, stored as two full copies: one in the author's `User` document
/// and one in the target `Subreddit` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub content: String,
    pub publisher: Uuid,
    pub published_to: Uuid,
    pub published_at: DateTime<Utc>,
    #[serde(flatten)]
    pub votes: Votes,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Post {
    /// Create a new post with a fresh id and zero vote state.
    pub fn new(publisher: Uuid, published_to: Uuid, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            publisher,
            published_to,
            published_at: Utc::now(),
            votes: Votes::default(),
            comments: Vec::new(),
        }
    }

    pub fn comment(&self, id: Uuid) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == id)
    }

    pub fn comment_mut(&mut self, id: Uuid) -> Option<&mut Comment> {
        self.comments.iter_mut().find(|c| c.id == id)
    }
}
