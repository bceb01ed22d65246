//! Parent documents that embed post copies.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::post::Post;

/// Which collection a post copy lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParentKind {
    User,
    Subreddit,
}

impl ParentKind {
    /// The collection holding the other copy of the same post.
    pub fn mirror(self) -> Self {
        match self {
            ParentKind::User => ParentKind::Subreddit,
            ParentKind::Subreddit => ParentKind::User,
        }
    }

    /// Id of the parent document of this kind that holds `post`.
    pub fn parent_of(self, post: &Post) -> Uuid {
        match self {
            ParentKind::User => post.publisher,
            ParentKind::Subreddit => post.published_to,
        }
    }

    pub fn entity_type(self) -> &'static str {
        match self {
            ParentKind::User => "User",
            ParentKind::Subreddit => "Subreddit",
        }
    }
}

impl fmt::Display for ParentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.entity_type())
    }
}

/// A document that embeds an ordered list of post copies.
pub trait Document: Clone + Send + Sync + 'static {
    const KIND: ParentKind;

    fn id(&self) -> Uuid;

    fn posts(&self) -> &[Post];

    fn posts_mut(&mut self) -> &mut Vec<Post>;

    fn post(&self, post_id: Uuid) -> Option<&Post> {
        self.posts().iter().find(|p| p.id == post_id)
    }

    fn post_mut(&mut self, post_id: Uuid) -> Option<&mut Post> {
        self.posts_mut().iter_mut().find(|p| p.id == post_id)
    }
}
