use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::{Document, ParentKind};
use super::post::Post;

/// User entity. Holds full copies of every post the user published.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub karma: i64,
    pub joined: DateTime<Utc>,
    #[serde(default)]
    pub subscribed_to: Vec<Uuid>,
    #[serde(default)]
    pub posts_published: Vec<Post>,
}

impl User {
    /// Create a new user with generated ID and the starting karma.
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            karma: 1,
            joined: Utc::now(),
            subscribed_to: Vec::new(),
            posts_published: Vec::new(),
        }
    }
}

impl Document for User {
    const KIND: ParentKind = ParentKind::User;

    fn id(&self) -> Uuid {
        self.id
    }

    fn posts(&self) -> &[Post] {
        &self.posts_published
    }

    fn posts_mut(&mut self) -> &mut Vec<Post> {
        &mut self.posts_published
    }
}
