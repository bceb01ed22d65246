use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::{Document, ParentKind};
use super::post::Post;

/// A community. Holds full copies of every post published to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subreddit {
    pub id: Uuid,
    pub name: String,
    pub bio: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    /// Always equal to `subscribers.len()`.
    pub subscriptions: u32,
    #[serde(default)]
    pub subscribers: Vec<Uuid>,
    #[serde(default)]
    pub posts_published: Vec<Post>,
}

impl Subreddit {
    pub fn new(name: String, bio: String, created_by: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            bio,
            created_by,
            created_at: Utc::now(),
            subscriptions: 0,
            subscribers: Vec::new(),
            posts_published: Vec::new(),
        }
    }

    pub fn is_subscribed(&self, user: Uuid) -> bool {
        self.subscribers.contains(&user)
    }

    /// Add a subscriber. Returns false if the user was already subscribed.
    pub fn add_subscriber(&mut self, user: Uuid) -> bool {
        if self.is_subscribed(user) {
            return false;
        }
        self.subscribers.push(user);
        self.subscriptions = self.subscribers.len() as u32;
        true
    }

    /// Remove a subscriber. Returns false if the user was not subscribed.
    pub fn remove_subscriber(&mut self, user: Uuid) -> bool {
        if !self.is_subscribed(user) {
            return false;
        }
        self.subscribers.retain(|u| *u != user);
        self.subscriptions = self.subscribers.len() as u32;
        true
    }
}

impl Document for Subreddit {
    const KIND: ParentKind = ParentKind::Subreddit;

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
