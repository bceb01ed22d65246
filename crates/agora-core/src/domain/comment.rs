use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::votes::Votes;

/// Comment embedded in a post. It has no copy of its own; it is duplicated
/// through its parent post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub publisher: Uuid,
    pub published_at: DateTime<Utc>,
    #[serde(flatten)]
    pub votes: Votes,
}

impl Comment {
    pub fn new(publisher: Uuid, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            publisher,
            published_at: Utc::now(),
            votes: Votes::default(),
        }
    }
}
