//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A user's public summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub karma: i64,
    pub joined: DateTime<Utc>,
}

/// Issued access token plus the user it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

/// Body of `POST /subreddit` and `PUT /subreddit/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubredditRequest {
    pub name: String,
    pub bio: String,
}

/// Id and name of a subreddit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubredditSummary {
    pub id: Uuid,
    pub name: String,
}

/// Body carrying post or comment text. A missing field is reported the same
/// way as blank text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentRequest {
    #[serde(default)]
    pub content: Option<String>,
}

/// `?page=&limit=` query parameters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// A resolved page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number.
    pub number: usize,
    pub limit: usize,
}

impl PageQuery {
    /// Apply defaults and clamp `limit` to `1..=max_limit`.
    pub fn resolve(self, default_limit: usize, max_limit: usize) -> Page {
        Page {
            number: self.page.unwrap_or(1).max(1),
            limit: self.limit.unwrap_or(default_limit).clamp(1, max_limit.max(1)),
        }
    }
}

impl Page {
    pub fn skip(&self) -> usize {
        (self.number - 1).saturating_mul(self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults_and_clamp() {
        let page = PageQuery::default().resolve(10, 50);
        assert_eq!(page, Page { number: 1, limit: 10 });
        assert_eq!(page.skip(), 0);

        let page = PageQuery {
            page: Some(3),
            limit: Some(500),
        }
        .resolve(10, 50);
        assert_eq!(page.limit, 50);
        assert_eq!(page.skip(), 100);
    }

    #[test]
    fn test_page_zero_is_first_page() {
        let page = PageQuery {
            page: Some(0),
            limit: Some(0),
        }
        .resolve(10, 50);

        assert_eq!(page, Page { number: 1, limit: 1 });
    }
}
