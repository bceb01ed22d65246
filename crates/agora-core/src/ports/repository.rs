use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{ParentKind, Post, PostUpdate, Subreddit, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or replace).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Insert a new user unless the email is already registered, as one
    /// atomic step. `None` if the email is taken.
    async fn create(&self, user: User) -> Result<Option<User>, RepoError>;

    /// Add a subreddit to the user's subscriptions. Returns false if the user is missing.
    async fn add_subscription(&self, user_id: Uuid, subreddit_id: Uuid) -> Result<bool, RepoError>;

    /// Remove a subreddit from the user's subscriptions. Returns false if the user is missing.
    async fn remove_subscription(
        &self,
        user_id: Uuid,
        subreddit_id: Uuid,
    ) -> Result<bool, RepoError>;
}

/// Outcome of a subscribe/unsubscribe request against a subreddit.
#[derive(Debug, Clone)]
pub enum SubscriptionChange {
    Changed(Subreddit),
    Unchanged(Subreddit),
    Missing,
}

/// Subreddit repository.
#[async_trait]
pub trait SubredditRepository: BaseRepository<Subreddit, Uuid> {
    /// One page of subreddits, ordered by creation, plus the total count.
    async fn list(&self, skip: usize, limit: usize) -> Result<(Vec<Subreddit>, usize), RepoError>;

    /// Subreddits matching any of `ids`.
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Subreddit>, RepoError>;

    /// Atomically replace name and bio, leaving embedded posts untouched.
    async fn update_profile(
        &self,
        id: Uuid,
        name: String,
        bio: String,
    ) -> Result<Option<Subreddit>, RepoError>;

    /// Atomically add `user_id` to the subscribers.
    async fn subscribe(&self, id: Uuid, user_id: Uuid) -> Result<SubscriptionChange, RepoError>;

    /// Atomically remove `user_id` from the subscribers.
    async fn unsubscribe(&self, id: Uuid, user_id: Uuid)
    -> Result<SubscriptionChange, RepoError>;
}

/// Slice of the posts embedded in one parent document.
#[derive(Debug, Clone)]
pub struct PostPage {
    pub posts: Vec<Post>,
    /// Number of posts in the parent, not in this page.
    pub total: usize,
}

/// The embedded-post operations of a parent collection (users or subreddits).
///
/// Every method touches a single parent document and is atomic with respect
/// to other calls on the same document. Nothing here spans two documents;
/// keeping the two copies of a post aligned is the caller's job.
#[async_trait]
pub trait PostCollection: Send + Sync {
    /// Which parent collection this is.
    fn kind(&self) -> ParentKind;

    /// Whether the parent document exists.
    async fn parent_exists(&self, parent_id: Uuid) -> Result<bool, RepoError>;

    /// The post copy embedded in `parent_id`, if both exist.
    async fn find_post(&self, parent_id: Uuid, post_id: Uuid) -> Result<Option<Post>, RepoError>;

    /// `limit` posts starting at `skip`. `None` if the parent is missing.
    async fn posts_page(
        &self,
        parent_id: Uuid,
        skip: usize,
        limit: usize,
    ) -> Result<Option<PostPage>, RepoError>;

    /// Append a post copy. Returns false if the parent is missing.
    async fn push_post(&self, parent_id: Uuid, post: Post) -> Result<bool, RepoError>;

    /// Apply `update` to the embedded copy and return it.
    /// `None` if the parent or the post is missing.
    async fn update_post(
        &self,
        parent_id: Uuid,
        post_id: Uuid,
        update: &PostUpdate,
    ) -> Result<Option<Post>, RepoError>;

    /// Remove the embedded copy and return it. `None` if it was not there.
    async fn pull_post(&self, parent_id: Uuid, post_id: Uuid) -> Result<Option<Post>, RepoError>;
}
