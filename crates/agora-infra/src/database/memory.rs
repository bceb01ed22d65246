//! In-memory document store - the default when no database is configured.
//!
//! Each collection is an id-keyed map behind an async `RwLock`, plus the
//! insertion order for listings. Every operation takes the lock once, which
//! gives the same per-document atomicity a document database offers. Data is
//! lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use agora_core::domain::{Document, ParentKind, Post, PostUpdate, Subreddit, User};
use agora_core::error::RepoError;
use agora_core::ports::{
    BaseRepository, PostCollection, PostPage, SubredditRepository, SubscriptionChange,
    UserRepository,
};

struct Documents<D> {
    by_id: HashMap<Uuid, D>,
    order: Vec<Uuid>,
}

impl<D: Document> Documents<D> {
    fn insert(&mut self, doc: D) {
        let id = doc.id();
        if self.by_id.insert(id, doc).is_none() {
            self.order.push(id);
        }
    }

    fn remove(&mut self, id: Uuid) -> Option<D> {
        let doc = self.by_id.remove(&id)?;
        self.order.retain(|o| *o != id);
        Some(doc)
    }

    /// Documents in insertion order.
    fn ordered(&self) -> impl Iterator<Item = &D> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }
}

/// A collection of parent documents, listed in insertion order.
pub struct InMemoryCollection<D: Document> {
    docs: RwLock<Documents<D>>,
}

/// In-memory user collection.
pub type InMemoryUserRepository = InMemoryCollection<User>;

/// In-memory subreddit collection.
pub type InMemorySubredditRepository = InMemoryCollection<Subreddit>;

impl<D: Document> InMemoryCollection<D> {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(Documents {
                by_id: HashMap::new(),
                order: Vec::new(),
            }),
        }
    }
}

impl<D: Document> Default for InMemoryCollection<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<D: Document> BaseRepository<D, Uuid> for InMemoryCollection<D> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<D>, RepoError> {
        Ok(self.docs.read().await.by_id.get(&id).cloned())
    }

    async fn save(&self, entity: D) -> Result<D, RepoError> {
        self.docs.write().await.insert(entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut docs = self.docs.write().await;
        docs.remove(id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl<D: Document> PostCollection for InMemoryCollection<D> {
    fn kind(&self) -> ParentKind {
        D::KIND
    }

    async fn parent_exists(&self, parent_id: Uuid) -> Result<bool, RepoError> {
        Ok(self.docs.read().await.by_id.contains_key(&parent_id))
    }

    async fn find_post(&self, parent_id: Uuid, post_id: Uuid) -> Result<Option<Post>, RepoError> {
        let docs = self.docs.read().await;
        Ok(docs
            .by_id
            .get(&parent_id)
            .and_then(|d| d.post(post_id))
            .cloned())
    }

    async fn posts_page(
        &self,
        parent_id: Uuid,
        skip: usize,
        limit: usize,
    ) -> Result<Option<PostPage>, RepoError> {
        let docs = self.docs.read().await;
        Ok(docs.by_id.get(&parent_id).map(|d| PostPage {
            posts: d.posts().iter().skip(skip).take(limit).cloned().collect(),
            total: d.posts().len(),
        }))
    }

    async fn push_post(&self, parent_id: Uuid, post: Post) -> Result<bool, RepoError> {
        let mut docs = self.docs.write().await;
        let Some(doc) = docs.by_id.get_mut(&parent_id) else {
            return Ok(false);
        };
        if doc.post(post.id).is_none() {
            doc.posts_mut().push(post);
        }
        Ok(true)
    }

    async fn update_post(
        &self,
        parent_id: Uuid,
        post_id: Uuid,
        update: &PostUpdate,
    ) -> Result<Option<Post>, RepoError> {
        let mut docs = self.docs.write().await;
        let post = docs
            .by_id
            .get_mut(&parent_id)
            .and_then(|d| d.post_mut(post_id));

        Ok(post.map(|post| {
            update.apply(post);
            post.clone()
        }))
    }

    async fn pull_post(&self, parent_id: Uuid, post_id: Uuid) -> Result<Option<Post>, RepoError> {
        let mut docs = self.docs.write().await;
        let Some(doc) = docs.by_id.get_mut(&parent_id) else {
            return Ok(None);
        };
        let posts = doc.posts_mut();
        Ok(posts
            .iter()
            .position(|p| p.id == post_id)
            .map(|idx| posts.remove(idx)))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let docs = self.docs.read().await;
        Ok(docs
            .by_id
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create(&self, user: User) -> Result<Option<User>, RepoError> {
        let mut docs = self.docs.write().await;
        if docs
            .by_id
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Ok(None);
        }
        docs.insert(user.clone());
        Ok(Some(user))
    }

    async fn add_subscription(&self, user_id: Uuid, subreddit_id: Uuid) -> Result<bool, RepoError> {
        let mut docs = self.docs.write().await;
        let Some(user) = docs.by_id.get_mut(&user_id) else {
            return Ok(false);
        };
        if !user.subscribed_to.contains(&subreddit_id) {
            user.subscribed_to.push(subreddit_id);
        }
        Ok(true)
    }

    async fn remove_subscription(
        &self,
        user_id: Uuid,
        subreddit_id: Uuid,
    ) -> Result<bool, RepoError> {
        let mut docs = self.docs.write().await;
        let Some(user) = docs.by_id.get_mut(&user_id) else {
            return Ok(false);
        };
        user.subscribed_to.retain(|s| *s != subreddit_id);
        Ok(true)
    }
}

#[async_trait]
impl SubredditRepository for InMemorySubredditRepository {
    async fn list(&self, skip: usize, limit: usize) -> Result<(Vec<Subreddit>, usize), RepoError> {
        let docs = self.docs.read().await;
        let page = docs.ordered().skip(skip).take(limit).cloned().collect();
        Ok((page, docs.by_id.len()))
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Subreddit>, RepoError> {
        let docs = self.docs.read().await;
        Ok(docs.ordered().filter(|s| ids.contains(&s.id)).cloned().collect())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: String,
        bio: String,
    ) -> Result<Option<Subreddit>, RepoError> {
        let mut docs = self.docs.write().await;
        Ok(docs.by_id.get_mut(&id).map(|subreddit| {
            subreddit.name = name;
            subreddit.bio = bio;
            subreddit.clone()
        }))
    }

    async fn subscribe(&self, id: Uuid, user_id: Uuid) -> Result<SubscriptionChange, RepoError> {
        let mut docs = self.docs.write().await;
        let Some(subreddit) = docs.by_id.get_mut(&id) else {
            return Ok(SubscriptionChange::Missing);
        };
        Ok(if subreddit.add_subscriber(user_id) {
            SubscriptionChange::Changed(subreddit.clone())
        } else {
            SubscriptionChange::Unchanged(subreddit.clone())
        })
    }

    async fn unsubscribe(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<SubscriptionChange, RepoError> {
        let mut docs = self.docs.write().await;
        let Some(subreddit) = docs.by_id.get_mut(&id) else {
            return Ok(SubscriptionChange::Missing);
        };
        Ok(if subreddit.remove_subscriber(user_id) {
            SubscriptionChange::Changed(subreddit.clone())
        } else {
            SubscriptionChange::Unchanged(subreddit.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::domain::{Comment, VoteDirection};

    async fn subreddit_with_post() -> (InMemorySubredditRepository, Subreddit, Post) {
        let repo = InMemorySubredditRepository::new();
        let subreddit = Subreddit::new("rustaceans".into(), "crabs only".into(), Uuid::new_v4());
        let post = Post::new(subreddit.created_by, subreddit.id, "first".into());
        repo.save(subreddit.clone()).await.unwrap();
        assert!(repo.push_post(subreddit.id, post.clone()).await.unwrap());
        (repo, subreddit, post)
    }

    #[tokio::test]
    async fn test_find_post_requires_matching_parent() {
        let (repo, subreddit, post) = subreddit_with_post().await;

        assert!(repo.find_post(subreddit.id, post.id).await.unwrap().is_some());
        assert!(repo.find_post(Uuid::new_v4(), post.id).await.unwrap().is_none());
        assert!(
            repo.find_post(subreddit.id, Uuid::new_v4())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_update_post_returns_updated_copy() {
        let (repo, subreddit, post) = subreddit_with_post().await;
        let transition = post
            .votes
            .transition(Uuid::new_v4(), VoteDirection::Down)
            .unwrap();

        let updated = repo
            .update_post(subreddit.id, post.id, &PostUpdate::Vote(transition))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.votes.down_votes(), 1);
        let stored = repo.find_post(subreddit.id, post.id).await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_posts_page_slices_and_counts() {
        let (repo, subreddit, _) = subreddit_with_post().await;
        for i in 0..4 {
            let post = Post::new(Uuid::new_v4(), subreddit.id, format!("post {i}"));
            repo.push_post(subreddit.id, post).await.unwrap();
        }

        let page = repo.posts_page(subreddit.id, 2, 2).await.unwrap().unwrap();

        assert_eq!(page.total, 5);
        assert_eq!(page.posts.len(), 2);
        assert_eq!(page.posts[0].content, "post 1");
        assert!(repo.posts_page(Uuid::new_v4(), 0, 10).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pull_post_removes_only_that_post() {
        let (repo, subreddit, post) = subreddit_with_post().await;
        let mut commented = Post::new(Uuid::new_v4(), subreddit.id, "second".into());
        commented.comments.push(Comment::new(Uuid::new_v4(), "hi".into()));
        repo.push_post(subreddit.id, commented.clone()).await.unwrap();

        let removed = repo.pull_post(subreddit.id, post.id).await.unwrap();

        assert_eq!(removed.map(|p| p.id), Some(post.id));
        assert!(repo.pull_post(subreddit.id, post.id).await.unwrap().is_none());
        assert!(repo.find_post(subreddit.id, commented.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_subscribe_is_idempotent() {
        let (repo, subreddit, _) = subreddit_with_post().await;
        let user = Uuid::new_v4();

        assert!(matches!(
            repo.subscribe(subreddit.id, user).await.unwrap(),
            SubscriptionChange::Changed(s) if s.subscriptions == 1
        ));
        assert!(matches!(
            repo.subscribe(subreddit.id, user).await.unwrap(),
            SubscriptionChange::Unchanged(_)
        ));
        assert!(matches!(
            repo.unsubscribe(Uuid::new_v4(), user).await.unwrap(),
            SubscriptionChange::Missing
        ));
    }

    #[tokio::test]
    async fn test_find_by_email_ignores_case() {
        let repo = InMemoryUserRepository::new();
        let user = User::new("alice".into(), "Alice@Example.com".into(), "hash".into());
        repo.save(user.clone()).await.unwrap();

        let found = repo.find_by_email("alice@example.com").await.unwrap();

        assert_eq!(found.map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn test_create_rejects_taken_email() {
        let repo = InMemoryUserRepository::new();
        let alice = User::new("alice".into(), "alice@example.com".into(), "hash".into());
        let impostor = User::new("alice2".into(), "ALICE@example.com".into(), "hash".into());

        assert!(repo.create(alice.clone()).await.unwrap().is_some());
        assert!(repo.create(impostor.clone()).await.unwrap().is_none());
        assert!(repo.find_by_id(impostor.id).await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_create_admits_one_email_once() {
        let repo = std::sync::Arc::new(InMemoryUserRepository::new());

        let attempts = (0..8).map(|i| {
            let repo = repo.clone();
            tokio::spawn(async move {
                let user = User::new(format!("user{i}"), "same@example.com".into(), "hash".into());
                repo.create(user).await.unwrap().is_some()
            })
        });
        let created = futures::future::join_all(attempts)
            .await
            .into_iter()
            .filter(|r| *r.as_ref().unwrap())
            .count();

        assert_eq!(created, 1);
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order_after_delete() {
        let repo = InMemorySubredditRepository::new();
        let owner = Uuid::new_v4();
        let names = ["first", "second", "third"];
        let mut ids = Vec::new();
        for name in names {
            let subreddit = Subreddit::new(name.into(), "a bio".into(), owner);
            ids.push(subreddit.id);
            repo.save(subreddit).await.unwrap();
        }

        repo.delete(ids[1]).await.unwrap();
        let (page, total) = repo.list(0, 10).await.unwrap();

        assert_eq!(total, 2);
        let listed: Vec<_> = page.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(listed, ["first", "third"]);
    }
}
