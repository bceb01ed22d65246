use chrono::Utc;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};
use serde_json::json;
use uuid::Uuid;

use agora_core::domain::{Post, PostUpdate, Subreddit, User, VoteDirection};
use agora_core::error::RepoError;
use agora_core::ports::{BaseRepository, PostCollection, UserRepository};

use super::entity::{subreddit, user};
use super::postgres_repo::{PostgresSubredditRepository, PostgresUserRepository};
use super::postgres_base::DocumentEntity;

fn subreddit_row(id: Uuid, posts: &[Post]) -> subreddit::Model {
    subreddit::Model {
        id,
        name: "rustaceans".to_owned(),
        bio: "crabs only".to_owned(),
        created_by: Uuid::new_v4(),
        created_at: Utc::now().into(),
        subscriptions: 0,
        subscribers: json!([]),
        posts_published: serde_json::to_value(posts).unwrap(),
    }
}

#[tokio::test]
async fn test_find_subreddit_decodes_embedded_posts() {
    let id = Uuid::new_v4();
    let post = Post::new(Uuid::new_v4(), id, "hello".into());

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![subreddit_row(id, std::slice::from_ref(&post))]])
        .into_connection();
    let repo = PostgresSubredditRepository::new(db);

    let found: Option<Subreddit> = repo.find_by_id(id).await.unwrap();

    let found = found.unwrap();
    assert_eq!(found.posts_published, vec![post]);
}

#[tokio::test]
async fn test_update_post_writes_inside_transaction() {
    let id = Uuid::new_v4();
    let post = Post::new(Uuid::new_v4(), id, "hello".into());
    let voter = Uuid::new_v4();
    let transition = post.votes.transition(voter, VoteDirection::Up).unwrap();
    let row = subreddit_row(id, std::slice::from_ref(&post));

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![row.clone()], vec![row]])
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let repo = PostgresSubredditRepository::new(db);

    let updated = repo
        .update_post(id, post.id, &PostUpdate::Vote(transition))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.votes.up_votes(), 1);
    assert!(updated.votes.has_up_voted(voter));
}

#[tokio::test]
async fn test_missing_parent_is_not_an_error() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<subreddit::Model>::new()])
        .into_connection();
    let repo = PostgresSubredditRepository::new(db);

    let pushed = repo
        .push_post(Uuid::new_v4(), Post::new(Uuid::new_v4(), Uuid::new_v4(), "x".into()))
        .await
        .unwrap();

    assert!(!pushed);
}

#[test]
fn test_decode_rejects_malformed_posts_column() {
    let mut row = subreddit_row(Uuid::new_v4(), &[]);
    row.posts_published = json!({ "not": "a list" });

    let result = subreddit::Entity::decode(row);

    assert!(matches!(result, Err(RepoError::Corrupt(msg)) if msg.starts_with("posts_published")));
}

#[test]
fn test_decode_derives_subscription_counter() {
    let mut row = subreddit_row(Uuid::new_v4(), &[]);
    row.subscriptions = 42;
    row.subscribers = json!([Uuid::new_v4(), Uuid::new_v4()]);

    let subreddit = subreddit::Entity::decode(row).unwrap();

    assert_eq!(subreddit.subscriptions, 2);
}

fn user_row(user: &User) -> user::Model {
    user::Model {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        password_hash: user.password_hash.clone(),
        karma: user.karma,
        joined: user.joined.into(),
        subscribed_to: json!([]),
        posts_published: json!([]),
    }
}

#[tokio::test]
async fn test_create_user_inserts_row() {
    let user = User::new("alice".into(), "alice@example.com".into(), "hash".into());

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![user_row(&user)]])
        .into_connection();
    let repo = PostgresUserRepository::new(db);

    let created = repo.create(user.clone()).await.unwrap();

    assert_eq!(created.map(|u| u.id), Some(user.id));
}

#[tokio::test]
async fn test_create_user_with_taken_email_is_none() {
    let user = User::new("alice".into(), "alice@example.com".into(), "hash".into());

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors(vec![DbErr::Custom(
            "duplicate key value violates unique constraint \"users_email_key\"".to_owned(),
        )])
        .into_connection();
    let repo = PostgresUserRepository::new(db);

    let created = repo.create(user).await.unwrap();

    assert!(created.is_none());
}
