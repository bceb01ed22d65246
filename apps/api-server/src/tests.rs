//! HTTP scenario tests against the in-memory store.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test};
use serde_json::{Value, json};

use agora_infra::{Argon2PasswordService, JwtConfig, JwtTokenService};

use crate::config::PaginationConfig;
use crate::configure_app;
use crate::state::AppState;

pub(crate) fn state() -> AppState {
    let tokens = JwtTokenService::new(JwtConfig {
        secret: "test-secret".to_string(),
        expiration_hours: 1,
        issuer: "agora-test".to_string(),
    });
    let passwords = Argon2PasswordService::with_params(1024, 1, 1).unwrap();
    AppState::in_memory(Arc::new(tokens), Arc::new(passwords), PaginationConfig::default())
}

macro_rules! app {
    () => {
        test::init_service(App::new().configure(configure_app(state()))).await
    };
}

/// Send a request and return status and JSON body (`Null` when empty).
macro_rules! send {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let bytes = test::read_body(resp).await;
        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }};
}

/// Register a user and return `(token, user_id)`.
macro_rules! register {
    ($app:expr, $name:expr) => {{
        let (status, body) = send!(
            $app,
            test::TestRequest::post()
                .uri("/api/user/register")
                .set_json(json!({
                    "name": $name,
                    "email": format!("{}@example.com", $name),
                    "password": "hunter22"
                }))
        );
        assert_eq!(status, StatusCode::CREATED, "{body}");
        (
            body["accessToken"].as_str().unwrap().to_string(),
            body["user"]["id"].as_str().unwrap().to_string(),
        )
    }};
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

fn get(uri: &str, token: &str) -> test::TestRequest {
    test::TestRequest::get().uri(uri).insert_header(bearer(token))
}

fn post(uri: &str, token: &str) -> test::TestRequest {
    test::TestRequest::post().uri(uri).insert_header(bearer(token))
}

fn put(uri: &str, token: &str) -> test::TestRequest {
    test::TestRequest::put().uri(uri).insert_header(bearer(token))
}

fn delete(uri: &str, token: &str) -> test::TestRequest {
    test::TestRequest::delete().uri(uri).insert_header(bearer(token))
}

/// Create a subreddit as `token` and publish one post in it.
macro_rules! subreddit_with_post {
    ($app:expr, $token:expr) => {{
        let (status, subreddit) = send!(
            $app,
            post("/api/subreddit", $token)
                .set_json(json!({ "name": "rustaceans", "bio": "crabs only" }))
        );
        assert_eq!(status, StatusCode::CREATED, "{subreddit}");
        let subreddit_id = subreddit["id"].as_str().unwrap().to_string();

        let (status, post_body) = send!(
            $app,
            post(&format!("/api/post/{subreddit_id}"), $token)
                .set_json(json!({ "content": "hello world" }))
        );
        assert_eq!(status, StatusCode::CREATED, "{post_body}");
        (subreddit_id, post_body["id"].as_str().unwrap().to_string())
    }};
}

#[actix_web::test]
async fn test_health_check() {
    let app = app!();

    let (status, body) = send!(app, test::TestRequest::get().uri("/api/health"));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_register_login_and_profile() {
    let app = app!();
    let (token, user_id) = register!(app, "alice");

    let (status, me) = send!(app, get("/api/user/me", &token));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], user_id);
    assert_eq!(me["karma"], 1);
    assert!(me.get("passwordHash").is_none());

    let (status, _) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/user/me")
            .insert_header(("x-auth-token", token.clone()))
    );
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/auth")
            .set_json(json!({ "email": "alice@example.com", "password": "hunter22" }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tokenType"], "Bearer");

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/auth")
            .set_json(json!({ "email": "alice@example.com", "password": "wrong!" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_duplicate_registration_conflicts() {
    let app = app!();
    register!(app, "alice");

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/user/register")
            .set_json(json!({
                "name": "alice2",
                "email": "ALICE@example.com",
                "password": "hunter22"
            }))
    );

    assert_eq!(status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_protected_routes_need_a_token() {
    let app = app!();

    let (status, body) = send!(app, test::TestRequest::get().uri("/api/post/user"));

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);
}

#[actix_web::test]
async fn test_vote_flow_and_repeat_rejection() {
    let app = app!();
    let (alice, _) = register!(app, "alice");
    let (bob, bob_id) = register!(app, "bob");
    let (subreddit_id, post_id) = subreddit_with_post!(app, &alice);
    let upvote = format!("/api/post/upvote/{subreddit_id}/{post_id}");
    let downvote = format!("/api/post/downvote/{subreddit_id}/{post_id}");

    let (status, voted) = send!(app, post(&upvote, &bob));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(voted["upVotes"], 1);
    assert_eq!(voted["usersUpVoted"], json!([bob_id]));
    assert_eq!(voted["interaction"]["isUpVoted"], true);

    let (status, err) = send!(app, post(&upvote, &bob));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["detail"], "post already upvoted");

    let (status, switched) = send!(app, post(&downvote, &bob));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(switched["upVotes"], 0);
    assert_eq!(switched["downVotes"], 1);
    assert_eq!(switched["interaction"]["isDownVoted"], true);

    // The author's copy moved with it.
    let (_, mine) = send!(app, get(&format!("/api/post/user/{post_id}"), &alice));
    assert_eq!(mine["downVotes"], 1);
    assert_eq!(mine["interaction"]["isDownVoted"], false);
}

#[actix_web::test]
async fn test_vote_on_missing_post() {
    let app = app!();
    let (alice, _) = register!(app, "alice");
    let (subreddit_id, _) = subreddit_with_post!(app, &alice);

    let (status, body) = send!(
        app,
        post(
            &format!("/api/post/upvote/{subreddit_id}/{}", uuid::Uuid::new_v4()),
            &alice
        )
    );

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "post not found");
}

#[actix_web::test]
async fn test_malformed_id_is_not_found() {
    let app = app!();
    let (alice, _) = register!(app, "alice");

    let (status, _) = send!(app, get("/api/subreddit/not-an-id", &alice));

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_post_listing_pagination() {
    let app = app!();
    let (alice, _) = register!(app, "alice");

    let (status, body) = send!(app, get("/api/post/user", &alice));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "no posts found");

    let (subreddit_id, _) = subreddit_with_post!(app, &alice);
    for i in 0..2 {
        send!(
            app,
            post(&format!("/api/post/{subreddit_id}"), &alice)
                .set_json(json!({ "content": format!("post {i}") }))
        );
    }

    let (status, list) = send!(
        app,
        get(&format!("/api/post/subreddit/{subreddit_id}?page=1&limit=2"), &alice)
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["object"], "list");
    assert_eq!(list["itemCount"], 3);
    assert_eq!(list["hasMore"], true);
    assert_eq!(list["data"].as_array().unwrap().len(), 2);
    assert_eq!(list["data"][0]["interaction"]["isUpVoted"], false);
}

#[actix_web::test]
async fn test_comment_ownership() {
    let app = app!();
    let (alice, _) = register!(app, "alice");
    let (bob, _) = register!(app, "bob");
    let (subreddit_id, post_id) = subreddit_with_post!(app, &alice);
    let comments = format!("/api/comment/{subreddit_id}/{post_id}");

    let (status, comment) = send!(
        app,
        post(&comments, &bob).set_json(json!({ "content": "first!" }))
    );
    assert_eq!(status, StatusCode::OK);
    let comment_id = comment["id"].as_str().unwrap().to_string();

    let (status, _) = send!(
        app,
        put(&format!("{comments}/{comment_id}"), &alice).set_json(json!({ "content": "edited" }))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, voted) = send!(
        app,
        put(
            &format!("/api/comment/upvote/{subreddit_id}/{post_id}/{comment_id}"),
            &alice
        )
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(voted["comments"][0]["upVotes"], 1);
    assert_eq!(voted["comments"][0]["interaction"]["isUpVoted"], true);

    let (status, listed) = send!(app, get(&comments, &bob));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["content"], "first!");
    assert_eq!(listed[0]["interaction"]["isUpVoted"], false);

    let (status, after) = send!(app, delete(&format!("{comments}/{comment_id}"), &bob));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["comments"], json!([]));
}

#[actix_web::test]
async fn test_blank_comment_is_rejected() {
    let app = app!();
    let (alice, _) = register!(app, "alice");
    let (subreddit_id, post_id) = subreddit_with_post!(app, &alice);

    let (status, body) = send!(
        app,
        post(&format!("/api/comment/{subreddit_id}/{post_id}"), &alice).set_json(json!({}))
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "comment content is empty");
}

#[actix_web::test]
async fn test_subscriptions() {
    let app = app!();
    let (alice, _) = register!(app, "alice");
    let (bob, bob_id) = register!(app, "bob");
    let (subreddit_id, _) = subreddit_with_post!(app, &alice);

    let (status, subreddit) = send!(app, put(&format!("/api/subreddit/subscribe/{subreddit_id}"), &bob));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(subreddit["subscriptions"], 1);
    assert_eq!(subreddit["subscribers"], json!([bob_id]));

    let (status, _) = send!(app, put(&format!("/api/subreddit/subscribe/{subreddit_id}"), &bob));
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, mine) = send!(app, get("/api/subreddit/me", &bob));
    assert_eq!(mine[0]["name"], "rustaceans");

    let (status, subreddit) = send!(app, put(&format!("/api/subreddit/unsubscribe/{subreddit_id}"), &bob));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(subreddit["subscriptions"], 0);

    let (_, mine) = send!(app, get("/api/subreddit/me", &bob));
    assert_eq!(mine, json!([]));
}

#[actix_web::test]
async fn test_only_creator_edits_subreddit() {
    let app = app!();
    let (alice, _) = register!(app, "alice");
    let (bob, _) = register!(app, "bob");
    let (subreddit_id, post_id) = subreddit_with_post!(app, &alice);
    let uri = format!("/api/subreddit/{subreddit_id}");
    let body = json!({ "name": "crabs", "bio": "renamed by the owner" });

    let (status, _) = send!(app, put(&uri, &bob).set_json(body.clone()));
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, renamed) = send!(app, put(&uri, &alice).set_json(body));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["name"], "crabs");
    assert_eq!(renamed["postsPublished"][0]["id"], post_id);
}

#[actix_web::test]
async fn test_vote_after_author_deleted_reports_divergence() {
    let app = app!();
    let (alice, _) = register!(app, "alice");
    let (bob, _) = register!(app, "bob");
    let (subreddit_id, post_id) = subreddit_with_post!(app, &alice);

    let (status, _) = send!(app, delete("/api/user/me", &alice));
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send!(
        app,
        post(&format!("/api/post/upvote/{subreddit_id}/{post_id}"), &bob)
    );
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], 500);

    let (_, stored) = send!(
        app,
        get(&format!("/api/post/subreddit/{subreddit_id}/{post_id}"), &bob)
    );
    assert_eq!(stored["upVotes"], 1);
}

#[actix_web::test]
async fn test_edit_and_delete_answer_with_projected_post() {
    let app = app!();
    let (alice, _) = register!(app, "alice");
    let (subreddit_id, post_id) = subreddit_with_post!(app, &alice);
    send!(app, post(&format!("/api/post/upvote/{subreddit_id}/{post_id}"), &alice));

    let (status, edited) = send!(
        app,
        put(&format!("/api/post/{post_id}"), &alice).set_json(json!({ "content": "edited" }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["content"], "edited");
    assert_eq!(edited["interaction"]["isUpVoted"], true);

    let (status, deleted) = send!(app, delete(&format!("/api/post/{post_id}"), &alice));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["id"], post_id);
    assert_eq!(deleted["interaction"]["isUpVoted"], true);

    let (status, _) = send!(
        app,
        get(&format!("/api/post/subreddit/{subreddit_id}/{post_id}"), &alice)
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}
