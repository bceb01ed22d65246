//! Post listing, publishing and voting.
//!
//! Reads are projected for the caller. Listings come from one parent: the
//! caller's user document or the addressed subreddit.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use agora_core::domain::{Post, Project, VoteDirection, project};
use agora_core::ports::PostPage;
use agora_shared::ListResponse;
use agora_shared::dto::{ContentRequest, Page, PageQuery};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn page_of(state: &AppState, query: web::Query<PageQuery>) -> Page {
    query
        .into_inner()
        .resolve(state.pagination.default_limit, state.pagination.max_limit)
}

fn listing(posts: PostPage, page: Page, viewer: Uuid) -> AppResult<HttpResponse> {
    if posts.total == 0 {
        return Err(AppError::NotFound("no posts found".to_string()));
    }
    let data = project::<Post>(posts.posts, viewer);
    Ok(HttpResponse::Ok().json(ListResponse::new(data, page, posts.total)))
}

/// GET /api/post/user
pub async fn user_posts(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = page_of(&state, query);
    let posts = state
        .engine
        .user_posts(identity.user_id, page.skip(), page.limit)
        .await?;

    listing(posts, page, identity.user_id)
}

/// GET /api/post/user/{id}
pub async fn user_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state
        .engine
        .user_post(identity.user_id, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(post.project(identity.user_id)))
}

/// GET /api/post/subreddit/{subreddit_id}
pub async fn subreddit_posts(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = page_of(&state, query);
    let posts = state
        .engine
        .subreddit_posts(path.into_inner(), page.skip(), page.limit)
        .await?;

    listing(posts, page, identity.user_id)
}

/// GET /api/post/subreddit/{subreddit_id}/{id}
pub async fn subreddit_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (subreddit_id, post_id) = path.into_inner();
    let post = state.engine.subreddit_post(subreddit_id, post_id).await?;

    Ok(HttpResponse::Ok().json(post.project(identity.user_id)))
}

/// POST /api/post/{subreddit_id}
pub async fn publish(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<ContentRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .engine
        .publish_post(identity.user_id, path.into_inner(), body.content.as_deref())
        .await?;

    Ok(HttpResponse::Created().json(post))
}

/// PUT /api/post/{id}
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<ContentRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .engine
        .edit_post(identity.user_id, path.into_inner(), body.content.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(post.project(identity.user_id)))
}

/// DELETE /api/post/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state
        .engine
        .delete_post(identity.user_id, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(post.project(identity.user_id)))
}

async fn vote(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    direction: VoteDirection,
) -> AppResult<HttpResponse> {
    let (subreddit_id, post_id) = path.into_inner();
    let post = state
        .engine
        .vote_post(identity.user_id, subreddit_id, post_id, direction)
        .await?;

    Ok(HttpResponse::Ok().json(post.project(identity.user_id)))
}

/// POST /api/post/upvote/{subreddit_id}/{id}
pub async fn upvote(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    vote(state, identity, path, VoteDirection::Up).await
}

/// POST /api/post/downvote/{subreddit_id}/{id}
pub async fn downvote(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    vote(state, identity, path, VoteDirection::Down).await
}
