//! Comments on a post addressed through its subreddit.
//!
//! Edit, delete and vote answer with the whole post so clients can refresh
//! the thread in one step.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use agora_core::domain::{Comment, Project, VoteDirection, project};
use agora_shared::dto::ContentRequest;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/comment/{subreddit_id}/{post_id}
pub async fn list(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (subreddit_id, post_id) = path.into_inner();
    let comments = state.engine.comments(subreddit_id, post_id).await?;

    Ok(HttpResponse::Ok().json(project::<Comment>(comments, identity.user_id)))
}

/// POST /api/comment/{subreddit_id}/{post_id}
pub async fn add(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<ContentRequest>,
) -> AppResult<HttpResponse> {
    let (subreddit_id, post_id) = path.into_inner();
    let comment = state
        .engine
        .add_comment(
            identity.user_id,
            subreddit_id,
            post_id,
            body.content.as_deref(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(comment))
}

/// PUT /api/comment/{subreddit_id}/{post_id}/{id}
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid, Uuid)>,
    body: web::Json<ContentRequest>,
) -> AppResult<HttpResponse> {
    let (subreddit_id, post_id, comment_id) = path.into_inner();
    let post = state
        .engine
        .edit_comment(
            identity.user_id,
            subreddit_id,
            post_id,
            comment_id,
            body.content.as_deref(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(post.project(identity.user_id)))
}

/// DELETE /api/comment/{subreddit_id}/{post_id}/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (subreddit_id, post_id, comment_id) = path.into_inner();
    let post = state
        .engine
        .delete_comment(identity.user_id, subreddit_id, post_id, comment_id)
        .await?;

    Ok(HttpResponse::Ok().json(post.project(identity.user_id)))
}

async fn vote(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid, Uuid)>,
    direction: VoteDirection,
) -> AppResult<HttpResponse> {
    let (subreddit_id, post_id, comment_id) = path.into_inner();
    let post = state
        .engine
        .vote_comment(
            identity.user_id,
            subreddit_id,
            post_id,
            comment_id,
            direction,
        )
        .await?;

    Ok(HttpResponse::Ok().json(post.project(identity.user_id)))
}

/// PUT /api/comment/upvote/{subreddit_id}/{post_id}/{id}
pub async fn upvote(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    vote(state, identity, path, VoteDirection::Up).await
}

/// PUT /api/comment/downvote/{subreddit_id}/{post_id}/{id}
pub async fn downvote(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    vote(state, identity, path, VoteDirection::Down).await
}
