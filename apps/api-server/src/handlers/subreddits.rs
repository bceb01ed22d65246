//! Subreddit CRUD and subscriptions.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use agora_core::domain::{Subreddit, validate_length};
use agora_core::error::DomainError;
use agora_core::ports::SubscriptionChange;
use agora_shared::ListResponse;
use agora_shared::dto::{PageQuery, SubredditRequest, SubredditSummary};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn validate(req: &SubredditRequest) -> Result<(), DomainError> {
    validate_length(&req.name, "name", 3, 50)?;
    validate_length(&req.bio, "bio", 5, 1024)
}

fn not_found() -> AppError {
    AppError::NotFound("subreddit not found".to_string())
}

async fn owned_by(state: &AppState, id: Uuid, requester: Uuid) -> AppResult<Subreddit> {
    let subreddit = state.subreddits.find_by_id(id).await?.ok_or_else(not_found)?;
    if subreddit.created_by != requester {
        return Err(DomainError::Forbidden {
            entity_type: "Subreddit",
        }
        .into());
    }
    Ok(subreddit)
}

/// GET /api/subreddit
pub async fn list(
    state: web::Data<AppState>,
    _identity: Identity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = query
        .into_inner()
        .resolve(state.pagination.default_limit, state.pagination.max_limit);

    let (subreddits, total) = state.subreddits.list(page.skip(), page.limit).await?;

    Ok(HttpResponse::Ok().json(ListResponse::new(subreddits, page, total)))
}

/// GET /api/subreddit/me
pub async fn mine(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    let subscribed: Vec<SubredditSummary> = state
        .subreddits
        .find_many(&user.subscribed_to)
        .await?
        .into_iter()
        .map(|s| SubredditSummary {
            id: s.id,
            name: s.name,
        })
        .collect();

    Ok(HttpResponse::Ok().json(subscribed))
}

/// GET /api/subreddit/{id}
pub async fn get(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let subreddit = state
        .subreddits
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(not_found)?;

    Ok(HttpResponse::Ok().json(subreddit))
}

/// POST /api/subreddit
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<SubredditRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    validate(&req)?;

    let subreddit = Subreddit::new(
        req.name.trim().to_string(),
        req.bio.trim().to_string(),
        identity.user_id,
    );
    let subreddit = state.subreddits.save(subreddit).await?;

    tracing::info!(subreddit_id = %subreddit.id, user_id = %identity.user_id, "Subreddit created");
    Ok(HttpResponse::Created().json(subreddit))
}

/// PUT /api/subreddit/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<SubredditRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    validate(&req)?;
    let id = path.into_inner();
    owned_by(&state, id, identity.user_id).await?;

    let subreddit = state
        .subreddits
        .update_profile(id, req.name.trim().to_string(), req.bio.trim().to_string())
        .await?
        .ok_or_else(not_found)?;

    Ok(HttpResponse::Ok().json(subreddit))
}

/// DELETE /api/subreddit/{id}
///
/// User copies of the subreddit's posts are left in place.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let subreddit = owned_by(&state, path.into_inner(), identity.user_id).await?;
    state.subreddits.delete(subreddit.id).await?;

    tracing::info!(subreddit_id = %subreddit.id, "Subreddit deleted");
    Ok(HttpResponse::Ok().json(subreddit))
}

/// PUT /api/subreddit/subscribe/{id}
pub async fn subscribe(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let subreddit = match state.subreddits.subscribe(id, identity.user_id).await? {
        SubscriptionChange::Changed(subreddit) => subreddit,
        SubscriptionChange::Unchanged(_) => {
            return Err(AppError::BadRequest(
                "user already subscribed to this subreddit".to_string(),
            ));
        }
        SubscriptionChange::Missing => return Err(not_found()),
    };

    if !state.users.add_subscription(identity.user_id, id).await? {
        tracing::warn!(user_id = %identity.user_id, subreddit_id = %id, "Subscriber has no user document");
    }

    Ok(HttpResponse::Ok().json(subreddit))
}

/// PUT /api/subreddit/unsubscribe/{id}
pub async fn unsubscribe(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let subreddit = match state.subreddits.unsubscribe(id, identity.user_id).await? {
        SubscriptionChange::Changed(subreddit) => subreddit,
        SubscriptionChange::Unchanged(_) => {
            return Err(AppError::BadRequest(
                "user is not subscribed to this subreddit".to_string(),
            ));
        }
        SubscriptionChange::Missing => return Err(not_found()),
    };

    state
        .users
        .remove_subscription(identity.user_id, id)
        .await?;

    Ok(HttpResponse::Ok().json(subreddit))
}
