//! Registration and the caller's own account.

use actix_web::{HttpResponse, web};

use agora_core::domain::{User, validate_length};
use agora_core::error::DomainError;
use agora_shared::dto::RegisterUserRequest;

use super::auth::{issue_token, summary};
use crate::middleware::auth::{Identity, LEGACY_TOKEN_HEADER};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn validate(req: &RegisterUserRequest) -> Result<(), DomainError> {
    validate_length(&req.name, "name", 3, 50)?;
    validate_length(&req.email, "email", 5, 255)?;
    if !req.email.contains('@') {
        return Err(DomainError::Validation("email must be a valid email".to_string()));
    }
    validate_length(&req.password, "password", 5, 255)
}

/// POST /api/user/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    validate(&req)?;

    let email = req.email.trim().to_lowercase();
    if state.users.find_by_email(&email).await?.is_some() {
        return Err(DomainError::Duplicate("user already registered".to_string()).into());
    }

    let password_hash = state.passwords.hash(&req.password)?;
    // The check above only spares the hash; `create` decides.
    let user = state
        .users
        .create(User::new(req.name.trim().to_string(), email, password_hash))
        .await?
        .ok_or_else(|| DomainError::Duplicate("user already registered".to_string()))?;

    let (token, body) = issue_token(&state, &user)?;
    tracing::info!(user_id = %user.id, "User registered");

    Ok(HttpResponse::Created()
        .insert_header((LEGACY_TOKEN_HEADER, token))
        .json(body))
}

/// GET /api/user/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    Ok(HttpResponse::Ok().json(user))
}

/// DELETE /api/user/me
///
/// Copies of the user's posts stay in their subreddits.
pub async fn delete_me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    for subreddit_id in &user.subscribed_to {
        state.subreddits.unsubscribe(*subreddit_id, user.id).await?;
    }
    state.users.delete(user.id).await?;

    tracing::info!(
        user_id = %user.id,
        orphaned_posts = user.posts_published.len(),
        "User deleted"
    );
    Ok(HttpResponse::Ok().json(summary(&user)))
}
