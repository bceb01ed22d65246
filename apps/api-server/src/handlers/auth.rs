//! Login.

use actix_web::{HttpResponse, web};

use agora_core::domain::User;
use agora_core::ports::AuthError;
use agora_shared::dto::{AuthResponse, LoginRequest, UserResponse};

use crate::middleware::auth::LEGACY_TOKEN_HEADER;
use crate::middleware::error::AppResult;
use crate::state::AppState;

pub(crate) fn summary(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        karma: user.karma,
        joined: user.joined,
    }
}

/// Issue a token for `user` and build the response body.
pub(crate) fn issue_token(state: &AppState, user: &User) -> AppResult<(String, AuthResponse)> {
    let token = state
        .tokens
        .generate_token(user.id, &user.name, &user.email)?;

    let body = AuthResponse {
        access_token: token.clone(),
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
        user: summary(user),
    };
    Ok((token, body))
}

/// POST /api/auth
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_email(&req.email.trim().to_lowercase())
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !state.passwords.verify(&req.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "Password mismatch");
        return Err(AuthError::InvalidCredentials.into());
    }

    let (token, body) = issue_token(&state, &user)?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(HttpResponse::Ok()
        .insert_header((LEGACY_TOKEN_HEADER, token))
        .json(body))
}
