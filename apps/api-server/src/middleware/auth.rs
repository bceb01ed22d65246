//! Authentication extractor.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use uuid::Uuid;

use agora_core::ports::{AuthError, TokenClaims};

use super::error::AppError;
use crate::state::AppState;

/// Header accepted alongside `Authorization: Bearer`.
pub const LEGACY_TOKEN_HEADER: &str = "x-auth-token";

/// Authenticated caller, decoded from the access token.
///
/// ```ignore
/// async fn me(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.name)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            name: claims.name,
            email: claims.email,
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    if let Some(value) = req.headers().get(header::AUTHORIZATION) {
        let value = value
            .to_str()
            .map_err(|_| AuthError::InvalidToken("invalid authorization header".to_string()))?;
        return value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or_else(|| AuthError::InvalidToken("expected Bearer token".to_string()));
    }

    req.headers()
        .get(LEGACY_TOKEN_HEADER)
        .ok_or(AuthError::MissingAuth)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken("invalid token header".to_string()))
}

fn authenticate(req: &HttpRequest) -> Result<Identity, AppError> {
    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        tracing::error!("AppState not found in app data");
        AppError::Internal("server configuration error".to_string())
    })?;

    let token = bearer_token(req)?;
    let claims = state.tokens.validate_token(token)?;
    Ok(claims.into())
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
