//! Authentication API endpoints.
//!
//! - POST `/` - Sign in with id and password (only with a member directory)
//! - GET `/check` - Check that the refresh token cookie is still valid
//! - POST `/logout` - Clear the refresh token cookie
//! - POST `/token/refresh` - Exchange the refresh token for a new access token

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::ApiError;
use super::members::{MemberDirectory, SignInError};
use crate::auth::{REFRESH_COOKIE_NAME, clear_refresh_cookie, get_cookie, refresh_cookie};
use crate::jwt::JwtConfig;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<JwtConfig>,
    pub members: Option<Arc<dyn MemberDirectory>>,
    pub secure_cookies: bool,
}

pub fn router(state: AuthState) -> Router {
    let router = Router::new()
        .route("/check", get(check_auth))
        .route("/logout", post(logout))
        .route("/token/refresh", post(refresh_access_token));

    let router = if state.members.is_some() {
        router.route("/", post(sign_in))
    } else {
        router
    };

    router.with_state(state)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest {
    sign_id: String,
    password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AccessTokenResponse {
    access_token: String,
}

/// Sign in through the member directory.
/// Sets the refresh token cookie and returns the access token.
async fn sign_in(
    State(state): State<AuthState>,
    Json(body): Json<SignInRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(members) = state.members.as_ref() else {
        return Err(ApiError::bad_request("Sign-in is not available"));
    };

    let claim = members
        .authenticate(&body.sign_id, &body.password)
        .await
        .map_err(|e| match e {
            SignInError::NotFound | SignInError::BadCredentials => {
                ApiError::bad_request(e.to_string())
            }
            SignInError::Unapproved => ApiError::not_acceptable(e.to_string()),
            SignInError::Backend(_) => ApiError::internal("Failed to authenticate member", e),
        })?;

    let pair = state.jwt.issue_pair(&claim, Utc::now())?;
    tracing::info!(member_id = claim.id(), "Member signed in");

    Ok((
        StatusCode::OK,
        [(SET_COOKIE, refresh_cookie(&pair, state.secure_cookies))],
        Json(AccessTokenResponse {
            access_token: pair.access_token,
        }),
    ))
}

/// Returns 204 if the refresh token cookie validates, 406 otherwise.
async fn check_auth(State(state): State<AuthState>, headers: HeaderMap) -> StatusCode {
    let Some(refresh_token) = get_cookie(&headers, REFRESH_COOKIE_NAME).filter(|t| !t.is_empty())
    else {
        return StatusCode::NOT_ACCEPTABLE;
    };

    match state.jwt.validate_token(refresh_token, Utc::now()) {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(e) => {
            tracing::error!(error = %e, "Refresh token check failed");
            StatusCode::NOT_ACCEPTABLE
        }
    }
}

/// Clear the refresh token cookie. Without a cookie there is nothing to do.
async fn logout(State(state): State<AuthState>, headers: HeaderMap) -> impl IntoResponse {
    if get_cookie(&headers, REFRESH_COOKIE_NAME).is_none() {
        return StatusCode::OK.into_response();
    }

    (
        StatusCode::NO_CONTENT,
        [(SET_COOKIE, clear_refresh_cookie(state.secure_cookies))],
    )
        .into_response()
}

/// Issue a new access token from the refresh token cookie.
/// The refresh token itself is not rotated.
async fn refresh_access_token(
    State(state): State<AuthState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let refresh_token = get_cookie(&headers, REFRESH_COOKIE_NAME)
        .ok_or_else(|| ApiError::bad_request("No refresh token"))?;

    let now = Utc::now();
    let access_token = state.jwt.refresh(refresh_token, now)?;

    if let Some(members) = state.members.as_ref() {
        let claim = state.jwt.validate(refresh_token, now)?;
        members
            .record_access(claim.id())
            .await
            .map_err(|e| ApiError::internal("Failed to record member access", e))?;
    }

    Ok((StatusCode::OK, Json(AccessTokenResponse { access_token })))
}
