mod auth;
mod error;
mod members;

use axum::{Json, Router, middleware, routing::get};
use std::sync::Arc;

use crate::auth::{Auth, require_auth};
use crate::claim::Claim;
use crate::jwt::JwtConfig;

pub use auth::AuthState;
pub use error::ApiError;
pub use members::{MemberDirectory, SignInError};

/// Create the API router.
pub fn create_api_router(
    jwt: Arc<JwtConfig>,
    members: Option<Arc<dyn MemberDirectory>>,
    secure_cookies: bool,
) -> Router {
    let auth_state = AuthState {
        jwt,
        members,
        secure_cookies,
    };

    let protected = Router::new()
        .route("/me", get(me))
        .route_layer(middleware::from_fn(require_auth));

    Router::new()
        .nest("/auth", auth::router(auth_state))
        .merge(protected)
}

/// The verified claim of the caller.
async fn me(Auth(claim): Auth) -> Json<Claim> {
    Json(claim)
}
