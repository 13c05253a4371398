pub mod api;
pub mod auth;
pub mod claim;
pub mod cli;
pub mod jwt;

use api::{MemberDirectory, create_api_router};
use auth::authenticate;
use axum::{Router, middleware};
use jwt::{ConfigError, JwtConfig};
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct ServerConfig {
    /// JWT secret for signing tokens
    pub jwt_secret: Vec<u8>,
    /// Whether to set Secure flag on cookies (should be true in production with HTTPS)
    pub secure_cookies: bool,
    /// Sign-in backend; sign-in is disabled without one
    pub members: Option<Arc<dyn MemberDirectory>>,
}

/// Create the application router with the given configuration.
///
/// Every route sits behind [`authenticate`]; routes needing an identity add
/// their own guard.
pub fn create_app(config: &ServerConfig) -> Result<Router, ConfigError> {
    let jwt = Arc::new(JwtConfig::new(&config.jwt_secret)?);

    let api_router = create_api_router(jwt.clone(), config.members.clone(), config.secure_cookies);

    Ok(Router::new()
        .nest("/api", api_router)
        .layer(middleware::from_fn_with_state(jwt, authenticate)))
}

/// Run the server on the given listener. This function blocks until the server exits.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    let app = create_app(&config).map_err(std::io::Error::other)?;
    axum::serve(listener, app).await
}
