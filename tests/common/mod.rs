#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response},
};
use keyward::{
    ServerConfig,
    api::{MemberDirectory, SignInError},
    claim::Claim,
    create_app,
    jwt::JwtConfig,
};

pub const TEST_SECRET: &[u8] = b"test-jwt-secret-for-integration!";

/// In-memory member directory with a single approved member and a single
/// unapproved one.
#[derive(Default)]
pub struct StubMembers {
    pub accessed: Mutex<Vec<u64>>,
}

pub fn alice() -> Claim {
    Claim::new(42, ["admin"], ["read", "write"]).unwrap()
}

#[async_trait]
impl MemberDirectory for StubMembers {
    async fn authenticate(&self, sign_id: &str, password: &str) -> Result<Claim, SignInError> {
        match (sign_id, password) {
            ("alice", "correct horse") => Ok(alice()),
            ("alice", _) => Err(SignInError::BadCredentials),
            ("bob", _) => Err(SignInError::Unapproved),
            ("broken", _) => Err(SignInError::Backend("connection reset".into())),
            _ => Err(SignInError::NotFound),
        }
    }

    async fn record_access(&self, member_id: u64) -> Result<(), SignInError> {
        self.accessed.lock().unwrap().push(member_id);
        Ok(())
    }
}

/// Create a test app without a member directory and return (app, jwt_config).
pub fn create_test_app() -> (axum::Router, JwtConfig) {
    let config = ServerConfig {
        jwt_secret: TEST_SECRET.to_vec(),
        secure_cookies: false,
        members: None,
    };
    let jwt = JwtConfig::new(TEST_SECRET).unwrap();
    (create_app(&config).unwrap(), jwt)
}

/// Create a test app with the stub member directory.
pub fn create_test_app_with_members() -> (axum::Router, JwtConfig, Arc<StubMembers>) {
    let members = Arc::new(StubMembers::default());
    let config = ServerConfig {
        jwt_secret: TEST_SECRET.to_vec(),
        secure_cookies: false,
        members: Some(members.clone()),
    };
    let jwt = JwtConfig::new(TEST_SECRET).unwrap();
    (create_app(&config).unwrap(), jwt, members)
}

pub fn get(uri: &str) -> axum::http::request::Builder {
    Request::builder().method("GET").uri(uri)
}

pub fn post(uri: &str) -> axum::http::request::Builder {
    Request::builder().method("POST").uri(uri)
}

pub fn refresh_cookie_header(refresh_token: &str) -> String {
    format!("refreshToken={}", refresh_token)
}

/// Extract Set-Cookie headers from response
pub fn extract_set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .collect()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
