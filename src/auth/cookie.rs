//! Refresh token cookie helpers.

use axum::http::header;

use crate::jwt::TokenPair;

/// Cookie name for the refresh token (long-lived, 7 days).
pub const REFRESH_COOKIE_NAME: &str = "refreshToken";

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Extract a cookie value from the Cookie header.
pub fn get_cookie<'a>(headers: &'a axum::http::HeaderMap, name: &str) -> Option<&'a str> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    for part in cookie_header.split(';') {
        let part = part.trim();
        if let Some((key, value)) = part.split_once('=') {
            if key.trim() == name {
                return Some(value.trim());
            }
        }
    }
    None
}

/// `Set-Cookie` value carrying the refresh token of a freshly issued pair.
pub fn refresh_cookie(pair: &TokenPair, secure: bool) -> String {
    let secure = if secure { "; Secure" } else { "" };
    format!(
        "{}={}; HttpOnly; Path=/; Expires={}{}",
        REFRESH_COOKIE_NAME,
        pair.refresh_token,
        pair.refresh_expires_for_cookie().format(HTTP_DATE_FORMAT),
        secure
    )
}

/// `Set-Cookie` value that removes the refresh token cookie.
pub fn clear_refresh_cookie(secure: bool) -> String {
    let secure = if secure { "; Secure" } else { "" };
    format!(
        "{}=; HttpOnly; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0{}",
        REFRESH_COOKIE_NAME, secure
    )
}
