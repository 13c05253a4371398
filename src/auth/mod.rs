//! Bearer-token authentication for API routes.
//!
//! [`authenticate`] runs on every request: it verifies an `Authorization:
//! Bearer` credential when one is present and stores the resulting
//! [`Claim`](crate::claim::Claim) in the request extensions. [`require_auth`]
//! guards routes that need a verified identity.

mod cookie;
mod errors;
mod extractors;
mod middleware;

pub use cookie::{REFRESH_COOKIE_NAME, clear_refresh_cookie, get_cookie, refresh_cookie};
pub use errors::{ApiAuthError, AuthErrorKind};
pub use extractors::{Auth, MaybeAuth};
pub use middleware::{authenticate, bearer_token, require_auth};
