//! Authentication — session validity, request headers, the wrapped-request helper.
//!
//! ## Security Model
//!
//! - **Wasm/Browser**: the session cookie is set by the backend and sent by the
//!   browser (`credentials: include`). [`AuthSession::cookie`] carries no token
//!   and adds no headers.
//! - **Native/CLI**: the token is held privately inside [`AuthSession`] and
//!   injected as an `Authorization: Bearer <token>` header. There is no public
//!   accessor for the token.
//!
//! Every network call made by the sub-clients goes through [`wrapped_request`],
//! which invalidates the session when the server answers 401.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::clock::Timestamp;
use crate::error::{AuthError, DeskError};

/// Extra HTTP headers a session attaches to outbound requests.
pub type Headers = BTreeMap<String, String>;

/// The authenticated-session handle every operation takes.
///
/// Validity is judged at a caller-supplied time so that expiry follows the
/// client's [`crate::clock::Clock`].
pub trait AuthApi {
    /// `Ok` if requests may be made at `now`, otherwise why not.
    fn status_at(&self, now: Timestamp) -> Result<(), AuthError>;

    /// Whether requests may be made at `now`.
    fn valid(&self, now: Timestamp) -> bool {
        self.status_at(now).is_ok()
    }

    /// Headers to attach to each request.
    fn headers(&self) -> Headers;

    /// Mark the session as no longer accepted by the server.
    fn invalidate(&self);
}

/// A login session: optional bearer token plus expiry.
#[derive(Debug)]
pub struct AuthSession {
    token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
    revoked: AtomicBool,
}

impl AuthSession {
    /// Native session authenticated by a bearer token.
    pub fn bearer(token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            token: Some(token.into()),
            expires_at,
            revoked: AtomicBool::new(false),
        }
    }

    /// Browser session authenticated by an HTTP-only cookie.
    pub fn cookie(expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            token: None,
            expires_at,
            revoked: AtomicBool::new(false),
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

}

impl AuthApi for AuthSession {
    fn status_at(&self, now: Timestamp) -> Result<(), AuthError> {
        if self.revoked.load(Ordering::Relaxed) {
            return Err(AuthError::NotAuthenticated);
        }
        match self.expires_at {
            Some(at) if now >= at => Err(AuthError::TokenExpired),
            _ => Ok(()),
        }
    }

    fn headers(&self) -> Headers {
        let mut headers = Headers::new();
        if let Some(token) = &self.token {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }
        headers
    }

    fn invalidate(&self) {
        self.revoked.store(true, Ordering::Relaxed);
    }
}

/// Run `request`, then map its outcome to something to dispatch.
///
/// Either mapper may return `None` to mean "nothing to do". A 401 from the
/// server invalidates `session` before `on_error` sees the error.
pub async fn wrapped_request<S, T, A, F, Fut>(
    session: &S,
    request: F,
    on_success: impl FnOnce(T) -> Option<A>,
    on_error: impl FnOnce(DeskError) -> Option<A>,
) -> Option<A>
where
    S: AuthApi + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, DeskError>>,
{
    match request().await {
        Ok(value) => on_success(value),
        Err(err) => {
            if err.is_unauthorized() {
                tracing::warn!("Session rejected by server, invalidating");
                session.invalidate();
            }
            on_error(err)
        }
    }
}
