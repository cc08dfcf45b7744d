use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::session::Session;

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session middleware not installed".into()))
    }
}

/// Logged-in user taken from the request's session.
///
/// Add this as a handler parameter to require a login; requests without one
/// are rejected with 403.
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
    csrf_token: String,
}

impl AuthUser {
    /// The session's CSRF token, for embedding in rendered forms.
    pub fn csrf_token(&self) -> &str {
        &self.csrf_token
    }

    /// Returns `Ok(())` if the submitted token matches the session's CSRF
    /// token exactly. A missing or mismatched token is `Forbidden`.
    pub fn verify_csrf(&self, submitted: Option<&str>) -> Result<(), AppError> {
        match submitted {
            Some(token) if token == self.csrf_token => Ok(()),
            _ => Err(AppError::Forbidden),
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        let user = session.user().ok_or(AppError::Forbidden)?;

        Ok(AuthUser {
            user_id: user.id,
            username: user.username,
            csrf_token: user.csrf_token,
        })
    }
}
