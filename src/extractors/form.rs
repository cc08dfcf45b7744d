use axum::extract::{FromRequest, Request};
use axum_extra::extract::Form;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// A `Form<T>` wrapper that converts deserialization errors into
/// `AppError::BadInput`, so malformed posts get the HTML error page instead
/// of axum's plain-text rejection.
///
/// `axum_extra`'s form extractor is used rather than axum's own because the
/// genre checkboxes submit repeated `genres` keys.
pub struct AppForm<T>(pub T);

impl<S, T> FromRequest<S> for AppForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadInput(e.to_string()))?;
        Ok(AppForm(value))
    }
}
