use axum::extract::{Path, State};
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::AppError;
use crate::pages::{PageCtx, ProfilePage, render};
use crate::service::{catalog, identity};
use crate::session::Session;
use crate::state::AppState;

#[instrument(skip(state, session))]
pub async fn profile(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = identity::get_user(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let stats = identity::user_stats(&state.db, user_id).await?;
    let movies = catalog::movies_by_user(&state.db, user_id).await?;

    render(ProfilePage {
        ctx: PageCtx::from_session(&session),
        user_id: user.id,
        username: user.username,
        stats,
        movies,
    })
}
