use axum::extract::State;
use axum::response::{IntoResponse, Redirect};
use tracing::instrument;

use crate::error::AppError;
use crate::extractors::form::AppForm;
use crate::models::auth::{LoginForm, RegisterForm};
use crate::pages::{LoginPage, PageCtx, RegisterPage, render};
use crate::service::identity;
use crate::session::Session;
use crate::state::AppState;

#[instrument(skip_all)]
pub async fn register_page(session: Session) -> Result<impl IntoResponse, AppError> {
    render(RegisterPage {
        ctx: PageCtx::from_session(&session),
    })
}

/// Handle `POST /create`. Every validation failure becomes a flash message
/// and a redirect back to the form; nothing here is a hard error except the
/// database going away.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    AppForm(form): AppForm<RegisterForm>,
) -> Result<Redirect, AppError> {
    let username = form.username.trim();
    let password1 = form.password1.trim();
    let password2 = form.password2.trim();

    if username.is_empty() {
        session.flash("Error: username cannot be empty");
        return Ok(Redirect::to("/register"));
    }
    if password1.is_empty() || password2.is_empty() {
        session.flash("Error: password cannot be empty");
        return Ok(Redirect::to("/register"));
    }
    if password1 != password2 {
        session.flash("Error: the passwords do not match");
        return Ok(Redirect::to("/register"));
    }

    match identity::create_user(&state.db, username, password1).await {
        Ok(_) => {
            session.flash("Account created! Please log in.");
            Ok(Redirect::to("/login"))
        }
        Err(AppError::UsernameTaken) => {
            session.flash("Error: username is already taken");
            Ok(Redirect::to("/register"))
        }
        Err(e) => Err(e),
    }
}

#[instrument(skip_all)]
pub async fn login_page(session: Session) -> Result<impl IntoResponse, AppError> {
    render(LoginPage {
        ctx: PageCtx::from_session(&session),
    })
}

#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    AppForm(form): AppForm<LoginForm>,
) -> Result<Redirect, AppError> {
    match identity::check_login(&state.db, &form.username, &form.password).await? {
        Some(user_id) => {
            session.log_in(user_id, form.username);
            Ok(Redirect::to("/"))
        }
        None => {
            session.flash("Error: invalid username or password");
            Ok(Redirect::to("/login"))
        }
    }
}

#[instrument(skip_all)]
pub async fn logout(session: Session) -> Redirect {
    session.log_out();
    Redirect::to("/")
}
