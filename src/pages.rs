use askama::Template;
use axum::response::Html;

use crate::entity::genre;
use crate::error::AppError;
use crate::service::catalog::{MovieComment, MovieRating, MovieSummary};
use crate::service::identity::UserStats;
use crate::session::{Session, SessionUser};

/// Per-request context shared by every page: the logged-in user (if any)
/// for the navigation bar, and the flash messages queued for this render.
pub struct PageCtx {
    pub user: Option<SessionUser>,
    pub flashes: Vec<String>,
}

impl PageCtx {
    /// Build the context, draining the session's flash queue.
    pub fn from_session(session: &Session) -> Self {
        Self {
            user: session.user(),
            flashes: session.take_flashes(),
        }
    }
}

/// Render a page, mapping template failures to an internal error.
pub fn render<T: Template>(template: T) -> Result<Html<String>, AppError> {
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::Internal(format!("Template render error: {}", e)))
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub ctx: PageCtx,
    pub movies: Vec<MovieSummary>,
}

#[derive(Template)]
#[template(path = "show_movie.html")]
pub struct MoviePage {
    pub ctx: PageCtx,
    pub movie: MovieSummary,
    pub ratings: Vec<MovieRating>,
    pub comments: Vec<MovieComment>,
}

#[derive(Template)]
#[template(path = "find_movie.html")]
pub struct FindMoviePage {
    pub ctx: PageCtx,
    pub query: String,
    /// False when the page was opened without a query; the results list is
    /// hidden entirely instead of showing "no matches".
    pub searched: bool,
    pub results: Vec<MovieSummary>,
}

#[derive(Template)]
#[template(path = "new_movie.html")]
pub struct NewMoviePage {
    pub ctx: PageCtx,
    pub genres: Vec<genre::Model>,
    pub csrf_token: String,
}

/// A genre checkbox on the edit form.
pub struct GenreOption {
    pub id: i32,
    pub title: String,
    pub checked: bool,
}

#[derive(Template)]
#[template(path = "edit_movie.html")]
pub struct EditMoviePage {
    pub ctx: PageCtx,
    pub movie: MovieSummary,
    pub genres: Vec<GenreOption>,
    pub csrf_token: String,
}

#[derive(Template)]
#[template(path = "remove_movie.html")]
pub struct RemoveMoviePage {
    pub ctx: PageCtx,
    pub movie: MovieSummary,
    pub csrf_token: String,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterPage {
    pub ctx: PageCtx,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub ctx: PageCtx,
}

#[derive(Template)]
#[template(path = "show_user.html")]
pub struct ProfilePage {
    pub ctx: PageCtx,
    pub user_id: i32,
    pub username: String,
    pub stats: UserStats,
    pub movies: Vec<MovieSummary>,
}

/// Standalone page rendered by `AppError::into_response`; it does not
/// extend the base layout because no session context is available there.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub code: u16,
    pub reason: &'static str,
    pub message: String,
}

pub mod filters {
    /// Render user-authored text as HTML: escape everything first, then
    /// turn newlines into `<br />`. The order matters; replacing newlines
    /// before escaping would escape the inserted tags themselves, and the
    /// reverse order would let markup through. The template marks the
    /// result `|safe`.
    pub fn show_lines(content: &str) -> askama::Result<String> {
        let mut escaped = String::with_capacity(content.len());
        for c in content.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&#x27;"),
                _ => escaped.push(c),
            }
        }
        Ok(escaped.replace('\n', "<br />"))
    }
}
