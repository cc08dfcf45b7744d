use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

/// The full route surface. Flat on purpose; the URL set is small and the
/// paths are part of the page markup.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::movie::index))
        .route("/movie/{movie_id}", get(handlers::movie::show))
        .route("/find_movie", get(handlers::movie::find))
        .route("/new_movie", get(handlers::movie::new))
        .route("/create_movie", post(handlers::movie::create))
        .route("/edit_movie/{movie_id}", get(handlers::movie::edit))
        .route("/update_movie", post(handlers::movie::update))
        .route(
            "/remove_movie/{movie_id}",
            get(handlers::movie::remove_confirm).post(handlers::movie::remove),
        )
        .route("/register", get(handlers::auth::register_page))
        .route("/create", post(handlers::auth::create))
        .route(
            "/login",
            get(handlers::auth::login_page).post(handlers::auth::login),
        )
        .route("/logout", get(handlers::auth::logout))
        .route("/user/{user_id}", get(handlers::user::profile))
        .route("/add_rating", post(handlers::movie::add_rating))
        .route("/add_comment", post(handlers::movie::add_comment))
}
