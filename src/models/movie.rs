use serde::Deserialize;

use crate::error::AppError;

/// Query string for `GET /find_movie`.
#[derive(Deserialize)]
pub struct FindQuery {
    pub query: Option<String>,
}

/// Form body for `POST /create_movie`.
#[derive(Deserialize)]
pub struct CreateMovieForm {
    pub title: String,
    pub description: String,
    pub release_year: String,
    #[serde(default)]
    pub genres: Vec<String>,
    pub csrf_token: Option<String>,
}

/// Form body for `POST /update_movie`. The movie id travels as a hidden
/// field rather than in the path.
#[derive(Deserialize)]
pub struct UpdateMovieForm {
    pub movie_id: String,
    pub title: String,
    pub description: String,
    pub release_year: String,
    #[serde(default)]
    pub genres: Vec<String>,
    pub csrf_token: Option<String>,
}

/// Form body for `POST /add_rating`.
#[derive(Deserialize)]
pub struct RatingForm {
    pub rating: String,
    pub movie_id: String,
    pub csrf_token: Option<String>,
}

/// Form body for `POST /add_comment`.
#[derive(Deserialize)]
pub struct CommentForm {
    pub movie_id: String,
    #[serde(default)]
    pub content: String,
    pub csrf_token: Option<String>,
}

/// Form body for `POST /remove_movie/{id}`. Submitting without the `remove`
/// button's field is a cancel.
#[derive(Deserialize)]
pub struct RemoveMovieForm {
    pub remove: Option<String>,
    pub csrf_token: Option<String>,
}

/// Validate a movie title as the form submits it, without trimming:
/// non-empty and at most 100 characters.
pub fn validate_title(title: &str) -> Result<(), AppError> {
    if title.is_empty() || title.chars().count() > 100 {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// Validate a movie description: non-empty and at most 1000 characters.
pub fn validate_description(description: &str) -> Result<(), AppError> {
    if description.is_empty() || description.chars().count() > 1000 {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// Parse a release year from its form field. Anything but plain digits is
/// rejected.
pub fn parse_release_year(raw: &str) -> Result<i32, AppError> {
    parse_digits(raw).ok_or(AppError::Forbidden)
}

/// Parse the submitted genre checkbox values. Non-numeric values are
/// silently dropped.
pub fn parse_genre_ids(raw: &[String]) -> Vec<i32> {
    raw.iter().filter_map(|value| parse_digits(value)).collect()
}

/// Strict digits-only integer parse. Signs, spaces, and empty strings all
/// fail.
pub fn parse_digits(raw: &str) -> Option<i32> {
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
