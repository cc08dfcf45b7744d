use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect};
use tracing::instrument;

use crate::error::AppError;
use crate::extractors::form::AppForm;
use crate::extractors::session::AuthUser;
use crate::models::movie::{
    CommentForm, CreateMovieForm, FindQuery, RatingForm, RemoveMovieForm, UpdateMovieForm,
    parse_digits, parse_genre_ids, parse_release_year, validate_description, validate_title,
};
use crate::pages::{
    EditMoviePage, FindMoviePage, GenreOption, IndexPage, MoviePage, NewMoviePage, PageCtx,
    RemoveMoviePage, render,
};
use crate::service::catalog::{self, MovieChanges, MovieSummary, NewMovie};
use crate::session::Session;
use crate::state::AppState;

#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let movies = catalog::list_movies(&state.db).await?;
    render(IndexPage {
        ctx: PageCtx::from_session(&session),
        movies,
    })
}

#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(movie_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let movie = catalog::get_movie(&state.db, movie_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let ratings = catalog::ratings_for_movie(&state.db, movie_id).await?;
    let comments = catalog::comments_for_movie(&state.db, movie_id).await?;

    render(MoviePage {
        ctx: PageCtx::from_session(&session),
        movie,
        ratings,
        comments,
    })
}

#[instrument(skip_all)]
pub async fn find(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<FindQuery>,
) -> Result<impl IntoResponse, AppError> {
    let query = params.query.unwrap_or_default();
    let results = if query.is_empty() {
        Vec::new()
    } else {
        catalog::find_movies(&state.db, &query).await?
    };

    render(FindMoviePage {
        ctx: PageCtx::from_session(&session),
        searched: !query.is_empty(),
        query,
        results,
    })
}

#[instrument(skip_all)]
pub async fn new(
    State(state): State<AppState>,
    session: Session,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let genres = catalog::all_genres(&state.db).await?;
    render(NewMoviePage {
        ctx: PageCtx::from_session(&session),
        genres,
        csrf_token: auth.csrf_token().to_string(),
    })
}

#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    AppForm(form): AppForm<CreateMovieForm>,
) -> Result<Redirect, AppError> {
    auth.verify_csrf(form.csrf_token.as_deref())?;
    validate_title(&form.title)?;
    validate_description(&form.description)?;
    let release_year = parse_release_year(&form.release_year)?;
    let genre_ids = parse_genre_ids(&form.genres);

    let movie_id = catalog::add_movie(
        &state.db,
        NewMovie {
            title: form.title,
            description: form.description,
            release_year,
            user_id: auth.user_id,
            genre_ids,
        },
    )
    .await?;

    Ok(Redirect::to(&format!("/movie/{}", movie_id)))
}

#[instrument(skip(state, session, auth))]
pub async fn edit(
    State(state): State<AppState>,
    session: Session,
    auth: AuthUser,
    Path(movie_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let movie = owned_movie(&state, movie_id, &auth).await?;

    let selected: Vec<i32> = catalog::genres_for_movie(&state.db, movie_id)
        .await?
        .into_iter()
        .map(|g| g.id)
        .collect();
    let genres = catalog::all_genres(&state.db)
        .await?
        .into_iter()
        .map(|g| GenreOption {
            checked: selected.contains(&g.id),
            id: g.id,
            title: g.title,
        })
        .collect();

    render(EditMoviePage {
        ctx: PageCtx::from_session(&session),
        movie,
        genres,
        csrf_token: auth.csrf_token().to_string(),
    })
}

#[instrument(skip_all)]
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    AppForm(form): AppForm<UpdateMovieForm>,
) -> Result<Redirect, AppError> {
    auth.verify_csrf(form.csrf_token.as_deref())?;

    let movie_id =
        parse_digits(&form.movie_id).ok_or_else(|| AppError::BadInput("invalid movie id".into()))?;
    owned_movie(&state, movie_id, &auth).await?;

    validate_title(&form.title)?;
    validate_description(&form.description)?;
    let release_year = parse_release_year(&form.release_year)?;
    let genre_ids = parse_genre_ids(&form.genres);

    catalog::update_movie(
        &state.db,
        movie_id,
        MovieChanges {
            title: form.title,
            description: form.description,
            release_year,
            genre_ids,
        },
    )
    .await?;

    Ok(Redirect::to(&format!("/movie/{}", movie_id)))
}

#[instrument(skip(state, session, auth))]
pub async fn remove_confirm(
    State(state): State<AppState>,
    session: Session,
    auth: AuthUser,
    Path(movie_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let movie = owned_movie(&state, movie_id, &auth).await?;

    render(RemoveMoviePage {
        ctx: PageCtx::from_session(&session),
        movie,
        csrf_token: auth.csrf_token().to_string(),
    })
}

#[instrument(skip(state, auth, form))]
pub async fn remove(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(movie_id): Path<i32>,
    AppForm(form): AppForm<RemoveMovieForm>,
) -> Result<Redirect, AppError> {
    // Existence and ownership answer first, as on the GET confirm page; a
    // bad token on an unknown movie is a 404, not a 403.
    owned_movie(&state, movie_id, &auth).await?;
    auth.verify_csrf(form.csrf_token.as_deref())?;

    // Submitting without the remove button's field is a cancel.
    if form.remove.is_none() {
        return Ok(Redirect::to(&format!("/movie/{}", movie_id)));
    }

    catalog::remove_movie(&state.db, movie_id).await?;
    Ok(Redirect::to("/"))
}

#[instrument(skip_all)]
pub async fn add_rating(
    State(state): State<AppState>,
    auth: AuthUser,
    AppForm(form): AppForm<RatingForm>,
) -> Result<Redirect, AppError> {
    auth.verify_csrf(form.csrf_token.as_deref())?;

    let rating =
        parse_digits(&form.rating).ok_or_else(|| AppError::BadInput("invalid rating".into()))?;
    let movie_id =
        parse_digits(&form.movie_id).ok_or_else(|| AppError::BadInput("invalid movie id".into()))?;

    catalog::add_rating(&state.db, movie_id, auth.user_id, rating).await?;
    Ok(Redirect::to(&format!("/movie/{}", movie_id)))
}

#[instrument(skip_all)]
pub async fn add_comment(
    State(state): State<AppState>,
    session: Session,
    auth: AuthUser,
    AppForm(form): AppForm<CommentForm>,
) -> Result<Redirect, AppError> {
    auth.verify_csrf(form.csrf_token.as_deref())?;

    let movie_id =
        parse_digits(&form.movie_id).ok_or_else(|| AppError::BadInput("invalid movie id".into()))?;

    if form.content.trim().is_empty() {
        session.flash("Error: comment cannot be empty");
        return Ok(Redirect::to(&format!("/movie/{}", movie_id)));
    }

    catalog::add_comment(&state.db, movie_id, auth.user_id, &form.content).await?;
    Ok(Redirect::to(&format!("/movie/{}", movie_id)))
}

/// Fetch a movie and enforce the ownership rule: 404 when the id is
/// unknown, 403 when the caller is not the movie's creator.
async fn owned_movie(
    state: &AppState,
    movie_id: i32,
    auth: &AuthUser,
) -> Result<MovieSummary, AppError> {
    let movie = catalog::get_movie(&state.db, movie_id)
        .await?
        .ok_or(AppError::NotFound)?;
    if movie.user_id != auth.user_id {
        return Err(AppError::Forbidden);
    }
    Ok(movie)
}
