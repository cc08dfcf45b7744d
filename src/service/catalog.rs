use sea_orm::prelude::DateTimeUtc;
use sea_orm::*;

use crate::entity::{comment, genre, movie, movie_genre, rating, user};
use crate::error::AppError;

/// A movie row augmented with everything the pages display: author name,
/// genre titles, and rating aggregates.
pub struct MovieSummary {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub release_year: i32,
    pub user_id: i32,
    pub username: String,
    /// Genre titles joined with ", ", in genre id order. Empty when the
    /// movie has none.
    pub genres: String,
    /// Mean of all rating rows, rounded to two decimals. `None` while the
    /// movie is unrated.
    pub avg_rating: Option<f64>,
    pub rating_count: u64,
}

pub struct NewMovie {
    pub title: String,
    pub description: String,
    pub release_year: i32,
    pub user_id: i32,
    pub genre_ids: Vec<i32>,
}

pub struct MovieChanges {
    pub title: String,
    pub description: String,
    pub release_year: i32,
    pub genre_ids: Vec<i32>,
}

/// One rating row on the movie page.
pub struct MovieRating {
    pub rating: i32,
    pub user_id: i32,
    pub username: String,
}

/// One comment on the movie page.
pub struct MovieComment {
    pub content: String,
    pub username: String,
    pub created_at: DateTimeUtc,
}

/// All movies, title ascending.
pub async fn list_movies(db: &DatabaseConnection) -> Result<Vec<MovieSummary>, AppError> {
    let rows = movie::Entity::find()
        .find_also_related(user::Entity)
        .order_by_asc(movie::Column::Title)
        .all(db)
        .await?;
    summarize_all(db, rows).await
}

/// One movie with its aggregates, or `None` when the id is unknown.
pub async fn get_movie(
    db: &DatabaseConnection,
    movie_id: i32,
) -> Result<Option<MovieSummary>, AppError> {
    let Some((movie, author)) = movie::Entity::find_by_id(movie_id)
        .find_also_related(user::Entity)
        .one(db)
        .await?
    else {
        return Ok(None);
    };
    Ok(Some(summarize(db, movie, author).await?))
}

/// Title search with `LIKE '%query%'`. `%` and `_` inside the query act as
/// wildcards; the search has always behaved that way.
pub async fn find_movies(
    db: &DatabaseConnection,
    query: &str,
) -> Result<Vec<MovieSummary>, AppError> {
    let rows = movie::Entity::find()
        .filter(movie::Column::Title.contains(query))
        .find_also_related(user::Entity)
        .order_by_asc(movie::Column::Title)
        .all(db)
        .await?;
    summarize_all(db, rows).await
}

/// The movies one user has added, title ascending.
pub async fn movies_by_user(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<MovieSummary>, AppError> {
    let rows = movie::Entity::find()
        .filter(movie::Column::UserId.eq(user_id))
        .find_also_related(user::Entity)
        .order_by_asc(movie::Column::Title)
        .all(db)
        .await?;
    summarize_all(db, rows).await
}

async fn summarize_all(
    db: &DatabaseConnection,
    rows: Vec<(movie::Model, Option<user::Model>)>,
) -> Result<Vec<MovieSummary>, AppError> {
    let mut summaries = Vec::with_capacity(rows.len());
    for (movie, author) in rows {
        summaries.push(summarize(db, movie, author).await?);
    }
    Ok(summaries)
}

async fn summarize(
    db: &DatabaseConnection,
    movie: movie::Model,
    author: Option<user::Model>,
) -> Result<MovieSummary, AppError> {
    let genres = genres_for_movie(db, movie.id)
        .await?
        .into_iter()
        .map(|g| g.title)
        .collect::<Vec<_>>()
        .join(", ");

    let values: Vec<i32> = rating::Entity::find()
        .select_only()
        .column(rating::Column::Rating)
        .filter(rating::Column::MovieId.eq(movie.id))
        .into_tuple()
        .all(db)
        .await?;

    Ok(MovieSummary {
        id: movie.id,
        title: movie.title,
        description: movie.description,
        release_year: movie.release_year,
        user_id: movie.user_id,
        username: author.map(|u| u.username).unwrap_or_default(),
        genres,
        avg_rating: super::round2_mean(&values),
        rating_count: values.len() as u64,
    })
}

/// Insert a movie and its genre links in one transaction, returning the new
/// movie's id.
pub async fn add_movie(db: &DatabaseConnection, new: NewMovie) -> Result<i32, AppError> {
    let txn = db.begin().await?;

    let movie = movie::ActiveModel {
        title: Set(new.title),
        description: Set(new.description),
        release_year: Set(new.release_year),
        user_id: Set(new.user_id),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    insert_genre_links(&txn, movie.id, &new.genre_ids).await?;

    txn.commit().await?;
    Ok(movie.id)
}

/// Update a movie's fields and replace its genre set in one transaction.
/// The link set is deleted and reinserted wholesale, never diffed.
pub async fn update_movie(
    db: &DatabaseConnection,
    movie_id: i32,
    changes: MovieChanges,
) -> Result<(), AppError> {
    let txn = db.begin().await?;

    let model = movie::ActiveModel {
        id: Set(movie_id),
        title: Set(changes.title),
        description: Set(changes.description),
        release_year: Set(changes.release_year),
        ..Default::default()
    };
    movie::Entity::update(model).exec(&txn).await?;

    movie_genre::Entity::delete_many()
        .filter(movie_genre::Column::MovieId.eq(movie_id))
        .exec(&txn)
        .await?;
    insert_genre_links(&txn, movie_id, &changes.genre_ids).await?;

    txn.commit().await?;
    Ok(())
}

/// Delete a movie and everything hanging off it, in one transaction:
/// genre links, ratings, comments, then the movie row itself.
pub async fn remove_movie(db: &DatabaseConnection, movie_id: i32) -> Result<(), AppError> {
    let txn = db.begin().await?;

    movie_genre::Entity::delete_many()
        .filter(movie_genre::Column::MovieId.eq(movie_id))
        .exec(&txn)
        .await?;
    rating::Entity::delete_many()
        .filter(rating::Column::MovieId.eq(movie_id))
        .exec(&txn)
        .await?;
    comment::Entity::delete_many()
        .filter(comment::Column::MovieId.eq(movie_id))
        .exec(&txn)
        .await?;
    movie::Entity::delete_by_id(movie_id).exec(&txn).await?;

    txn.commit().await?;
    Ok(())
}

async fn insert_genre_links<C>(conn: &C, movie_id: i32, genre_ids: &[i32]) -> Result<(), AppError>
where
    C: ConnectionTrait,
{
    for &genre_id in genre_ids {
        let link = movie_genre::ActiveModel {
            movie_id: Set(movie_id),
            genre_id: Set(genre_id),
        };
        movie_genre::Entity::insert(link)
            .exec_without_returning(conn)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    AppError::BadInput(format!("unknown genre id {genre_id}"))
                }
                _ => AppError::from(e),
            })?;
    }
    Ok(())
}

/// Every genre, id ascending. This is the form checkbox order.
pub async fn all_genres(db: &DatabaseConnection) -> Result<Vec<genre::Model>, AppError> {
    Ok(genre::Entity::find()
        .order_by_asc(genre::Column::Id)
        .all(db)
        .await?)
}

/// The genres linked to one movie, id ascending.
pub async fn genres_for_movie(
    db: &DatabaseConnection,
    movie_id: i32,
) -> Result<Vec<genre::Model>, AppError> {
    Ok(genre::Entity::find()
        .inner_join(movie_genre::Entity)
        .filter(movie_genre::Column::MovieId.eq(movie_id))
        .order_by_asc(genre::Column::Id)
        .all(db)
        .await?)
}

/// The individual rating rows for the movie page, with their authors.
pub async fn ratings_for_movie(
    db: &DatabaseConnection,
    movie_id: i32,
) -> Result<Vec<MovieRating>, AppError> {
    let rows = rating::Entity::find()
        .filter(rating::Column::MovieId.eq(movie_id))
        .find_also_related(user::Entity)
        .order_by_asc(rating::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(r, author)| MovieRating {
            rating: r.rating,
            user_id: r.user_id,
            username: author.map(|u| u.username).unwrap_or_default(),
        })
        .collect())
}

/// Comments for the movie page, newest first.
pub async fn comments_for_movie(
    db: &DatabaseConnection,
    movie_id: i32,
) -> Result<Vec<MovieComment>, AppError> {
    let rows = comment::Entity::find()
        .filter(comment::Column::MovieId.eq(movie_id))
        .find_also_related(user::Entity)
        .order_by_desc(comment::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(c, author)| MovieComment {
            content: c.content,
            username: author.map(|u| u.username).unwrap_or_default(),
            created_at: c.created_at,
        })
        .collect())
}

/// Record a rating. The value must be 1 through 5. Nothing stops the same
/// user rating a movie twice; every row counts toward the average.
pub async fn add_rating(
    db: &DatabaseConnection,
    movie_id: i32,
    user_id: i32,
    value: i32,
) -> Result<(), AppError> {
    if !(1..=5).contains(&value) {
        return Err(AppError::BadInput("rating must be between 1 and 5".into()));
    }

    rating::ActiveModel {
        user_id: Set(user_id),
        movie_id: Set(movie_id),
        rating: Set(value),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(unknown_movie_as_not_found)?;

    Ok(())
}

/// An insert referencing a movie that no longer exists trips the foreign
/// key; to the user that is simply a missing movie.
fn unknown_movie_as_not_found(e: DbErr) -> AppError {
    match e.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => AppError::NotFound,
        _ => AppError::from(e),
    }
}

/// Record a comment. The content is stored trimmed and must not be empty
/// after trimming.
pub async fn add_comment(
    db: &DatabaseConnection,
    movie_id: i32,
    user_id: i32,
    content: &str,
) -> Result<(), AppError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::BadInput("comment cannot be empty".into()));
    }

    comment::ActiveModel {
        user_id: Set(user_id),
        movie_id: Set(movie_id),
        content: Set(content.to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(unknown_movie_as_not_found)?;

    Ok(())
}
