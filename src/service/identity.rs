use sea_orm::*;

use crate::entity::{movie, rating, user};
use crate::error::AppError;
use crate::utils::hash;

/// Aggregates shown on a user's profile page.
pub struct UserStats {
    pub movie_count: u64,
    /// Mean of the ratings this user has given, rounded to two decimals.
    /// `None` if they have not rated anything.
    pub avg_rating_given: Option<f64>,
}

/// Create an account, returning the new user's id.
pub async fn create_user(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<i32, AppError> {
    let password_hash = hash::hash_password(password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;

    let new_user = user::ActiveModel {
        username: Set(username.to_string()),
        password_hash: Set(password_hash),
        ..Default::default()
    };

    let user = new_user.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::UsernameTaken,
        _ => AppError::from(e),
    })?;

    Ok(user.id)
}

/// Check a username/password pair.
///
/// Unknown usernames and wrong passwords both come back as `Ok(None)`; the
/// caller cannot tell which it was. The username lookup is exact and
/// case-sensitive.
pub async fn check_login(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<Option<i32>, AppError> {
    let Some(user) = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    let valid = hash::verify_password(password, &user.password_hash)
        .map_err(|e| AppError::Internal(format!("Password verify error: {}", e)))?;

    Ok(valid.then_some(user.id))
}

pub async fn get_user(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Option<user::Model>, AppError> {
    Ok(user::Entity::find_by_id(user_id).one(db).await?)
}

pub async fn user_stats(db: &DatabaseConnection, user_id: i32) -> Result<UserStats, AppError> {
    let movie_count = movie::Entity::find()
        .filter(movie::Column::UserId.eq(user_id))
        .count(db)
        .await?;

    let given: Vec<i32> = rating::Entity::find()
        .select_only()
        .column(rating::Column::Rating)
        .filter(rating::Column::UserId.eq(user_id))
        .into_tuple()
        .all(db)
        .await?;

    Ok(UserStats {
        movie_count,
        avg_rating_given: super::round2_mean(&given),
    })
}
