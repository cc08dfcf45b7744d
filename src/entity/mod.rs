pub mod comment;
pub mod genre;
pub mod movie;
pub mod movie_genre;
pub mod rating;
pub mod user;
