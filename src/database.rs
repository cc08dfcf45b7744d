use std::time::Duration;

use sea_orm::sea_query::TableCreateStatement;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};

use crate::entity::{comment, genre, movie, movie_genre, rating, user};

pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    // SQLite permits one writer at a time, so a small pool is plenty.
    opt.max_connections(8)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    create_tables(&db).await?;

    Ok(db)
}

/// Create any missing tables, parents before children so the foreign keys
/// resolve. sqlx turns `foreign_keys` on for every SQLite connection, which
/// makes the references enforced at runtime as well.
pub async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, schema.create_table_from_entity(user::Entity)).await?;
    create_table(db, schema.create_table_from_entity(genre::Entity)).await?;
    create_table(db, schema.create_table_from_entity(movie::Entity)).await?;
    create_table(db, schema.create_table_from_entity(movie_genre::Entity)).await?;
    create_table(db, schema.create_table_from_entity(rating::Entity)).await?;
    create_table(db, schema.create_table_from_entity(comment::Entity)).await?;

    Ok(())
}

async fn create_table(
    db: &DatabaseConnection,
    mut stmt: TableCreateStatement,
) -> Result<(), DbErr> {
    stmt.if_not_exists();
    db.execute(db.get_database_backend().build(&stmt)).await?;
    Ok(())
}
