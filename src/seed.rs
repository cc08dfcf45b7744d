use sea_orm::*;
use tracing::info;

use crate::entity::genre;

/// Genres offered on the movie forms. Fixed reference data with stable ids;
/// there is no user-facing way to change them.
const DEFAULT_GENRES: &[(i32, &str)] = &[
    (1, "Action"),
    (2, "Adventure"),
    (3, "Comedy"),
    (4, "Documentary"),
    (5, "Drama"),
    (6, "Fantasy"),
    (7, "Horror"),
    (8, "Romance"),
    (9, "Sci-Fi"),
    (10, "Thriller"),
];

/// Seed the `genres` table with the default set.
pub async fn seed_genres(db: &DatabaseConnection) -> Result<(), DbErr> {
    let mut inserted = 0u32;
    for &(id, title) in DEFAULT_GENRES {
        let model = genre::ActiveModel {
            id: Set(id),
            title: Set(title.to_string()),
        };

        let result = genre::Entity::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(genre::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(_) => inserted += 1,
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if inserted > 0 {
        info!("Seeded {} new genres", inserted);
    }

    Ok(())
}
