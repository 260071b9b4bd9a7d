mod forum_repo;
mod profile_repo;
mod quiz_repo;
mod shop_repo;

pub use forum_repo::SqliteForumRepository;
pub use profile_repo::SqliteProfileRepository;
pub use quiz_repo::SqliteQuizRepository;
pub use shop_repo::SqliteShopRepository;

use crate::domain::repositories::RepositoryError;

/// Map a failed write, surfacing unique violations as conflicts
pub(crate) fn write_error(e: sqlx::Error) -> RepositoryError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::AlreadyExists(db.message().to_string())
        }
        _ => RepositoryError::Database(e.to_string()),
    }
}
