use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to prepare the database location: {0}")]
    ConnectionConfigError(#[from] std::io::Error),

    #[error("Database query failed: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
}
