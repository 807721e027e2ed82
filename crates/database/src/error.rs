use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid database connection settings: {0}")]
    ConnectionConfigError(String),

    #[error("Database query failed: {0}")]
    QueryError(sqlx::Error),

    /// A unique constraint rejected the write (e.g. a repeated `identification`).
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// The row is still referenced, or references a row that does not exist.
    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    return DbError::UniqueViolation(db_err.message().to_string());
                }
                ErrorKind::ForeignKeyViolation => {
                    return DbError::ForeignKeyViolation(db_err.message().to_string());
                }
                _ => {}
            }
        }
        DbError::QueryError(err)
    }
}
