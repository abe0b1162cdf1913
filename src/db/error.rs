use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    Sqlx(sqlx::Error),

    #[error("Record not found")]
    NotFound,

    #[error("Duplicate record")]
    Duplicate,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database connection error: {0}")]
    ConnectionError(String),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound,
            // 23505 = unique_violation, 23P01 = exclusion_violation (the
            // no_active_overlap constraint on reservations).
            sqlx::Error::Database(db) => match db.code().as_deref() {
                Some("23505") | Some("23P01") => DatabaseError::Duplicate,
                _ => DatabaseError::Sqlx(err),
            },
            _ => DatabaseError::Sqlx(err),
        }
    }
}
