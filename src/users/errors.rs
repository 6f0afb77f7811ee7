use axum::http::StatusCode;
use thiserror::Error;

/// Failures of the signup and login workflows.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("email already registered")]
    DuplicateEmail,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("hashing error: {0}")]
    Hash(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl UserError {
    pub fn status(&self) -> StatusCode {
        match self {
            UserError::Validation(_) => StatusCode::BAD_REQUEST,
            UserError::DuplicateEmail => StatusCode::CONFLICT,
            UserError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            UserError::Hash(_) | UserError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Internal failures are logged in full but only reported generically.
    pub fn is_internal(&self) -> bool {
        self.status().is_server_error()
    }
}

impl From<sqlx::Error> for UserError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => UserError::DuplicateEmail,
            _ => UserError::Repository(e.to_string()),
        }
    }
}

impl From<UserError> for (StatusCode, String) {
    fn from(e: UserError) -> Self {
        let status = e.status();
        if e.is_internal() {
            tracing::error!(error = %e, "request failed");
            (status, "Internal server error".into())
        } else {
            (status, e.to_string())
        }
    }
}
