use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Duplicate {entity}: {key}")]
    UniqueViolation { entity: &'static str, key: String },

    #[error("Foreign key violation on {entity}: {detail}")]
    ForeignKeyViolation { entity: &'static str, detail: String },

    #[error("Check constraint violated on {entity}: {detail}")]
    CheckViolation { entity: &'static str, detail: String },

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

impl AppError {
    /// Classifies a driver error raised while writing `entity`.
    ///
    /// Constraint failures get their own variants so callers can tell a
    /// seed-data bug from a lost connection.
    pub fn from_write(entity: &'static str, err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let detail = db_err
                .constraint()
                .map(str::to_string)
                .unwrap_or_else(|| db_err.message().to_string());

            if db_err.is_unique_violation() {
                return AppError::UniqueViolation {
                    entity,
                    key: detail,
                };
            }
            if db_err.is_foreign_key_violation() {
                return AppError::ForeignKeyViolation { entity, detail };
            }
            if db_err.is_check_violation() {
                return AppError::CheckViolation { entity, detail };
            }
        }

        error!("Database error writing {entity}: {err}");
        AppError::Database(err)
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            AppError::UniqueViolation { .. }
                | AppError::ForeignKeyViolation { .. }
                | AppError::CheckViolation { .. }
        )
    }
}
