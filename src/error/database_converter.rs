use crate::error::AppError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// Turns Diesel failures into [`AppError`]s.
///
/// SQLite reports constraint failures as plain text (`UNIQUE constraint
/// failed: users.username`), so the driver message is kept verbatim and only
/// prefixed with the kind of violation.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::NotFound => AppError::NotFound {
                entity: "record".to_string(),
                field: "id".to_string(),
                value: "unknown".to_string(),
            },
            DieselError::DatabaseError(kind, info) => {
                let message = match Self::violation_label(&kind) {
                    Some(label) => format!("{}: {}", label, info.message()),
                    None => info.message().to_string(),
                };
                AppError::store(operation, message)
            }
            other => AppError::store(operation, other),
        }
    }

    fn violation_label(kind: &DatabaseErrorKind) -> Option<&'static str> {
        match kind {
            DatabaseErrorKind::UniqueViolation => Some("Unique constraint violation"),
            DatabaseErrorKind::ForeignKeyViolation => Some("Foreign key constraint violation"),
            DatabaseErrorKind::NotNullViolation => Some("Not null constraint violation"),
            DatabaseErrorKind::CheckViolation => Some("Check constraint violation"),
            DatabaseErrorKind::ReadOnlyTransaction => Some("Read-only transaction"),
            _ => None,
        }
    }
}
