//! Shared Diesel error classification for the repositories.
//!
//! Each repository owns its port error type; this module reduces pool and
//! Diesel failures to a small [`DieselFailure`] that the repositories then map
//! onto their own constructors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Persistence failure reduced to the cases the ports distinguish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The database could not be reached.
    Connection(String),
    /// A unique constraint rejected the write; carries the constraint name.
    UniqueViolation(Option<String>),
    /// Any other query failure.
    Query(&'static str),
}

pub(crate) fn classify_pool_error(error: PoolError) -> DieselFailure {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            DieselFailure::Connection(message)
        }
    }
}

/// Classify a Diesel error, logging the underlying cause at `debug`.
pub(crate) fn classify_diesel_error(error: DieselError) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::UniqueViolation(info.constraint_name().map(str::to_owned))
        }
        _ => DieselFailure::Query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DieselError::NotFound, DieselFailure::Query("record not found"))]
    #[case(DieselError::RollbackTransaction, DieselFailure::Query("database error"))]
    fn classifies_non_database_errors(#[case] error: DieselError, #[case] expected: DieselFailure) {
        assert_eq!(classify_diesel_error(error), expected);
    }

    #[rstest]
    fn pool_errors_are_connection_failures() {
        assert_eq!(
            classify_pool_error(PoolError::checkout("timed out")),
            DieselFailure::Connection("timed out".to_owned())
        );
    }
}
