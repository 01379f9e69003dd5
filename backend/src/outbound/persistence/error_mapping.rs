//! Shared mapping from pool and Diesel failures to port error enums.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{
    NoteRepositoryError, StudyRepositoryError, TagRepositoryError, UserPersistenceError,
};

use super::pool::PoolError;

/// Port error enums the Diesel adapters can produce.
pub(crate) trait RepositoryError: Sized {
    fn from_connection(message: String) -> Self;
    fn from_query(message: String) -> Self;

    /// Unique-constraint violations; ports without a conflict variant report
    /// a query failure.
    fn from_conflict(message: String) -> Self {
        Self::from_query(message)
    }
}

macro_rules! impl_repository_error {
    ($error:ty) => {
        impl RepositoryError for $error {
            fn from_connection(message: String) -> Self {
                <$error>::connection(message)
            }

            fn from_query(message: String) -> Self {
                <$error>::query(message)
            }
        }
    };
    ($error:ty, conflict) => {
        impl RepositoryError for $error {
            fn from_connection(message: String) -> Self {
                <$error>::connection(message)
            }

            fn from_query(message: String) -> Self {
                <$error>::query(message)
            }

            fn from_conflict(message: String) -> Self {
                <$error>::conflict(message)
            }
        }
    };
}

impl_repository_error!(NoteRepositoryError);
impl_repository_error!(StudyRepositoryError, conflict);
impl_repository_error!(TagRepositoryError, conflict);
impl_repository_error!(UserPersistenceError, conflict);

pub(crate) fn map_pool_error<E: RepositoryError>(error: PoolError) -> E {
    E::from_connection(error.into_message())
}

pub(crate) fn map_diesel_error<E: RepositoryError>(error: DieselError) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            let target = info
                .constraint_name()
                .unwrap_or("unique constraint")
                .to_owned();
            E::from_conflict(target)
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            E::from_connection("database connection error".to_owned())
        }
        DieselError::NotFound => E::from_query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => E::from_query("database query error".to_owned()),
        _ => E::from_query("database error".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug)]
    struct Info(Option<&'static str>);

    impl diesel::result::DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn details(&self) -> Option<&str> {
            None
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            Some("tags")
        }

        fn column_name(&self) -> Option<&str> {
            None
        }

        fn constraint_name(&self) -> Option<&str> {
            self.0
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info(Some("tags_name_key"))))
    }

    #[rstest]
    fn unique_violation_is_conflict_for_ports_that_have_one() {
        let err: TagRepositoryError =
            map_diesel_error(database_error(DatabaseErrorKind::UniqueViolation));
        assert_eq!(err, TagRepositoryError::conflict("tags_name_key"));
    }

    #[rstest]
    fn unique_violation_is_query_for_ports_without_conflict() {
        let err: NoteRepositoryError =
            map_diesel_error(database_error(DatabaseErrorKind::UniqueViolation));
        assert_eq!(err, NoteRepositoryError::query("tags_name_key"));
    }

    #[rstest]
    fn closed_connection_is_connection_error() {
        let err: StudyRepositoryError =
            map_diesel_error(database_error(DatabaseErrorKind::ClosedConnection));
        assert_eq!(err, StudyRepositoryError::connection("database connection error"));
    }

    #[rstest]
    fn pool_errors_keep_their_message() {
        let err: UserPersistenceError = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(err, UserPersistenceError::connection("timed out"));
    }
}
