use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl RepositoryError {
    /// Builds a `NotFound` error for the given entity and key.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Builds an `AlreadyExists` error for the given entity and key.
    pub fn already_exists(entity_type: &'static str, id: impl ToString) -> Self {
        Self::AlreadyExists {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Returns true for backend failures (I/O, connectivity, encoding), as
    /// opposed to outcomes about the requested key.
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::QueryFailed(_) | Self::Serialization(_)
        )
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_not_found_display() {
        let error = RepositoryError::not_found("Workout", 42);
        assert_eq!(error.to_string(), "Workout not found: 42");
    }

    #[test]
    fn test_repository_error_already_exists_display() {
        let error = RepositoryError::already_exists("WorkoutEntity", "Fake/1999");
        assert_eq!(error.to_string(), "WorkoutEntity already exists: Fake/1999");
    }

    #[test]
    fn test_repository_error_connection_failed_display() {
        let error = RepositoryError::ConnectionFailed("timeout after 30s".to_string());
        assert_eq!(error.to_string(), "Connection failed: timeout after 30s");
    }

    #[test]
    fn test_repository_error_serialization_display() {
        let error = RepositoryError::Serialization("missing required field".to_string());
        assert_eq!(
            error.to_string(),
            "Serialization error: missing required field"
        );
    }

    #[test]
    fn test_storage_failure_classification() {
        assert!(RepositoryError::ConnectionFailed("x".into()).is_storage_failure());
        assert!(RepositoryError::QueryFailed("x".into()).is_storage_failure());
        assert!(RepositoryError::Serialization("x".into()).is_storage_failure());
        assert!(!RepositoryError::InvalidData("x".into()).is_storage_failure());
        assert!(!RepositoryError::not_found("Comment", 1).is_storage_failure());
        assert!(!RepositoryError::already_exists("CommentEntity", "a/b").is_storage_failure());
    }
}
