use thiserror::Error;

/// Backend messages that mean the schema was never created or the
/// access policies are broken, rather than a failure of a single query.
const SETUP_ERROR_MARKERS: [&str; 3] = ["no such table", "does not exist", "infinite recursion"];

/// Classifies cache-related errors to avoid ad-hoc strings.
#[derive(Error, Debug, Clone)]
pub enum CacheError {
    /// Value type is incompatible with the requested operation (e.g. non-integer for incr)
    #[error("cache value type incompatible: {0}")]
    ValueType(String),
    /// Operation could not initialize or persist a value
    #[error("cache initialization failure: {0}")]
    Initialization(String),
    #[error("cache error: {0}")]
    Msg(String),
    /// Key does not exist or value factory returned no value
    #[error("cache key missing: {0}")]
    KeyMiss(String),
    /// TTL or expire_at was already expired or invalid
    #[error("cache ttl expired or invalid: {0}")]
    TTLExpired(String),
    /// NX/XX semantics violation
    #[error("cache concurrency conflict: {0}")]
    ConcurrencyConflict(String),
    #[error("cache already exists: {0}")]
    AlreadyExists(String),
    #[error("cache not found: {0}")]
    NotFound(String),
}

#[derive(Error, Debug, Default)]
pub enum StorageError {
    #[error("database unavailable")]
    #[default]
    StorageUnavailable,

    #[error("database error: `{0}`")]
    DBError(#[from] sea_orm::DbErr),

    #[error("entity not found: {0}")]
    EntityNotFound(String),

    /// A guarded write found the row in a state it may not leave from.
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("{0}")]
    CacheKind(#[from] CacheError),
}

impl StorageError {
    /// Whether this error indicates a missing or misconfigured schema.
    pub fn is_setup_error(&self) -> bool {
        match self {
            StorageError::DBError(e) => is_setup_message(&e.to_string()),
            _ => false,
        }
    }
}

#[inline]
pub fn is_setup_message(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    SETUP_ERROR_MARKERS.iter().any(|m| lower.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbErr, RuntimeErr};

    #[test]
    fn test_setup_message_detection() {
        assert!(is_setup_message("error returned from database: no such table: products"));
        assert!(is_setup_message("relation \"profiles\" does not exist"));
        assert!(is_setup_message(
            "Infinite recursion detected in policy for relation \"profiles\""
        ));
        assert!(!is_setup_message("UNIQUE constraint failed: roles.code"));
    }

    #[test]
    fn test_storage_error_setup_classification() {
        let err = StorageError::DBError(DbErr::Query(RuntimeErr::Internal(
            "no such table: messages".to_string(),
        )));
        assert!(err.is_setup_error());
        assert!(!StorageError::EntityNotFound("product".into()).is_setup_error());
    }
}
