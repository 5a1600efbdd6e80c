use thiserror::Error;

/// Error type for seeding context lookups
#[derive(Error, Debug)]
pub enum InitContextError {
    #[error("key not found: {0}")]
    KeyNotFound(String),
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    #[error("primitive error: {0}")]
    Primitive(String),
}
