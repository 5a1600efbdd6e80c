pub mod init;
pub mod rbac;
pub mod storage;
pub mod web;

use anyhow::Error as AnyhowError;
use config::ConfigError;
use init::InitContextError;
use rbac::RBACError;
use sea_orm::{DbErr, TransactionError};
use serde_json::Error as SerdeJsonError;
use std::{error::Error as StdError, io::Error as IoError};
use storage::StorageError;
use thiserror::Error;
use tokio::task::JoinError;
use web::WebError;

pub type UMResult<T, E = UMError> = anyhow::Result<T, E>;
pub type WebResult<T, E = WebError> = anyhow::Result<T, E>;
pub type StorageResult<T, E = StorageError> = Result<T, E>;

#[derive(Error, Debug, Default)]
pub enum UMError {
    #[error("service unavailable")]
    #[default]
    ServiceUnavailable,
    #[error("{0}")]
    JoinError(#[from] JoinError),
    #[error("{0}")]
    StdError(#[from] Box<dyn StdError + Send + Sync>),
    #[error("{0}")]
    IoError(#[from] IoError),
    #[error("{0}")]
    Msg(String),
    #[error("{0}")]
    Anyhow(#[from] AnyhowError),
    #[error("{0}")]
    Json(#[from] SerdeJsonError),
    #[error("{0}")]
    ConfigError(#[from] ConfigError),
    #[error("{0}")]
    StorageError(#[from] StorageError),
    #[error("{0}")]
    RBACError(#[from] RBACError),
    #[error("{0}")]
    InitContextError(#[from] InitContextError),
    #[error("{0}")]
    WebError(#[from] WebError),
    #[error("Initialization error: {0}")]
    InitializationError(String),
    #[error("Invalid state error: {0}")]
    InvalidStateError(String),
}

impl From<String> for UMError {
    #[inline]
    fn from(e: String) -> Self {
        UMError::Msg(e)
    }
}

impl From<&str> for UMError {
    #[inline]
    fn from(e: &str) -> Self {
        UMError::Msg(e.to_string())
    }
}

impl From<DbErr> for UMError {
    #[inline]
    fn from(e: DbErr) -> Self {
        UMError::StorageError(StorageError::DBError(e))
    }
}

impl From<TransactionError<UMError>> for UMError {
    #[inline]
    fn from(e: TransactionError<UMError>) -> Self {
        match e {
            TransactionError::Connection(db) => db.into(),
            TransactionError::Transaction(inner) => inner,
        }
    }
}
