use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::{rbac::RBACError, storage::StorageError, UMError};

const SETUP_HINT: &str = "The marketplace database is not initialized or its schema is out of date. \
Run the service with a writable data directory so migrations can apply, then retry.";

#[derive(Error, Debug)]
pub enum WebError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("BadRequest: `{0}`")]
    BadRequest(String),
    #[error("`{0}` not found")]
    NotFound(String),
    #[error("Forbidden: `{0}`")]
    Forbidden(String),
    #[error("Conflict: `{0}`")]
    Conflict(String),
    #[error("InternalError: `{0}`")]
    InternalError(String),
    #[error("SetupRequired: `{0}`")]
    SetupRequired(String),
    #[error("Unavailable: `{0}`")]
    Unavailable(String),
    #[error("DBError: `{0}`")]
    StorageError(StorageError),
}

impl From<StorageError> for WebError {
    fn from(e: StorageError) -> Self {
        if e.is_setup_error() {
            return WebError::SetupRequired(e.to_string());
        }
        match e {
            StorageError::EntityNotFound(msg) => WebError::NotFound(msg),
            StorageError::InvalidState(msg) => WebError::BadRequest(msg),
            other => WebError::StorageError(other),
        }
    }
}

impl From<sea_orm::DbErr> for WebError {
    fn from(e: sea_orm::DbErr) -> Self {
        StorageError::DBError(e).into()
    }
}

impl From<std::io::Error> for WebError {
    fn from(e: std::io::Error) -> Self {
        WebError::InternalError(e.to_string())
    }
}

impl From<RBACError> for WebError {
    fn from(e: RBACError) -> Self {
        WebError::InternalError(e.to_string())
    }
}

impl From<UMError> for WebError {
    fn from(e: UMError) -> Self {
        match e {
            UMError::StorageError(se) => se.into(),
            UMError::WebError(we) => we,
            other => WebError::InternalError(other.to_string()),
        }
    }
}

impl ResponseError for WebError {
    fn error_response(&self) -> HttpResponse {
        let mut body = json!({
            "message": self.to_string()
        });
        match self {
            WebError::Unauthorized => {
                body["error"] = json!("Unauthorized");
                HttpResponse::Unauthorized().json(body)
            }
            WebError::BadRequest(_) => {
                body["error"] = json!("Bad Request");
                HttpResponse::BadRequest().json(body)
            }
            WebError::NotFound(_) => {
                body["error"] = json!("Not Found");
                HttpResponse::NotFound().json(body)
            }
            WebError::Forbidden(_) => {
                body["error"] = json!("Forbidden");
                HttpResponse::Forbidden().json(body)
            }
            WebError::Conflict(_) => {
                body["error"] = json!("Conflict");
                HttpResponse::Conflict().json(body)
            }
            WebError::InternalError(_) => {
                body["error"] = json!("Internal Server Error");
                HttpResponse::InternalServerError().json(body)
            }
            WebError::SetupRequired(detail) => {
                body["error"] = json!("Setup Required");
                body["message"] = json!(SETUP_HINT);
                body["detail"] = json!(detail);
                HttpResponse::ServiceUnavailable().json(body)
            }
            WebError::Unavailable(_) => {
                body["error"] = json!("Service Unavailable");
                HttpResponse::ServiceUnavailable().json(body)
            }
            WebError::StorageError(_) => {
                body["error"] = json!("Storage Error");
                HttpResponse::InternalServerError().json(body)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use sea_orm::{DbErr, RuntimeErr};

    #[test]
    fn test_missing_table_maps_to_service_unavailable() {
        let err: WebError =
            DbErr::Query(RuntimeErr::Internal("no such table: products".into())).into();
        assert!(matches!(err, WebError::SetupRequired(_)));
        assert_eq!(
            err.error_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_entity_not_found_maps_to_404() {
        let err: WebError = UMError::StorageError(StorageError::EntityNotFound("order".into())).into();
        assert_eq!(err.error_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_state_maps_to_400() {
        let err: WebError = StorageError::InvalidState("product 7 is no longer active".into()).into();
        assert!(matches!(err, WebError::BadRequest(_)));
        assert_eq!(err.error_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_conflict_status() {
        let err = WebError::Conflict("duplicate role code".into());
        assert_eq!(err.error_response().status(), StatusCode::CONFLICT);
    }
}
