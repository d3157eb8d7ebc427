use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeError;

use crate::error::{PlannerError, StorageError};

/// Envelope returned to the host for every C ABI call.
///
/// `Ok` carries a JSON document as text; every other variant carries a
/// human-readable message.
#[derive(Debug, Serialize, Deserialize)]
pub enum AppResponse {
    DatabaseError(String),
    SerializationError(String),
    NotFound(String),
    ValidationError(String),
    BadRequest(String),
    Ok(String),
}

impl Display for AppResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AppResponse::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppResponse::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            AppResponse::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppResponse::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppResponse::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppResponse::Ok(msg) => write!(f, "Ok: {}", msg),
        }
    }
}

impl From<PlannerError> for AppResponse {
    fn from(err: PlannerError) -> Self {
        match err {
            PlannerError::Validation(e) => AppResponse::ValidationError(e.to_string()),
            PlannerError::Import(e) => AppResponse::ValidationError(e.to_string()),
            PlannerError::Storage(StorageError::Json(e)) => AppResponse::from(e),
            PlannerError::Storage(e) => AppResponse::DatabaseError(e.to_string()),
            PlannerError::Config(e) => AppResponse::BadRequest(e.to_string()),
            PlannerError::NothingPending => AppResponse::NotFound("No confirmation is pending".to_string()),
        }
    }
}

impl From<SerdeError> for AppResponse {
    fn from(err: SerdeError) -> Self {
        AppResponse::SerializationError(format!("JSON serialization error: {}", err))
    }
}

impl AppResponse {
    pub fn success(msg: impl Into<String>) -> Self {
        AppResponse::Ok(msg.into())
    }

    /// Serializes `value` into an `Ok` response.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(json) => AppResponse::Ok(json),
            Err(e) => AppResponse::from(e),
        }
    }
}
