//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//!
//! Three body shapes are returned, depending on where the request failed:
//!
//! | Stage | Status | Body |
//! |---|---|---|
//! | Auth / role gate | 401 / 403 | `{"message": "..."}` |
//! | Field validation | 400 | `{"errors": [FieldError, ...]}` |
//! | Body parsing / persistence | 400 | `{"error": "..."}` |
//! | Anything else | 500 | `{"error": "An internal error occurred"}` |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kgl_core::{FieldError, KglError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::db::StoreError;

/// Body of 401 and 403 responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageBody {
    pub message: String,
}

/// Body of field validation failures.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorsBody {
    #[schema(value_type = Vec<FieldErrorDoc>)]
    pub errors: Vec<FieldError>,
}

/// Body of parse, persistence and internal failures.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// One violated field check, as it appears in [`ErrorsBody`].
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FieldErrorDoc {
    /// Always `"field"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// The submitted value; absent when the field was not sent.
    #[schema(value_type = Option<Object>)]
    pub value: Option<serde_json::Value>,
    pub msg: String,
    pub path: String,
    /// Always `"body"`.
    pub location: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or unverifiable credential (401).
    #[error("{0}")]
    Unauthenticated(String),

    /// Authenticated caller lacks the endpoint's role (403).
    #[error("{0}")]
    Forbidden(String),

    /// One or more field checks failed (400).
    #[error("validation failed: {} error(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// Request body could not be read as a JSON object (400).
    #[error("{0}")]
    BadRequest(String),

    /// The store refused the write (400).
    #[error("{0}")]
    Persistence(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Validation(_) | Self::BadRequest(_) | Self::Persistence(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::Unauthenticated(message) | Self::Forbidden(message) => {
                (status, Json(MessageBody { message })).into_response()
            }
            Self::Validation(errors) => (status, Json(ErrorsBody { errors })).into_response(),
            Self::BadRequest(error) | Self::Persistence(error) => {
                (status, Json(ErrorBody { error })).into_response()
            }
            Self::Internal(detail) => {
                tracing::error!(error = %detail, "internal server error");
                let body = ErrorBody {
                    error: "An internal error occurred".to_string(),
                };
                (status, Json(body)).into_response()
            }
        }
    }
}

impl From<KglError> for AppError {
    fn from(err: KglError) -> Self {
        match err {
            KglError::Validation(errors) => Self::Validation(errors),
            KglError::NotAnObject => Self::BadRequest(KglError::NotAnObject.to_string()),
            KglError::Json(e) => Self::Internal(format!("validated document did not map: {e}")),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        tracing::warn!(error = %err, "record store rejected write");
        Self::Persistence(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};

    async fn body_json(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn gate_errors_use_message_body() {
        let (status, body) = body_json(AppError::Unauthenticated("No token".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"message": "No token"}));

        let (status, body) = body_json(AppError::Forbidden("nope".into())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "nope");
    }

    #[tokio::test]
    async fn validation_errors_use_errors_body() {
        let err = AppError::Validation(vec![FieldError::body(
            "tonnage",
            "Tonnage must be a number",
            Some(&json!("heavy")),
        )]);
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["errors"][0],
            json!({
                "type": "field",
                "value": "heavy",
                "msg": "Tonnage must be a number",
                "path": "tonnage",
                "location": "body"
            })
        );
    }

    #[tokio::test]
    async fn persistence_errors_use_error_body() {
        let (status, body) = body_json(AppError::Persistence("duplicate key".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "duplicate key"}));
    }

    #[tokio::test]
    async fn internal_details_are_hidden() {
        let (status, body) = body_json(AppError::Internal("pool exhausted".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "An internal error occurred");
    }

    #[test]
    fn record_validation_maps_to_validation() {
        let err: AppError = KglError::Validation(vec![]).into();
        assert!(matches!(err, AppError::Validation(_)));
        let err: AppError = KglError::NotAnObject.into();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
