//! # Body Extraction & Request Validation
//!
//! Handlers take the body as `Result<Json<Value>, JsonRejection>` so the
//! role gate runs before any body error is reported, then hand it to
//! [`extract_validated`].

use axum::extract::rejection::JsonRejection;
use axum::Json;
use kgl_core::RequestValidator;
use serde_json::{Map, Value};

use crate::error::AppError;

/// Extract a JSON object body, mapping parse errors and non-object
/// payloads to [`AppError::BadRequest`].
pub fn extract_object(result: Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>, AppError> {
    match result {
        Ok(Json(Value::Object(map))) => Ok(map),
        Ok(Json(_)) => Err(AppError::BadRequest(
            "request body must be a JSON object".to_string(),
        )),
        Err(err) => Err(AppError::BadRequest(err.body_text())),
    }
}

/// Extract a JSON object body and run the endpoint's request checks.
///
/// Every failing check is reported in a single [`AppError::Validation`].
pub fn extract_validated(
    result: Result<Json<Value>, JsonRejection>,
    validator: &RequestValidator,
) -> Result<Map<String, Value>, AppError> {
    let body = extract_object(result)?;
    let errors = validator.validate(&body);
    if errors.is_empty() {
        Ok(body)
    } else {
        tracing::debug!(
            endpoint = validator.name,
            count = errors.len(),
            "request validation failed"
        );
        Err(AppError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kgl_core::PROCUREMENT_REQUEST;
    use serde_json::json;

    #[test]
    fn arrays_are_rejected() {
        let err = extract_object(Ok(Json(json!([1, 2])))).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn empty_object_fails_every_procurement_check() {
        let err = extract_validated(Ok(Json(json!({}))), &PROCUREMENT_REQUEST).unwrap_err();
        match err {
            AppError::Validation(errors) => assert_eq!(errors.len(), 15),
            other => panic!("expected validation errors, got {other:?}"),
        }
    }
}
