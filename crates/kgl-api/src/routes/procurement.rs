//! # Procurement API
//!
//! `POST /procurement` records produce bought from a dealer. Managers only.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use kgl_core::{Procurement, Record, Stored, PROCUREMENT_REQUEST};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{require_role, CallerIdentity, Role};
use crate::error::AppError;
use crate::extractors::extract_validated;
use crate::state::AppState;

/// Request body for `POST /procurement`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcurementRequest {
    /// Letters, digits and spaces.
    #[schema(example = "Maize")]
    pub produce_name: String,
    /// Letters and spaces, at least 2 characters.
    #[schema(example = "Cereal")]
    pub produce_type: String,
    pub date: DateTime<Utc>,
    #[schema(example = "10:30")]
    pub time: String,
    #[schema(minimum = 100)]
    pub tonnage: f64,
    #[schema(minimum = 10000)]
    pub cost: f64,
    #[schema(example = "Okello Traders")]
    pub dealer_name: String,
    #[schema(example = "Maganjo")]
    pub branch: String,
    /// Optional `+` followed by 10 to 15 digits.
    #[schema(example = "0772123456")]
    pub contact: String,
    #[schema(minimum = 10000)]
    pub selling_price: f64,
}

/// A stored procurement.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProcurementRecord {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: ProcurementRequest,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/procurement", post(create_procurement))
}

/// POST /procurement: Record a procurement.
#[utoipa::path(
    post,
    path = "/procurement",
    request_body = ProcurementRequest,
    responses(
        (status = 201, description = "Procurement recorded", body = ProcurementRecord),
        (status = 400, description = "Field validation failed", body = crate::error::ErrorsBody),
        (status = 401, description = "Missing or invalid token", body = crate::error::MessageBody),
        (status = 403, description = "Caller is not a manager", body = crate::error::MessageBody),
    ),
    security(("bearer_auth" = [])),
    tag = "procurement"
)]
pub(crate) async fn create_procurement(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Stored<Procurement>>), AppError> {
    require_role(&caller, Role::Manager)?;
    let body = extract_validated(body, &PROCUREMENT_REQUEST)?;

    let stored = Stored::new(Procurement::from_body(&body)?);
    state.store.insert_procurement(&stored).await?;

    Ok((StatusCode::CREATED, Json(stored)))
}
