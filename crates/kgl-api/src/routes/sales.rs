//! # Sales API
//!
//! Cash and credit sales, recorded by sales agents. Each endpoint forces
//! the sale `type` before the record schema runs, so a client cannot file
//! a credit sale through the cash endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use kgl_core::{
    Record, RequestValidator, Sale, SaleType, Stored, CASH_SALE_REQUEST, CREDIT_SALE_REQUEST,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{require_role, CallerIdentity, Role};
use crate::error::AppError;
use crate::extractors::extract_validated;
use crate::state::AppState;

/// Request body for `POST /sales/cash`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CashSaleRequest {
    /// Letters and digits only.
    #[schema(example = "Beans")]
    pub produce_name: String,
    #[schema(minimum = 100)]
    pub tonnage: f64,
    #[schema(minimum = 10000)]
    pub amount_paid: f64,
    pub buyer_name: String,
    pub sales_agent_name: String,
    pub date: DateTime<Utc>,
    pub time: String,
}

/// Request body for `POST /sales/credit`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreditSaleRequest {
    pub buyer_name: String,
    /// National Identification Number, 14 uppercase letters or digits.
    #[schema(example = "CM12345678ABCD")]
    pub nin: String,
    #[schema(example = "Kampala City")]
    pub location: String,
    #[schema(example = "+256772123456")]
    pub contact: String,
    #[schema(minimum = 10000)]
    pub amount_due: f64,
    pub sales_agent_name: String,
    pub due_date: DateTime<Utc>,
    pub produce_name: String,
    pub produce_type: String,
    #[schema(minimum = 100)]
    pub tonnage: f64,
    pub dispatch_date: DateTime<Utc>,
}

/// A stored cash sale.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CashSaleRecord {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Always `"Cash"`.
    #[serde(rename = "type")]
    pub sale_type: String,
    #[serde(flatten)]
    pub fields: CashSaleRequest,
}

/// A stored credit sale.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreditSaleRecord {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Always `"Credit"`.
    #[serde(rename = "type")]
    pub sale_type: String,
    #[serde(flatten)]
    pub fields: CreditSaleRequest,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sales/cash", post(create_cash_sale))
        .route("/sales/credit", post(create_credit_sale))
}

/// POST /sales/cash: Record a cash sale.
#[utoipa::path(
    post,
    path = "/sales/cash",
    request_body = CashSaleRequest,
    responses(
        (status = 201, description = "Sale recorded", body = CashSaleRecord),
        (status = 400, description = "Field validation failed", body = crate::error::ErrorsBody),
        (status = 401, description = "Missing or invalid token", body = crate::error::MessageBody),
        (status = 403, description = "Caller is not a sales agent", body = crate::error::MessageBody),
    ),
    security(("bearer_auth" = [])),
    tag = "sales"
)]
pub(crate) async fn create_cash_sale(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Stored<Sale>>), AppError> {
    record_sale(&state, &caller, body, &CASH_SALE_REQUEST, SaleType::Cash).await
}

/// POST /sales/credit: Record a credit sale.
#[utoipa::path(
    post,
    path = "/sales/credit",
    request_body = CreditSaleRequest,
    responses(
        (status = 201, description = "Credit sale recorded", body = CreditSaleRecord),
        (status = 400, description = "Field validation failed", body = crate::error::ErrorsBody),
        (status = 401, description = "Missing or invalid token", body = crate::error::MessageBody),
        (status = 403, description = "Caller is not a sales agent", body = crate::error::MessageBody),
    ),
    security(("bearer_auth" = [])),
    tag = "sales"
)]
pub(crate) async fn create_credit_sale(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Stored<Sale>>), AppError> {
    record_sale(&state, &caller, body, &CREDIT_SALE_REQUEST, SaleType::Credit).await
}

async fn record_sale(
    state: &AppState,
    caller: &CallerIdentity,
    body: Result<Json<Value>, JsonRejection>,
    validator: &RequestValidator,
    sale_type: SaleType,
) -> Result<(StatusCode, Json<Stored<Sale>>), AppError> {
    require_role(caller, Role::SalesAgent)?;
    let mut body = extract_validated(body, validator)?;
    body.insert("type".to_string(), Value::from(sale_type.as_str()));

    let stored = Stored::new(Sale::from_body(&body)?);
    state.store.insert_sale(&stored).await?;

    Ok((StatusCode::CREATED, Json(stored)))
}
