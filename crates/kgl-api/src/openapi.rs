//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI spec,
//! served at `/api-docs`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

/// Adds the Bearer JWT security scheme to the OpenAPI spec.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("HMAC-signed JWT carrying a `role` claim."))
                        .build(),
                ),
            );
        }
    }
}

/// Assembled OpenAPI spec for the ledger API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "KGL Produce Ledger API",
        version = "0.3.1",
        description = "Records produce procurements and cash or credit sales.\n\nAuthentication: `Authorization: Bearer <jwt>`. Procurement requires the `manager` role; sales require `SalesAgent`.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server"),
    ),
    paths(
        crate::routes::procurement::create_procurement,
        crate::routes::sales::create_cash_sale,
        crate::routes::sales::create_credit_sale,
    ),
    components(schemas(
        crate::routes::procurement::ProcurementRequest,
        crate::routes::procurement::ProcurementRecord,
        crate::routes::sales::CashSaleRequest,
        crate::routes::sales::CashSaleRecord,
        crate::routes::sales::CreditSaleRequest,
        crate::routes::sales::CreditSaleRecord,
        crate::error::MessageBody,
        crate::error::ErrorsBody,
        crate::error::ErrorBody,
        crate::error::FieldErrorDoc,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "procurement", description = "Produce bought from dealers"),
        (name = "sales", description = "Cash and credit sales"),
    )
)]
pub struct ApiDoc;

/// Serves the OpenAPI JSON spec at `/api-docs`. Mounted outside the auth gate.
pub fn router() -> Router<AppState> {
    Router::new().route("/api-docs", get(api_docs))
}

async fn api_docs() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
