//! # Authentication & Authorization Middleware
//!
//! Bearer JWT middleware with per-endpoint role checks.
//!
//! ## Token Format
//!
//! ```text
//! Authorization: <scheme> <jwt>
//! ```
//!
//! The token is the second space-separated part of the header; the scheme
//! word is not inspected. Tokens are HMAC-signed (HS256, HS384 or HS512)
//! with the shared `JWT_SECRET`. An `exp` claim is enforced when present.
//! Tokens are minted by a separate user service.
//!
//! ## CallerIdentity
//!
//! Every authenticated request gets a [`CallerIdentity`] injected into the
//! request extensions. Handlers extract it via the `FromRequestParts` impl
//! and call [`require_role`] before touching the body.

use std::sync::Arc;

use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use zeroize::Zeroizing;

use crate::error::AppError;

// ── Role ────────────────────────────────────────────────────────────────────

/// Roles recognised by the role gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Branch manager: records procurements.
    Manager,
    /// Sales agent: records cash and credit sales.
    SalesAgent,
}

impl Role {
    /// The exact claim value a caller must carry.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::SalesAgent => "SalesAgent",
        }
    }
}

// ── Claims & CallerIdentity ─────────────────────────────────────────────────

/// Claims read from a verified token. Unknown claims are ignored.
///
/// The user service decides the payload shape, so identity claims are kept
/// as raw JSON and any type is accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

/// Identity of the authenticated caller, available to all route handlers
/// via Axum's `FromRequestParts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// Role claim when it is a string, compared verbatim against
    /// [`Role::as_str`]. Any other type never matches a role.
    pub role: Option<String>,
    /// `sub` claim, falling back to `id`.
    pub subject: Option<String>,
}

impl From<Claims> for CallerIdentity {
    fn from(claims: Claims) -> Self {
        let role = match claims.role {
            Some(Value::String(role)) => Some(role),
            _ => None,
        };
        Self {
            role,
            subject: claim_text(claims.sub).or_else(|| claim_text(claims.id)),
        }
    }
}

/// Strings and numbers identify a subject; other JSON types do not.
fn claim_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl CallerIdentity {
    pub fn has_role(&self, required: Role) -> bool {
        self.role.as_deref() == Some(required.as_str())
    }
}

/// Extracts the identity that the auth middleware injected into extensions.
/// Returns 401 if no identity is present.
#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or_else(|| AppError::Unauthenticated(NO_TOKEN.into()))
    }
}

/// Check that the caller carries exactly the required role.
/// Returns 403 Forbidden otherwise.
pub fn require_role(caller: &CallerIdentity, required: Role) -> Result<(), AppError> {
    if caller.has_role(required) {
        Ok(())
    } else {
        tracing::warn!(
            required = required.as_str(),
            actual = caller.role.as_deref().unwrap_or("<none>"),
            "access denied: role mismatch"
        );
        Err(AppError::Forbidden(format!(
            "Access denied: requires role '{}'",
            required.as_str()
        )))
    }
}

// ── Auth Configuration ──────────────────────────────────────────────────────

const NO_TOKEN: &str = "No token";
const INVALID_TOKEN: &str = "Invalid token";

/// Auth configuration injected into request extensions.
///
/// Custom `Debug` redacts the secret to prevent credential leakage in logs.
#[derive(Clone)]
pub struct AuthConfig {
    secret: Arc<Zeroizing<String>>,
}

impl AuthConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Arc::new(Zeroizing::new(secret.into())),
        }
    }

    /// Verify a compact JWT and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let key = DecodingKey::from_secret(self.secret.as_bytes());
        decode::<Claims>(token, &key, &validation()).map(|data| data.claims)
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
    validation.set_required_spec_claims::<&str>(&[]);
    validation.validate_exp = true;
    validation.validate_aud = false;
    validation.leeway = 0;
    validation
}

// ── Middleware ───────────────────────────────────────────────────────────────

/// Verify the bearer credential and inject the caller's [`CallerIdentity`]
/// into request extensions.
///
/// Responds 401 `{"message": "No token"}` when the header is absent or
/// empty, and 401 `{"message": "Invalid token"}` when the header is not
/// visible ASCII or the token part is missing or fails verification.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let Some(config) = request.extensions().get::<AuthConfig>().cloned() else {
        return AppError::Internal("auth middleware mounted without AuthConfig".into())
            .into_response();
    };

    let header_value = match request.headers().get(header::AUTHORIZATION).map(|v| v.to_str()) {
        None => "",
        Some(Ok(value)) => value,
        Some(Err(_)) => {
            tracing::warn!("authentication failed: authorization header is not visible ASCII");
            return AppError::Unauthenticated(INVALID_TOKEN.into()).into_response();
        }
    };

    if header_value.is_empty() {
        tracing::warn!("authentication failed: missing authorization header");
        return AppError::Unauthenticated(NO_TOKEN.into()).into_response();
    }

    let Some(token) = header_value.split(' ').nth(1).filter(|t| !t.is_empty()) else {
        tracing::warn!("authentication failed: no token after scheme");
        return AppError::Unauthenticated(INVALID_TOKEN.into()).into_response();
    };

    match config.verify(token) {
        Ok(claims) => {
            let identity = CallerIdentity::from(claims);
            tracing::debug!(
                role = identity.role.as_deref().unwrap_or("<none>"),
                subject = identity.subject.as_deref().unwrap_or("<none>"),
                "caller authenticated"
            );
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!(reason = %e, "authentication failed: invalid token");
            AppError::Unauthenticated(INVALID_TOKEN.into()).into_response()
        }
    }
}
