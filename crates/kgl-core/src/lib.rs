#![deny(missing_docs)]
//! # kgl-core: Records and Validation Rules for the KGL Produce Ledger
//!
//! This crate defines the two record types of the ledger ([`Procurement`]
//! and [`Sale`]) and both layers of rules that guard them. It has no
//! internal crate dependencies and performs no I/O.
//!
//! ## Two Rule Layers
//!
//! 1. **Request validators** ([`RequestValidator`]) run at the HTTP
//!    boundary. Every check of every field runs; every failure is reported.
//!
//! 2. **Record schemas** ([`RecordSchema`]) run at the persistence
//!    boundary. Values are cast to their stored kind and each path reports
//!    at most one error.
//!
//! Both layers are declared in the entity modules ([`procurement`],
//! [`sale`]) next to each other. Where they disagree (phone strictness,
//! NIN length, spaces in names) the disagreement is deliberate and covered
//! by tests.
//!
//! Both layers produce the same [`FieldError`] shape.

pub mod error;
pub mod format;
pub mod procurement;
pub mod record;
pub mod request;
pub mod sale;
pub mod schema;

pub use error::{FieldError, KglError};
pub use procurement::{Branch, Procurement, PROCUREMENT_REQUEST, PROCUREMENT_SCHEMA};
pub use record::{Amount, Record, Stored};
pub use request::{Check, FieldChain, RequestValidator, Rule};
pub use sale::{
    CashTerms, CreditTerms, Sale, SaleCommon, SaleTerms, SaleType, CASH_SALE_REQUEST,
    CREDIT_SALE_REQUEST, SALE_SCHEMA,
};
pub use schema::{FieldKind, Presence, RecordSchema};
