//! # Validate Subcommand
//!
//! Runs a JSON payload through the same two rule layers the HTTP service
//! applies: the endpoint's request checks, then the record schema.
//!
//! Both layers always run, so a single invocation shows every error a
//! client would eventually hit.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use kgl_core::{
    FieldError, Procurement, Record, RequestValidator, Sale, CASH_SALE_REQUEST,
    CREDIT_SALE_REQUEST, PROCUREMENT_REQUEST,
};
use serde::Serialize;
use serde_json::{Map, Value};

/// Which endpoint's rules to apply.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadKind {
    /// `POST /procurement`
    Procurement,
    /// `POST /sales/cash`
    CashSale,
    /// `POST /sales/credit`
    CreditSale,
}

impl PayloadKind {
    fn request_validator(self) -> &'static RequestValidator {
        match self {
            Self::Procurement => &PROCUREMENT_REQUEST,
            Self::CashSale => &CASH_SALE_REQUEST,
            Self::CreditSale => &CREDIT_SALE_REQUEST,
        }
    }

    /// Sale type the endpoint forces before the record schema runs.
    fn forced_type(self) -> Option<&'static str> {
        match self {
            Self::Procurement => None,
            Self::CashSale => Some("Cash"),
            Self::CreditSale => Some("Credit"),
        }
    }
}

/// Arguments for the `kgl validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Endpoint whose rules apply.
    #[arg(value_enum)]
    pub kind: PayloadKind,

    /// JSON file holding the request body.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Errors found by each layer.
#[derive(Debug, Default, Serialize)]
pub struct ValidationReport {
    pub request: Vec<FieldError>,
    pub record: Vec<FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.request.is_empty() && self.record.is_empty()
    }
}

/// Run both rule layers over an in-memory body.
pub fn check(kind: PayloadKind, body: &Map<String, Value>) -> ValidationReport {
    let request = kind.request_validator().validate(body);

    let mut document = body.clone();
    if let Some(sale_type) = kind.forced_type() {
        document.insert("type".to_string(), Value::from(sale_type));
    }
    let outcome = match kind {
        PayloadKind::Procurement => Procurement::from_body(&document).map(drop),
        PayloadKind::CashSale | PayloadKind::CreditSale => Sale::from_body(&document).map(drop),
    };
    let record = match outcome {
        Ok(()) => Vec::new(),
        Err(kgl_core::KglError::Validation(errors)) => errors,
        Err(other) => vec![FieldError::body("", other.to_string(), None)],
    };

    ValidationReport { request, record }
}

/// Read and parse a payload file.
pub fn load_payload(path: &Path) -> Result<Map<String, Value>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {} as JSON", path.display()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => bail!("{}: payload must be a JSON object", path.display()),
    }
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when valid, 1 on validation failure. I/O and parse
/// failures are returned as errors.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let body = load_payload(&args.file)?;
    let report = check(args.kind, &body);

    tracing::info!(
        kind = ?args.kind,
        request_errors = report.request.len(),
        record_errors = report.record.len(),
        "validated payload"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.is_valid() {
        println!("OK: {} is valid", args.file.display());
    } else {
        for error in &report.request {
            println!("  request  {error}");
        }
        for error in &report.record {
            println!("  record   {error}");
        }
        println!(
            "FAIL: {} request error(s), {} record error(s)",
            report.request.len(),
            report.record.len()
        );
    }

    Ok(if report.is_valid() { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("test body must be an object"),
        }
    }

    #[test]
    fn cash_sale_type_is_forced() {
        let body = object(json!({
            "type": "Credit",
            "produceName": "Beans",
            "tonnage": 200,
            "amountPaid": 50000,
            "buyerName": "Nakato",
            "salesAgentName": "Agent007",
            "date": "2026-02-14",
            "time": "09:15"
        }));
        assert!(check(PayloadKind::CashSale, &body).is_valid());
    }

    #[test]
    fn both_layers_are_reported() {
        let body = object(json!({"branch": "OtherPlace"}));
        let report = check(PayloadKind::Procurement, &body);
        assert_eq!(report.request.len(), 15);
        assert_eq!(report.record.len(), 10);
    }
}
