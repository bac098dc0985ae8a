//! File-based tests for `kgl validate`.

use std::io::Write;

use kgl_cli::validate::{load_payload, run_validate, PayloadKind, ValidateArgs};
use tempfile::NamedTempFile;

fn payload_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn args(kind: PayloadKind, file: &NamedTempFile) -> ValidateArgs {
    ValidateArgs {
        kind,
        file: file.path().to_path_buf(),
        json: false,
    }
}

#[test]
fn valid_credit_sale_exits_zero() {
    let file = payload_file(
        r#"{
            "buyerName": "Valid Buyer",
            "nin": "CM12345678ABCD",
            "location": "Kampala City",
            "contact": "+256772123456",
            "amountDue": 40000,
            "salesAgentName": "Valid Agent",
            "dueDate": "2026-03-01",
            "produceName": "Maize",
            "produceType": "Cereal",
            "tonnage": 100,
            "dispatchDate": "2026-02-14"
        }"#,
    );
    assert_eq!(run_validate(&args(PayloadKind::CreditSale, &file)).unwrap(), 0);
}

#[test]
fn invalid_cash_sale_exits_one() {
    let file = payload_file(r#"{"produceName": "Bean$", "tonnage": "heavy"}"#);
    assert_eq!(run_validate(&args(PayloadKind::CashSale, &file)).unwrap(), 1);
}

#[test]
fn json_report_mode_still_signals_failure() {
    let file = payload_file(r#"{"branch": "OtherPlace"}"#);
    let mut a = args(PayloadKind::Procurement, &file);
    a.json = true;
    assert_eq!(run_validate(&a).unwrap(), 1);
}

#[test]
fn malformed_json_is_an_error() {
    let file = payload_file("{not json");
    let err = run_validate(&args(PayloadKind::Procurement, &file)).unwrap_err();
    assert!(format!("{err:#}").contains("parse"));
}

#[test]
fn non_object_payload_is_an_error() {
    let file = payload_file("[1, 2, 3]");
    assert!(load_payload(file.path()).is_err());
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    let err = load_payload(&missing).unwrap_err();
    assert!(format!("{err:#}").contains("failed to read"));
}
