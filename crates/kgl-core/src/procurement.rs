//! # Procurement
//!
//! A recorded purchase of produce from a dealer, together with the rules
//! that guard it at both boundaries.
//!
//! The request checks and the record schema do not agree everywhere:
//!
//! | Field | Request check | Record rule |
//! |---|---|---|
//! | `contact` | 10–15 digits, optional `+`, no separators | `^\+?[\d\s-]{10,}$` |
//! | `date` | ISO-8601 text | any castable date (incl. epoch millis) |
//! | `tonnage`, `cost`, `sellingPrice` | integer literal | any number |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::format::CharClass;
use crate::record::{Amount, Record};
use crate::request::{Check, FieldChain, RequestValidator, Rule};
use crate::schema::{Constrained, Constraint, FieldKind, FieldRule, Pattern, Presence, RecordSchema};

/// Branches that buy produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Branch {
    /// Maganjo branch.
    Maganjo,
    /// Matugga branch.
    Matugga,
}

impl Branch {
    /// Every branch name, as accepted on the wire.
    pub const NAMES: &'static [&'static str] = &["Maganjo", "Matugga"];

    /// Wire name of this branch.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Maganjo => "Maganjo",
            Self::Matugga => "Matugga",
        }
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A procurement record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Procurement {
    /// Produce bought.
    pub produce_name: String,
    /// Kind of produce, e.g. `"Cereal"`.
    pub produce_type: String,
    /// Day of purchase.
    pub date: DateTime<Utc>,
    /// Time of day, as entered.
    pub time: String,
    /// Quantity bought, in tonnes.
    pub tonnage: Amount,
    /// Price paid to the dealer.
    pub cost: Amount,
    /// Dealer sold from.
    pub dealer_name: String,
    /// Branch that bought.
    pub branch: Branch,
    /// Dealer's phone number.
    pub contact: String,
    /// Price the produce will be sold at.
    pub selling_price: Amount,
}

impl Record for Procurement {
    const COLLECTION: &'static str = "procurements";

    fn schema() -> &'static RecordSchema {
        &PROCUREMENT_SCHEMA
    }
}

/// Checks for `POST /procurement`.
pub static PROCUREMENT_REQUEST: RequestValidator = RequestValidator {
    name: "procurement",
    chains: &[
        FieldChain {
            path: "produceName",
            rules: &[Rule::new(
                Check::Matches(CharClass::AlphanumericSpace),
                "Name of produce must be alpha-numeric",
            )],
        },
        FieldChain {
            path: "produceType",
            rules: &[
                Rule::new(
                    Check::Matches(CharClass::AlphaSpace),
                    "Type of produce must be alphabetic characters only",
                ),
                Rule::new(Check::MinLength(2), "Type of produce must be at least 2 characters"),
            ],
        },
        FieldChain {
            path: "date",
            rules: &[Rule::new(Check::Iso8601, "Date cannot be empty")],
        },
        FieldChain {
            path: "time",
            rules: &[Rule::new(Check::NotEmpty, "Time cannot be empty")],
        },
        FieldChain {
            path: "tonnage",
            rules: &[
                Rule::new(Check::Numeric, "Tonnage must be a number"),
                Rule::new(Check::Int { min: 100 }, "Tonnage must be at least 100"),
            ],
        },
        FieldChain {
            path: "cost",
            rules: &[
                Rule::new(Check::Numeric, "Cost must be a number"),
                Rule::new(Check::Int { min: 10_000 }, "Cost must be at least 10000"),
            ],
        },
        FieldChain {
            path: "dealerName",
            rules: &[
                Rule::new(
                    Check::Matches(CharClass::AlphanumericSpace),
                    "Dealer Name must be alpha-numeric",
                ),
                Rule::new(Check::MinLength(2), "Dealer Name must be at least 2 characters"),
            ],
        },
        FieldChain {
            path: "branch",
            rules: &[Rule::new(
                Check::OneOf(Branch::NAMES),
                "Branch must be either Maganjo or Matugga",
            )],
        },
        FieldChain {
            path: "contact",
            rules: &[Rule::new(Check::MobilePhone, "Contact must be a valid phone number")],
        },
        FieldChain {
            path: "sellingPrice",
            rules: &[
                Rule::new(Check::Numeric, "Selling Price must be a number"),
                Rule::new(Check::Int { min: 10_000 }, "Selling Price must be at least 10000"),
            ],
        },
    ],
};

/// Persistence-level schema of [`Procurement`].
pub static PROCUREMENT_SCHEMA: RecordSchema = RecordSchema {
    fields: &[
        FieldRule {
            path: "produceName",
            kind: FieldKind::Text,
            presence: Presence::Required,
            constraints: &[Constrained::new(
                Constraint::Pattern(Pattern::Class(CharClass::AlphanumericSpace)),
                "Name of produce must be alpha-numeric",
            )],
        },
        FieldRule {
            path: "produceType",
            kind: FieldKind::Text,
            presence: Presence::Required,
            constraints: &[
                Constrained::new(
                    Constraint::MinLength(2),
                    "Type of produce must be at least 2 characters",
                ),
                Constrained::new(
                    Constraint::Pattern(Pattern::Class(CharClass::AlphaSpace)),
                    "Type of produce must be alphabetic characters only",
                ),
            ],
        },
        FieldRule {
            path: "date",
            kind: FieldKind::Date,
            presence: Presence::Required,
            constraints: &[],
        },
        FieldRule {
            path: "time",
            kind: FieldKind::Text,
            presence: Presence::Required,
            constraints: &[],
        },
        FieldRule {
            path: "tonnage",
            kind: FieldKind::Number,
            presence: Presence::Required,
            constraints: &[Constrained::new(Constraint::Min(100.0), "Tonnage must be at least 100")],
        },
        FieldRule {
            path: "cost",
            kind: FieldKind::Number,
            presence: Presence::Required,
            constraints: &[Constrained::new(Constraint::Min(10_000.0), "Cost must be at least 10000")],
        },
        FieldRule {
            path: "dealerName",
            kind: FieldKind::Text,
            presence: Presence::Required,
            constraints: &[
                Constrained::new(Constraint::MinLength(2), "Dealer Name must be at least 2 characters"),
                Constrained::new(
                    Constraint::Pattern(Pattern::Class(CharClass::AlphanumericSpace)),
                    "Dealer Name must be alpha-numeric",
                ),
            ],
        },
        FieldRule {
            path: "branch",
            kind: FieldKind::Text,
            presence: Presence::Required,
            constraints: &[Constrained::new(
                Constraint::OneOf(Branch::NAMES),
                "Branch must be either Maganjo or Matugga",
            )],
        },
        FieldRule {
            path: "contact",
            kind: FieldKind::Text,
            presence: Presence::Required,
            constraints: &[Constrained::new(
                Constraint::Pattern(Pattern::Phone),
                "Contact must be a valid phone number",
            )],
        },
        FieldRule {
            path: "sellingPrice",
            kind: FieldKind::Number,
            presence: Presence::Required,
            constraints: &[Constrained::new(
                Constraint::Min(10_000.0),
                "Selling price must be at least 10000",
            )],
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KglError;
    use serde_json::{json, Map, Value};

    fn valid() -> Map<String, Value> {
        match json!({
            "produceName": "Maize",
            "produceType": "Cereal",
            "date": "2026-02-14",
            "time": "10:30",
            "tonnage": 150,
            "cost": 20000,
            "dealerName": "Okello Traders",
            "branch": "Maganjo",
            "contact": "0772123456",
            "sellingPrice": 15000
        }) {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn valid_payload_passes_both_layers() {
        let body = valid();
        assert!(PROCUREMENT_REQUEST.validate(&body).is_empty());
        let record = Procurement::from_body(&body).unwrap();
        assert_eq!(record.branch, Branch::Maganjo);
        assert_eq!(record.tonnage, Amount(150.0));
        assert_eq!(record.dealer_name, "Okello Traders");
    }

    #[test]
    fn unknown_branch_is_rejected_by_both_layers() {
        let mut body = valid();
        body.insert("branch".into(), json!("OtherPlace"));

        let errors = PROCUREMENT_REQUEST.validate(&body);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].msg.contains("Maganjo or Matugga"));

        match Procurement::from_body(&body) {
            Err(KglError::Validation(errs)) => {
                assert_eq!(errs.len(), 1);
                assert_eq!(errs[0].path, "branch");
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn separated_phone_passes_record_but_not_request() {
        let mut body = valid();
        body.insert("contact".into(), json!("0772-123-456"));
        assert_eq!(PROCUREMENT_REQUEST.validate(&body).len(), 1);
        assert!(Procurement::from_body(&body).is_ok());
    }

    #[test]
    fn offset_date_times_pass_both_layers() {
        let mut body = valid();
        body.insert("date".into(), json!("2026-02-14T10:30+03:00"));
        assert!(PROCUREMENT_REQUEST.validate(&body).is_empty());
        let record = Procurement::from_body(&body).unwrap();
        assert_eq!(record.date.to_rfc3339(), "2026-02-14T07:30:00+00:00");
    }

    #[test]
    fn record_serializes_camel_case() {
        let record = Procurement::from_body(&valid()).unwrap();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["sellingPrice"], json!(15000));
        assert_eq!(value["produceName"], json!("Maize"));
        assert_eq!(value["branch"], json!("Maganjo"));
    }

    #[test]
    fn branch_wire_names_round_trip() {
        for name in Branch::NAMES {
            let branch: Branch = serde_json::from_value(json!(name)).unwrap();
            assert_eq!(branch.as_str(), *name);
            assert_eq!(branch.to_string(), *name);
        }
        assert!(serde_json::from_value::<Branch>(json!("Kampala")).is_err());
    }
}
