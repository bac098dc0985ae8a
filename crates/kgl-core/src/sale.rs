//! # Sales
//!
//! A sale is either paid on the spot ([`SaleTerms::Cash`]) or deferred
//! ([`SaleTerms::Credit`]). Both share [`SaleCommon`]; the `type` tag alone
//! decides which of the remaining fields are required.
//!
//! At the persistence boundary one [`SALE_SCHEMA`] covers both variants
//! with conditionally required paths. Fields of the other variant are
//! still checked when supplied, but only the fields of the tagged variant
//! end up in the stored [`Sale`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::format::CharClass;
use crate::record::{Amount, Record};
use crate::request::{Check, FieldChain, RequestValidator, Rule};
use crate::schema::{Constrained, Constraint, FieldKind, FieldRule, Pattern, Presence, RecordSchema};

/// Discriminant of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SaleType {
    /// Paid in full at the time of sale.
    Cash,
    /// Paid later; the buyer is identified by NIN.
    Credit,
}

impl SaleType {
    /// Every `type` value accepted on the wire.
    pub const NAMES: &'static [&'static str] = &["Cash", "Credit"];

    /// Wire name of this sale type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Credit => "Credit",
        }
    }
}

impl std::fmt::Display for SaleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields every sale carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleCommon {
    /// Produce sold.
    pub produce_name: String,
    /// Quantity sold, in tonnes.
    pub tonnage: Amount,
    /// Buyer's name.
    pub buyer_name: String,
    /// Agent who made the sale.
    pub sales_agent_name: String,
}

/// Fields only a cash sale carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashTerms {
    /// Amount received.
    pub amount_paid: Amount,
    /// Day of the sale.
    pub date: DateTime<Utc>,
    /// Time of day, as entered.
    pub time: String,
}

/// Fields only a credit sale carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditTerms {
    /// Kind of produce, e.g. `"Cereal"`.
    pub produce_type: String,
    /// Amount owed by the buyer.
    pub amount_due: Amount,
    /// Buyer's National Identification Number.
    pub nin: String,
    /// Buyer's location.
    pub location: String,
    /// Buyer's phone number.
    pub contact: String,
    /// When payment falls due.
    pub due_date: DateTime<Utc>,
    /// When the produce left the store.
    pub dispatch_date: DateTime<Utc>,
}

/// Variant payload, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SaleTerms {
    /// `"type": "Cash"`
    Cash(CashTerms),
    /// `"type": "Credit"`
    Credit(CreditTerms),
}

/// A sale record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    /// Fields shared by both variants.
    #[serde(flatten)]
    pub common: SaleCommon,
    /// Variant-specific fields, with the `type` tag.
    #[serde(flatten)]
    pub terms: SaleTerms,
}

impl Sale {
    /// Which variant this sale is.
    pub fn sale_type(&self) -> SaleType {
        match self.terms {
            SaleTerms::Cash(_) => SaleType::Cash,
            SaleTerms::Credit(_) => SaleType::Credit,
        }
    }
}

impl Record for Sale {
    const COLLECTION: &'static str = "sales";

    fn schema() -> &'static RecordSchema {
        &SALE_SCHEMA
    }
}

const TONNAGE_RULES: &[Rule] = &[
    Rule::new(Check::Numeric, "Tonnage must be a number"),
    Rule::new(Check::Int { min: 100 }, "Tonnage must be at least 100"),
];

/// Checks for `POST /sales/cash`. Names must not contain spaces here.
pub static CASH_SALE_REQUEST: RequestValidator = RequestValidator {
    name: "cash-sale",
    chains: &[
        FieldChain {
            path: "produceName",
            rules: &[Rule::new(
                Check::Matches(CharClass::Alphanumeric),
                "Produce Name must be alpha-numeric",
            )],
        },
        FieldChain {
            path: "tonnage",
            rules: TONNAGE_RULES,
        },
        FieldChain {
            path: "amountPaid",
            rules: &[
                Rule::new(Check::Numeric, "Amount Paid must be a number"),
                Rule::new(Check::Int { min: 10_000 }, "Amount Paid must be at least 10000"),
            ],
        },
        FieldChain {
            path: "buyerName",
            rules: &[
                Rule::new(
                    Check::Matches(CharClass::Alphanumeric),
                    "Buyer Name must be alpha-numeric",
                ),
                Rule::new(Check::MinLength(2), "Buyer Name must be at least 2 characters"),
            ],
        },
        FieldChain {
            path: "salesAgentName",
            rules: &[
                Rule::new(
                    Check::Matches(CharClass::Alphanumeric),
                    "Sales Agent Name must be alpha-numeric",
                ),
                Rule::new(
                    Check::MinLength(2),
                    "Sales Agent Name must be at least 2 characters",
                ),
            ],
        },
        FieldChain {
            path: "date",
            rules: &[Rule::new(Check::NotEmpty, "Date cannot be empty")],
        },
        FieldChain {
            path: "time",
            rules: &[Rule::new(Check::NotEmpty, "Time cannot be empty")],
        },
    ],
};

/// Checks for `POST /sales/credit`.
pub static CREDIT_SALE_REQUEST: RequestValidator = RequestValidator {
    name: "credit-sale",
    chains: &[
        FieldChain {
            path: "buyerName",
            rules: &[
                Rule::new(
                    Check::Matches(CharClass::AlphanumericSpace),
                    "Buyer Name must be alpha-numeric",
                ),
                Rule::new(Check::MinLength(2), "Buyer Name must be at least 2 characters"),
            ],
        },
        FieldChain {
            path: "nin",
            rules: &[
                Rule::new(Check::Matches(CharClass::Alphanumeric), "NIN must be alpha-numeric"),
                Rule::new(Check::MinLength(13), "NIN must be at least 13 characters"),
            ],
        },
        FieldChain {
            path: "location",
            rules: &[
                Rule::new(
                    Check::Matches(CharClass::AlphanumericSpace),
                    "Location must be alpha-numeric",
                ),
                Rule::new(Check::MinLength(2), "Location must be at least 2 characters"),
            ],
        },
        FieldChain {
            path: "contact",
            rules: &[Rule::new(Check::MobilePhone, "Contact must be a valid phone number")],
        },
        FieldChain {
            path: "amountDue",
            rules: &[
                Rule::new(Check::Numeric, "Amount Due must be a number"),
                Rule::new(Check::Int { min: 10_000 }, "Amount Due must be at least 10000"),
            ],
        },
        FieldChain {
            path: "salesAgentName",
            rules: &[
                Rule::new(
                    Check::Matches(CharClass::AlphanumericSpace),
                    "Sales Agent Name must be alpha-numeric",
                ),
                Rule::new(
                    Check::MinLength(2),
                    "Sales Agent Name must be at least 2 characters",
                ),
            ],
        },
        FieldChain {
            path: "dueDate",
            rules: &[Rule::new(Check::NotEmpty, "Due Date cannot be empty")],
        },
        FieldChain {
            path: "produceName",
            rules: &[Rule::new(
                Check::Matches(CharClass::Alphanumeric),
                "Produce Name must be alpha-numeric",
            )],
        },
        FieldChain {
            path: "produceType",
            rules: &[
                Rule::new(
                    Check::Matches(CharClass::Alpha),
                    "Produce Type must be alphabetic characters only",
                ),
                Rule::new(Check::MinLength(2), "Produce Type must be at least 2 characters"),
            ],
        },
        FieldChain {
            path: "tonnage",
            rules: TONNAGE_RULES,
        },
        FieldChain {
            path: "dispatchDate",
            rules: &[Rule::new(Check::NotEmpty, "Dispatch Date cannot be empty")],
        },
    ],
};

const WHEN_CASH: Presence = Presence::RequiredWhen {
    path: "type",
    equals: "Cash",
};

const WHEN_CREDIT: Presence = Presence::RequiredWhen {
    path: "type",
    equals: "Credit",
};

const ALNUM_SPACE: Constraint = Constraint::Pattern(Pattern::Class(CharClass::AlphanumericSpace));

/// Persistence-level schema of [`Sale`], covering both variants.
pub static SALE_SCHEMA: RecordSchema = RecordSchema {
    fields: &[
        FieldRule {
            path: "type",
            kind: FieldKind::Text,
            presence: Presence::Required,
            constraints: &[Constrained::new(
                Constraint::OneOf(SaleType::NAMES),
                "Type must be either Cash or Credit",
            )],
        },
        FieldRule {
            path: "produceName",
            kind: FieldKind::Text,
            presence: Presence::Required,
            constraints: &[Constrained::new(ALNUM_SPACE, "Produce Name must be alpha-numeric")],
        },
        FieldRule {
            path: "produceType",
            kind: FieldKind::Text,
            presence: WHEN_CREDIT,
            constraints: &[
                Constrained::new(
                    Constraint::MinLength(2),
                    "Produce Type must be at least 2 characters",
                ),
                // Digits are admitted despite the message.
                Constrained::new(ALNUM_SPACE, "Produce Type must be alphabetic characters only"),
            ],
        },
        FieldRule {
            path: "tonnage",
            kind: FieldKind::Number,
            presence: Presence::Required,
            constraints: &[Constrained::new(Constraint::Min(100.0), "Tonnage must be at least 100")],
        },
        FieldRule {
            path: "amountPaid",
            kind: FieldKind::Number,
            presence: WHEN_CASH,
            constraints: &[Constrained::new(
                Constraint::Min(10_000.0),
                "Amount Paid must be at least 5 digits",
            )],
        },
        FieldRule {
            path: "amountDue",
            kind: FieldKind::Number,
            presence: WHEN_CREDIT,
            constraints: &[Constrained::new(
                Constraint::Min(10_000.0),
                "Amount Due must be at least 5 digits",
            )],
        },
        FieldRule {
            path: "buyerName",
            kind: FieldKind::Text,
            presence: Presence::Required,
            constraints: &[
                Constrained::new(Constraint::MinLength(2), "Buyer Name must be at least 2 characters"),
                Constrained::new(ALNUM_SPACE, "Buyer Name must be alpha-numeric"),
            ],
        },
        FieldRule {
            path: "nin",
            kind: FieldKind::Text,
            presence: WHEN_CREDIT,
            constraints: &[
                Constrained::new(Constraint::Pattern(Pattern::Nin), "NIN must be valid format"),
                Constrained::new(Constraint::MinLength(14), "NIN must be at least 14 characters"),
            ],
        },
        FieldRule {
            path: "location",
            kind: FieldKind::Text,
            presence: WHEN_CREDIT,
            constraints: &[
                Constrained::new(Constraint::MinLength(2), "Location must be at least 2 characters"),
                Constrained::new(ALNUM_SPACE, "Location must be alpha-numeric"),
            ],
        },
        FieldRule {
            path: "contact",
            kind: FieldKind::Text,
            presence: WHEN_CREDIT,
            constraints: &[Constrained::new(
                Constraint::Pattern(Pattern::Phone),
                "Contact must be a valid phone number",
            )],
        },
        FieldRule {
            path: "salesAgentName",
            kind: FieldKind::Text,
            presence: Presence::Required,
            constraints: &[
                Constrained::new(
                    Constraint::MinLength(2),
                    "Sales Agent Name must be at least 2 characters",
                ),
                Constrained::new(ALNUM_SPACE, "Sales Agent Name must be alpha-numeric"),
            ],
        },
        FieldRule {
            path: "dueDate",
            kind: FieldKind::Date,
            presence: WHEN_CREDIT,
            constraints: &[],
        },
        FieldRule {
            path: "dispatchDate",
            kind: FieldKind::Date,
            presence: WHEN_CREDIT,
            constraints: &[],
        },
        FieldRule {
            path: "date",
            kind: FieldKind::Date,
            presence: WHEN_CASH,
            constraints: &[],
        },
        FieldRule {
            path: "time",
            kind: FieldKind::Text,
            presence: WHEN_CASH,
            constraints: &[],
        },
    ],
};
