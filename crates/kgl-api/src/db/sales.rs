//! Sale persistence operations on the `sales` table.
//!
//! Cash and credit sales share one table; the columns of the other variant
//! are written as NULL.

use chrono::{DateTime, Utc};
use kgl_core::{Sale, SaleTerms, Stored};
use sqlx::PgPool;

#[derive(Default)]
struct TermColumns<'a> {
    amount_paid: Option<f64>,
    date: Option<DateTime<Utc>>,
    time: Option<&'a str>,
    produce_type: Option<&'a str>,
    amount_due: Option<f64>,
    nin: Option<&'a str>,
    location: Option<&'a str>,
    contact: Option<&'a str>,
    due_date: Option<DateTime<Utc>>,
    dispatch_date: Option<DateTime<Utc>>,
}

impl<'a> From<&'a SaleTerms> for TermColumns<'a> {
    fn from(terms: &'a SaleTerms) -> Self {
        match terms {
            SaleTerms::Cash(cash) => Self {
                amount_paid: Some(cash.amount_paid.value()),
                date: Some(cash.date),
                time: Some(&cash.time),
                ..Self::default()
            },
            SaleTerms::Credit(credit) => Self {
                produce_type: Some(&credit.produce_type),
                amount_due: Some(credit.amount_due.value()),
                nin: Some(&credit.nin),
                location: Some(&credit.location),
                contact: Some(&credit.contact),
                due_date: Some(credit.due_date),
                dispatch_date: Some(credit.dispatch_date),
                ..Self::default()
            },
        }
    }
}

/// Insert a new sale record.
pub async fn insert(pool: &PgPool, stored: &Stored<Sale>) -> Result<(), sqlx::Error> {
    let sale = &stored.record;
    let terms = TermColumns::from(&sale.terms);
    sqlx::query(
        "INSERT INTO sales (id, sale_type, produce_name, tonnage, buyer_name,
         sales_agent_name, amount_paid, date, time, produce_type, amount_due, nin,
         location, contact, due_date, dispatch_date)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)",
    )
    .bind(stored.id)
    .bind(sale.sale_type().as_str())
    .bind(&sale.common.produce_name)
    .bind(sale.common.tonnage.value())
    .bind(&sale.common.buyer_name)
    .bind(&sale.common.sales_agent_name)
    .bind(terms.amount_paid)
    .bind(terms.date)
    .bind(terms.time)
    .bind(terms.produce_type)
    .bind(terms.amount_due)
    .bind(terms.nin)
    .bind(terms.location)
    .bind(terms.contact)
    .bind(terms.due_date)
    .bind(terms.dispatch_date)
    .execute(pool)
    .await?;

    Ok(())
}
