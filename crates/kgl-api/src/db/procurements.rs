//! Procurement persistence operations on the `procurements` table.

use kgl_core::{Procurement, Stored};
use sqlx::PgPool;

/// Insert a new procurement record.
pub async fn insert(pool: &PgPool, stored: &Stored<Procurement>) -> Result<(), sqlx::Error> {
    let r = &stored.record;
    sqlx::query(
        "INSERT INTO procurements (id, produce_name, produce_type, date, time, tonnage,
         cost, dealer_name, branch, contact, selling_price)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
    )
    .bind(stored.id)
    .bind(&r.produce_name)
    .bind(&r.produce_type)
    .bind(r.date)
    .bind(&r.time)
    .bind(r.tonnage.value())
    .bind(r.cost.value())
    .bind(&r.dealer_name)
    .bind(r.branch.as_str())
    .bind(&r.contact)
    .bind(r.selling_price.value())
    .execute(pool)
    .await?;

    Ok(())
}
