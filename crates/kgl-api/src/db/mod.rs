//! # Database Persistence Layer
//!
//! PostgreSQL persistence via SQLx, with an in-memory backend used by tests
//! and local development.
//!
//! ## Tables
//!
//! - `procurements`: one row per [`Procurement`]
//! - `sales`: one row per [`Sale`]; credit-only columns are NULL for cash
//!   sales and vice versa
//!
//! Records are written once. Migrations are embedded from `./migrations`
//! and applied on connect.

pub mod procurements;
pub mod sales;

use kgl_core::{Procurement, Record, Sale, Stored};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;

use crate::state::Store;

/// Errors raised by the record store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Connect to PostgreSQL and apply pending migrations.
///
/// Failure here is fatal at startup.
pub async fn connect(uri: &str) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(uri)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}

/// In-memory tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub procurements: Store<Stored<Procurement>>,
    pub sales: Store<Stored<Sale>>,
}

/// Where records are written.
#[derive(Debug, Clone)]
pub enum RecordStore {
    Memory(MemoryStore),
    Postgres(PgPool),
}

impl RecordStore {
    pub fn memory() -> Self {
        Self::Memory(MemoryStore::default())
    }

    pub async fn insert_procurement(&self, record: &Stored<Procurement>) -> Result<(), StoreError> {
        match self {
            Self::Memory(mem) => {
                mem.procurements.insert(record.id, record.clone());
            }
            Self::Postgres(pool) => procurements::insert(pool, record).await?,
        }
        tracing::info!(
            table = Procurement::COLLECTION,
            id = %record.id,
            branch = %record.record.branch,
            "procurement recorded"
        );
        Ok(())
    }

    pub async fn insert_sale(&self, record: &Stored<Sale>) -> Result<(), StoreError> {
        match self {
            Self::Memory(mem) => {
                mem.sales.insert(record.id, record.clone());
            }
            Self::Postgres(pool) => sales::insert(pool, record).await?,
        }
        tracing::info!(
            table = Sale::COLLECTION,
            id = %record.id,
            sale_type = %record.record.sale_type(),
            "sale recorded"
        );
        Ok(())
    }

    /// Round-trip to the backing database. Always succeeds in memory.
    pub async fn ping(&self) -> Result<(), StoreError> {
        match self {
            Self::Memory(_) => Ok(()),
            Self::Postgres(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn procurement() -> Procurement {
        let Value::Object(body) = json!({
            "produceName": "Maize",
            "produceType": "Cereal",
            "date": "2026-02-14",
            "time": "10:30",
            "tonnage": 150,
            "cost": 20000,
            "dealerName": "Okello",
            "branch": "Maganjo",
            "contact": "0772123456",
            "sellingPrice": 15000
        }) else {
            unreachable!()
        };
        Procurement::from_body(&body).unwrap()
    }

    #[tokio::test]
    async fn memory_store_keeps_every_insert() {
        let store = RecordStore::memory();
        let a = Stored::new(procurement());
        let b = Stored::new(procurement());
        store.insert_procurement(&a).await.unwrap();
        store.insert_procurement(&b).await.unwrap();

        let RecordStore::Memory(mem) = &store else {
            panic!("expected memory store");
        };
        assert_eq!(mem.procurements.len(), 2);
        assert_eq!(mem.procurements.insert(a.id, a.clone()), Some(a));
        assert!(mem.sales.is_empty());
    }

    #[tokio::test]
    async fn memory_ping_succeeds() {
        assert!(RecordStore::memory().ping().await.is_ok());
    }
}
