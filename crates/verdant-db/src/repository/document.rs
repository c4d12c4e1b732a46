//! # Document Repository
//!
//! Every collection is stored as JSON documents in its own table:
//!
//! ```text
//! ┌──────────────┬──────────┬──────────────────────────────┬────────────┐
//! │ id (PK)      │ position │ payload (serde JSON)         │ updated_at │
//! ├──────────────┼──────────┼──────────────────────────────┼────────────┤
//! │ 3f2a…        │ 0        │ {"id":"3f2a…","name":"OG…"}  │ 2026-04-…  │
//! │ 91bc…        │ 1        │ {"id":"91bc…","name":"Bl…"}  │ 2026-04-…  │
//! └──────────────┴──────────┴──────────────────────────────┴────────────┘
//! ```
//!
//! `position` preserves the in-memory order; `list` returns rows in it.

use std::marker::PhantomData;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use verdant_core::{CashRegisterSession, Customer, Expense, Product, Sale, SaleLog};

use crate::error::DbResult;

// =============================================================================
// Document Trait
// =============================================================================

/// A domain record stored as one JSON row.
pub trait Document: Serialize + DeserializeOwned + Send + Sync + Unpin + 'static {
    /// Table holding this document type.
    const TABLE: &'static str;

    fn id(&self) -> &str;
}

impl Document for Product {
    const TABLE: &'static str = "products";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Document for Customer {
    const TABLE: &'static str = "customers";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Document for Sale {
    const TABLE: &'static str = "sales";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Document for SaleLog {
    const TABLE: &'static str = "sale_logs";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Document for CashRegisterSession {
    const TABLE: &'static str = "register_sessions";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Document for Expense {
    const TABLE: &'static str = "expenses";

    fn id(&self) -> &str {
        &self.id
    }
}

// =============================================================================
// Repository
// =============================================================================

/// CRUD over one document table.
#[derive(Debug, Clone)]
pub struct DocumentRepository<T> {
    pool: SqlitePool,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Document> DocumentRepository<T> {
    pub fn new(pool: SqlitePool) -> Self {
        DocumentRepository {
            pool,
            _marker: PhantomData,
        }
    }

    /// All documents in stored order.
    pub async fn list(&self) -> DbResult<Vec<T>> {
        let sql = format!("SELECT payload FROM {} ORDER BY position, id", T::TABLE);
        let rows: Vec<(String,)> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        let docs = rows
            .into_iter()
            .map(|(payload,)| serde_json::from_str(&payload))
            .collect::<Result<Vec<T>, _>>()?;

        debug!(table = T::TABLE, count = docs.len(), "Documents loaded");
        Ok(docs)
    }

    pub async fn get(&self, id: &str) -> DbResult<Option<T>> {
        let sql = format!("SELECT payload FROM {} WHERE id = ?1", T::TABLE);
        let row: Option<(String,)> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some((payload,)) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    /// Inserts at the end of the table or replaces the payload in place.
    pub async fn upsert(&self, doc: &T) -> DbResult<()> {
        let payload = serde_json::to_string(doc)?;
        let sql = format!(
            r#"
            INSERT INTO {table} (id, position, payload, updated_at)
            VALUES (?1, (SELECT COALESCE(MAX(position), -1) + 1 FROM {table}), ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
            table = T::TABLE
        );

        sqlx::query(&sql)
            .bind(doc.id())
            .bind(payload)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        debug!(table = T::TABLE, id = %doc.id(), "Document upserted");
        Ok(())
    }

    /// Deletes a document. Returns false when it did not exist.
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", T::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        Ok(result.rows_affected() > 0)
    }

    /// Rewrites the whole table with `docs`, in one transaction.
    ///
    /// A failure part way leaves the previous contents intact.
    pub async fn replace_all(&self, docs: &[T]) -> DbResult<()> {
        let delete_sql = format!("DELETE FROM {}", T::TABLE);
        let insert_sql = format!(
            "INSERT INTO {} (id, position, payload, updated_at) VALUES (?1, ?2, ?3, ?4)",
            T::TABLE
        );
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        sqlx::query(&delete_sql).execute(&mut *tx).await?;

        for (position, doc) in docs.iter().enumerate() {
            let payload = serde_json::to_string(doc)?;
            sqlx::query(&insert_sql)
                .bind(doc.id())
                .bind(position as i64)
                .bind(payload)
                .bind(now)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        debug!(table = T::TABLE, count = docs.len(), "Table rewritten");
        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", T::TABLE);
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
