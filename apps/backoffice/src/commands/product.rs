//! # Product Commands
//!
//! Catalog listing and CRUD.
//!
//! ## Search Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  list_products(query: "kush")                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  case-insensitive match on name OR category                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Vec<Product> in catalog order (status already derived from stock)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Instant;

use tracing::debug;

use verdant_core::{NewProduct, Product, ProductPatch};

use crate::error::ApiError;
use crate::state::StoreState;

/// Lists products, optionally filtered by a name or category fragment.
pub async fn list_products(
    store: &StoreState,
    query: Option<String>,
) -> Result<Vec<Product>, ApiError> {
    let start = Instant::now();
    let needle = query
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    let products: Vec<Product> = store.with_store(|s| {
        s.products()
            .iter()
            .filter(|p| match &needle {
                Some(n) => {
                    p.name.to_lowercase().contains(n) || p.category.to_lowercase().contains(n)
                }
                None => true,
            })
            .cloned()
            .collect()
    });

    debug!(
        query = ?needle,
        results = products.len(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "list_products"
    );
    Ok(products)
}

/// Products at or below the low-stock threshold, including sold out ones.
pub async fn low_stock_products(store: &StoreState) -> Result<Vec<Product>, ApiError> {
    let products: Vec<Product> =
        store.with_store(|s| s.low_stock_products().into_iter().cloned().collect());
    debug!(count = products.len(), "low_stock_products");
    Ok(products)
}

pub async fn create_product(store: &StoreState, input: NewProduct) -> Result<Product, ApiError> {
    debug!(name = %input.name, "create_product");
    Ok(store.with_store_mut(|s| s.create_product(input))?)
}

/// Applies `patch`. `None` when no product has that id.
pub async fn update_product(
    store: &StoreState,
    id: String,
    patch: ProductPatch,
) -> Result<Option<Product>, ApiError> {
    debug!(product_id = %id, "update_product");
    Ok(store.with_store_mut(|s| s.update_product(&id, patch))?)
}

/// Deletes a product. Past sales keep their name snapshot.
pub async fn delete_product(store: &StoreState, id: String) -> Result<bool, ApiError> {
    debug!(product_id = %id, "delete_product");
    Ok(store.with_store_mut(|s| s.delete_product(&id)))
}
