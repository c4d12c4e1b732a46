//! # Product Catalog
//!
//! Record CRUD for products. Stock is also changed indirectly by completed
//! sales (see [`crate::inventory`]); both paths keep `status` derived from
//! `stock_quantity`.

use tracing::{debug, info};

use crate::error::CoreResult;
use crate::store::{new_id, Collection, Store};
use crate::types::{NewProduct, Product, ProductPatch, StockStatus};
use crate::validation::{validate_new_product, validate_product_patch};

impl Store {
    /// All products in catalog order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products that need reordering (low or out of stock), lowest stock first.
    pub fn low_stock_products(&self) -> Vec<&Product> {
        let mut low: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| p.status != StockStatus::InStock)
            .collect();
        low.sort_by_key(|p| p.stock_quantity);
        low
    }

    pub fn create_product(&mut self, input: NewProduct) -> CoreResult<Product> {
        validate_new_product(&input)?;

        let now = self.now();
        let product = Product {
            id: new_id(),
            name: input.name.trim().to_string(),
            category: input.category.trim().to_string(),
            description: input.description,
            price_cents: input.price_cents,
            cost_cents: input.cost_cents,
            stock_quantity: input.stock_quantity,
            stock_unit: input.stock_unit,
            status: StockStatus::for_quantity(input.stock_quantity),
            created_at: now,
            updated_at: now,
        };

        info!(product_id = %product.id, name = %product.name, "Product created");

        self.products.push(product.clone());
        self.mark(Collection::Products);
        Ok(product)
    }

    /// Applies a patch. Returns `Ok(None)` when the product does not exist.
    pub fn update_product(&mut self, id: &str, patch: ProductPatch) -> CoreResult<Option<Product>> {
        validate_product_patch(&patch)?;

        let now = self.now();
        let Some(product) = self.products.iter_mut().find(|p| p.id == id) else {
            debug!(product_id = %id, "Update of unknown product ignored");
            return Ok(None);
        };

        if let Some(name) = patch.name {
            product.name = name.trim().to_string();
        }
        if let Some(category) = patch.category {
            product.category = category.trim().to_string();
        }
        if let Some(description) = patch.description {
            product.description = description;
        }
        if let Some(price) = patch.price_cents {
            product.price_cents = price;
        }
        if let Some(cost) = patch.cost_cents {
            product.cost_cents = cost;
        }
        if let Some(stock) = patch.stock_quantity {
            product.stock_quantity = stock;
        }
        if let Some(unit) = patch.stock_unit {
            product.stock_unit = unit;
        }
        product.status = StockStatus::for_quantity(product.stock_quantity);
        product.updated_at = now;

        let updated = product.clone();
        info!(product_id = %id, stock = updated.stock_quantity, "Product updated");

        self.mark(Collection::Products);
        Ok(Some(updated))
    }

    /// Deletes a product. Past sale lines keep their name snapshot.
    pub fn delete_product(&mut self, id: &str) -> bool {
        let before = self.products.len();
        self.products.retain(|p| p.id != id);

        let removed = self.products.len() != before;
        if removed {
            info!(product_id = %id, "Product deleted");
            self.mark(Collection::Products);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use crate::store::tests::{new_product, test_store};
    use crate::types::{ProductPatch, StockStatus};

    #[test]
    fn test_create_derives_status() {
        let (mut store, _clock) = test_store();

        let plenty = store.create_product(new_product("Blue Dream", 1200, 40)).unwrap();
        let few = store.create_product(new_product("Gelato", 1800, 3)).unwrap();
        let none = store.create_product(new_product("Sour Diesel", 1400, 0)).unwrap();

        assert_eq!(plenty.status, StockStatus::InStock);
        assert_eq!(few.status, StockStatus::LowStock);
        assert_eq!(none.status, StockStatus::OutOfStock);
        assert_eq!(store.low_stock_products().len(), 2);
        assert_eq!(store.low_stock_products()[0].name, "Sour Diesel");
    }

    #[test]
    fn test_create_rejects_negative_price() {
        let (mut store, _clock) = test_store();
        let mut input = new_product("Bad", 0, 1);
        input.price_cents = -1;

        assert!(store.create_product(input).is_err());
        assert!(store.products().is_empty());
        assert!(!store.has_changes());
    }

    #[test]
    fn test_update_recomputes_status_and_clears_description() {
        let (mut store, _clock) = test_store();
        let mut input = new_product("Gelato", 1800, 30);
        input.description = Some("Sweet".to_string());
        let product = store.create_product(input).unwrap();

        let patch = ProductPatch {
            stock_quantity: Some(4),
            description: Some(None),
            ..Default::default()
        };
        let updated = store.update_product(&product.id, patch).unwrap().unwrap();

        assert_eq!(updated.stock_quantity, 4);
        assert_eq!(updated.status, StockStatus::LowStock);
        assert_eq!(updated.description, None);
    }

    #[test]
    fn test_update_and_delete_missing_are_noops() {
        let (mut store, _clock) = test_store();

        assert!(store
            .update_product("missing", ProductPatch::default())
            .unwrap()
            .is_none());
        assert!(!store.delete_product("missing"));
        assert!(!store.has_changes());
    }
}
