use agora_core::{Amount, Identity, MarketError, MarketResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

/// A vendor-owned catalog entry. Never deleted; mutated only by a wholesale
/// replace issued by the owning vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub unit_price: Amount,
    pub available_quantity: u64,
    pub vendor: Identity,
}

/// Product registry with a monotonic id counter advanced only by
/// `add_product`.
#[derive(Debug, Default)]
pub struct CatalogStore {
    products: HashMap<u64, Product>,
    next_product_id: u64,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self {
            products: HashMap::new(),
            next_product_id: 1,
        }
    }

    /// Register a new product owned by the caller. No validation on price or
    /// quantity; zero is allowed for both.
    pub fn add_product(
        &mut self,
        name: String,
        unit_price: Amount,
        available_quantity: u64,
        caller: &Identity,
    ) -> u64 {
        let product_id = self.next_product_id;
        self.products.insert(
            product_id,
            Product {
                id: product_id,
                name,
                unit_price,
                available_quantity,
                vendor: caller.clone(),
            },
        );
        self.next_product_id += 1;
        info!(product_id, vendor = %caller, "product registered");
        product_id
    }

    /// Wholesale replace of a product's fields by its owning vendor. The
    /// vendor field is re-set to the caller, which the guard has already
    /// proven equal to the stored vendor, so ownership never changes.
    pub fn update_product(
        &mut self,
        product_id: u64,
        name: String,
        unit_price: Amount,
        available_quantity: u64,
        caller: &Identity,
    ) -> MarketResult<()> {
        if *caller != self.vendor_of(product_id) {
            return Err(MarketError::Unauthorized(caller.clone()));
        }
        self.products.insert(
            product_id,
            Product {
                id: product_id,
                name,
                unit_price,
                available_quantity,
                vendor: caller.clone(),
            },
        );
        info!(product_id, vendor = %caller, "product replaced");
        Ok(())
    }

    pub fn get(&self, product_id: u64) -> Option<&Product> {
        self.products.get(&product_id)
    }

    /// Stored vendor for a product id. An id that has never been created
    /// reads as the nil identity, so no real caller can pass an ownership
    /// check against it.
    pub fn vendor_of(&self, product_id: u64) -> Identity {
        self.products
            .get(&product_id)
            .map(|p| p.vendor.clone())
            .unwrap_or_default()
    }
}
