use crate::product::CatalogStore;
use agora_core::{Amount, Identity, MarketError, MarketResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountKind {
    /// Absolute reduction of the unit price.
    Flat,
    /// Percentage reduction, applied with truncating integer division.
    Percentage,
}

/// Time-bounded discount record. Immutable once created; expires when the
/// current instant passes `valid_until`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    pub id: u64,
    pub kind: DiscountKind,
    pub value: u64,
    pub valid_until: DateTime<Utc>,
}

impl Discount {
    /// Apply the discount to a unit price. Flat values above the price and
    /// percentages above 100 fault instead of clamping.
    fn apply(&self, original_price: Amount) -> MarketResult<Amount> {
        match self.kind {
            DiscountKind::Flat => original_price
                .checked_sub(self.value)
                .ok_or(MarketError::ArithmeticFault("flat discount exceeds unit price")),
            DiscountKind::Percentage => {
                let keep = 100u64
                    .checked_sub(self.value)
                    .ok_or(MarketError::ArithmeticFault("discount percentage exceeds 100"))?;
                let scaled = original_price
                    .checked_mul(keep)
                    .ok_or(MarketError::ArithmeticFault("discounted price overflows"))?;
                Ok(scaled / 100)
            }
        }
    }
}

/// Discount records keyed by the ids a dedicated counter assigns them.
///
/// Pricing lookups index this map by *product* id (see
/// `price_after_discount`), while creation keys records by discount id. The
/// two counters advance independently, so a discount only takes effect when
/// its id collides with the id of a product. This mismatch is inherited
/// ledger behavior and is kept exactly as documented.
#[derive(Debug, Default)]
pub struct DiscountBook {
    discounts: HashMap<u64, Discount>,
    next_discount_id: u64,
}

impl DiscountBook {
    pub fn new() -> Self {
        Self {
            discounts: HashMap::new(),
            next_discount_id: 1,
        }
    }

    /// Record a discount for a target product. Only the product's vendor may
    /// create one; a nonexistent product reads as nil-owned, so every real
    /// caller is rejected.
    pub fn add_discount(
        &mut self,
        catalog: &CatalogStore,
        product_id: u64,
        kind: DiscountKind,
        value: u64,
        valid_until: DateTime<Utc>,
        caller: &Identity,
    ) -> MarketResult<u64> {
        if *caller != catalog.vendor_of(product_id) {
            return Err(MarketError::Unauthorized(caller.clone()));
        }
        let discount_id = self.next_discount_id;
        self.discounts.insert(
            discount_id,
            Discount {
                id: discount_id,
                kind,
                value,
                valid_until,
            },
        );
        self.next_discount_id += 1;
        info!(discount_id, product_id, "discount recorded");
        Ok(discount_id)
    }

    /// Effective unit price for a product at `now`.
    ///
    /// The lookup uses the product id as if it were a discount id. A missing
    /// or expired record leaves the price unchanged; an active record
    /// applies, faulting on invalid arithmetic.
    pub fn price_after_discount(
        &self,
        product_id: u64,
        original_price: Amount,
        now: DateTime<Utc>,
    ) -> MarketResult<Amount> {
        match self.discounts.get(&product_id) {
            Some(discount) if discount.valid_until >= now => discount.apply(original_price),
            _ => Ok(original_price),
        }
    }

    pub fn get(&self, discount_id: u64) -> Option<&Discount> {
        self.discounts.get(&discount_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn future() -> DateTime<Utc> {
        Utc::now() + Duration::days(7)
    }

    fn catalog_with_product(vendor: &Identity, price: Amount) -> (CatalogStore, u64) {
        let mut catalog = CatalogStore::new();
        let id = catalog.add_product("widget".into(), price, 10, vendor);
        (catalog, id)
    }

    #[test]
    fn only_product_vendor_may_add() {
        let vendor = Identity::new();
        let intruder = Identity::new();
        let (catalog, product_id) = catalog_with_product(&vendor, 100);
        let mut book = DiscountBook::new();

        let err = book
            .add_discount(&catalog, product_id, DiscountKind::Flat, 10, future(), &intruder)
            .unwrap_err();
        assert_eq!(err, MarketError::Unauthorized(intruder));

        book.add_discount(&catalog, product_id, DiscountKind::Flat, 10, future(), &vendor)
            .unwrap();
    }

    #[test]
    fn add_for_missing_product_is_unauthorized() {
        let catalog = CatalogStore::new();
        let mut book = DiscountBook::new();
        let caller = Identity::new();

        let err = book
            .add_discount(&catalog, 9, DiscountKind::Flat, 10, future(), &caller)
            .unwrap_err();
        assert_eq!(err, MarketError::Unauthorized(caller));
    }

    #[test]
    fn discount_ids_advance_independently_of_product_ids() {
        let vendor = Identity::new();
        let mut catalog = CatalogStore::new();
        let first = catalog.add_product("a".into(), 100, 1, &vendor);
        let second = catalog.add_product("b".into(), 100, 1, &vendor);
        let mut book = DiscountBook::new();

        // Discount targets product 2 but is stored under discount id 1, so
        // pricing finds it for product 1 and not for product 2.
        let discount_id = book
            .add_discount(&catalog, second, DiscountKind::Flat, 30, future(), &vendor)
            .unwrap();
        assert_eq!(discount_id, first);

        let now = Utc::now();
        assert_eq!(book.price_after_discount(first, 100, now).unwrap(), 70);
        assert_eq!(book.price_after_discount(second, 100, now).unwrap(), 100);
    }

    #[test]
    fn flat_discount_subtracts() {
        let vendor = Identity::new();
        let (catalog, product_id) = catalog_with_product(&vendor, 100);
        let mut book = DiscountBook::new();
        book.add_discount(&catalog, product_id, DiscountKind::Flat, 25, future(), &vendor)
            .unwrap();

        assert_eq!(book.price_after_discount(product_id, 100, Utc::now()).unwrap(), 75);
    }

    #[test]
    fn flat_discount_above_price_faults() {
        let vendor = Identity::new();
        let (catalog, product_id) = catalog_with_product(&vendor, 100);
        let mut book = DiscountBook::new();
        book.add_discount(&catalog, product_id, DiscountKind::Flat, 150, future(), &vendor)
            .unwrap();

        let err = book
            .price_after_discount(product_id, 100, Utc::now())
            .unwrap_err();
        assert!(matches!(err, MarketError::ArithmeticFault(_)));
    }

    #[test]
    fn percentage_discount_truncates() {
        let vendor = Identity::new();
        let (catalog, product_id) = catalog_with_product(&vendor, 50);
        let mut book = DiscountBook::new();
        book.add_discount(&catalog, product_id, DiscountKind::Percentage, 20, future(), &vendor)
            .unwrap();

        // 50 * (100 - 20) / 100 = 40
        assert_eq!(book.price_after_discount(product_id, 50, Utc::now()).unwrap(), 40);
        // truncating division: 99 * 80 / 100 = 79.2 -> 79
        assert_eq!(book.price_after_discount(product_id, 99, Utc::now()).unwrap(), 79);
    }

    #[test]
    fn percentage_above_hundred_faults() {
        let vendor = Identity::new();
        let (catalog, product_id) = catalog_with_product(&vendor, 100);
        let mut book = DiscountBook::new();
        book.add_discount(&catalog, product_id, DiscountKind::Percentage, 120, future(), &vendor)
            .unwrap();

        let err = book
            .price_after_discount(product_id, 100, Utc::now())
            .unwrap_err();
        assert!(matches!(err, MarketError::ArithmeticFault(_)));
    }

    #[test]
    fn expired_discount_leaves_price_unchanged() {
        let vendor = Identity::new();
        let (catalog, product_id) = catalog_with_product(&vendor, 100);
        let mut book = DiscountBook::new();
        let valid_until = Utc::now();
        book.add_discount(&catalog, product_id, DiscountKind::Flat, 40, valid_until, &vendor)
            .unwrap();

        // active at the boundary instant, expired one second later
        assert_eq!(book.price_after_discount(product_id, 100, valid_until).unwrap(), 60);
        let later = valid_until + Duration::seconds(1);
        assert_eq!(book.price_after_discount(product_id, 100, later).unwrap(), 100);
    }

    #[test]
    fn no_discount_record_leaves_price_unchanged() {
        let book = DiscountBook::new();
        assert_eq!(book.price_after_discount(1, 100, Utc::now()).unwrap(), 100);
    }
}
