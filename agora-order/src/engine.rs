use crate::approval::ApprovalGate;
use crate::models::{Order, ShippingOption};
use agora_catalog::{CatalogStore, DiscountBook, DiscountKind};
use agora_core::{
    Amount, Clock, EventSink, Identity, MarketConfig, MarketError, MarketEvent, MarketResult,
    PaymentGateway,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// The marketplace ledger facade: product registry, discount book, order
/// settlement and the quorum gate, behind one serialized mutation surface.
///
/// Every public operation is atomic. All checks, pricing arithmetic and the
/// refund transfer run before the first map write, so a failure at any step
/// leaves no partial state and publishes no event.
pub struct Marketplace {
    config: MarketConfig,
    catalog: CatalogStore,
    discounts: DiscountBook,
    orders: HashMap<u64, Order>,
    next_order_id: u64,
    gate: ApprovalGate,
    clock: Arc<dyn Clock>,
    gateway: Arc<dyn PaymentGateway>,
    events: Arc<dyn EventSink>,
}

impl Marketplace {
    pub fn new(
        config: MarketConfig,
        clock: Arc<dyn Clock>,
        gateway: Arc<dyn PaymentGateway>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            config,
            catalog: CatalogStore::new(),
            discounts: DiscountBook::new(),
            orders: HashMap::new(),
            next_order_id: 1,
            gate: ApprovalGate::new(),
            clock,
            gateway,
            events,
        }
    }

    /// Register a product owned by the caller.
    pub fn add_product(
        &mut self,
        name: String,
        unit_price: Amount,
        available_quantity: u64,
        caller: &Identity,
    ) -> u64 {
        let product_id =
            self.catalog
                .add_product(name.clone(), unit_price, available_quantity, caller);
        self.events.publish(MarketEvent::ProductCreated {
            product_id,
            vendor: caller.clone(),
            name,
            unit_price,
        });
        product_id
    }

    /// Wholesale-replace a product; only its vendor may do so.
    pub fn update_product(
        &mut self,
        product_id: u64,
        name: String,
        unit_price: Amount,
        available_quantity: u64,
        caller: &Identity,
    ) -> MarketResult<()> {
        self.catalog
            .update_product(product_id, name, unit_price, available_quantity, caller)
    }

    /// Record a time-bounded discount for a product; only its vendor may.
    pub fn add_discount(
        &mut self,
        product_id: u64,
        kind: DiscountKind,
        value: u64,
        valid_until: DateTime<Utc>,
        caller: &Identity,
    ) -> MarketResult<u64> {
        let discount_id = self.discounts.add_discount(
            &self.catalog,
            product_id,
            kind,
            value,
            valid_until,
            caller,
        )?;
        self.events.publish(MarketEvent::DiscountCreated {
            discount_id,
            product_id,
            vendor: caller.clone(),
        });
        Ok(discount_id)
    }

    /// Price, validate and settle a multi-line order.
    ///
    /// Stock is checked against the requested quantities but never
    /// decremented. Overpayment beyond total plus shipping is refunded
    /// through the gateway; the refund runs before any record is written, so
    /// a rejected transfer aborts the whole placement.
    pub fn place_order(
        &mut self,
        product_ids: &[u64],
        quantities: &[u64],
        shipping_option: ShippingOption,
        shipping_address: &str,
        payment: Amount,
        buyer: &Identity,
    ) -> MarketResult<u64> {
        if product_ids.len() != quantities.len() {
            return Err(MarketError::InvalidInput(format!(
                "{} product ids but {} quantities",
                product_ids.len(),
                quantities.len()
            )));
        }
        let now = self.clock.now();

        let mut total: Amount = 0;
        for (&product_id, &quantity) in product_ids.iter().zip(quantities) {
            // an id that was never created reads as a zero-price,
            // zero-quantity record
            let (unit_price, available) = self
                .catalog
                .get(product_id)
                .map(|p| (p.unit_price, p.available_quantity))
                .unwrap_or_default();
            if available < quantity {
                return Err(MarketError::InsufficientResource {
                    resource: "stock",
                    requested: quantity,
                    available,
                });
            }
            let unit = self
                .discounts
                .price_after_discount(product_id, unit_price, now)?;
            let line = unit
                .checked_mul(quantity)
                .ok_or(MarketError::ArithmeticFault("line total overflows"))?;
            total = total
                .checked_add(line)
                .ok_or(MarketError::ArithmeticFault("order total overflows"))?;
        }

        let shipping = shipping_option.cost();
        let due = total
            .checked_add(shipping)
            .ok_or(MarketError::ArithmeticFault("amount due overflows"))?;
        if payment < due {
            return Err(MarketError::InsufficientResource {
                resource: "funds",
                requested: due,
                available: payment,
            });
        }

        let refund = payment - due;
        if refund > 0 {
            self.gateway
                .transfer(buyer, refund)
                .map_err(|_| MarketError::TransferFailed {
                    to: buyer.clone(),
                    amount: refund,
                })?;
        }

        let order_id = self.next_order_id;
        self.orders.insert(
            order_id,
            Order {
                id: order_id,
                buyer: buyer.clone(),
                total,
                fulfilled: false,
                shipping_option,
            },
        );
        self.next_order_id += 1;
        if total >= self.config.high_value_threshold {
            self.gate.open(order_id);
        }
        self.events.publish(MarketEvent::OrderCreated {
            order_id,
            buyer: buyer.clone(),
            total,
            shipping_address: shipping_address.to_string(),
        });
        info!(order_id, buyer = %buyer, total, refund, "order placed");
        Ok(order_id)
    }

    /// Cast one approval toward a high-value order's quorum. Reaching quorum
    /// fulfills the order within the same operation.
    pub fn approve(&mut self, order_id: u64, approver: &Identity) -> MarketResult<()> {
        if !self.config.is_approver(approver) {
            return Err(MarketError::Unauthorized(approver.clone()));
        }
        let total = self
            .orders
            .get(&order_id)
            .map(|o| o.total)
            .unwrap_or_default();
        if total < self.config.high_value_threshold {
            return Err(MarketError::NotEligible(order_id));
        }
        if self.gate.has_approved(order_id, approver) {
            return Err(MarketError::AlreadyDone(format!(
                "approver {approver} already approved order {order_id}"
            )));
        }

        // quorum compares the post-increment tally against floor(n / 2)
        let reaches_quorum = self.gate.approvals(order_id) + 1 >= self.config.quorum();
        if reaches_quorum && self.orders.get(&order_id).map_or(true, |o| o.fulfilled) {
            // the embedded fulfillment would fail, so nothing is recorded
            return Err(MarketError::AlreadyDone(format!(
                "order {order_id} is already fulfilled"
            )));
        }

        let approvals = self.gate.record_approval(order_id, approver.clone());
        self.events.publish(MarketEvent::OrderApproved {
            order_id,
            approver: approver.clone(),
            approvals,
        });
        info!(order_id, approver = %approver, approvals, "order approved");
        if reaches_quorum {
            self.mark_fulfilled(order_id);
        }
        Ok(())
    }

    /// Flip an order to fulfilled. Carries no caller restriction and is
    /// independent of the approval gate; it only refuses orders that are
    /// unknown or already fulfilled.
    pub fn fulfill(&mut self, order_id: u64) -> MarketResult<()> {
        match self.orders.get(&order_id) {
            Some(order) if !order.fulfilled => {
                self.mark_fulfilled(order_id);
                Ok(())
            }
            _ => Err(MarketError::AlreadyDone(format!(
                "order {order_id} is already fulfilled or unknown"
            ))),
        }
    }

    fn mark_fulfilled(&mut self, order_id: u64) {
        if let Some(order) = self.orders.get_mut(&order_id) {
            order.fulfilled = true;
        }
        self.events.publish(MarketEvent::OrderFulfilled { order_id });
        info!(order_id, "order fulfilled");
    }

    /// A product's unit price after any active discount, at the current
    /// clock instant.
    pub fn effective_price(&self, product_id: u64) -> MarketResult<Amount> {
        let unit_price = self
            .catalog
            .get(product_id)
            .map(|p| p.unit_price)
            .unwrap_or_default();
        self.discounts
            .price_after_discount(product_id, unit_price, self.clock.now())
    }

    pub fn shipping_cost(option: ShippingOption) -> Amount {
        option.cost()
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn discounts(&self) -> &DiscountBook {
        &self.discounts
    }

    pub fn order(&self, order_id: u64) -> Option<&Order> {
        self.orders.get(&order_id)
    }

    pub fn approvals(&self, order_id: u64) -> u64 {
        self.gate.approvals(order_id)
    }

    pub fn gate(&self) -> &ApprovalGate {
        &self.gate
    }
}
