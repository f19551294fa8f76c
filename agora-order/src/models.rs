use agora_core::{Amount, Identity, COIN};
use serde::{Deserialize, Serialize};

/// Shipping options with a fixed cost table. Shipping is charged on top of
/// the order total and never included in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShippingOption {
    Standard,
    Express,
    Overnight,
}

impl ShippingOption {
    /// Flat shipping cost: 0.01 / 0.02 / 0.05 coin.
    pub const fn cost(self) -> Amount {
        match self {
            ShippingOption::Standard => COIN / 100,
            ShippingOption::Express => COIN / 50,
            ShippingOption::Overnight => COIN / 20,
        }
    }
}

/// A settled purchase. `total` is fixed at creation and excludes shipping;
/// `fulfilled` flips false to true at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub buyer: Identity,
    pub total: Amount,
    pub fulfilled: bool,
    pub shipping_option: ShippingOption,
}
