pub mod discount;
pub mod product;

pub use discount::{Discount, DiscountBook, DiscountKind};
pub use product::{CatalogStore, Product};
