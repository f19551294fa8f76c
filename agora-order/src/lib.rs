pub mod approval;
pub mod engine;
pub mod models;

pub use approval::{ApprovalGate, ApprovalRecord};
pub use engine::Marketplace;
pub use models::{Order, ShippingOption};
