pub mod clock;
pub mod config;
pub mod events;
pub mod identity;
pub mod money;
pub mod payment;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::MarketConfig;
pub use events::{EventSink, LogSink, MarketEvent, RecordingSink};
pub use identity::Identity;
pub use money::{Amount, COIN};
pub use payment::{MockGateway, PaymentGateway};

/// Failure taxonomy shared by every public marketplace operation. A failed
/// operation leaves no partial state behind and publishes no event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarketError {
    #[error("caller {0} is not authorized for this operation")]
    Unauthorized(Identity),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("insufficient {resource}: requested {requested}, available {available}")]
    InsufficientResource {
        resource: &'static str,
        requested: Amount,
        available: Amount,
    },

    #[error("already done: {0}")]
    AlreadyDone(String),

    #[error("order {0} is not eligible for approval")]
    NotEligible(u64),

    #[error("arithmetic fault: {0}")]
    ArithmeticFault(&'static str),

    #[error("payment transfer of {amount} to {to} failed")]
    TransferFailed { to: Identity, amount: Amount },
}

pub type MarketResult<T> = Result<T, MarketError>;
