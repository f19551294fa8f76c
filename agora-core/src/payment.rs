use crate::identity::Identity;
use crate::money::Amount;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Rejection reported by the payment provider.
#[derive(Debug, Clone, thiserror::Error)]
#[error("transfer rejected by payment provider: {0}")]
pub struct TransferRejected(pub String);

/// Payment transfer collaborator. The marketplace uses it for overpayment
/// refunds; it never retries a rejected transfer.
pub trait PaymentGateway: Send + Sync {
    fn transfer(&self, to: &Identity, amount: Amount) -> Result<(), TransferRejected>;
}

/// In-process gateway that records every transfer and can be scripted to
/// reject, for tests and demos.
#[derive(Default)]
pub struct MockGateway {
    transfers: Mutex<Vec<(Identity, Amount)>>,
    failing: AtomicBool,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn transfers(&self) -> Vec<(Identity, Amount)> {
        self.transfers.lock().unwrap().clone()
    }
}

impl PaymentGateway for MockGateway {
    fn transfer(&self, to: &Identity, amount: Amount) -> Result<(), TransferRejected> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransferRejected("gateway declined".into()));
        }
        self.transfers.lock().unwrap().push((to.clone(), amount));
        Ok(())
    }
}
