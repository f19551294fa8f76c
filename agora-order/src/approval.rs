use agora_core::Identity;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Per-order approval tally. `approvals` only ever increases; each approver
/// identity appears in `approved_by` at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRecord {
    pub approvals: u64,
    pub approved_by: HashSet<Identity>,
}

/// Quorum state for high-value orders, keyed 1:1 with order ids. Records are
/// opened lazily; orders below the threshold never get one.
#[derive(Debug, Default)]
pub struct ApprovalGate {
    records: HashMap<u64, ApprovalRecord>,
}

impl ApprovalGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a zero-approval record for an order, if not already present.
    pub fn open(&mut self, order_id: u64) {
        self.records.entry(order_id).or_default();
    }

    pub fn record(&self, order_id: u64) -> Option<&ApprovalRecord> {
        self.records.get(&order_id)
    }

    pub fn approvals(&self, order_id: u64) -> u64 {
        self.records.get(&order_id).map(|r| r.approvals).unwrap_or(0)
    }

    pub fn has_approved(&self, order_id: u64, approver: &Identity) -> bool {
        self.records
            .get(&order_id)
            .is_some_and(|r| r.approved_by.contains(approver))
    }

    /// Count one approval from `approver` and return the new tally. The
    /// caller has already rejected duplicates.
    pub fn record_approval(&mut self, order_id: u64, approver: Identity) -> u64 {
        let record = self.records.entry(order_id).or_default();
        record.approved_by.insert(approver);
        record.approvals += 1;
        record.approvals
    }
}
