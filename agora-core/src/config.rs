use crate::identity::Identity;
use crate::money::{Amount, COIN};
use serde::Deserialize;

/// Fixed marketplace configuration: the owner identity, the approver list
/// and the high-value threshold. Read-only for the lifetime of the market;
/// no operation may mutate it.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    pub owner: Identity,
    pub approvers: Vec<Identity>,
    #[serde(default = "default_threshold")]
    pub high_value_threshold: Amount,
}

fn default_threshold() -> Amount {
    100 * COIN
}

impl MarketConfig {
    pub fn new(owner: Identity, approvers: Vec<Identity>, high_value_threshold: Amount) -> Self {
        Self {
            owner,
            approvers,
            high_value_threshold,
        }
    }

    /// Load configuration from an optional `Agora.toml` in the working
    /// directory, overridden by `AGORA_*` environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let s = config::Config::builder()
            .add_source(config::File::with_name("Agora").required(false))
            .add_source(config::Environment::with_prefix("AGORA").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    /// Membership test over the fixed approver list. Linear scan; duplicate
    /// entries in the list are immaterial.
    pub fn is_approver(&self, identity: &Identity) -> bool {
        self.approvers.iter().any(|a| a == identity)
    }

    /// Approvals required for quorum: at least half the approver list,
    /// rounded down. Not a majority.
    pub fn quorum(&self) -> u64 {
        self.approvers.len() as u64 / 2
    }
}
