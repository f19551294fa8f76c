/// Currency amount in nanocoins.
pub type Amount = u64;

/// One whole coin.
pub const COIN: Amount = 1_000_000_000;
