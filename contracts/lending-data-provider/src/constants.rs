use soroban_sdk::{symbol_short, Symbol};

pub const TTL_THRESHOLD: u32 = 100_000;
pub const TTL_EXTEND_TO: u32 = 200_000;

/// Quote currency of every oracle price.
pub const USD: Symbol = symbol_short!("USD");
