pub const TTL_THRESHOLD: u32 = 100_000;
pub const TTL_EXTEND_TO: u32 = 200_000;

/// Wallets or LP entries read per `distribute` call.
pub const BATCH_SIZE: u32 = 100;

/// Length of a reward day in seconds.
pub const DAY: u64 = 86_400;
