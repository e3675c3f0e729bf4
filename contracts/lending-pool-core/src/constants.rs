pub const TTL_THRESHOLD: u32 = 100_000;
pub const TTL_EXTEND_TO: u32 = 200_000;
