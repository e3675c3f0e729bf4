#![no_std]

mod constants;
mod contract;
mod events;
mod helpers;
mod machine;
mod storage;

pub use constants::{BATCH_SIZE, DAY};
pub use contract::*;
pub use events::*;
pub use helpers::token_distribution_per_day;
pub use machine::{advance, Batch, CategoryState, Effect, Phase};
pub use storage::{Recipient, RewardsConfig, RewardsView};
