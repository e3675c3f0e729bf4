#![no_std]

mod constants;
mod contract;
mod events;
mod helpers;
mod storage;

pub use contract::*;
pub use events::*;

#[cfg(test)]
mod test;
