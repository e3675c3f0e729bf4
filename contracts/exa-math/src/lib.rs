#![no_std]

mod fixed;
mod interest;
mod rates;
mod risk;

pub use fixed::*;
pub use interest::*;
pub use rates::*;
pub use risk::*;
