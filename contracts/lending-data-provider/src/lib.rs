#![no_std]

mod constants;
mod contract;
mod events;
mod helpers;
mod storage;

pub use contract::*;
pub use events::*;
pub use storage::{
    BorrowLiquidation, CollateralView, LiquidationData, ProviderAddresses, ReserveAccountData,
    ReserveView, UserAccountData, UserReserveView,
};
