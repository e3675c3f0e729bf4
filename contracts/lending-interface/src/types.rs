use soroban_sdk::{contracttype, Address};

/// Aggregate pool state of a single lending asset. Rates, indices and
/// collateral parameters are EXA (1e18) fixed point.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReserveData {
    pub asset: Address,
    pub o_token: Address,
    pub d_token: Address,
    pub total_borrows: u128,
    pub last_update_timestamp: u64,
    pub liquidity_rate: u128,
    pub borrow_rate: u128,
    pub liquidity_cumulative_index: u128,
    pub borrow_cumulative_index: u128,
    pub base_ltv_as_collateral: u128,
    pub liquidation_threshold: u128,
    pub liquidation_bonus: u128,
    pub decimals: u32,
    pub borrowing_enabled: bool,
    pub usage_as_collateral_enabled: bool,
    pub is_freezed: bool,
    pub is_active: bool,
}

/// One mutable reserve attribute. Decimals are fixed when the reserve is added.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ReserveField {
    TotalBorrows(u128),
    LastUpdateTimestamp(u64),
    LiquidityRate(u128),
    BorrowRate(u128),
    LiquidityCumulativeIndex(u128),
    BorrowCumulativeIndex(u128),
    BaseLtvAsCollateral(u128),
    LiquidationThreshold(u128),
    LiquidationBonus(u128),
    BorrowingEnabled(bool),
    UsageAsCollateralEnabled(bool),
    IsFreezed(bool),
    IsActive(bool),
}

/// Borrow-side position of a user in one reserve.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserReserveData {
    pub asset: Address,
    pub user: Address,
    pub principal_borrow_balance: u128,
    pub user_borrow_cumulative_index: u128,
    pub last_update_timestamp: u64,
    pub origination_fee: u128,
    pub use_as_collateral: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UserReserveField {
    PrincipalBorrowBalance(u128),
    UserBorrowCumulativeIndex(u128),
    LastUpdateTimestamp(u64),
    OriginationFee(u128),
    UseAsCollateral(bool),
}

/// Two-slope rate curve parameters.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReserveConstants {
    pub asset: Address,
    pub optimal_utilization_rate: u128,
    pub base_borrow_rate: u128,
    pub slope_rate_1: u128,
    pub slope_rate_2: u128,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InterestRates {
    pub borrow_rate: u128,
    pub liquidity_rate: u128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReserveConfiguration {
    pub decimals: u32,
    pub base_ltv_as_collateral: u128,
    pub liquidation_threshold: u128,
    pub liquidation_bonus: u128,
    pub usage_as_collateral_enabled: bool,
}

/// Balances in the reserve's own decimals.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserBasicReserveData {
    pub underlying_balance: u128,
    pub compounded_borrow_balance: u128,
    pub origination_fee: u128,
    pub use_as_collateral: bool,
}

/// Per-user token state recorded at the end of a reward day.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserSnapshot {
    pub principal_o_token_balance: u128,
    pub user_liquidity_cumulative_index: u128,
    pub principal_borrow_balance: u128,
    pub user_borrow_cumulative_index: u128,
}

/// Reserve state recorded at the end of a reward day. `price` is USD, EXA scaled.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReserveSnapshot {
    pub price: u128,
    pub liquidity_rate: u128,
    pub borrow_rate: u128,
    pub liquidity_cumulative_index: u128,
    pub borrow_cumulative_index: u128,
    pub last_update_timestamp: u64,
}
