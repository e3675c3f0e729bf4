use soroban_sdk::{contractevent, Address};

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReserveAdded {
    #[topic]
    pub reserve: Address,
    pub decimals: u32,
}

/// Emitted whenever rates are recomputed and the reserve timestamp is stamped.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReserveUpdated {
    #[topic]
    pub reserve: Address,
    pub liquidity_rate: u128,
    pub borrow_rate: u128,
    pub liquidity_cumulative_index: u128,
    pub borrow_cumulative_index: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexesUpdated {
    #[topic]
    pub reserve: Address,
    pub liquidity_cumulative_index: u128,
    pub borrow_cumulative_index: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CollateralEnabled {
    #[topic]
    pub reserve: Address,
    pub base_ltv_as_collateral: u128,
    pub liquidation_threshold: u128,
    pub liquidation_bonus: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CollateralDisabled {
    #[topic]
    pub reserve: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BorrowingToggled {
    #[topic]
    pub reserve: Address,
    pub enabled: bool,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReserveConstantsSet {
    #[topic]
    pub reserve: Address,
    pub optimal_utilization_rate: u128,
    pub base_borrow_rate: u128,
    pub slope_rate_1: u128,
    pub slope_rate_2: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserCollateralToggled {
    #[topic]
    pub reserve: Address,
    #[topic]
    pub user: Address,
    pub use_as_collateral: bool,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LendingPoolUpdated {
    #[topic]
    pub pool: Address,
}
