use lending_interface::{LendingError, ReserveData};
use soroban_sdk::{contracttype, Address, Env, Map, Symbol};

use crate::constants::{TTL_EXTEND_TO, TTL_THRESHOLD};

#[contracttype]
pub enum DataKey {
    Admin,
    Addresses,
    Symbol(Address),  // oracle symbol per reserve
    StakedSymbol,     // priced through the staking exchange rate
    BorrowPercentage, // EXA share of deposits open to borrowing
}

/// Collaborators the provider reads from.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProviderAddresses {
    pub core: Address,
    pub oracle: Address,
    pub staking: Address,
    pub lending_pool: Address,
}

/// Risk summary of one account. USD figures are EXA scaled, `health_factor`
/// is -1 when the account has no debt.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserAccountData {
    pub total_liquidity_balance_usd: u128,
    pub total_collateral_balance_usd: u128,
    pub total_borrow_balance_usd: u128,
    pub total_fees_usd: u128,
    pub available_borrows_usd: u128,
    pub current_ltv: u128,
    pub current_liquidation_threshold: u128,
    pub health_factor: i128,
    pub borrowing_power: u128,
    pub health_factor_below_threshold: bool,
}

/// Position of a user in one reserve. Token amounts are in reserve decimals.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserReserveView {
    pub current_o_token_balance: u128,
    pub current_o_token_balance_usd: u128,
    pub principal_o_token_balance: u128,
    pub principal_o_token_balance_usd: u128,
    pub current_borrow_balance: u128,
    pub current_borrow_balance_usd: u128,
    pub principal_borrow_balance: u128,
    pub principal_borrow_balance_usd: u128,
    pub user_liquidity_cumulative_index: u128,
    pub user_borrow_cumulative_index: u128,
    pub borrow_rate: u128,
    pub liquidity_rate: u128,
    pub origination_fee: u128,
    pub last_update_timestamp: u64,
    pub use_as_collateral: bool,
    pub price: u128,
    pub decimals: u32,
    pub staking_rate: Option<u128>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReserveAccountData {
    pub total_liquidity_balance_usd: u128,
    pub available_liquidity_balance_usd: u128,
    pub total_borrows_balance_usd: u128,
    pub total_collateral_balance_usd: u128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReserveView {
    pub data: ReserveData,
    pub total_liquidity: u128,
    pub available_liquidity: u128,
    pub available_borrows: u128,
    pub price: u128,
    pub staking_rate: Option<u128>,
    pub total_liquidity_usd: u128,
    pub available_liquidity_usd: u128,
    pub total_borrows_usd: u128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BorrowLiquidation {
    pub compounded_borrow_balance: u128,
    pub compounded_borrow_balance_usd: u128,
    pub max_amount_to_liquidate: u128,
    pub max_amount_to_liquidate_usd: u128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CollateralView {
    pub underlying_balance: u128,
    pub underlying_balance_usd: u128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LiquidationData {
    pub bad_debt: u128,
    pub borrows: Map<Symbol, BorrowLiquidation>,
    pub collaterals: Map<Symbol, CollateralView>,
}

fn bump(env: &Env, key: &DataKey) {
    let persistent = env.storage().persistent();
    if persistent.has(key) {
        persistent.extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

pub fn bump_core_ttl(env: &Env) {
    bump(env, &DataKey::Admin);
    bump(env, &DataKey::Addresses);
    bump(env, &DataKey::StakedSymbol);
    bump(env, &DataKey::BorrowPercentage);
}

pub fn has_admin(env: &Env) -> bool {
    env.storage().persistent().has(&DataKey::Admin)
}

pub fn read_admin(env: &Env) -> Result<Address, LendingError> {
    env.storage()
        .persistent()
        .get(&DataKey::Admin)
        .ok_or(LendingError::NotInitialized)
}

pub fn write_admin(env: &Env, admin: &Address) {
    env.storage().persistent().set(&DataKey::Admin, admin);
}

pub fn read_addresses(env: &Env) -> Result<ProviderAddresses, LendingError> {
    bump_core_ttl(env);
    env.storage()
        .persistent()
        .get(&DataKey::Addresses)
        .ok_or(LendingError::NotInitialized)
}

pub fn write_addresses(env: &Env, addresses: &ProviderAddresses) {
    env.storage()
        .persistent()
        .set(&DataKey::Addresses, addresses);
}

pub fn read_symbol(env: &Env, reserve: &Address) -> Result<Symbol, LendingError> {
    let key = DataKey::Symbol(reserve.clone());
    bump(env, &key);
    env.storage()
        .persistent()
        .get(&key)
        .ok_or(LendingError::InvalidConfiguration)
}

pub fn write_symbol(env: &Env, reserve: &Address, symbol: &Symbol) {
    let key = DataKey::Symbol(reserve.clone());
    env.storage().persistent().set(&key, symbol);
    bump(env, &key);
}

pub fn read_staked_symbol(env: &Env) -> Option<Symbol> {
    env.storage().persistent().get(&DataKey::StakedSymbol)
}

pub fn write_staked_symbol(env: &Env, symbol: &Symbol) {
    env.storage()
        .persistent()
        .set(&DataKey::StakedSymbol, symbol);
}

/// Unset until the admin configures it, in which case nothing can be borrowed.
pub fn read_borrow_percentage(env: &Env) -> u128 {
    env.storage()
        .persistent()
        .get(&DataKey::BorrowPercentage)
        .unwrap_or(0u128)
}

pub fn write_borrow_percentage(env: &Env, percentage: u128) {
    env.storage()
        .persistent()
        .set(&DataKey::BorrowPercentage, &percentage);
}
