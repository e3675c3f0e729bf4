use lending_interface::LendingError;
use soroban_sdk::{contracttype, Address, Env, Symbol, Vec};

use crate::constants::{TTL_EXTEND_TO, TTL_THRESHOLD};
use crate::machine::CategoryState;

/// A reward category. Liquidity pools are named by their LP source key.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Recipient {
    Deposit,
    Borrow,
    Liquidity(Symbol),
    Worker,
    DaoFund,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsConfig {
    pub lending_pool: Address,
    pub core: Address,
    pub snapshot: Address,
    pub reward_token: Address,
    pub worker_token: Address,
    pub lp_source: Address,
    pub dao_fund: Address,
    pub start_timestamp: u64,
}

/// Unclaimed rewards of a user, per category and summed.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsView {
    pub rewards: Vec<(Recipient, u128)>,
    pub total: u128,
}

#[contracttype]
pub enum DataKey {
    Admin,
    Config,
    Day,        // next reward day to distribute
    Recipients, // distribution order, DaoFund last
    DistPercentage(Recipient),
    State(Recipient),
    Weight(Recipient, Address, u64), // temporary
    Rewards(Address, Recipient),
}

fn bump(env: &Env, key: &DataKey) {
    let persistent = env.storage().persistent();
    if persistent.has(key) {
        persistent.extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

pub fn bump_core_ttl(env: &Env) {
    bump(env, &DataKey::Admin);
    bump(env, &DataKey::Config);
    bump(env, &DataKey::Day);
    bump(env, &DataKey::Recipients);
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

pub fn read_config(env: &Env) -> Result<RewardsConfig, LendingError> {
    bump_core_ttl(env);
    env.storage()
        .persistent()
        .get(&DataKey::Config)
        .ok_or(LendingError::NotInitialized)
}

pub fn write_config(env: &Env, config: &RewardsConfig) {
    env.storage().persistent().set(&DataKey::Config, config);
}

pub fn read_day(env: &Env) -> u64 {
    env.storage()
        .persistent()
        .get(&DataKey::Day)
        .unwrap_or(0u64)
}

pub fn write_day(env: &Env, day: u64) {
    env.storage().persistent().set(&DataKey::Day, &day);
}

pub fn read_recipients(env: &Env) -> Vec<Recipient> {
    env.storage()
        .persistent()
        .get(&DataKey::Recipients)
        .unwrap_or(Vec::new(env))
}

pub fn write_recipients(env: &Env, recipients: &Vec<Recipient>) {
    env.storage()
        .persistent()
        .set(&DataKey::Recipients, recipients);
}

pub fn read_dist_percentage(env: &Env, recipient: &Recipient) -> Option<u128> {
    let key = DataKey::DistPercentage(recipient.clone());
    bump(env, &key);
    env.storage().persistent().get(&key)
}

pub fn write_dist_percentage(env: &Env, recipient: &Recipient, percentage: u128) {
    let key = DataKey::DistPercentage(recipient.clone());
    env.storage().persistent().set(&key, &percentage);
    bump(env, &key);
}

/// A category never started reads as an empty precompute.
pub fn read_state(env: &Env, recipient: &Recipient) -> CategoryState {
    let key = DataKey::State(recipient.clone());
    bump(env, &key);
    env.storage()
        .persistent()
        .get(&key)
        .unwrap_or(CategoryState::open(0))
}

pub fn write_state(env: &Env, recipient: &Recipient, state: &CategoryState) {
    let key = DataKey::State(recipient.clone());
    env.storage().persistent().set(&key, state);
    bump(env, &key);
}

// Day weights are temporary; entries of wallets dropped from a listing expire.
pub fn read_weight(env: &Env, recipient: &Recipient, user: &Address, day: u64) -> u128 {
    env.storage()
        .temporary()
        .get(&DataKey::Weight(recipient.clone(), user.clone(), day))
        .unwrap_or(0u128)
}

pub fn write_weight(env: &Env, recipient: &Recipient, user: &Address, day: u64, weight: u128) {
    let key = DataKey::Weight(recipient.clone(), user.clone(), day);
    let temporary = env.storage().temporary();
    temporary.set(&key, &weight);
    temporary.extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn remove_weight(env: &Env, recipient: &Recipient, user: &Address, day: u64) {
    env.storage()
        .temporary()
        .remove(&DataKey::Weight(recipient.clone(), user.clone(), day));
}

pub fn read_rewards(env: &Env, user: &Address, recipient: &Recipient) -> u128 {
    let key = DataKey::Rewards(user.clone(), recipient.clone());
    bump(env, &key);
    env.storage().persistent().get(&key).unwrap_or(0u128)
}

pub fn write_rewards(env: &Env, user: &Address, recipient: &Recipient, amount: u128) {
    let key = DataKey::Rewards(user.clone(), recipient.clone());
    if amount == 0 {
        env.storage().persistent().remove(&key);
        return;
    }
    env.storage().persistent().set(&key, &amount);
    bump(env, &key);
}
