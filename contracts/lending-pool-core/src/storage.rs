use lending_interface::{LendingError, ReserveConstants, ReserveData, UserReserveData};
use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::constants::{TTL_EXTEND_TO, TTL_THRESHOLD};

#[contracttype]
pub enum DataKey {
    Admin,
    LendingPool,
    ReserveList,                  // Vec<Address>
    Reserve(Address),             // ReserveData per asset
    UserReserve(Address, Address), // (asset, user)
    Constants(Address),           // ReserveConstants per asset
}

fn bump(env: &Env, key: &DataKey) {
    let persistent = env.storage().persistent();
    if persistent.has(key) {
        persistent.extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

pub fn bump_core_ttl(env: &Env) {
    bump(env, &DataKey::Admin);
    bump(env, &DataKey::LendingPool);
    bump(env, &DataKey::ReserveList);
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

pub fn read_lending_pool(env: &Env) -> Option<Address> {
    env.storage().persistent().get(&DataKey::LendingPool)
}

pub fn write_lending_pool(env: &Env, pool: &Address) {
    env.storage().persistent().set(&DataKey::LendingPool, pool);
}

pub fn read_reserve_list(env: &Env) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::ReserveList)
        .unwrap_or(Vec::new(env))
}

fn push_reserve(env: &Env, asset: &Address) {
    let mut reserves = read_reserve_list(env);
    if !reserves.contains(asset) {
        reserves.push_back(asset.clone());
        env.storage()
            .persistent()
            .set(&DataKey::ReserveList, &reserves);
    }
}

pub fn has_reserve(env: &Env, asset: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Reserve(asset.clone()))
}

pub fn read_reserve(env: &Env, asset: &Address) -> Result<ReserveData, LendingError> {
    let key = DataKey::Reserve(asset.clone());
    let reserve = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(LendingError::UnknownReserve)?;
    bump(env, &key);
    Ok(reserve)
}

pub fn write_reserve(env: &Env, reserve: &ReserveData) {
    let key = DataKey::Reserve(reserve.asset.clone());
    env.storage().persistent().set(&key, reserve);
    bump(env, &key);
    push_reserve(env, &reserve.asset);
}

/// A user that never touched the reserve holds an empty position.
pub fn read_user_reserve(env: &Env, asset: &Address, user: &Address) -> UserReserveData {
    let key = DataKey::UserReserve(asset.clone(), user.clone());
    bump(env, &key);
    env.storage()
        .persistent()
        .get(&key)
        .unwrap_or(UserReserveData {
            asset: asset.clone(),
            user: user.clone(),
            principal_borrow_balance: 0,
            user_borrow_cumulative_index: 0,
            last_update_timestamp: 0,
            origination_fee: 0,
            use_as_collateral: false,
        })
}

pub fn write_user_reserve(env: &Env, data: &UserReserveData) {
    let key = DataKey::UserReserve(data.asset.clone(), data.user.clone());
    env.storage().persistent().set(&key, data);
    bump(env, &key);
}

pub fn read_constants(env: &Env, asset: &Address) -> Result<ReserveConstants, LendingError> {
    let key = DataKey::Constants(asset.clone());
    bump(env, &key);
    env.storage()
        .persistent()
        .get(&key)
        .ok_or(LendingError::InvalidConfiguration)
}

pub fn write_constants(env: &Env, constants: &ReserveConstants) {
    let key = DataKey::Constants(constants.asset.clone());
    env.storage().persistent().set(&key, constants);
    bump(env, &key);
}
