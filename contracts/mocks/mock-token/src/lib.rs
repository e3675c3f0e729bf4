#![no_std]

//! Test token that serves as deposit token, debt token or reward token.
//! Balances come from the OpenZeppelin fungible base; principal balances and
//! user cumulative indices are set directly by tests.

use soroban_sdk::{contract, contractimpl, contracttype, Address, Env, String};
use stellar_tokens::fungible::Base as TokenBase;

#[contracttype]
enum DataKey {
    Initialized,
    Principal(Address),
    LiquidityIndex(Address),
    BorrowIndex(Address),
}

#[contract]
pub struct MockToken;

#[contractimpl]
impl MockToken {
    pub fn initialize(env: Env, name: String, symbol: String, decimals: u32) {
        if env
            .storage()
            .persistent()
            .get::<_, bool>(&DataKey::Initialized)
            .is_some()
        {
            panic!("already initialized");
        }
        TokenBase::set_metadata(&env, decimals, name, symbol);
        env.storage().persistent().set(&DataKey::Initialized, &true);
    }

    pub fn decimals(env: Env) -> u32 {
        TokenBase::decimals(&env)
    }

    pub fn total_supply(env: Env) -> i128 {
        TokenBase::total_supply(&env)
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        TokenBase::balance(&env, &id)
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) {
        if amount <= 0 {
            panic!("bad amount");
        }
        TokenBase::transfer(&env, &from, &to, amount);
    }

    pub fn mint(env: Env, to: Address, amount: i128) {
        if amount <= 0 {
            panic!("bad amount");
        }
        TokenBase::mint(&env, &to, amount);
    }

    pub fn set_principal(env: Env, user: Address, amount: u128) {
        env.storage()
            .persistent()
            .set(&DataKey::Principal(user), &amount);
    }

    pub fn principal_balance_of(env: Env, user: Address) -> u128 {
        env.storage()
            .persistent()
            .get(&DataKey::Principal(user))
            .unwrap_or(0u128)
    }

    pub fn set_user_indexes(env: Env, user: Address, liquidity_index: u128, borrow_index: u128) {
        env.storage()
            .persistent()
            .set(&DataKey::LiquidityIndex(user.clone()), &liquidity_index);
        env.storage()
            .persistent()
            .set(&DataKey::BorrowIndex(user), &borrow_index);
    }

    pub fn user_liquidity_cumulative_index(env: Env, user: Address) -> u128 {
        env.storage()
            .persistent()
            .get(&DataKey::LiquidityIndex(user))
            .unwrap_or(0u128)
    }

    pub fn user_borrow_cumulative_index(env: Env, user: Address) -> u128 {
        env.storage()
            .persistent()
            .get(&DataKey::BorrowIndex(user))
            .unwrap_or(0u128)
    }
}
