use exa_math::EXA;
use lending_interface::{non_negative, service_call, LendingError, LendingTokenClient, ReserveData};
use soroban_sdk::{token, Address, Env};

use crate::storage::{bump_core_ttl, read_admin, read_lending_pool};

pub fn require_admin(env: &Env, admin: &Address) -> Result<(), LendingError> {
    let stored = read_admin(env)?;
    bump_core_ttl(env);
    if stored != *admin {
        return Err(LendingError::UnauthorizedCaller);
    }
    admin.require_auth();
    Ok(())
}

/// Ledger mutations are open to the admin and the lending pool orchestrator.
pub fn require_authorized(env: &Env, caller: &Address) -> Result<(), LendingError> {
    let admin = read_admin(env)?;
    bump_core_ttl(env);
    let is_pool = read_lending_pool(env).is_some_and(|pool| pool == *caller);
    if admin != *caller && !is_pool {
        return Err(LendingError::UnauthorizedCaller);
    }
    caller.require_auth();
    Ok(())
}

/// Cumulative indices start at one; a zero index would divide every user balance by zero.
pub fn bootstrap_indices(reserve: &mut ReserveData) {
    if reserve.liquidity_cumulative_index == 0 {
        reserve.liquidity_cumulative_index = EXA;
    }
    if reserve.borrow_cumulative_index == 0 {
        reserve.borrow_cumulative_index = EXA;
    }
}

pub fn now(env: &Env) -> u64 {
    env.ledger().timestamp()
}

/// Underlying tokens held by the core for `asset`.
pub fn underlying_balance(env: &Env, asset: &Address) -> Result<u128, LendingError> {
    let holder = env.current_contract_address();
    let balance = service_call(
        env,
        asset,
        "balance",
        token::TokenClient::new(env, asset).try_balance(&holder),
    )?;
    non_negative(env, asset, "balance", balance)
}

pub fn o_token_balance(env: &Env, o_token: &Address, user: &Address) -> Result<u128, LendingError> {
    let balance = service_call(
        env,
        o_token,
        "balance",
        LendingTokenClient::new(env, o_token).try_balance(user),
    )?;
    non_negative(env, o_token, "balance", balance)
}
