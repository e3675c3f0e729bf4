use lending_interface::{LendingError, ReserveData, UserReserveData};
use soroban_sdk::Env;

use crate::fixed::{exa_div, exa_mul, exa_pow, EXA};

pub const SECONDS_PER_YEAR: u128 = 31_536_000;

fn elapsed(last_update_timestamp: u64, now: u64) -> u64 {
    now.saturating_sub(last_update_timestamp)
}

/// Simple-interest growth factor since `last_update_timestamp`, always >= 1.0.
pub fn calculate_linear_interest(
    env: &Env,
    rate: u128,
    last_update_timestamp: u64,
    now: u64,
) -> Result<u128, LendingError> {
    let seconds = elapsed(last_update_timestamp, now) as u128;
    let time_delta = exa_div(env, seconds, SECONDS_PER_YEAR)?;
    Ok(exa_mul(env, rate, time_delta)? + EXA)
}

/// Per-second compounded growth factor. The per-second rate is truncated
/// before compounding.
pub fn calculate_compounded_interest(
    env: &Env,
    rate: u128,
    last_update_timestamp: u64,
    now: u64,
) -> Result<u128, LendingError> {
    let rate_per_second = rate / SECONDS_PER_YEAR;
    exa_pow(env, rate_per_second + EXA, elapsed(last_update_timestamp, now))
}

/// Liquidity index including the interest pending since the last update.
pub fn normalized_income(env: &Env, reserve: &ReserveData, now: u64) -> Result<u128, LendingError> {
    let interest = calculate_linear_interest(
        env,
        reserve.liquidity_rate,
        reserve.last_update_timestamp,
        now,
    )?;
    exa_mul(env, interest, reserve.liquidity_cumulative_index)
}

/// Rolls both cumulative indices forward to `now`. Returns `None` when the
/// reserve has no outstanding borrows, in which case neither index moves.
pub fn next_cumulative_indexes(
    env: &Env,
    reserve: &ReserveData,
    now: u64,
) -> Result<Option<(u128, u128)>, LendingError> {
    if reserve.total_borrows == 0 {
        return Ok(None);
    }
    let liquidity_interest = calculate_linear_interest(
        env,
        reserve.liquidity_rate,
        reserve.last_update_timestamp,
        now,
    )?;
    let borrow_interest = calculate_compounded_interest(
        env,
        reserve.borrow_rate,
        reserve.last_update_timestamp,
        now,
    )?;
    Ok(Some((
        exa_mul(env, liquidity_interest, reserve.liquidity_cumulative_index)?,
        exa_mul(env, borrow_interest, reserve.borrow_cumulative_index)?,
    )))
}

/// Inputs shared by every borrow balance projection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IndexedBalance {
    pub principal: u128,
    pub user_index: u128,
    pub rate: u128,
    pub reserve_index: u128,
    pub reserve_last_update: u64,
}

/// Principal grown by the compounded borrow index since the user's snapshot.
pub fn accrue_borrow(env: &Env, position: IndexedBalance, now: u64) -> Result<u128, LendingError> {
    if position.principal == 0 {
        return Ok(0);
    }
    let interest =
        calculate_compounded_interest(env, position.rate, position.reserve_last_update, now)?;
    let cumulated = exa_div(
        env,
        exa_mul(env, interest, position.reserve_index)?,
        position.user_index,
    )?;
    exa_mul(env, position.principal, cumulated)
}

/// Principal grown by the linear liquidity index since the user's snapshot.
/// A user without a snapshot holds exactly the principal.
pub fn accrue_deposit(env: &Env, position: IndexedBalance, now: u64) -> Result<u128, LendingError> {
    if position.user_index == 0 {
        return Ok(position.principal);
    }
    let interest =
        calculate_linear_interest(env, position.rate, position.reserve_last_update, now)?;
    let cumulated = exa_mul(env, interest, position.reserve_index)?;
    exa_div(
        env,
        exa_mul(env, position.principal, cumulated)?,
        position.user_index,
    )
}

/// Present debt of `user` in `reserve`. When rounding hides all accrued
/// interest on a position not touched at `now`, one unit is added so that
/// growth is always observable.
pub fn compounded_borrow_balance(
    env: &Env,
    reserve: &ReserveData,
    user: &UserReserveData,
    now: u64,
) -> Result<u128, LendingError> {
    let principal = user.principal_borrow_balance;
    let balance = accrue_borrow(
        env,
        IndexedBalance {
            principal,
            user_index: user.user_borrow_cumulative_index,
            rate: reserve.borrow_rate,
            reserve_index: reserve.borrow_cumulative_index,
            reserve_last_update: reserve.last_update_timestamp,
        },
        now,
    )?;
    if principal != 0 && balance == principal && user.last_update_timestamp != now {
        return Ok(principal + 1);
    }
    Ok(balance)
}
