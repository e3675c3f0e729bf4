use lending_interface::LendingError;
use soroban_sdk::Env;

use crate::fixed::{exa_div, exa_mul, EXA};

pub const HEALTH_FACTOR_LIQUIDATION_THRESHOLD: i128 = EXA as i128;
/// Health factor reported for an account without debt.
pub const NO_DEBT_HEALTH_FACTOR: i128 = -1;

pub fn health_factor_from_balances(
    env: &Env,
    collateral_usd: u128,
    borrow_usd: u128,
    fees_usd: u128,
    liquidation_threshold: u128,
) -> Result<i128, LendingError> {
    if borrow_usd == 0 {
        return Ok(NO_DEBT_HEALTH_FACTOR);
    }
    let covered = exa_mul(env, collateral_usd.saturating_sub(fees_usd), liquidation_threshold)?;
    let factor = exa_div(env, covered, borrow_usd)?;
    i128::try_from(factor).map_err(|_| LendingError::MathOverflow)
}

pub fn is_below_liquidation_threshold(health_factor: i128) -> bool {
    health_factor != NO_DEBT_HEALTH_FACTOR && health_factor < HEALTH_FACTOR_LIQUIDATION_THRESHOLD
}

/// Share of the borrowing capacity already used, EXA scaled.
pub fn borrowing_power_from_balances(
    env: &Env,
    collateral_usd: u128,
    borrow_usd: u128,
    fees_usd: u128,
    ltv: u128,
) -> Result<u128, LendingError> {
    if collateral_usd == 0 {
        return Ok(0);
    }
    let capacity = exa_mul(env, collateral_usd.saturating_sub(fees_usd), ltv)?;
    if capacity == 0 {
        return Ok(0);
    }
    exa_div(env, borrow_usd, capacity)
}

pub fn available_borrows_usd(
    env: &Env,
    collateral_usd: u128,
    borrow_usd: u128,
    fees_usd: u128,
    ltv: u128,
) -> Result<u128, LendingError> {
    let allowed = exa_mul(env, collateral_usd.saturating_sub(fees_usd), ltv)?;
    Ok(allowed.saturating_sub(borrow_usd))
}

/// Collateral required to hold the current debt plus `requested_borrow_usd` at `ltv`.
pub fn collateral_needed_usd(
    env: &Env,
    requested_borrow_usd: u128,
    current_borrow_usd: u128,
    current_fees_usd: u128,
    ltv: u128,
) -> Result<u128, LendingError> {
    let debt = current_borrow_usd
        .checked_add(requested_borrow_usd)
        .ok_or(LendingError::MathOverflow)?;
    exa_div(env, debt, ltv)?
        .checked_add(current_fees_usd)
        .ok_or(LendingError::MathOverflow)
}

/// Debt in excess of what the collateral supports at `ltv`.
pub fn bad_debt_usd(
    env: &Env,
    collateral_usd: u128,
    borrow_usd: u128,
    fees_usd: u128,
    ltv: u128,
) -> Result<u128, LendingError> {
    let supported = exa_mul(env, collateral_usd, ltv)?;
    Ok(borrow_usd.saturating_add(fees_usd).saturating_sub(supported))
}

/// Normalizes a value-weighted sum into its weighted average, 0 without weight.
pub fn weighted_average(env: &Env, weighted_sum: u128, total_weight: u128) -> Result<u128, LendingError> {
    if total_weight == 0 {
        return Ok(0);
    }
    exa_div(env, weighted_sum, total_weight)
}
