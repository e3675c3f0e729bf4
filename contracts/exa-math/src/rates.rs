use lending_interface::{InterestRates, LendingError, ReserveConstants};
use soroban_sdk::Env;

use crate::fixed::{exa_div, exa_mul, EXA};

/// Depositors receive 90% of what borrowers pay.
pub const LENDING_SPREAD: u128 = 9 * EXA / 10;

pub fn utilization_rate(
    env: &Env,
    total_borrows: u128,
    available_liquidity: u128,
) -> Result<u128, LendingError> {
    if total_borrows == 0 && available_liquidity == 0 {
        return Ok(0);
    }
    let total = total_borrows
        .checked_add(available_liquidity)
        .ok_or(LendingError::MathOverflow)?;
    exa_div(env, total_borrows, total)
}

pub(crate) fn below_kink_rate(
    env: &Env,
    constants: &ReserveConstants,
    utilization: u128,
) -> Result<u128, LendingError> {
    let slope = exa_mul(
        env,
        exa_div(env, utilization, constants.optimal_utilization_rate)?,
        constants.slope_rate_1,
    )?;
    Ok(constants.base_borrow_rate + slope)
}

pub(crate) fn above_kink_rate(
    env: &Env,
    constants: &ReserveConstants,
    utilization: u128,
) -> Result<u128, LendingError> {
    let excess = utilization.saturating_sub(constants.optimal_utilization_rate);
    let slope = exa_mul(
        env,
        exa_div(env, excess, EXA - constants.optimal_utilization_rate)?,
        constants.slope_rate_2,
    )?;
    Ok(constants.base_borrow_rate + constants.slope_rate_1 + slope)
}

/// Two-slope borrow rate and the liquidity rate derived from it.
pub fn calculate_interest_rates(
    env: &Env,
    constants: &ReserveConstants,
    available_liquidity: u128,
    total_borrows: u128,
) -> Result<InterestRates, LendingError> {
    let utilization = utilization_rate(env, total_borrows, available_liquidity)?;
    let borrow_rate = if utilization < constants.optimal_utilization_rate {
        below_kink_rate(env, constants, utilization)?
    } else {
        above_kink_rate(env, constants, utilization)?
    };
    let liquidity_rate = exa_mul(env, exa_mul(env, borrow_rate, utilization)?, LENDING_SPREAD)?;
    Ok(InterestRates {
        borrow_rate,
        liquidity_rate,
    })
}

/// The curve needs a kink strictly inside (0, 1.0).
pub fn validate_constants(constants: &ReserveConstants) -> Result<(), LendingError> {
    if constants.optimal_utilization_rate == 0 || constants.optimal_utilization_rate >= EXA {
        return Err(LendingError::InvalidConfiguration);
    }
    Ok(())
}
