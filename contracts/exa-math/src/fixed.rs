use lending_interface::LendingError;
use soroban_sdk::{Env, U256};

/// 1.0 in fixed point.
pub const EXA: u128 = 1_000_000_000_000_000_000u128;
pub const EXA_DECIMALS: u32 = 18;

/// Computes `a * b / denominator` with floor rounding, widening to the host
/// 256-bit integer only when the product does not fit in `u128`.
fn mul_div(env: &Env, a: u128, b: u128, denominator: u128) -> Result<u128, LendingError> {
    if denominator == 0 {
        return Err(LendingError::DivideByZero);
    }
    match a.checked_mul(b) {
        Some(product) => Ok(product / denominator),
        None => {
            let wide = U256::from_u128(env, a)
                .mul(&U256::from_u128(env, b))
                .div(&U256::from_u128(env, denominator));
            wide.to_u128().ok_or(LendingError::MathOverflow)
        }
    }
}

pub fn exa_mul(env: &Env, a: u128, b: u128) -> Result<u128, LendingError> {
    mul_div(env, a, b, EXA)
}

pub fn exa_div(env: &Env, a: u128, b: u128) -> Result<u128, LendingError> {
    mul_div(env, a, EXA, b)
}

/// Raises a fixed-point `base` to a plain integer `exponent` by repeated squaring.
pub fn exa_pow(env: &Env, base: u128, exponent: u64) -> Result<u128, LendingError> {
    let mut x = base;
    let mut n = exponent;
    let mut result = if n % 2 != 0 { x } else { EXA };
    n /= 2;
    while n != 0 {
        x = exa_mul(env, x, x)?;
        if n % 2 != 0 {
            result = exa_mul(env, result, x)?;
        }
        n /= 2;
    }
    Ok(result)
}

pub fn pow10(exponent: u32) -> Result<u128, LendingError> {
    10u128
        .checked_pow(exponent)
        .ok_or(LendingError::MathOverflow)
}

/// Scales a raw token amount with `decimals` precision up to 18 decimals.
pub fn convert_to_exa(amount: u128, decimals: u32) -> Result<u128, LendingError> {
    if decimals == EXA_DECIMALS {
        return Ok(amount);
    }
    if decimals > EXA_DECIMALS {
        return Ok(amount / pow10(decimals - EXA_DECIMALS)?);
    }
    amount
        .checked_mul(pow10(EXA_DECIMALS - decimals)?)
        .ok_or(LendingError::MathOverflow)
}

/// Scales an 18 decimal amount down to `decimals` precision, rounding down.
pub fn convert_exa_to_other(amount: u128, decimals: u32) -> Result<u128, LendingError> {
    if decimals == EXA_DECIMALS {
        return Ok(amount);
    }
    if decimals > EXA_DECIMALS {
        return amount
            .checked_mul(pow10(decimals - EXA_DECIMALS)?)
            .ok_or(LendingError::MathOverflow);
    }
    Ok(amount / pow10(EXA_DECIMALS - decimals)?)
}
