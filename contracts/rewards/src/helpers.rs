use exa_math::{accrue_borrow, accrue_deposit, convert_to_exa, exa_mul, IndexedBalance, EXA};
use lending_interface::{
    protocol_call, service_call, CoreServiceClient, LendingError, ReserveSnapshot,
    RewardTokenClient, SnapshotServiceClient,
};
use soroban_sdk::{token, Address, Env, Vec, U256};

use crate::constants::DAY;
use crate::storage::{bump_core_ttl, read_admin, RewardsConfig};

const EMISSION_FLOOR: u128 = 100_000 * EXA;

pub fn require_admin(env: &Env, admin: &Address) -> Result<(), LendingError> {
    let stored = read_admin(env)?;
    bump_core_ttl(env);
    if stored != *admin {
        return Err(LendingError::UnauthorizedCaller);
    }
    admin.require_auth();
    Ok(())
}

/// Last yearly decay step whose exact form `97^i * floor / 100^i` fits in 256 bits.
const EXACT_DECAY_YEARS: u32 = 27;

/// Reward tokens minted for `day`. Emission steps down over the first four
/// years and then decays by 3% per year.
pub fn token_distribution_per_day(env: &Env, day: u64) -> Result<u128, LendingError> {
    let amount = match day {
        0..=29 => 10 * EMISSION_FLOOR,
        30..=364 => 4 * EMISSION_FLOOR,
        365..=729 => 3 * EMISSION_FLOOR,
        730..=1094 => 2 * EMISSION_FLOOR,
        1095..=1459 => EMISSION_FLOOR,
        _ => {
            let years = day / 365 - 3;
            let exact = years.min(EXACT_DECAY_YEARS as u64) as u32;
            let mut amount = U256::from_u128(env, EMISSION_FLOOR)
                .mul(&U256::from_u32(env, 97).pow(exact))
                .div(&U256::from_u32(env, 100).pow(exact))
                .to_u128()
                .ok_or(LendingError::MathOverflow)?;
            // past the exact range each year rounds down on its own
            for _ in (exact as u64)..years {
                if amount == 0 {
                    break;
                }
                amount = amount * 97 / 100;
            }
            amount
        }
    };
    Ok(amount)
}

/// Reward day `now` falls in; zero before the schedule starts.
pub fn current_day(now: u64, start_timestamp: u64) -> u64 {
    now.saturating_sub(start_timestamp) / DAY
}

/// Instant balances of `day` are valued at.
pub fn day_end(start_timestamp: u64, day: u64) -> Result<u64, LendingError> {
    day.checked_add(1)
        .and_then(|days| days.checked_mul(DAY))
        .and_then(|offset| offset.checked_add(start_timestamp))
        .ok_or(LendingError::MathOverflow)
}

pub fn to_amount(value: u128) -> Result<i128, LendingError> {
    i128::try_from(value).map_err(|_| LendingError::MathOverflow)
}

pub fn mint_reward(env: &Env, config: &RewardsConfig, amount: u128) -> Result<(), LendingError> {
    if amount == 0 {
        return Ok(());
    }
    let client = RewardTokenClient::new(env, &config.reward_token);
    service_call(
        env,
        &config.reward_token,
        "mint",
        client.try_mint(&env.current_contract_address(), &to_amount(amount)?),
    )
}

pub fn transfer_reward(
    env: &Env,
    config: &RewardsConfig,
    to: &Address,
    amount: u128,
) -> Result<(), LendingError> {
    if amount == 0 {
        return Ok(());
    }
    let client = token::TokenClient::new(env, &config.reward_token);
    service_call(
        env,
        &config.reward_token,
        "transfer",
        client.try_transfer(&env.current_contract_address(), to, &to_amount(amount)?),
    )
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    Deposit,
    Borrow,
}

/// Reserve state of one reward day with the reserve's token decimals.
pub fn reserve_snapshots(
    env: &Env,
    config: &RewardsConfig,
    day: u64,
) -> Result<Vec<(Address, ReserveSnapshot, u32)>, LendingError> {
    let core = CoreServiceClient::new(env, &config.core);
    let snapshot = SnapshotServiceClient::new(env, &config.snapshot);
    let reserves = service_call(env, &config.core, "get_reserves", core.try_get_reserves())?;
    let mut snapshots = Vec::new(env);
    for reserve in reserves.iter() {
        let configuration = protocol_call(
            env,
            &config.core,
            "get_reserve_configuration",
            core.try_get_reserve_configuration(&reserve),
        )?;
        let data = service_call(
            env,
            &config.snapshot,
            "reserve_data_at",
            snapshot.try_reserve_data_at(&reserve, &day),
        )?;
        snapshots.push_back((reserve, data, configuration.decimals));
    }
    Ok(snapshots)
}

/// Rate-weighted USD exposure of `user` on one side of the market at the end
/// of `day`, summed over every reserve.
pub fn user_weight(
    env: &Env,
    config: &RewardsConfig,
    side: Side,
    user: &Address,
    reserves: &Vec<(Address, ReserveSnapshot, u32)>,
    day: u64,
) -> Result<u128, LendingError> {
    let snapshot = SnapshotServiceClient::new(env, &config.snapshot);
    let at = day_end(config.start_timestamp, day)?;
    let mut weight = 0u128;
    for (reserve, data, decimals) in reserves.iter() {
        let position = service_call(
            env,
            &config.snapshot,
            "user_data_at",
            snapshot.try_user_data_at(user, &reserve, &day),
        )?;
        let (balance, rate) = match side {
            Side::Deposit => (
                accrue_deposit(
                    env,
                    IndexedBalance {
                        principal: position.principal_o_token_balance,
                        user_index: position.user_liquidity_cumulative_index,
                        rate: data.liquidity_rate,
                        reserve_index: data.liquidity_cumulative_index,
                        reserve_last_update: data.last_update_timestamp,
                    },
                    at,
                )?,
                data.liquidity_rate,
            ),
            Side::Borrow => (
                accrue_borrow(
                    env,
                    IndexedBalance {
                        principal: position.principal_borrow_balance,
                        user_index: position.user_borrow_cumulative_index,
                        rate: data.borrow_rate,
                        reserve_index: data.borrow_cumulative_index,
                        reserve_last_update: data.last_update_timestamp,
                    },
                    at,
                )?,
                data.borrow_rate,
            ),
        };
        let usd = exa_mul(env, convert_to_exa(balance, decimals)?, data.price)?;
        weight = weight
            .checked_add(exa_mul(env, usd, rate)?)
            .ok_or(LendingError::MathOverflow)?;
    }
    Ok(weight)
}
