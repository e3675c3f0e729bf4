use exa_math::{convert_to_exa, exa_mul};
use lending_interface::{
    non_negative, protocol_call, service_call, CoreServiceClient, LendingError, LendingTokenClient,
    PriceServiceClient, ReserveConfiguration, ReserveData, StakingServiceClient,
    UserBasicReserveData, UserReserveData,
};
use soroban_sdk::{Address, Env, Vec};

use crate::constants::USD;
use crate::storage::{bump_core_ttl, read_admin, read_staked_symbol, read_symbol, ProviderAddresses};

pub fn require_admin(env: &Env, admin: &Address) -> Result<(), LendingError> {
    let stored = read_admin(env)?;
    bump_core_ttl(env);
    if stored != *admin {
        return Err(LendingError::UnauthorizedCaller);
    }
    admin.require_auth();
    Ok(())
}

pub fn checked_sum(total: u128, value: u128) -> Result<u128, LendingError> {
    total.checked_add(value).ok_or(LendingError::MathOverflow)
}

/// USD unit price of a reserve. The staked asset is quoted through the
/// staking exchange rate.
pub struct Price {
    pub usd: u128,
    pub staking_rate: Option<u128>,
}

pub fn reserve_price(
    env: &Env,
    addresses: &ProviderAddresses,
    reserve: &Address,
) -> Result<Price, LendingError> {
    let symbol = read_symbol(env, reserve)?;
    let oracle = PriceServiceClient::new(env, &addresses.oracle);
    let price = service_call(
        env,
        &addresses.oracle,
        "get_price",
        oracle.try_get_price(&symbol, &USD),
    )?;
    if read_staked_symbol(env).is_some_and(|staked| staked == symbol) {
        let staking = StakingServiceClient::new(env, &addresses.staking);
        let rate = service_call(
            env,
            &addresses.staking,
            "get_exchange_rate",
            staking.try_get_exchange_rate(),
        )?;
        return Ok(Price {
            usd: exa_mul(env, price, rate)?,
            staking_rate: Some(rate),
        });
    }
    Ok(Price {
        usd: price,
        staking_rate: None,
    })
}

/// USD value of `amount` given in `decimals` precision.
pub fn usd_value(env: &Env, amount: u128, decimals: u32, price: u128) -> Result<u128, LendingError> {
    exa_mul(env, convert_to_exa(amount, decimals)?, price)
}

/// Reads of a deposit or debt token.
pub struct LendingToken<'a> {
    client: LendingTokenClient<'a>,
}

impl<'a> LendingToken<'a> {
    pub fn new(env: &'a Env, token: &Address) -> Self {
        Self {
            client: LendingTokenClient::new(env, token),
        }
    }

    pub fn balance(&self, user: &Address) -> Result<u128, LendingError> {
        let env = &self.client.env;
        let token = &self.client.address;
        let balance = service_call(env, token, "balance", self.client.try_balance(user))?;
        non_negative(env, token, "balance", balance)
    }

    pub fn total_supply(&self) -> Result<u128, LendingError> {
        let env = &self.client.env;
        let token = &self.client.address;
        let supply = service_call(env, token, "total_supply", self.client.try_total_supply())?;
        non_negative(env, token, "total_supply", supply)
    }

    pub fn principal_balance_of(&self, user: &Address) -> Result<u128, LendingError> {
        service_call(
            &self.client.env,
            &self.client.address,
            "principal_balance_of",
            self.client.try_principal_balance_of(user),
        )
    }

    pub fn user_liquidity_cumulative_index(&self, user: &Address) -> Result<u128, LendingError> {
        service_call(
            &self.client.env,
            &self.client.address,
            "user_liquidity_cumulative_index",
            self.client.try_user_liquidity_cumulative_index(user),
        )
    }

    pub fn user_borrow_cumulative_index(&self, user: &Address) -> Result<u128, LendingError> {
        service_call(
            &self.client.env,
            &self.client.address,
            "user_borrow_cumulative_index",
            self.client.try_user_borrow_cumulative_index(user),
        )
    }
}

/// Read access to the lending pool core. Its own errors are forwarded as is.
pub struct Core<'a> {
    client: CoreServiceClient<'a>,
}

impl<'a> Core<'a> {
    pub fn new(env: &'a Env, addresses: &ProviderAddresses) -> Self {
        Self {
            client: CoreServiceClient::new(env, &addresses.core),
        }
    }

    pub fn reserves(&self) -> Result<Vec<Address>, LendingError> {
        service_call(
            &self.client.env,
            &self.client.address,
            "get_reserves",
            self.client.try_get_reserves(),
        )
    }

    pub fn reserve_data(&self, reserve: &Address) -> Result<ReserveData, LendingError> {
        protocol_call(
            &self.client.env,
            &self.client.address,
            "get_reserve_data",
            self.client.try_get_reserve_data(reserve),
        )
    }

    pub fn user_reserve_data(
        &self,
        reserve: &Address,
        user: &Address,
    ) -> Result<UserReserveData, LendingError> {
        protocol_call(
            &self.client.env,
            &self.client.address,
            "get_user_reserve_data",
            self.client.try_get_user_reserve_data(reserve, user),
        )
    }

    pub fn configuration(&self, reserve: &Address) -> Result<ReserveConfiguration, LendingError> {
        protocol_call(
            &self.client.env,
            &self.client.address,
            "get_reserve_configuration",
            self.client.try_get_reserve_configuration(reserve),
        )
    }

    pub fn user_basic_reserve_data(
        &self,
        reserve: &Address,
        user: &Address,
    ) -> Result<UserBasicReserveData, LendingError> {
        protocol_call(
            &self.client.env,
            &self.client.address,
            "get_user_basic_reserve_data",
            self.client.try_get_user_basic_reserve_data(reserve, user),
        )
    }

    pub fn available_liquidity(&self, reserve: &Address) -> Result<u128, LendingError> {
        protocol_call(
            &self.client.env,
            &self.client.address,
            "get_reserve_available_liquidity",
            self.client.try_get_reserve_available_liquidity(reserve),
        )
    }

    pub fn total_liquidity(&self, reserve: &Address) -> Result<u128, LendingError> {
        protocol_call(
            &self.client.env,
            &self.client.address,
            "get_reserve_total_liquidity",
            self.client.try_get_reserve_total_liquidity(reserve),
        )
    }
}
