use soroban_sdk::{Address, Env, Symbol, Vec};

use crate::{
    LendingError, ReserveConfiguration, ReserveData, ReserveSnapshot, UserBasicReserveData,
    UserReserveData, UserSnapshot,
};

#[soroban_sdk::contractclient(name = "PriceServiceClient")]
pub trait PriceService {
    /// Unit price of `base` quoted in `quote`, EXA scaled.
    fn get_price(env: Env, base: Symbol, quote: Symbol) -> u128;
}

#[soroban_sdk::contractclient(name = "StakingServiceClient")]
pub trait StakingService {
    /// Native asset to staked derivative rate, EXA scaled.
    fn get_exchange_rate(env: Env) -> u128;
}

/// Deposit (oToken) and debt (dToken) token ledgers of a reserve.
#[soroban_sdk::contractclient(name = "LendingTokenClient")]
pub trait LendingTokenService {
    fn total_supply(env: Env) -> i128;
    fn balance(env: Env, id: Address) -> i128;
    fn principal_balance_of(env: Env, user: Address) -> u128;
    fn user_liquidity_cumulative_index(env: Env, user: Address) -> u128;
    fn user_borrow_cumulative_index(env: Env, user: Address) -> u128;
}

#[soroban_sdk::contractclient(name = "SnapshotServiceClient")]
pub trait SnapshotService {
    fn user_data_at(env: Env, user: Address, reserve: Address, day: u64) -> UserSnapshot;
    fn reserve_data_at(env: Env, reserve: Address, day: u64) -> ReserveSnapshot;
}

/// Paginated depositor and borrower lists kept by the lending pool.
#[soroban_sdk::contractclient(name = "WalletEnumerationClient")]
pub trait WalletEnumerationService {
    fn get_deposit_wallets(env: Env, page: u32) -> Vec<Address>;
    fn get_borrow_wallets(env: Env, page: u32) -> Vec<Address>;
}

#[soroban_sdk::contractclient(name = "WorkerTokenClient")]
pub trait WorkerTokenService {
    fn get_wallets(env: Env) -> Vec<Address>;
    fn total_supply(env: Env) -> u128;
    fn balance_of(env: Env, user: Address) -> u128;
}

/// Liquidity-pool stake data, keyed by pool name and reward day.
#[soroban_sdk::contractclient(name = "LpDataSourceClient")]
pub trait LpDataSource {
    fn get_total_value(env: Env, name: Symbol, day: u64) -> u128;
    fn get_data_batch(
        env: Env,
        name: Symbol,
        day: u64,
        limit: u32,
        offset: u32,
    ) -> Vec<(Address, u128)>;
}

#[soroban_sdk::contractclient(name = "RewardTokenClient")]
pub trait RewardTokenService {
    fn mint(env: Env, to: Address, amount: i128);
}

/// Read surface of the lending pool core consumed by the provider and rewards contracts.
#[soroban_sdk::contractclient(name = "CoreServiceClient")]
pub trait CoreService {
    fn get_reserves(env: Env) -> Vec<Address>;
    fn get_reserve_data(env: Env, asset: Address) -> Result<ReserveData, LendingError>;
    fn get_user_reserve_data(
        env: Env,
        asset: Address,
        user: Address,
    ) -> Result<UserReserveData, LendingError>;
    fn get_reserve_configuration(
        env: Env,
        asset: Address,
    ) -> Result<ReserveConfiguration, LendingError>;
    fn get_user_basic_reserve_data(
        env: Env,
        asset: Address,
        user: Address,
    ) -> Result<UserBasicReserveData, LendingError>;
    fn get_reserve_available_liquidity(env: Env, asset: Address) -> Result<u128, LendingError>;
    fn get_reserve_total_liquidity(env: Env, asset: Address) -> Result<u128, LendingError>;
}
