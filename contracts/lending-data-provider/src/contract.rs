use exa_math::{
    available_borrows_usd, bad_debt_usd, borrowing_power_from_balances, collateral_needed_usd,
    convert_exa_to_other, exa_div, exa_mul, health_factor_from_balances,
    is_below_liquidation_threshold, weighted_average, EXA, HEALTH_FACTOR_LIQUIDATION_THRESHOLD,
};
use lending_interface::{
    service_call, LendingError, ReserveConfiguration, WalletEnumerationClient,
};
use soroban_sdk::{contract, contractimpl, Address, Env, Map, Symbol};

use crate::events::*;
use crate::helpers::*;
use crate::storage::*;

#[contract]
pub struct LendingDataProvider;

#[contractimpl]
impl LendingDataProvider {
    pub fn initialize(
        env: Env,
        admin: Address,
        core: Address,
        oracle: Address,
        staking: Address,
        lending_pool: Address,
    ) -> Result<(), LendingError> {
        if has_admin(&env) {
            return Err(LendingError::AlreadyInitialized);
        }
        admin.require_auth();
        write_admin(&env, &admin);
        write_addresses(
            &env,
            &ProviderAddresses {
                core,
                oracle,
                staking,
                lending_pool,
            },
        );
        bump_core_ttl(&env);
        Ok(())
    }

    pub fn set_symbol(env: Env, admin: Address, reserve: Address, symbol: Symbol) -> Result<(), LendingError> {
        require_admin(&env, &admin)?;
        write_symbol(&env, &reserve, &symbol);
        SymbolSet { reserve, symbol }.publish(&env);
        Ok(())
    }

    pub fn get_symbol(env: Env, reserve: Address) -> Result<Symbol, LendingError> {
        read_symbol(&env, &reserve)
    }

    pub fn set_staked_symbol(env: Env, admin: Address, symbol: Symbol) -> Result<(), LendingError> {
        require_admin(&env, &admin)?;
        write_staked_symbol(&env, &symbol);
        StakedSymbolSet { symbol }.publish(&env);
        Ok(())
    }

    pub fn get_staked_symbol(env: Env) -> Option<Symbol> {
        read_staked_symbol(&env)
    }

    pub fn set_addresses(env: Env, admin: Address, addresses: ProviderAddresses) -> Result<(), LendingError> {
        require_admin(&env, &admin)?;
        write_addresses(&env, &addresses);
        AddressesUpdated {
            core: addresses.core,
            oracle: addresses.oracle,
            staking: addresses.staking,
            lending_pool: addresses.lending_pool,
        }
        .publish(&env);
        Ok(())
    }

    pub fn get_addresses(env: Env) -> Result<ProviderAddresses, LendingError> {
        read_addresses(&env)
    }

    pub fn set_borrow_percentage(env: Env, admin: Address, percentage: u128) -> Result<(), LendingError> {
        require_admin(&env, &admin)?;
        if percentage == 0 || percentage > EXA {
            return Err(LendingError::InvalidConfiguration);
        }
        write_borrow_percentage(&env, percentage);
        BorrowPercentageSet { percentage }.publish(&env);
        Ok(())
    }

    pub fn get_borrow_percentage(env: Env) -> u128 {
        read_borrow_percentage(&env)
    }

    /// Aggregates every reserve the user touches into USD totals, weighted
    /// collateral parameters and the health factor.
    pub fn get_user_account_data(env: Env, user: Address) -> Result<UserAccountData, LendingError> {
        let addresses = read_addresses(&env)?;
        Self::account_data(&env, &addresses, &user)
    }

    pub fn get_user_reserve_data(
        env: Env,
        reserve: Address,
        user: Address,
    ) -> Result<UserReserveView, LendingError> {
        let addresses = read_addresses(&env)?;
        Self::user_reserve_view(&env, &addresses, &reserve, &user)
    }

    pub fn get_user_all_reserve_data(
        env: Env,
        user: Address,
    ) -> Result<Map<Symbol, UserReserveView>, LendingError> {
        let addresses = read_addresses(&env)?;
        let mut views = Map::new(&env);
        for reserve in Core::new(&env, &addresses).reserves()?.iter() {
            let view = Self::user_reserve_view(&env, &addresses, &reserve, &user)?;
            views.set(read_symbol(&env, &reserve)?, view);
        }
        Ok(views)
    }

    /// Whether withdrawing `amount` of `reserve` keeps the account above the
    /// liquidation threshold.
    pub fn balance_decrease_allowed(
        env: Env,
        reserve: Address,
        user: Address,
        amount: u128,
    ) -> Result<bool, LendingError> {
        let addresses = read_addresses(&env)?;
        let core = Core::new(&env, &addresses);
        let config = core.configuration(&reserve)?;
        let position = core.user_reserve_data(&reserve, &user)?;
        if !config.usage_as_collateral_enabled || !position.use_as_collateral {
            return Ok(true);
        }

        let account = Self::account_data(&env, &addresses, &user)?;
        if account.total_borrow_balance_usd == 0 {
            return Ok(true);
        }

        let price = reserve_price(&env, &addresses, &reserve)?;
        let decrease_usd = usd_value(&env, amount, config.decimals, price.usd)?;
        let collateral_after = account
            .total_collateral_balance_usd
            .saturating_sub(decrease_usd);
        if collateral_after == 0 {
            return Ok(false);
        }

        let weighted_threshold = exa_mul(
            &env,
            account.total_collateral_balance_usd,
            account.current_liquidation_threshold,
        )?
        .saturating_sub(exa_mul(&env, decrease_usd, config.liquidation_threshold)?);
        let threshold_after = exa_div(&env, weighted_threshold, collateral_after)?;
        let health_factor = health_factor_from_balances(
            &env,
            collateral_after,
            account.total_borrow_balance_usd,
            account.total_fees_usd,
            threshold_after,
        )?;
        Ok(health_factor > HEALTH_FACTOR_LIQUIDATION_THRESHOLD)
    }

    /// Collateral in USD needed to hold the current debt plus `amount` of `reserve`.
    pub fn calculate_collateral_needed_usd(
        env: Env,
        reserve: Address,
        amount: u128,
        _fee: u128,
        current_borrow_usd: u128,
        current_fees_usd: u128,
        current_ltv: u128,
    ) -> Result<u128, LendingError> {
        let addresses = read_addresses(&env)?;
        let config = Core::new(&env, &addresses).configuration(&reserve)?;
        let price = reserve_price(&env, &addresses, &reserve)?;
        let requested_usd = usd_value(&env, amount, config.decimals, price.usd)?;
        collateral_needed_usd(
            &env,
            requested_usd,
            current_borrow_usd,
            current_fees_usd,
            current_ltv,
        )
    }

    pub fn get_reserve_account_data(env: Env) -> Result<ReserveAccountData, LendingError> {
        let addresses = read_addresses(&env)?;
        let core = Core::new(&env, &addresses);
        let mut totals = ReserveAccountData {
            total_liquidity_balance_usd: 0,
            available_liquidity_balance_usd: 0,
            total_borrows_balance_usd: 0,
            total_collateral_balance_usd: 0,
        };
        for reserve in core.reserves()?.iter() {
            let data = core.reserve_data(&reserve)?;
            let price = reserve_price(&env, &addresses, &reserve)?.usd;
            let total = usd_value(&env, core.total_liquidity(&reserve)?, data.decimals, price)?;
            let available =
                usd_value(&env, core.available_liquidity(&reserve)?, data.decimals, price)?;
            let borrows = usd_value(&env, data.total_borrows, data.decimals, price)?;

            totals.total_liquidity_balance_usd = checked_sum(totals.total_liquidity_balance_usd, total)?;
            totals.available_liquidity_balance_usd =
                checked_sum(totals.available_liquidity_balance_usd, available)?;
            totals.total_borrows_balance_usd = checked_sum(totals.total_borrows_balance_usd, borrows)?;
            if data.usage_as_collateral_enabled {
                totals.total_collateral_balance_usd =
                    checked_sum(totals.total_collateral_balance_usd, total)?;
            }
        }
        Ok(totals)
    }

    pub fn get_reserve_data(env: Env, reserve: Address) -> Result<ReserveView, LendingError> {
        let addresses = read_addresses(&env)?;
        Self::reserve_view(&env, &addresses, &reserve)
    }

    pub fn get_all_reserve_data(env: Env) -> Result<Map<Symbol, ReserveView>, LendingError> {
        let addresses = read_addresses(&env)?;
        let mut views = Map::new(&env);
        for reserve in Core::new(&env, &addresses).reserves()?.iter() {
            let view = Self::reserve_view(&env, &addresses, &reserve)?;
            views.set(read_symbol(&env, &reserve)?, view);
        }
        Ok(views)
    }

    pub fn get_reserve_configuration_data(
        env: Env,
        reserve: Address,
    ) -> Result<ReserveConfiguration, LendingError> {
        let addresses = read_addresses(&env)?;
        Core::new(&env, &addresses).configuration(&reserve)
    }

    /// Debt token balance plus the unpaid origination fee, in reserve decimals.
    pub fn get_real_time_debt(env: Env, reserve: Address, user: Address) -> Result<u128, LendingError> {
        let addresses = read_addresses(&env)?;
        let view = Self::user_reserve_view(&env, &addresses, &reserve, &user)?;
        checked_sum(view.current_borrow_balance, view.origination_fee)
    }

    pub fn get_user_liquidation_data(env: Env, user: Address) -> Result<LiquidationData, LendingError> {
        let addresses = read_addresses(&env)?;
        Self::liquidation_data(&env, &addresses, &user)
    }

    /// Liquidatable accounts among one page of borrowers.
    pub fn liquidation_list(env: Env, page: u32) -> Result<Map<Address, LiquidationData>, LendingError> {
        let addresses = read_addresses(&env)?;
        let pool = WalletEnumerationClient::new(&env, &addresses.lending_pool);
        let wallets = service_call(
            &env,
            &addresses.lending_pool,
            "get_borrow_wallets",
            pool.try_get_borrow_wallets(&page),
        )?;
        let mut list = Map::new(&env);
        for wallet in wallets.iter() {
            let account = Self::account_data(&env, &addresses, &wallet)?;
            if is_below_liquidation_threshold(account.health_factor) {
                let data = Self::liquidation_data(&env, &addresses, &wallet)?;
                list.set(wallet, data);
            }
        }
        Ok(list)
    }
}

impl LendingDataProvider {
    fn account_data(
        env: &Env,
        addresses: &ProviderAddresses,
        user: &Address,
    ) -> Result<UserAccountData, LendingError> {
        let core = Core::new(env, addresses);
        let mut liquidity_usd = 0u128;
        let mut collateral_usd = 0u128;
        let mut borrow_usd = 0u128;
        let mut fees_usd = 0u128;
        let mut weighted_ltv = 0u128;
        let mut weighted_threshold = 0u128;

        for reserve in core.reserves()?.iter() {
            let basic = core.user_basic_reserve_data(&reserve, user)?;
            if basic.underlying_balance == 0 && basic.compounded_borrow_balance == 0 {
                continue;
            }
            let config = core.configuration(&reserve)?;
            let price = reserve_price(env, addresses, &reserve)?.usd;

            if basic.underlying_balance > 0 {
                let balance_usd = usd_value(env, basic.underlying_balance, config.decimals, price)?;
                liquidity_usd = checked_sum(liquidity_usd, balance_usd)?;
                if config.usage_as_collateral_enabled && basic.use_as_collateral {
                    collateral_usd = checked_sum(collateral_usd, balance_usd)?;
                    weighted_ltv = checked_sum(
                        weighted_ltv,
                        exa_mul(env, balance_usd, config.base_ltv_as_collateral)?,
                    )?;
                    weighted_threshold = checked_sum(
                        weighted_threshold,
                        exa_mul(env, balance_usd, config.liquidation_threshold)?,
                    )?;
                }
            }

            if basic.compounded_borrow_balance > 0 {
                borrow_usd = checked_sum(
                    borrow_usd,
                    usd_value(env, basic.compounded_borrow_balance, config.decimals, price)?,
                )?;
                fees_usd = checked_sum(
                    fees_usd,
                    usd_value(env, basic.origination_fee, config.decimals, price)?,
                )?;
            }
        }

        let current_ltv = weighted_average(env, weighted_ltv, collateral_usd)?;
        let current_liquidation_threshold = weighted_average(env, weighted_threshold, collateral_usd)?;
        let health_factor = health_factor_from_balances(
            env,
            collateral_usd,
            borrow_usd,
            fees_usd,
            current_liquidation_threshold,
        )?;

        Ok(UserAccountData {
            total_liquidity_balance_usd: liquidity_usd,
            total_collateral_balance_usd: collateral_usd,
            total_borrow_balance_usd: borrow_usd,
            total_fees_usd: fees_usd,
            available_borrows_usd: available_borrows_usd(
                env,
                collateral_usd,
                borrow_usd,
                fees_usd,
                current_ltv,
            )?,
            current_ltv,
            current_liquidation_threshold,
            health_factor,
            borrowing_power: borrowing_power_from_balances(
                env,
                collateral_usd,
                borrow_usd,
                fees_usd,
                current_liquidation_threshold,
            )?,
            health_factor_below_threshold: is_below_liquidation_threshold(health_factor),
        })
    }

    fn user_reserve_view(
        env: &Env,
        addresses: &ProviderAddresses,
        reserve: &Address,
        user: &Address,
    ) -> Result<UserReserveView, LendingError> {
        let core = Core::new(env, addresses);
        let data = core.reserve_data(reserve)?;
        let position = core.user_reserve_data(reserve, user)?;
        let o_token = LendingToken::new(env, &data.o_token);
        let d_token = LendingToken::new(env, &data.d_token);
        let price = reserve_price(env, addresses, reserve)?;

        let current_o_token_balance = o_token.balance(user)?;
        let principal_o_token_balance = o_token.principal_balance_of(user)?;
        let current_borrow_balance = d_token.balance(user)?;
        let principal_borrow_balance = d_token.principal_balance_of(user)?;

        Ok(UserReserveView {
            current_o_token_balance,
            current_o_token_balance_usd: usd_value(env, current_o_token_balance, data.decimals, price.usd)?,
            principal_o_token_balance,
            principal_o_token_balance_usd: usd_value(
                env,
                principal_o_token_balance,
                data.decimals,
                price.usd,
            )?,
            current_borrow_balance,
            current_borrow_balance_usd: usd_value(env, current_borrow_balance, data.decimals, price.usd)?,
            principal_borrow_balance,
            principal_borrow_balance_usd: usd_value(
                env,
                principal_borrow_balance,
                data.decimals,
                price.usd,
            )?,
            user_liquidity_cumulative_index: o_token.user_liquidity_cumulative_index(user)?,
            user_borrow_cumulative_index: d_token.user_borrow_cumulative_index(user)?,
            borrow_rate: data.borrow_rate,
            liquidity_rate: data.liquidity_rate,
            origination_fee: position.origination_fee,
            last_update_timestamp: position.last_update_timestamp,
            use_as_collateral: position.use_as_collateral,
            price: price.usd,
            decimals: data.decimals,
            staking_rate: price.staking_rate,
        })
    }

    fn reserve_view(
        env: &Env,
        addresses: &ProviderAddresses,
        reserve: &Address,
    ) -> Result<ReserveView, LendingError> {
        let core = Core::new(env, addresses);
        let data = core.reserve_data(reserve)?;
        let deposited = LendingToken::new(env, &data.o_token).total_supply()?;
        let borrowed = LendingToken::new(env, &data.d_token).total_supply()?;
        let available_borrows =
            exa_mul(env, read_borrow_percentage(env), deposited)?.saturating_sub(borrowed);
        let price = reserve_price(env, addresses, reserve)?;
        let total_liquidity = core.total_liquidity(reserve)?;
        let available_liquidity = core.available_liquidity(reserve)?;

        Ok(ReserveView {
            total_liquidity_usd: usd_value(env, total_liquidity, data.decimals, price.usd)?,
            available_liquidity_usd: usd_value(env, available_liquidity, data.decimals, price.usd)?,
            total_borrows_usd: usd_value(env, data.total_borrows, data.decimals, price.usd)?,
            total_liquidity,
            available_liquidity,
            available_borrows,
            price: price.usd,
            staking_rate: price.staking_rate,
            data,
        })
    }

    fn liquidation_data(
        env: &Env,
        addresses: &ProviderAddresses,
        user: &Address,
    ) -> Result<LiquidationData, LendingError> {
        let account = Self::account_data(env, addresses, user)?;
        let bad_debt = if account.health_factor_below_threshold {
            bad_debt_usd(
                env,
                account.total_collateral_balance_usd,
                account.total_borrow_balance_usd,
                account.total_fees_usd,
                account.current_ltv,
            )?
        } else {
            0
        };

        let core = Core::new(env, addresses);
        let mut borrows = Map::new(env);
        let mut collaterals = Map::new(env);
        for reserve in core.reserves()?.iter() {
            let basic = core.user_basic_reserve_data(&reserve, user)?;
            if basic.underlying_balance == 0 && basic.compounded_borrow_balance == 0 {
                continue;
            }
            let decimals = core.configuration(&reserve)?.decimals;
            let symbol = read_symbol(env, &reserve)?;
            let price = reserve_price(env, addresses, &reserve)?.usd;

            if basic.compounded_borrow_balance > 0 {
                let borrow_usd = usd_value(env, basic.compounded_borrow_balance, decimals, price)?;
                let (max_amount_to_liquidate, max_amount_to_liquidate_usd) = if bad_debt > borrow_usd {
                    (basic.compounded_borrow_balance, borrow_usd)
                } else {
                    let amount = convert_exa_to_other(exa_div(env, bad_debt, price)?, decimals)?;
                    (amount, bad_debt)
                };
                borrows.set(
                    symbol.clone(),
                    BorrowLiquidation {
                        compounded_borrow_balance: basic.compounded_borrow_balance,
                        compounded_borrow_balance_usd: borrow_usd,
                        max_amount_to_liquidate,
                        max_amount_to_liquidate_usd,
                    },
                );
            }
            if basic.underlying_balance > 0 {
                collaterals.set(
                    symbol,
                    CollateralView {
                        underlying_balance: basic.underlying_balance,
                        underlying_balance_usd: usd_value(env, basic.underlying_balance, decimals, price)?,
                    },
                );
            }
        }

        Ok(LiquidationData {
            bad_debt,
            borrows,
            collaterals,
        })
    }
}
