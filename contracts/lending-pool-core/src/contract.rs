use exa_math::{
    calculate_compounded_interest, calculate_interest_rates, calculate_linear_interest,
    compounded_borrow_balance, exa_div, next_cumulative_indexes, normalized_income,
    validate_constants, EXA,
};
use lending_interface::{
    InterestRates, LendingError, ReserveConfiguration, ReserveConstants, ReserveData,
    ReserveField, UserBasicReserveData, UserReserveData, UserReserveField,
};
use soroban_sdk::{contract, contractimpl, Address, Env, Vec};

use crate::events::*;
use crate::helpers::*;
use crate::storage::*;

#[contract]
pub struct LendingPoolCore;

#[contractimpl]
impl LendingPoolCore {
    pub fn initialize(env: Env, admin: Address, lending_pool: Address) -> Result<(), LendingError> {
        if has_admin(&env) {
            return Err(LendingError::AlreadyInitialized);
        }
        admin.require_auth();
        write_admin(&env, &admin);
        write_lending_pool(&env, &lending_pool);
        bump_core_ttl(&env);
        Ok(())
    }

    pub fn set_lending_pool(env: Env, admin: Address, pool: Address) -> Result<(), LendingError> {
        require_admin(&env, &admin)?;
        write_lending_pool(&env, &pool);
        LendingPoolUpdated { pool }.publish(&env);
        Ok(())
    }

    pub fn get_admin(env: Env) -> Result<Address, LendingError> {
        read_admin(&env)
    }

    pub fn get_lending_pool(env: Env) -> Option<Address> {
        read_lending_pool(&env)
    }

    // Reserve ledger

    pub fn add_reserve(
        env: Env,
        caller: Address,
        mut reserve: ReserveData,
    ) -> Result<(), LendingError> {
        require_authorized(&env, &caller)?;
        bootstrap_indices(&mut reserve);
        if let Ok(existing) = read_reserve(&env, &reserve.asset) {
            if reserve.liquidity_cumulative_index < existing.liquidity_cumulative_index
                || reserve.borrow_cumulative_index < existing.borrow_cumulative_index
                || reserve.decimals != existing.decimals
            {
                return Err(LendingError::InvalidConfiguration);
            }
        }
        write_reserve(&env, &reserve);
        ReserveAdded {
            reserve: reserve.asset.clone(),
            decimals: reserve.decimals,
        }
        .publish(&env);
        Ok(())
    }

    pub fn get_reserves(env: Env) -> Vec<Address> {
        read_reserve_list(&env)
    }

    pub fn get_reserve_data(env: Env, asset: Address) -> Result<ReserveData, LendingError> {
        read_reserve(&env, &asset)
    }

    /// Sets a single reserve attribute. Cumulative indices may only grow.
    pub fn update_reserve(
        env: Env,
        caller: Address,
        asset: Address,
        field: ReserveField,
    ) -> Result<(), LendingError> {
        require_authorized(&env, &caller)?;
        let mut reserve = read_reserve(&env, &asset)?;
        match field {
            ReserveField::TotalBorrows(v) => reserve.total_borrows = v,
            ReserveField::LastUpdateTimestamp(v) => reserve.last_update_timestamp = v,
            ReserveField::LiquidityRate(v) => reserve.liquidity_rate = v,
            ReserveField::BorrowRate(v) => reserve.borrow_rate = v,
            ReserveField::LiquidityCumulativeIndex(v) => {
                if v < reserve.liquidity_cumulative_index {
                    return Err(LendingError::InvalidConfiguration);
                }
                reserve.liquidity_cumulative_index = v;
            }
            ReserveField::BorrowCumulativeIndex(v) => {
                if v < reserve.borrow_cumulative_index {
                    return Err(LendingError::InvalidConfiguration);
                }
                reserve.borrow_cumulative_index = v;
            }
            ReserveField::BaseLtvAsCollateral(v) => reserve.base_ltv_as_collateral = v,
            ReserveField::LiquidationThreshold(v) => reserve.liquidation_threshold = v,
            ReserveField::LiquidationBonus(v) => reserve.liquidation_bonus = v,
            ReserveField::BorrowingEnabled(v) => reserve.borrowing_enabled = v,
            ReserveField::UsageAsCollateralEnabled(v) => reserve.usage_as_collateral_enabled = v,
            ReserveField::IsFreezed(v) => reserve.is_freezed = v,
            ReserveField::IsActive(v) => reserve.is_active = v,
        }
        write_reserve(&env, &reserve);
        Ok(())
    }

    pub fn enable_as_collateral(
        env: Env,
        caller: Address,
        asset: Address,
        base_ltv_as_collateral: u128,
        liquidation_threshold: u128,
        liquidation_bonus: u128,
    ) -> Result<(), LendingError> {
        require_authorized(&env, &caller)?;
        if base_ltv_as_collateral > liquidation_threshold || liquidation_threshold > EXA {
            return Err(LendingError::InvalidConfiguration);
        }
        let mut reserve = read_reserve(&env, &asset)?;
        reserve.usage_as_collateral_enabled = true;
        reserve.base_ltv_as_collateral = base_ltv_as_collateral;
        reserve.liquidation_threshold = liquidation_threshold;
        reserve.liquidation_bonus = liquidation_bonus;
        bootstrap_indices(&mut reserve);
        write_reserve(&env, &reserve);
        CollateralEnabled {
            reserve: asset,
            base_ltv_as_collateral,
            liquidation_threshold,
            liquidation_bonus,
        }
        .publish(&env);
        Ok(())
    }

    pub fn disable_as_collateral(env: Env, caller: Address, asset: Address) -> Result<(), LendingError> {
        require_authorized(&env, &caller)?;
        let mut reserve = read_reserve(&env, &asset)?;
        reserve.usage_as_collateral_enabled = false;
        write_reserve(&env, &reserve);
        CollateralDisabled { reserve: asset }.publish(&env);
        Ok(())
    }

    pub fn enable_borrowing(env: Env, caller: Address, asset: Address) -> Result<(), LendingError> {
        Self::toggle_borrowing(&env, &caller, asset, true)
    }

    pub fn disable_borrowing(env: Env, caller: Address, asset: Address) -> Result<(), LendingError> {
        Self::toggle_borrowing(&env, &caller, asset, false)
    }

    pub fn get_reserve_configuration(
        env: Env,
        asset: Address,
    ) -> Result<ReserveConfiguration, LendingError> {
        let reserve = read_reserve(&env, &asset)?;
        Ok(ReserveConfiguration {
            decimals: reserve.decimals,
            base_ltv_as_collateral: reserve.base_ltv_as_collateral,
            liquidation_threshold: reserve.liquidation_threshold,
            liquidation_bonus: reserve.liquidation_bonus,
            usage_as_collateral_enabled: reserve.usage_as_collateral_enabled,
        })
    }

    pub fn set_reserve_constants(
        env: Env,
        caller: Address,
        constants: Vec<ReserveConstants>,
    ) -> Result<(), LendingError> {
        require_authorized(&env, &caller)?;
        for entry in constants.iter() {
            if !has_reserve(&env, &entry.asset) {
                return Err(LendingError::UnknownReserve);
            }
            validate_constants(&entry)?;
            write_constants(&env, &entry);
            ReserveConstantsSet {
                reserve: entry.asset.clone(),
                optimal_utilization_rate: entry.optimal_utilization_rate,
                base_borrow_rate: entry.base_borrow_rate,
                slope_rate_1: entry.slope_rate_1,
                slope_rate_2: entry.slope_rate_2,
            }
            .publish(&env);
        }
        Ok(())
    }

    pub fn get_reserve_constants(env: Env, asset: Address) -> Result<ReserveConstants, LendingError> {
        read_reserve(&env, &asset)?;
        read_constants(&env, &asset)
    }

    // User position ledger

    pub fn add_user_reserve(env: Env, caller: Address, data: UserReserveData) -> Result<(), LendingError> {
        require_authorized(&env, &caller)?;
        let reserve = read_reserve(&env, &data.asset)?;
        if data.user_borrow_cumulative_index > reserve.borrow_cumulative_index {
            return Err(LendingError::InvalidConfiguration);
        }
        write_user_reserve(&env, &data);
        Ok(())
    }

    pub fn get_user_reserve_data(
        env: Env,
        asset: Address,
        user: Address,
    ) -> Result<UserReserveData, LendingError> {
        read_reserve(&env, &asset)?;
        Ok(read_user_reserve(&env, &asset, &user))
    }

    /// Sets a single position attribute. The index snapshot may not run ahead of the reserve.
    pub fn update_user_reserve(
        env: Env,
        caller: Address,
        asset: Address,
        user: Address,
        field: UserReserveField,
    ) -> Result<(), LendingError> {
        require_authorized(&env, &caller)?;
        let reserve = read_reserve(&env, &asset)?;
        let mut data = read_user_reserve(&env, &asset, &user);
        match field {
            UserReserveField::PrincipalBorrowBalance(v) => data.principal_borrow_balance = v,
            UserReserveField::UserBorrowCumulativeIndex(v) => {
                if v > reserve.borrow_cumulative_index {
                    return Err(LendingError::InvalidConfiguration);
                }
                data.user_borrow_cumulative_index = v;
            }
            UserReserveField::LastUpdateTimestamp(v) => data.last_update_timestamp = v,
            UserReserveField::OriginationFee(v) => data.origination_fee = v,
            UserReserveField::UseAsCollateral(v) => data.use_as_collateral = v,
        }
        write_user_reserve(&env, &data);
        Ok(())
    }

    pub fn set_user_use_reserve_as_collateral(
        env: Env,
        caller: Address,
        asset: Address,
        user: Address,
        use_as_collateral: bool,
    ) -> Result<(), LendingError> {
        require_authorized(&env, &caller)?;
        read_reserve(&env, &asset)?;
        Self::write_user_collateral(&env, &asset, &user, use_as_collateral);
        Ok(())
    }

    pub fn get_user_underlying_asset_balance(
        env: Env,
        asset: Address,
        user: Address,
    ) -> Result<u128, LendingError> {
        let reserve = read_reserve(&env, &asset)?;
        o_token_balance(&env, &reserve.o_token, &user)
    }

    /// Balances in reserve decimals. Fee is only reported while a borrow is open.
    pub fn get_user_basic_reserve_data(
        env: Env,
        asset: Address,
        user: Address,
    ) -> Result<UserBasicReserveData, LendingError> {
        let reserve = read_reserve(&env, &asset)?;
        let data = read_user_reserve(&env, &asset, &user);
        let underlying_balance = o_token_balance(&env, &reserve.o_token, &user)?;
        if data.principal_borrow_balance == 0 {
            return Ok(UserBasicReserveData {
                underlying_balance,
                compounded_borrow_balance: 0,
                origination_fee: 0,
                use_as_collateral: data.use_as_collateral,
            });
        }
        Ok(UserBasicReserveData {
            underlying_balance,
            compounded_borrow_balance: compounded_borrow_balance(&env, &reserve, &data, now(&env))?,
            origination_fee: data.origination_fee,
            use_as_collateral: data.use_as_collateral,
        })
    }

    // Interest accrual

    pub fn calculate_linear_interest(
        env: Env,
        rate: u128,
        last_update_timestamp: u64,
    ) -> Result<u128, LendingError> {
        calculate_linear_interest(&env, rate, last_update_timestamp, now(&env))
    }

    pub fn calculate_compounded_interest(
        env: Env,
        rate: u128,
        last_update_timestamp: u64,
    ) -> Result<u128, LendingError> {
        calculate_compounded_interest(&env, rate, last_update_timestamp, now(&env))
    }

    pub fn get_normalized_income(env: Env, asset: Address) -> Result<u128, LendingError> {
        let reserve = read_reserve(&env, &asset)?;
        normalized_income(&env, &reserve, now(&env))
    }

    /// Grows both indices to the current ledger time. Indices stay put while
    /// the reserve has no outstanding borrows.
    pub fn update_cumulative_indexes(env: Env, caller: Address, asset: Address) -> Result<(), LendingError> {
        require_authorized(&env, &caller)?;
        let mut reserve = read_reserve(&env, &asset)?;
        Self::accrue(&env, &mut reserve)?;
        write_reserve(&env, &reserve);
        Ok(())
    }

    pub fn get_compounded_borrow_balance(
        env: Env,
        asset: Address,
        user: Address,
    ) -> Result<u128, LendingError> {
        let reserve = read_reserve(&env, &asset)?;
        let data = read_user_reserve(&env, &asset, &user);
        compounded_borrow_balance(&env, &reserve, &data, now(&env))
    }

    pub fn get_reserve_available_liquidity(env: Env, asset: Address) -> Result<u128, LendingError> {
        read_reserve(&env, &asset)?;
        underlying_balance(&env, &asset)
    }

    pub fn get_reserve_total_liquidity(env: Env, asset: Address) -> Result<u128, LendingError> {
        let reserve = read_reserve(&env, &asset)?;
        underlying_balance(&env, &asset)?
            .checked_add(reserve.total_borrows)
            .ok_or(LendingError::MathOverflow)
    }

    pub fn get_reserve_utilization_rate(env: Env, asset: Address) -> Result<u128, LendingError> {
        let reserve = read_reserve(&env, &asset)?;
        if reserve.total_borrows == 0 {
            return Ok(0);
        }
        let total = Self::get_reserve_total_liquidity(env.clone(), asset)?;
        exa_div(&env, reserve.total_borrows, total)
    }

    pub fn calculate_interest_rates(
        env: Env,
        asset: Address,
        available_liquidity: u128,
        total_borrows: u128,
    ) -> Result<InterestRates, LendingError> {
        read_reserve(&env, &asset)?;
        let constants = read_constants(&env, &asset)?;
        calculate_interest_rates(&env, &constants, available_liquidity, total_borrows)
    }

    pub fn update_reserve_interest_rates_and_timestamp(
        env: Env,
        caller: Address,
        asset: Address,
        liquidity_added: u128,
        liquidity_taken: u128,
    ) -> Result<(), LendingError> {
        require_authorized(&env, &caller)?;
        let mut reserve = read_reserve(&env, &asset)?;
        Self::refresh_rates(&env, &mut reserve, liquidity_added, liquidity_taken)?;
        write_reserve(&env, &reserve);
        Ok(())
    }

    // Pool state transitions

    pub fn update_state_on_deposit(
        env: Env,
        caller: Address,
        asset: Address,
        user: Address,
        amount: u128,
        is_first_deposit: bool,
    ) -> Result<(), LendingError> {
        require_authorized(&env, &caller)?;
        let mut reserve = read_reserve(&env, &asset)?;
        Self::accrue(&env, &mut reserve)?;
        Self::refresh_rates(&env, &mut reserve, amount, 0)?;
        write_reserve(&env, &reserve);
        if is_first_deposit {
            Self::write_user_collateral(&env, &asset, &user, true);
        }
        Ok(())
    }

    /// Folds interest accrued so far into the principal, then adds the new borrow.
    pub fn update_state_on_borrow(
        env: Env,
        caller: Address,
        asset: Address,
        user: Address,
        amount: u128,
        fee: u128,
    ) -> Result<u128, LendingError> {
        require_authorized(&env, &caller)?;
        let mut reserve = read_reserve(&env, &asset)?;
        Self::accrue(&env, &mut reserve)?;
        let mut data = read_user_reserve(&env, &asset, &user);
        let timestamp = now(&env);
        let compounded = compounded_borrow_balance(&env, &reserve, &data, timestamp)?;
        let accrued = compounded.saturating_sub(data.principal_borrow_balance);

        reserve.total_borrows = reserve
            .total_borrows
            .checked_add(accrued)
            .and_then(|v| v.checked_add(amount))
            .ok_or(LendingError::MathOverflow)?;
        data.principal_borrow_balance = compounded
            .checked_add(amount)
            .ok_or(LendingError::MathOverflow)?;
        data.user_borrow_cumulative_index = reserve.borrow_cumulative_index;
        data.last_update_timestamp = timestamp;
        data.origination_fee = data
            .origination_fee
            .checked_add(fee)
            .ok_or(LendingError::MathOverflow)?;

        Self::refresh_rates(&env, &mut reserve, 0, amount)?;
        write_reserve(&env, &reserve);
        write_user_reserve(&env, &data);
        Ok(data.principal_borrow_balance)
    }

    /// Applies a repayment capped at the present debt. Returns the amount applied.
    pub fn update_state_on_repay(
        env: Env,
        caller: Address,
        asset: Address,
        user: Address,
        payback: u128,
        fee_paid: u128,
    ) -> Result<u128, LendingError> {
        require_authorized(&env, &caller)?;
        let mut reserve = read_reserve(&env, &asset)?;
        Self::accrue(&env, &mut reserve)?;
        let mut data = read_user_reserve(&env, &asset, &user);
        let timestamp = now(&env);
        let compounded = compounded_borrow_balance(&env, &reserve, &data, timestamp)?;
        let accrued = compounded.saturating_sub(data.principal_borrow_balance);
        let applied = payback.min(compounded);

        reserve.total_borrows = reserve
            .total_borrows
            .saturating_add(accrued)
            .saturating_sub(applied);
        data.principal_borrow_balance = compounded - applied;
        data.user_borrow_cumulative_index = if data.principal_borrow_balance == 0 {
            0
        } else {
            reserve.borrow_cumulative_index
        };
        data.last_update_timestamp = timestamp;
        data.origination_fee = data.origination_fee.saturating_sub(fee_paid);

        Self::refresh_rates(&env, &mut reserve, applied, 0)?;
        write_reserve(&env, &reserve);
        write_user_reserve(&env, &data);
        Ok(applied)
    }
}

impl LendingPoolCore {
    fn toggle_borrowing(env: &Env, caller: &Address, asset: Address, enabled: bool) -> Result<(), LendingError> {
        require_authorized(env, caller)?;
        let mut reserve = read_reserve(env, &asset)?;
        reserve.borrowing_enabled = enabled;
        write_reserve(env, &reserve);
        BorrowingToggled {
            reserve: asset,
            enabled,
        }
        .publish(env);
        Ok(())
    }

    fn write_user_collateral(env: &Env, asset: &Address, user: &Address, use_as_collateral: bool) {
        let mut data = read_user_reserve(env, asset, user);
        data.use_as_collateral = use_as_collateral;
        write_user_reserve(env, &data);
        UserCollateralToggled {
            reserve: asset.clone(),
            user: user.clone(),
            use_as_collateral,
        }
        .publish(env);
    }

    /// Moves indices and the reserve timestamp together so that accrual is
    /// never applied twice over the same interval.
    fn accrue(env: &Env, reserve: &mut ReserveData) -> Result<(), LendingError> {
        let timestamp = now(env);
        if let Some((liquidity_index, borrow_index)) = next_cumulative_indexes(env, reserve, timestamp)? {
            reserve.liquidity_cumulative_index = liquidity_index;
            reserve.borrow_cumulative_index = borrow_index;
            reserve.last_update_timestamp = timestamp;
            IndexesUpdated {
                reserve: reserve.asset.clone(),
                liquidity_cumulative_index: liquidity_index,
                borrow_cumulative_index: borrow_index,
            }
            .publish(env);
        }
        Ok(())
    }

    fn refresh_rates(
        env: &Env,
        reserve: &mut ReserveData,
        liquidity_added: u128,
        liquidity_taken: u128,
    ) -> Result<(), LendingError> {
        let constants = read_constants(env, &reserve.asset)?;
        let available = underlying_balance(env, &reserve.asset)?
            .checked_add(liquidity_added)
            .and_then(|v| v.checked_sub(liquidity_taken))
            .ok_or(LendingError::MathOverflow)?;
        let rates = calculate_interest_rates(env, &constants, available, reserve.total_borrows)?;
        reserve.liquidity_rate = rates.liquidity_rate;
        reserve.borrow_rate = rates.borrow_rate;
        reserve.last_update_timestamp = now(env);
        ReserveUpdated {
            reserve: reserve.asset.clone(),
            liquidity_rate: rates.liquidity_rate,
            borrow_rate: rates.borrow_rate,
            liquidity_cumulative_index: reserve.liquidity_cumulative_index,
            borrow_cumulative_index: reserve.borrow_cumulative_index,
        }
        .publish(env);
        Ok(())
    }
}
