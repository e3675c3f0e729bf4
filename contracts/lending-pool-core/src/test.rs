#![cfg(test)]

use super::*;
use exa_math::EXA;
use lending_interface::{
    LendingError, ReserveConstants, ReserveData, ReserveField, UserReserveData, UserReserveField,
};
use mock_token::{MockToken, MockTokenClient};
use soroban_sdk::testutils::Ledger;
use soroban_sdk::{testutils::Address as _, token, vec, Address, Env, String};

fn pct(n: u128) -> u128 {
    n * EXA / 100
}

struct Setup<'a> {
    env: Env,
    admin: Address,
    pool: Address,
    core: LendingPoolCoreClient<'a>,
    asset: Address,
    asset_admin: token::StellarAssetClient<'a>,
    o_token: MockTokenClient<'a>,
}

fn setup<'a>() -> Setup<'a> {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let pool = Address::generate(&env);

    let core_id = env.register(LendingPoolCore, ());
    let core = LendingPoolCoreClient::new(&env, &core_id);
    core.initialize(&admin, &pool);

    let asset = env
        .register_stellar_asset_contract_v2(admin.clone())
        .address();
    let asset_admin = token::StellarAssetClient::new(&env, &asset);

    let o_token_id = env.register(MockToken, ());
    let o_token = MockTokenClient::new(&env, &o_token_id);
    o_token.initialize(
        &String::from_str(&env, "oToken"),
        &String::from_str(&env, "OTK"),
        &7u32,
    );

    core.add_reserve(&pool, &reserve_data(&env, &asset, &o_token_id));
    core.set_reserve_constants(
        &admin,
        &vec![
            &env,
            ReserveConstants {
                asset: asset.clone(),
                optimal_utilization_rate: pct(80),
                base_borrow_rate: pct(2),
                slope_rate_1: pct(6),
                slope_rate_2: pct(100),
            },
        ],
    );

    Setup {
        env,
        admin,
        pool,
        core,
        asset,
        asset_admin,
        o_token,
    }
}

fn reserve_data(env: &Env, asset: &Address, o_token: &Address) -> ReserveData {
    ReserveData {
        asset: asset.clone(),
        o_token: o_token.clone(),
        d_token: Address::generate(env),
        total_borrows: 0,
        last_update_timestamp: 0,
        liquidity_rate: 0,
        borrow_rate: 0,
        liquidity_cumulative_index: EXA,
        borrow_cumulative_index: EXA,
        base_ltv_as_collateral: pct(50),
        liquidation_threshold: pct(65),
        liquidation_bonus: pct(10),
        decimals: 7,
        borrowing_enabled: true,
        usage_as_collateral_enabled: true,
        is_freezed: false,
        is_active: true,
    }
}

#[test]
fn test_initialize_only_once() {
    let s = setup();
    assert_eq!(
        s.core.try_initialize(&s.admin, &s.pool),
        Err(Ok(LendingError::AlreadyInitialized))
    );
    assert_eq!(s.core.get_admin(), s.admin);
    assert_eq!(s.core.get_lending_pool(), Some(s.pool.clone()));
}

#[test]
fn test_reserve_registry() {
    let s = setup();
    assert_eq!(s.core.get_reserves(), vec![&s.env, s.asset.clone()]);
    let reserve = s.core.get_reserve_data(&s.asset);
    assert_eq!(reserve.decimals, 7);
    assert_eq!(reserve.liquidity_cumulative_index, EXA);

    let unknown = Address::generate(&s.env);
    assert_eq!(
        s.core.try_get_reserve_data(&unknown),
        Err(Ok(LendingError::UnknownReserve))
    );
    assert_eq!(
        s.core.try_get_user_reserve_data(&unknown, &s.admin),
        Err(Ok(LendingError::UnknownReserve))
    );
}

#[test]
fn test_readding_reserve_keeps_list_unique_and_indexes_monotonic() {
    let s = setup();
    let mut reserve = s.core.get_reserve_data(&s.asset);
    reserve.liquidation_bonus = pct(5);
    s.core.add_reserve(&s.admin, &reserve);
    assert_eq!(s.core.get_reserves().len(), 1);
    assert_eq!(s.core.get_reserve_data(&s.asset).liquidation_bonus, pct(5));

    reserve.borrow_cumulative_index = EXA - 1;
    assert_eq!(
        s.core.try_add_reserve(&s.admin, &reserve),
        Err(Ok(LendingError::InvalidConfiguration))
    );
}

#[test]
fn test_mutations_require_admin_or_pool() {
    let s = setup();
    let stranger = Address::generate(&s.env);
    assert_eq!(
        s.core
            .try_update_reserve(&stranger, &s.asset, &ReserveField::TotalBorrows(1)),
        Err(Ok(LendingError::UnauthorizedCaller))
    );
    assert_eq!(
        s.core.try_disable_borrowing(&stranger, &s.asset),
        Err(Ok(LendingError::UnauthorizedCaller))
    );
    assert_eq!(
        s.core.try_set_lending_pool(&s.pool, &stranger),
        Err(Ok(LendingError::UnauthorizedCaller))
    );

    s.core.disable_borrowing(&s.pool, &s.asset);
    assert!(!s.core.get_reserve_data(&s.asset).borrowing_enabled);
    s.core.enable_borrowing(&s.admin, &s.asset);
    assert!(s.core.get_reserve_data(&s.asset).borrowing_enabled);
}

#[test]
fn test_reserve_index_setters_reject_decrease() {
    let s = setup();
    s.core.update_reserve(
        &s.pool,
        &s.asset,
        &ReserveField::BorrowCumulativeIndex(EXA + 10),
    );
    assert_eq!(
        s.core.try_update_reserve(
            &s.pool,
            &s.asset,
            &ReserveField::BorrowCumulativeIndex(EXA)
        ),
        Err(Ok(LendingError::InvalidConfiguration))
    );
    assert_eq!(
        s.core.try_update_reserve(
            &s.pool,
            &s.asset,
            &ReserveField::LiquidityCumulativeIndex(EXA - 1)
        ),
        Err(Ok(LendingError::InvalidConfiguration))
    );
}

#[test]
fn test_user_index_cannot_exceed_reserve_index() {
    let s = setup();
    let user = Address::generate(&s.env);
    assert_eq!(
        s.core.try_update_user_reserve(
            &s.pool,
            &s.asset,
            &user,
            &UserReserveField::UserBorrowCumulativeIndex(EXA + 1)
        ),
        Err(Ok(LendingError::InvalidConfiguration))
    );
    s.core.update_user_reserve(
        &s.pool,
        &s.asset,
        &user,
        &UserReserveField::UserBorrowCumulativeIndex(EXA),
    );
    assert_eq!(
        s.core
            .get_user_reserve_data(&s.asset, &user)
            .user_borrow_cumulative_index,
        EXA
    );
}

#[test]
fn test_collateral_configuration() {
    let s = setup();
    assert_eq!(
        s.core
            .try_enable_as_collateral(&s.admin, &s.asset, &pct(80), &(EXA + 1), &pct(5)),
        Err(Ok(LendingError::InvalidConfiguration))
    );

    s.core
        .enable_as_collateral(&s.admin, &s.asset, &pct(75), &pct(80), &pct(5));
    let config = s.core.get_reserve_configuration(&s.asset);
    assert_eq!(config.decimals, 7);
    assert_eq!(config.base_ltv_as_collateral, pct(75));
    assert_eq!(config.liquidation_threshold, pct(80));
    assert_eq!(config.liquidation_bonus, pct(5));
    assert!(config.usage_as_collateral_enabled);

    s.core.disable_as_collateral(&s.admin, &s.asset);
    assert!(!s.core.get_reserve_configuration(&s.asset).usage_as_collateral_enabled);
}

#[test]
fn test_reserve_constants_validation() {
    let s = setup();
    let bad = ReserveConstants {
        asset: s.asset.clone(),
        optimal_utilization_rate: 0,
        base_borrow_rate: pct(2),
        slope_rate_1: pct(6),
        slope_rate_2: pct(100),
    };
    assert_eq!(
        s.core.try_set_reserve_constants(&s.admin, &vec![&s.env, bad]),
        Err(Ok(LendingError::InvalidConfiguration))
    );

    let unknown = ReserveConstants {
        asset: Address::generate(&s.env),
        optimal_utilization_rate: pct(80),
        base_borrow_rate: 0,
        slope_rate_1: 0,
        slope_rate_2: 0,
    };
    assert_eq!(
        s.core.try_set_reserve_constants(&s.admin, &vec![&s.env, unknown]),
        Err(Ok(LendingError::UnknownReserve))
    );
    assert_eq!(
        s.core.get_reserve_constants(&s.asset).optimal_utilization_rate,
        pct(80)
    );
}

#[test]
fn test_rate_update_at_kink() {
    let s = setup();
    s.asset_admin.mint(&s.core.address, &200);
    s.core
        .update_reserve(&s.pool, &s.asset, &ReserveField::TotalBorrows(800));
    assert_eq!(s.core.get_reserve_available_liquidity(&s.asset), 200);
    assert_eq!(s.core.get_reserve_total_liquidity(&s.asset), 1_000);
    assert_eq!(s.core.get_reserve_utilization_rate(&s.asset), pct(80));

    s.env.ledger().set_timestamp(500);
    s.core
        .update_reserve_interest_rates_and_timestamp(&s.pool, &s.asset, &0, &0);
    let reserve = s.core.get_reserve_data(&s.asset);
    assert_eq!(reserve.borrow_rate, pct(8));
    assert_eq!(reserve.liquidity_rate, 57_600_000_000_000_000);
    assert_eq!(reserve.last_update_timestamp, 500);

    let rates = s.core.calculate_interest_rates(&s.asset, &0, &1_000);
    assert_eq!(rates.borrow_rate, pct(108));
}

#[test]
fn test_rate_update_rejects_overdrawn_liquidity() {
    let s = setup();
    s.asset_admin.mint(&s.core.address, &10);
    assert_eq!(
        s.core
            .try_update_reserve_interest_rates_and_timestamp(&s.pool, &s.asset, &0, &11),
        Err(Ok(LendingError::MathOverflow))
    );
}

#[test]
fn test_interest_views_use_ledger_time() {
    let s = setup();
    s.env.ledger().set_timestamp(31_536_000);
    assert_eq!(
        s.core.calculate_linear_interest(&pct(10), &0),
        EXA + pct(10)
    );
    assert!(s.core.calculate_compounded_interest(&pct(10), &0) > EXA + pct(10));

    s.core
        .update_reserve(&s.pool, &s.asset, &ReserveField::LiquidityRate(pct(5)));
    assert_eq!(s.core.get_normalized_income(&s.asset), EXA + pct(5));
}

#[test]
fn test_indexes_frozen_without_borrows() {
    let s = setup();
    s.core
        .update_reserve(&s.pool, &s.asset, &ReserveField::LiquidityRate(pct(5)));
    s.core
        .update_reserve(&s.pool, &s.asset, &ReserveField::BorrowRate(pct(10)));
    s.env.ledger().set_timestamp(31_536_000);
    s.core.update_cumulative_indexes(&s.pool, &s.asset);

    let reserve = s.core.get_reserve_data(&s.asset);
    assert_eq!(reserve.liquidity_cumulative_index, EXA);
    assert_eq!(reserve.borrow_cumulative_index, EXA);
    assert_eq!(reserve.last_update_timestamp, 0);
}

#[test]
fn test_indexes_grow_once_per_interval() {
    let s = setup();
    s.core
        .update_reserve(&s.pool, &s.asset, &ReserveField::TotalBorrows(100));
    s.core
        .update_reserve(&s.pool, &s.asset, &ReserveField::LiquidityRate(pct(5)));
    s.core
        .update_reserve(&s.pool, &s.asset, &ReserveField::BorrowRate(pct(10)));
    s.env.ledger().set_timestamp(31_536_000);

    s.core.update_cumulative_indexes(&s.pool, &s.asset);
    let reserve = s.core.get_reserve_data(&s.asset);
    assert_eq!(reserve.liquidity_cumulative_index, EXA + pct(5));
    assert!(reserve.borrow_cumulative_index > 1_105_000_000_000_000_000);
    assert!(reserve.borrow_cumulative_index < 1_106_000_000_000_000_000);
    assert_eq!(reserve.last_update_timestamp, 31_536_000);

    s.core.update_cumulative_indexes(&s.pool, &s.asset);
    assert_eq!(s.core.get_reserve_data(&s.asset), reserve);
}

#[test]
fn test_compounded_balance_dust_rule() {
    let s = setup();
    let user = Address::generate(&s.env);
    s.core.add_user_reserve(
        &s.pool,
        &UserReserveData {
            asset: s.asset.clone(),
            user: user.clone(),
            principal_borrow_balance: 100,
            user_borrow_cumulative_index: EXA,
            last_update_timestamp: 0,
            origination_fee: 0,
            use_as_collateral: false,
        },
    );
    assert_eq!(s.core.get_compounded_borrow_balance(&s.asset, &user), 100);

    s.env.ledger().set_timestamp(10);
    assert_eq!(s.core.get_compounded_borrow_balance(&s.asset, &user), 101);

    let stranger = Address::generate(&s.env);
    assert_eq!(s.core.get_compounded_borrow_balance(&s.asset, &stranger), 0);
}

#[test]
fn test_first_deposit_enables_collateral() {
    let s = setup();
    let user = Address::generate(&s.env);
    s.core
        .update_state_on_deposit(&s.pool, &s.asset, &user, &1_000, &true);
    assert!(s.core.get_user_reserve_data(&s.asset, &user).use_as_collateral);

    let reserve = s.core.get_reserve_data(&s.asset);
    assert_eq!(reserve.borrow_rate, pct(2));
    assert_eq!(reserve.liquidity_rate, 0);

    let other = Address::generate(&s.env);
    s.core
        .update_state_on_deposit(&s.pool, &s.asset, &other, &10, &false);
    assert!(!s.core.get_user_reserve_data(&s.asset, &other).use_as_collateral);

    s.core
        .set_user_use_reserve_as_collateral(&s.pool, &s.asset, &user, &false);
    assert!(!s.core.get_user_reserve_data(&s.asset, &user).use_as_collateral);
}

#[test]
fn test_borrow_then_repay() {
    let s = setup();
    let user = Address::generate(&s.env);
    s.asset_admin.mint(&s.core.address, &1_000);
    s.env.ledger().set_timestamp(100);

    let principal = s
        .core
        .update_state_on_borrow(&s.pool, &s.asset, &user, &400, &4);
    assert_eq!(principal, 400);
    let reserve = s.core.get_reserve_data(&s.asset);
    assert_eq!(reserve.total_borrows, 400);
    assert_eq!(reserve.borrow_rate, pct(5));
    assert_eq!(reserve.liquidity_rate, 18_000_000_000_000_000);

    let position = s.core.get_user_reserve_data(&s.asset, &user);
    assert_eq!(position.principal_borrow_balance, 400);
    assert_eq!(position.user_borrow_cumulative_index, EXA);
    assert_eq!(position.origination_fee, 4);
    assert_eq!(position.last_update_timestamp, 100);

    let applied = s
        .core
        .update_state_on_repay(&s.pool, &s.asset, &user, &150, &4);
    assert_eq!(applied, 150);
    let position = s.core.get_user_reserve_data(&s.asset, &user);
    assert_eq!(position.principal_borrow_balance, 250);
    assert_eq!(position.origination_fee, 0);
    assert_eq!(s.core.get_reserve_data(&s.asset).total_borrows, 250);

    let applied = s
        .core
        .update_state_on_repay(&s.pool, &s.asset, &user, &1_000, &0);
    assert_eq!(applied, 250);
    let position = s.core.get_user_reserve_data(&s.asset, &user);
    assert_eq!(position.principal_borrow_balance, 0);
    assert_eq!(position.user_borrow_cumulative_index, 0);
    assert_eq!(s.core.get_reserve_data(&s.asset).total_borrows, 0);
}

#[test]
fn test_reserve_added_with_zero_indexes_supports_borrowing() {
    let s = setup();
    let asset = s
        .env
        .register_stellar_asset_contract_v2(s.admin.clone())
        .address();
    let asset_admin = token::StellarAssetClient::new(&s.env, &asset);
    let mut reserve = reserve_data(&s.env, &asset, &s.o_token.address);
    reserve.liquidity_cumulative_index = 0;
    reserve.borrow_cumulative_index = 0;
    reserve.usage_as_collateral_enabled = false;
    s.core.add_reserve(&s.admin, &reserve);
    s.core.set_reserve_constants(
        &s.admin,
        &vec![
            &s.env,
            ReserveConstants {
                asset: asset.clone(),
                optimal_utilization_rate: pct(80),
                base_borrow_rate: pct(2),
                slope_rate_1: pct(6),
                slope_rate_2: pct(100),
            },
        ],
    );

    let stored = s.core.get_reserve_data(&asset);
    assert_eq!(stored.liquidity_cumulative_index, EXA);
    assert_eq!(stored.borrow_cumulative_index, EXA);

    let user = Address::generate(&s.env);
    asset_admin.mint(&s.core.address, &1_000_000);
    s.env.ledger().set_timestamp(100);
    s.core
        .update_state_on_borrow(&s.pool, &asset, &user, &100_000, &0);
    assert_eq!(
        s.core
            .get_user_reserve_data(&asset, &user)
            .user_borrow_cumulative_index,
        EXA
    );

    s.env.ledger().set_timestamp(100 + 31_536_000);
    let debt = s.core.get_compounded_borrow_balance(&asset, &user);
    assert!(debt > 100_000);
    let applied = s
        .core
        .update_state_on_repay(&s.pool, &asset, &user, &(debt + 1), &0);
    assert_eq!(applied, debt);
    assert_eq!(
        s.core
            .get_user_reserve_data(&asset, &user)
            .principal_borrow_balance,
        0
    );
}

#[test]
fn test_borrow_accrues_existing_debt() {
    let s = setup();
    let user = Address::generate(&s.env);
    s.asset_admin.mint(&s.core.address, &1_000_000);
    s.core
        .update_state_on_borrow(&s.pool, &s.asset, &user, &100_000, &0);

    s.env.ledger().set_timestamp(31_536_000);
    let debt = s.core.get_compounded_borrow_balance(&s.asset, &user);
    assert!(debt > 100_000);

    let principal = s
        .core
        .update_state_on_borrow(&s.pool, &s.asset, &user, &1_000, &0);
    assert_eq!(principal, debt + 1_000);
    let reserve = s.core.get_reserve_data(&s.asset);
    assert_eq!(reserve.total_borrows, debt + 1_000);
    assert!(reserve.borrow_cumulative_index > EXA);
    assert_eq!(
        s.core
            .get_user_reserve_data(&s.asset, &user)
            .user_borrow_cumulative_index,
        reserve.borrow_cumulative_index
    );
}

#[test]
fn test_user_basic_reserve_data() {
    let s = setup();
    let user = Address::generate(&s.env);
    s.o_token.mint(&user, &300);
    s.core.update_user_reserve(
        &s.pool,
        &s.asset,
        &user,
        &UserReserveField::OriginationFee(5),
    );
    assert_eq!(s.core.get_user_underlying_asset_balance(&s.asset, &user), 300);

    let basic = s.core.get_user_basic_reserve_data(&s.asset, &user);
    assert_eq!(basic.underlying_balance, 300);
    assert_eq!(basic.compounded_borrow_balance, 0);
    assert_eq!(basic.origination_fee, 0);

    s.asset_admin.mint(&s.core.address, &1_000);
    s.core
        .update_state_on_borrow(&s.pool, &s.asset, &user, &50, &1);
    let basic = s.core.get_user_basic_reserve_data(&s.asset, &user);
    assert_eq!(basic.compounded_borrow_balance, 50);
    assert_eq!(basic.origination_fee, 6);
}

#[test]
#[should_panic(expected = "Error(Contract, #2)")]
fn test_configuration_of_unknown_reserve_panics() {
    let s = setup();
    let unknown = Address::generate(&s.env);
    s.core.get_reserve_configuration(&unknown);
}
