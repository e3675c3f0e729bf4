#![cfg(test)]
use super::*;
use soroban_sdk::{contract, contractimpl, testutils::Address as _, Address, Env};

#[contract]
struct PingContract;

#[contractimpl]
impl PingContract {
    pub fn ping(_env: Env) -> u32 {
        1
    }
}

#[test]
fn test_call_failed_maps_to_external_failure() {
    let env = Env::default();
    let id = env.register(PingContract, ());
    let target = Address::generate(&env);
    let err = env.as_contract(&id, || call_failed(&env, &target, "get_price"));
    assert_eq!(err, LendingError::ExternalCallFailure);
}

#[test]
fn test_non_negative_balances() {
    let env = Env::default();
    let id = env.register(PingContract, ());
    let token = Address::generate(&env);
    env.as_contract(&id, || {
        assert_eq!(non_negative(&env, &token, "balance", 42), Ok(42u128));
        assert_eq!(non_negative(&env, &token, "balance", 0), Ok(0u128));
        assert_eq!(
            non_negative(&env, &token, "balance", -1),
            Err(LendingError::ExternalCallFailure)
        );
    });
}

#[test]
fn test_protocol_call_forwards_protocol_errors() {
    let env = Env::default();
    let id = env.register(PingContract, ());
    let core = Address::generate(&env);
    env.as_contract(&id, || {
        let ok: Result<Result<u128, ()>, Result<LendingError, ()>> = Ok(Ok(7));
        assert_eq!(protocol_call(&env, &core, "get_reserve_data", ok), Ok(7u128));

        let rejected: Result<Result<u128, ()>, Result<LendingError, ()>> =
            Err(Ok(LendingError::UnknownReserve));
        assert_eq!(
            protocol_call(&env, &core, "get_reserve_data", rejected),
            Err(LendingError::UnknownReserve)
        );

        let aborted: Result<Result<u128, ()>, Result<LendingError, ()>> = Err(Err(()));
        assert_eq!(
            protocol_call(&env, &core, "get_reserve_data", aborted),
            Err(LendingError::ExternalCallFailure)
        );
    });
}

#[test]
fn test_service_call_masks_foreign_errors() {
    let env = Env::default();
    let id = env.register(PingContract, ());
    let oracle = Address::generate(&env);
    env.as_contract(&id, || {
        let ok: Result<Result<u128, ()>, Result<u32, ()>> = Ok(Ok(5));
        assert_eq!(service_call(&env, &oracle, "get_price", ok), Ok(5u128));

        let failed: Result<Result<u128, ()>, Result<u32, ()>> = Err(Ok(3));
        assert_eq!(
            service_call(&env, &oracle, "get_price", failed),
            Err(LendingError::ExternalCallFailure)
        );
    });
}
