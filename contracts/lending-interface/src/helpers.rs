use soroban_sdk::{Address, Env, Symbol};

use crate::{ExternalCallFailed, LendingError};

/// Records a failed collaborator call and yields the error to propagate.
pub fn call_failed(env: &Env, contract: &Address, function: &str) -> LendingError {
    ExternalCallFailed {
        contract: contract.clone(),
        function: Symbol::new(env, function),
    }
    .publish(env);
    LendingError::ExternalCallFailure
}

/// Token contracts report balances as `i128`; a negative one is a broken collaborator.
pub fn non_negative(
    env: &Env,
    contract: &Address,
    function: &str,
    value: i128,
) -> Result<u128, LendingError> {
    if value < 0 {
        return Err(call_failed(env, contract, function));
    }
    Ok(value as u128)
}

/// Unwraps a `try_` call into another contract of this protocol. Its
/// `LendingError`s pass through unchanged.
pub fn protocol_call<T, C, I>(
    env: &Env,
    contract: &Address,
    function: &str,
    result: Result<Result<T, C>, Result<LendingError, I>>,
) -> Result<T, LendingError> {
    match result {
        Ok(Ok(value)) => Ok(value),
        Err(Ok(err)) => Err(err),
        _ => Err(call_failed(env, contract, function)),
    }
}

/// Unwraps a `try_` call into an external service. Any failure is an
/// `ExternalCallFailure`.
pub fn service_call<T, C, E, I>(
    env: &Env,
    contract: &Address,
    function: &str,
    result: Result<Result<T, C>, Result<E, I>>,
) -> Result<T, LendingError> {
    match result {
        Ok(Ok(value)) => Ok(value),
        _ => Err(call_failed(env, contract, function)),
    }
}
