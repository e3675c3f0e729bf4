use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum LendingError {
    UnauthorizedCaller = 1,
    UnknownReserve = 2,
    DivideByZero = 3,
    InvalidConfiguration = 4,
    ExternalCallFailure = 5,
    MathOverflow = 6,
    AlreadyInitialized = 7,
    NotInitialized = 8,
}
