use soroban_sdk::{contractevent, Address, Symbol};

/// Published whenever a collaborator contract reverts or cannot be reached.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExternalCallFailed {
    #[topic]
    pub contract: Address,
    pub function: Symbol,
}
