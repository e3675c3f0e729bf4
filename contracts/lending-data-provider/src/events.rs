use soroban_sdk::{contractevent, Address, Symbol};

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SymbolSet {
    #[topic]
    pub reserve: Address,
    pub symbol: Symbol,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedSymbolSet {
    pub symbol: Symbol,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BorrowPercentageSet {
    pub percentage: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AddressesUpdated {
    #[topic]
    pub core: Address,
    pub oracle: Address,
    pub staking: Address,
    pub lending_pool: Address,
}
