use soroban_sdk::{contractevent, Address};

use crate::machine::Phase;
use crate::storage::Recipient;

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Distribution {
    #[topic]
    pub recipient: Recipient,
    #[topic]
    pub user: Address,
    pub amount: u128,
}

/// Emitted after every step of a category.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct State {
    #[topic]
    pub recipient: Recipient,
    pub phase: Phase,
    pub cursor: u32,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DayStarted {
    pub day: u64,
    pub minted: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DayAdvanced {
    pub day: u64,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsClaimed {
    #[topic]
    pub user: Address,
    pub amount: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DistPercentageSet {
    #[topic]
    pub recipient: Recipient,
    pub percentage: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LpPoolAdded {
    pub recipient: Recipient,
}
