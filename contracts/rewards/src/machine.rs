//! Per-category reward distribution as a pure transition function.
//!
//! A category walks `Precompute -> Distribute -> Complete` once per reward
//! day. Precompute pages sum participant weights. Distribute pages split the
//! remaining budget pro rata over the remaining weight, shrinking both by what
//! each participant consumed, so the last participant receives exactly what
//! is left. Budget that no weight claims falls back to the dao fund.

use exa_math::{exa_div, exa_mul};
use lending_interface::LendingError;
use soroban_sdk::{contracttype, Address, Env, Vec};

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Phase {
    Precompute = 0,
    Distribute = 1,
    Complete = 2,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CategoryState {
    pub phase: Phase,
    pub cursor: u32,
    pub remaining_weight: u128,
    pub remaining_budget: u128,
}

impl CategoryState {
    pub fn open(budget: u128) -> Self {
        Self {
            phase: Phase::Precompute,
            cursor: 0,
            remaining_weight: 0,
            remaining_budget: budget,
        }
    }

    pub fn closed() -> Self {
        Self {
            phase: Phase::Complete,
            cursor: 0,
            remaining_weight: 0,
            remaining_budget: 0,
        }
    }
}

/// One page of collaborator data.
#[derive(Clone, Debug)]
pub enum Batch {
    /// Weight summed over a precompute page of `page_len` entries.
    Weights {
        total: u128,
        page_len: u32,
        page_size: u32,
    },
    /// Weight of each participant on a distribution page.
    Shares {
        entries: Vec<(Address, u128)>,
        last_page: bool,
    },
}

impl Batch {
    /// A precompute that needs no paging.
    pub fn total(total: u128) -> Self {
        Batch::Weights {
            total,
            page_len: 0,
            page_size: 1,
        }
    }

    pub fn nothing(env: &Env) -> Self {
        Batch::Shares {
            entries: Vec::new(env),
            last_page: true,
        }
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Effect {
    Credit(Address, u128),
    Fallback(u128),
}

pub fn advance(
    env: &Env,
    state: CategoryState,
    batch: Batch,
) -> Result<(CategoryState, Vec<Effect>), LendingError> {
    let mut next = state;
    let mut effects = Vec::new(env);
    match (state.phase, batch) {
        (Phase::Complete, _) => {}
        (
            Phase::Precompute,
            Batch::Weights {
                total,
                page_len,
                page_size,
            },
        ) => {
            next.remaining_weight = next
                .remaining_weight
                .checked_add(total)
                .ok_or(LendingError::MathOverflow)?;
            if page_len < page_size {
                next.phase = Phase::Distribute;
                next.cursor = 0;
            } else {
                next.cursor = next.cursor.checked_add(1).ok_or(LendingError::MathOverflow)?;
            }
        }
        (Phase::Distribute, Batch::Shares { entries, last_page }) => {
            for (user, weight) in entries.iter() {
                if next.remaining_budget == 0 || next.remaining_weight == 0 {
                    break;
                }
                let weight = weight.min(next.remaining_weight);
                let share = exa_mul(
                    env,
                    exa_div(env, weight, next.remaining_weight)?,
                    next.remaining_budget,
                )?
                .min(next.remaining_budget);
                next.remaining_weight -= weight;
                next.remaining_budget -= share;
                if share > 0 {
                    effects.push_back(Effect::Credit(user, share));
                }
            }
            if last_page || next.remaining_weight == 0 {
                if next.remaining_budget > 0 {
                    effects.push_back(Effect::Fallback(next.remaining_budget));
                    next.remaining_budget = 0;
                }
                next.phase = Phase::Complete;
                next.cursor = 0;
            } else {
                next.cursor = next.cursor.checked_add(1).ok_or(LendingError::MathOverflow)?;
            }
        }
        _ => return Err(LendingError::InvalidConfiguration),
    }
    Ok((next, effects))
}
