use exa_math::{exa_mul, EXA};
use lending_interface::{
    service_call, LendingError, LpDataSourceClient, WalletEnumerationClient, WorkerTokenClient,
};
use soroban_sdk::{contract, contractimpl, Address, Env, Symbol, Vec};

use crate::constants::BATCH_SIZE;
use crate::events::{
    DayAdvanced, DayStarted, DistPercentageSet, Distribution, LpPoolAdded, RewardsClaimed, State,
};
use crate::helpers::{
    current_day, mint_reward, require_admin, reserve_snapshots, token_distribution_per_day,
    transfer_reward, user_weight, Side,
};
use crate::machine::{advance, Batch, CategoryState, Effect, Phase};
use crate::storage::{
    bump_core_ttl, has_admin, read_config, read_day, read_dist_percentage, read_recipients,
    read_rewards, read_state, read_weight, remove_weight, write_admin, write_config, write_day,
    write_dist_percentage, write_recipients, write_rewards, write_state, write_weight, Recipient,
    RewardsConfig, RewardsView,
};

#[contract]
pub struct RewardDistribution;

#[contractimpl]
impl RewardDistribution {
    /// Recipients start as deposit, borrow, worker and dao fund. The dao fund
    /// starts complete so that the first `distribute` opens day zero.
    pub fn initialize(env: Env, admin: Address, config: RewardsConfig) -> Result<(), LendingError> {
        if has_admin(&env) {
            return Err(LendingError::AlreadyInitialized);
        }
        admin.require_auth();
        write_admin(&env, &admin);
        write_config(&env, &config);
        write_day(&env, 0);
        let mut recipients = Vec::new(&env);
        recipients.push_back(Recipient::Deposit);
        recipients.push_back(Recipient::Borrow);
        recipients.push_back(Recipient::Worker);
        recipients.push_back(Recipient::DaoFund);
        write_recipients(&env, &recipients);
        write_state(&env, &Recipient::DaoFund, &CategoryState::closed());
        bump_core_ttl(&env);
        Ok(())
    }

    pub fn get_config(env: Env) -> Result<RewardsConfig, LendingError> {
        read_config(&env)
    }

    /// Shares must name every recipient exactly once and sum to 1.0.
    pub fn set_dist_percentage(
        env: Env,
        admin: Address,
        percentages: Vec<(Recipient, u128)>,
    ) -> Result<(), LendingError> {
        require_admin(&env, &admin)?;
        let recipients = read_recipients(&env);
        if percentages.len() != recipients.len() {
            return Err(LendingError::InvalidConfiguration);
        }
        let mut total = 0u128;
        for (index, (recipient, percentage)) in percentages.iter().enumerate() {
            let repeated = percentages
                .iter()
                .take(index)
                .any(|(seen, _)| seen == recipient);
            if repeated || !recipients.contains(&recipient) {
                return Err(LendingError::InvalidConfiguration);
            }
            total = total
                .checked_add(percentage)
                .ok_or(LendingError::InvalidConfiguration)?;
        }
        if total != EXA {
            return Err(LendingError::InvalidConfiguration);
        }
        for (recipient, percentage) in percentages.iter() {
            write_dist_percentage(&env, &recipient, percentage);
            DistPercentageSet {
                recipient,
                percentage,
            }
            .publish(&env);
        }
        Ok(())
    }

    /// Unset shares read as zero.
    pub fn get_dist_percentage(env: Env) -> Vec<(Recipient, u128)> {
        let mut percentages = Vec::new(&env);
        for recipient in read_recipients(&env).iter() {
            let percentage = read_dist_percentage(&env, &recipient).unwrap_or(0);
            percentages.push_back((recipient, percentage));
        }
        percentages
    }

    /// Registers a liquidity pool ahead of the worker and dao fund. The pool
    /// takes part from the next reward day and needs its share set before
    /// that day opens.
    pub fn add_lp_pool(env: Env, admin: Address, name: Symbol) -> Result<(), LendingError> {
        require_admin(&env, &admin)?;
        let recipient = Recipient::Liquidity(name);
        let mut recipients = read_recipients(&env);
        if recipients.contains(&recipient) {
            return Err(LendingError::InvalidConfiguration);
        }
        let position = recipients.len().saturating_sub(2);
        recipients.insert(position, recipient.clone());
        write_recipients(&env, &recipients);
        write_state(&env, &recipient, &CategoryState::closed());
        LpPoolAdded { recipient }.publish(&env);
        Ok(())
    }

    pub fn get_recipients(env: Env) -> Vec<Recipient> {
        read_recipients(&env)
    }

    /// Reward day of the current ledger time.
    pub fn get_day(env: Env) -> Result<u64, LendingError> {
        let config = read_config(&env)?;
        Ok(current_day(env.ledger().timestamp(), config.start_timestamp))
    }

    /// Next reward day `distribute` works on.
    pub fn get_distribution_day(env: Env) -> u64 {
        read_day(&env)
    }

    pub fn set_start_timestamp(
        env: Env,
        admin: Address,
        timestamp: u64,
    ) -> Result<(), LendingError> {
        require_admin(&env, &admin)?;
        let mut config = read_config(&env)?;
        config.start_timestamp = timestamp;
        write_config(&env, &config);
        Ok(())
    }

    pub fn get_start_timestamp(env: Env) -> Result<u64, LendingError> {
        Ok(read_config(&env)?.start_timestamp)
    }

    pub fn get_category_state(env: Env, recipient: Recipient) -> CategoryState {
        read_state(&env, &recipient)
    }

    pub fn get_token_distribution_per_day(env: Env, day: u64) -> Result<u128, LendingError> {
        token_distribution_per_day(&env, day)
    }

    /// Runs one step of the first unfinished category. Does nothing until the
    /// day being distributed has ended. The dao fund step closes the day.
    pub fn distribute(env: Env) -> Result<(), LendingError> {
        let config = read_config(&env)?;
        let day = read_day(&env);
        if day >= current_day(env.ledger().timestamp(), config.start_timestamp) {
            return Ok(());
        }
        let recipients = read_recipients(&env);
        if read_state(&env, &Recipient::DaoFund).phase == Phase::Complete {
            open_day(&env, &config, &recipients, day)?;
        }
        for recipient in recipients.iter() {
            let state = read_state(&env, &recipient);
            if state.phase != Phase::Complete {
                return step(&env, &config, &recipient, state, day);
            }
        }
        Ok(())
    }

    /// Pays out and clears every category balance of `user`.
    pub fn claim_rewards(env: Env, user: Address) -> Result<u128, LendingError> {
        user.require_auth();
        let config = read_config(&env)?;
        let mut total = 0u128;
        for recipient in read_recipients(&env).iter() {
            let amount = read_rewards(&env, &user, &recipient);
            total = total
                .checked_add(amount)
                .ok_or(LendingError::MathOverflow)?;
            write_rewards(&env, &user, &recipient, 0);
        }
        transfer_reward(&env, &config, &user, total)?;
        RewardsClaimed {
            user,
            amount: total,
        }
        .publish(&env);
        Ok(total)
    }

    pub fn get_rewards(env: Env, user: Address) -> Result<RewardsView, LendingError> {
        let mut rewards = Vec::new(&env);
        let mut total = 0u128;
        for recipient in read_recipients(&env).iter() {
            let amount = read_rewards(&env, &user, &recipient);
            total = total
                .checked_add(amount)
                .ok_or(LendingError::MathOverflow)?;
            rewards.push_back((recipient, amount));
        }
        Ok(RewardsView { rewards, total })
    }
}

/// Mints the day's emission and splits it into category budgets. Rounding
/// dust lands in the dao fund budget.
fn open_day(
    env: &Env,
    config: &RewardsConfig,
    recipients: &Vec<Recipient>,
    day: u64,
) -> Result<(), LendingError> {
    let daily = token_distribution_per_day(env, day)?;
    let mut allotted = 0u128;
    for recipient in recipients.iter() {
        let percentage =
            read_dist_percentage(env, &recipient).ok_or(LendingError::InvalidConfiguration)?;
        if recipient == Recipient::DaoFund {
            continue;
        }
        let budget = exa_mul(env, daily, percentage)?;
        allotted = allotted
            .checked_add(budget)
            .ok_or(LendingError::MathOverflow)?;
        write_state(env, &recipient, &CategoryState::open(budget));
    }
    let dao_budget = daily
        .checked_sub(allotted)
        .ok_or(LendingError::InvalidConfiguration)?;
    write_state(
        env,
        &Recipient::DaoFund,
        &CategoryState {
            phase: Phase::Distribute,
            ..CategoryState::open(dao_budget)
        },
    );
    mint_reward(env, config, daily)?;
    DayStarted { day, minted: daily }.publish(env);
    Ok(())
}

fn step(
    env: &Env,
    config: &RewardsConfig,
    recipient: &Recipient,
    state: CategoryState,
    day: u64,
) -> Result<(), LendingError> {
    if *recipient == Recipient::DaoFund {
        return close_day(env, config, state, day);
    }
    let batch = match state.phase {
        Phase::Precompute => precompute_batch(env, config, recipient, state, day)?,
        _ if state.remaining_weight == 0 => Batch::nothing(env),
        _ => distribution_batch(env, config, recipient, state, day)?,
    };
    let (next, effects) = advance(env, state, batch)?;
    for effect in effects.iter() {
        match effect {
            Effect::Credit(user, amount) => {
                let balance = read_rewards(env, &user, recipient)
                    .checked_add(amount)
                    .ok_or(LendingError::MathOverflow)?;
                write_rewards(env, &user, recipient, balance);
                Distribution {
                    recipient: recipient.clone(),
                    user,
                    amount,
                }
                .publish(env);
            }
            Effect::Fallback(amount) => {
                transfer_reward(env, config, &config.dao_fund, amount)?;
                Distribution {
                    recipient: recipient.clone(),
                    user: config.dao_fund.clone(),
                    amount,
                }
                .publish(env);
            }
        }
    }
    write_state(env, recipient, &next);
    State {
        recipient: recipient.clone(),
        phase: next.phase,
        cursor: next.cursor,
    }
    .publish(env);
    Ok(())
}

fn close_day(
    env: &Env,
    config: &RewardsConfig,
    state: CategoryState,
    day: u64,
) -> Result<(), LendingError> {
    transfer_reward(env, config, &config.dao_fund, state.remaining_budget)?;
    Distribution {
        recipient: Recipient::DaoFund,
        user: config.dao_fund.clone(),
        amount: state.remaining_budget,
    }
    .publish(env);
    write_state(env, &Recipient::DaoFund, &CategoryState::closed());
    let next_day = day.checked_add(1).ok_or(LendingError::MathOverflow)?;
    write_day(env, next_day);
    DayAdvanced { day: next_day }.publish(env);
    Ok(())
}

fn wallet_page(
    env: &Env,
    config: &RewardsConfig,
    side: Side,
    page: u32,
) -> Result<Vec<Address>, LendingError> {
    let pool = WalletEnumerationClient::new(env, &config.lending_pool);
    match side {
        Side::Deposit => service_call(
            env,
            &config.lending_pool,
            "get_deposit_wallets",
            pool.try_get_deposit_wallets(&page),
        ),
        Side::Borrow => service_call(
            env,
            &config.lending_pool,
            "get_borrow_wallets",
            pool.try_get_borrow_wallets(&page),
        ),
    }
}

fn market_side(recipient: &Recipient) -> Option<Side> {
    match recipient {
        Recipient::Deposit => Some(Side::Deposit),
        Recipient::Borrow => Some(Side::Borrow),
        _ => None,
    }
}

fn precompute_batch(
    env: &Env,
    config: &RewardsConfig,
    recipient: &Recipient,
    state: CategoryState,
    day: u64,
) -> Result<Batch, LendingError> {
    match recipient {
        Recipient::Liquidity(name) => {
            let source = LpDataSourceClient::new(env, &config.lp_source);
            let total = service_call(
                env,
                &config.lp_source,
                "get_total_value",
                source.try_get_total_value(name, &day),
            )?;
            Ok(Batch::total(total))
        }
        Recipient::Worker => {
            let worker = WorkerTokenClient::new(env, &config.worker_token);
            let total = service_call(
                env,
                &config.worker_token,
                "total_supply",
                worker.try_total_supply(),
            )?;
            Ok(Batch::total(total))
        }
        _ => {
            let side = market_side(recipient).ok_or(LendingError::InvalidConfiguration)?;
            let wallets = wallet_page(env, config, side, state.cursor)?;
            let mut total = 0u128;
            if !wallets.is_empty() {
                let reserves = reserve_snapshots(env, config, day)?;
                for user in wallets.iter() {
                    let weight = user_weight(env, config, side, &user, &reserves, day)?;
                    if weight == 0 {
                        continue;
                    }
                    let accumulated = read_weight(env, recipient, &user, day)
                        .checked_add(weight)
                        .ok_or(LendingError::MathOverflow)?;
                    write_weight(env, recipient, &user, day, accumulated);
                    total = total
                        .checked_add(weight)
                        .ok_or(LendingError::MathOverflow)?;
                }
            }
            Ok(Batch::Weights {
                total,
                page_len: wallets.len(),
                page_size: BATCH_SIZE,
            })
        }
    }
}

fn distribution_batch(
    env: &Env,
    config: &RewardsConfig,
    recipient: &Recipient,
    state: CategoryState,
    day: u64,
) -> Result<Batch, LendingError> {
    let mut entries = Vec::new(env);
    match recipient {
        Recipient::Liquidity(name) => {
            let source = LpDataSourceClient::new(env, &config.lp_source);
            let offset = state
                .cursor
                .checked_mul(BATCH_SIZE)
                .ok_or(LendingError::MathOverflow)?;
            let batch = service_call(
                env,
                &config.lp_source,
                "get_data_batch",
                source.try_get_data_batch(name, &day, &BATCH_SIZE, &offset),
            )?;
            let last_page = batch.len() < BATCH_SIZE;
            Ok(Batch::Shares {
                entries: batch,
                last_page,
            })
        }
        Recipient::Worker => {
            let worker = WorkerTokenClient::new(env, &config.worker_token);
            let wallets = service_call(
                env,
                &config.worker_token,
                "get_wallets",
                worker.try_get_wallets(),
            )?;
            for user in wallets.iter() {
                let balance = service_call(
                    env,
                    &config.worker_token,
                    "balance_of",
                    worker.try_balance_of(&user),
                )?;
                entries.push_back((user, balance));
            }
            Ok(Batch::Shares {
                entries,
                last_page: true,
            })
        }
        _ => {
            let side = market_side(recipient).ok_or(LendingError::InvalidConfiguration)?;
            let wallets = wallet_page(env, config, side, state.cursor)?;
            for user in wallets.iter() {
                let weight = read_weight(env, recipient, &user, day);
                remove_weight(env, recipient, &user, day);
                entries.push_back((user, weight));
            }
            Ok(Batch::Shares {
                entries,
                last_page: wallets.len() < BATCH_SIZE,
            })
        }
    }
}
