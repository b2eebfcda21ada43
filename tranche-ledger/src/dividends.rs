//! Per-instrument dividend accumulator.
//!
//! Each deposit bumps one magnified per-share value; balance changes adjust
//! a per-holder correction so entitlement never has to be recomputed by
//! walking holders.

use shared::errors::Error;
use shared::events::{DISTRIBUTION_STARTED, DIVIDENDS_DEPOSITED};
use shared::types::{Allocation, Amount, InstrumentId};
use soroban_sdk::{Address, Env, I256};

use crate::fixed_point;
use crate::guard::ReentrancyGuard;
use crate::payment;
use crate::storage::{
    get_balance, get_correction, get_dust, get_instrument, get_link_of, get_magnified_per_share,
    get_withdrawn, has_distributed, mark_distributed, set_correction, set_dust,
    set_magnified_per_share,
};
use crate::validation::{require_not_paused, require_open, validate_amount};
use crate::waterfall;

/// Accept a payment for `id` and spread it over the current holders.
///
/// Effects are written before the payment asset is pulled. A failed pull
/// surfaces as `ExternalTransferFailed`, which aborts the invocation and
/// discards those effects.
pub fn deposit(
    env: &Env,
    depositor: &Address,
    id: InstrumentId,
    amount: Amount,
) -> Result<Allocation, Error> {
    let _guard = ReentrancyGuard::acquire(env)?;
    require_not_paused(env)?;
    validate_amount(amount)?;

    let instrument = get_instrument(env, id)?;
    require_open(&instrument)?;
    if instrument.total_supply == 0 {
        return Err(Error::NoHolders);
    }

    let allocation = match get_link_of(env, id) {
        Some(link) if link.senior_id == id => {
            waterfall::route_deposit(env, &link, &instrument, amount)?
        }
        _ => {
            accrue(env, id, amount, instrument.total_supply)?;
            Allocation {
                instrument_id: id,
                accrued: amount,
                sibling_id: None,
                spilled: 0,
            }
        }
    };

    if !has_distributed(env) {
        mark_distributed(env);
        env.events()
            .publish((DISTRIBUTION_STARTED,), (id, env.ledger().timestamp()));
    }
    env.events().publish(
        (DIVIDENDS_DEPOSITED,),
        (id, depositor.clone(), amount, allocation.spilled),
    );

    payment::pull(env, depositor, amount)?.into_result()?;
    Ok(allocation)
}

/// Add `amount` pro-rata over `supply` units of `id` and book the rounding
/// remainder as dust.
pub fn accrue(env: &Env, id: InstrumentId, amount: Amount, supply: Amount) -> Result<(), Error> {
    let acc = get_magnified_per_share(env, id);
    let next = fixed_point::increment(env, &acc, amount, supply)?;
    let step = next.sub(&acc);
    set_magnified_per_share(env, id, &next);

    let distributable = fixed_point::distributable_bound(env, &step, supply)?;
    add_dust(env, amount - distributable)
}

pub fn add_dust(env: &Env, amount: Amount) -> Result<(), Error> {
    if amount <= 0 {
        return Ok(());
    }
    let dust = get_dust(env).checked_add(amount).ok_or(Error::Overflow)?;
    set_dust(env, dust);
    Ok(())
}

/// Shift a holder's correction by `delta` (magnified units).
pub(crate) fn adjust_correction(env: &Env, id: InstrumentId, holder: &Address, delta: &I256) {
    let correction = get_correction(env, id, holder);
    set_correction(env, id, holder, &correction.add(delta));
}

/// Total dividends ever earned by `holder` on `id`, withdrawn or not
pub fn accumulative_of(env: &Env, id: InstrumentId, holder: &Address) -> Result<Amount, Error> {
    let acc = get_magnified_per_share(env, id);
    let balance = get_balance(env, id, holder);
    let correction = get_correction(env, id, holder);
    fixed_point::entitlement(env, &acc, balance, &correction)
}

pub fn withdrawable_of(env: &Env, id: InstrumentId, holder: &Address) -> Result<Amount, Error> {
    let earned = accumulative_of(env, id, holder)?;
    let withdrawn = get_withdrawn(env, id, holder);
    Ok((earned - withdrawn).max(0))
}
