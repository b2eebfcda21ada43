use shared::constants::MAX_BATCH_SIZE;
use shared::errors::Error;
use shared::events::{
    BATCH_COMPLETED, HOLDER_FINALIZED, INSTRUMENT_FINALIZED, UNITS_BURNED, UNITS_ISSUED,
    UNITS_TRANSFERRED,
};
use shared::types::{Amount, BatchResult, Instrument, InstrumentId, InstrumentStatus};
use soroban_sdk::{Address, Env, Vec};

use crate::dividends::adjust_correction;
use crate::fixed_point;
use crate::storage::{
    get_balance, get_instrument, get_link_of, get_magnified_per_share, set_balance,
    set_instrument,
};
use crate::validation::{
    require_not_paused, require_open, require_transferable, validate_amount, validate_target,
};

/// Add units to a holder without touching supply. The correction is lowered
/// by `acc * amount` so the new units carry no past dividends.
fn credit(env: &Env, id: InstrumentId, holder: &Address, amount: Amount) -> Result<(), Error> {
    let balance = get_balance(env, id, holder)
        .checked_add(amount)
        .ok_or(Error::Overflow)?;
    let acc = get_magnified_per_share(env, id);
    let delta = fixed_point::zero(env).sub(&fixed_point::correction_delta(env, &acc, amount));
    set_balance(env, id, holder, balance);
    adjust_correction(env, id, holder, &delta);
    Ok(())
}

/// Remove units from a holder without touching supply. The correction is
/// raised by `acc * amount` so dividends already earned stay withdrawable.
fn debit(env: &Env, id: InstrumentId, holder: &Address, amount: Amount) -> Result<(), Error> {
    let balance = get_balance(env, id, holder);
    if balance < amount {
        return Err(Error::InsufficientBalance);
    }
    let acc = get_magnified_per_share(env, id);
    set_balance(env, id, holder, balance - amount);
    adjust_correction(env, id, holder, &fixed_point::correction_delta(env, &acc, amount));
    Ok(())
}

/// Mint `amount` new units of `instrument` to `to`.
pub fn issue(
    env: &Env,
    instrument: &mut Instrument,
    to: &Address,
    amount: Amount,
) -> Result<(), Error> {
    validate_amount(amount)?;
    validate_target(env, to)?;
    let supply = instrument
        .total_supply
        .checked_add(amount)
        .ok_or(Error::Overflow)?;
    if let Some(max_supply) = instrument.max_supply {
        if supply > max_supply {
            return Err(Error::InvalidSupply);
        }
    }

    credit(env, instrument.id, to, amount)?;
    instrument.total_supply = supply;
    if instrument.status == InstrumentStatus::Created {
        instrument.status = InstrumentStatus::Active;
    }
    set_instrument(env, instrument);

    env.events()
        .publish((UNITS_ISSUED,), (instrument.id, to.clone(), amount));
    Ok(())
}

/// Debit `amount` units and shrink supply accordingly
pub(crate) fn retire(
    env: &Env,
    instrument: &mut Instrument,
    holder: &Address,
    amount: Amount,
) -> Result<(), Error> {
    debit(env, instrument.id, holder, amount)?;
    instrument.total_supply -= amount;
    set_instrument(env, instrument);
    Ok(())
}

/// Holder-initiated burn. Dividends earned before the burn stay withdrawable.
pub fn burn(env: &Env, holder: &Address, id: InstrumentId, amount: Amount) -> Result<(), Error> {
    require_not_paused(env)?;
    validate_amount(amount)?;
    let mut instrument = get_instrument(env, id)?;
    require_open(&instrument)?;

    retire(env, &mut instrument, holder, amount)?;
    env.events()
        .publish((UNITS_BURNED,), (id, holder.clone(), amount));
    Ok(())
}

pub fn transfer(
    env: &Env,
    from: &Address,
    to: &Address,
    id: InstrumentId,
    amount: Amount,
) -> Result<(), Error> {
    require_not_paused(env)?;
    validate_amount(amount)?;
    validate_target(env, to)?;
    let instrument = get_instrument(env, id)?;
    require_transferable(env, &instrument)?;

    debit(env, id, from, amount)?;
    credit(env, id, to, amount)?;

    env.events()
        .publish((UNITS_TRANSFERRED,), (id, from.clone(), to.clone(), amount));
    Ok(())
}

/// Force-close one holder's position. Returns the units removed.
pub fn finalize_holder(env: &Env, id: InstrumentId, holder: &Address) -> Result<Amount, Error> {
    let mut instrument = get_instrument(env, id)?;
    require_open(&instrument)?;

    let balance = get_balance(env, id, holder);
    if balance == 0 {
        return Err(Error::ZeroAmount);
    }
    retire(env, &mut instrument, holder, balance)?;
    env.events()
        .publish((HOLDER_FINALIZED,), (id, holder.clone(), balance));

    finalize_if_drained(env, &mut instrument);
    Ok(balance)
}

/// Force-close up to `MAX_BATCH_SIZE` positions in one call.
///
/// Holders with nothing left to close, including repeats and anything after
/// the instrument finalizes, are counted as failed rather than aborting the
/// batch.
pub fn finalize_holders(
    env: &Env,
    id: InstrumentId,
    holders: &Vec<Address>,
) -> Result<BatchResult, Error> {
    let count = holders.len();
    if count == 0 {
        return Err(Error::BatchEmpty);
    }
    if count > MAX_BATCH_SIZE {
        return Err(Error::BatchLimitExceeded);
    }

    let mut instrument = get_instrument(env, id)?;
    require_open(&instrument)?;

    let mut successful: u32 = 0;
    let mut failed: u32 = 0;

    for holder in holders.iter() {
        if instrument.is_finalized() {
            failed += 1;
            continue;
        }
        let balance = get_balance(env, id, &holder);
        if balance == 0 {
            failed += 1;
            continue;
        }
        retire(env, &mut instrument, &holder, balance)?;
        env.events()
            .publish((HOLDER_FINALIZED,), (id, holder.clone(), balance));
        successful += 1;
        finalize_if_drained(env, &mut instrument);
    }

    env.events()
        .publish((BATCH_COMPLETED,), (id, count, successful, failed));

    Ok(BatchResult {
        total: count,
        successful,
        failed,
    })
}

/// Flip a fully drained instrument to `Finalized`, cascading to its tranche
/// sibling when that one is drained too.
fn finalize_if_drained(env: &Env, instrument: &mut Instrument) {
    if instrument.total_supply != 0 || instrument.is_finalized() {
        return;
    }
    mark_finalized(env, instrument);

    let Some(link) = get_link_of(env, instrument.id) else {
        return;
    };
    let sibling_id = if link.senior_id == instrument.id {
        link.junior_id
    } else {
        link.senior_id
    };
    if let Ok(mut sibling) = get_instrument(env, sibling_id) {
        if sibling.total_supply == 0 && !sibling.is_finalized() {
            mark_finalized(env, &mut sibling);
        }
    }
}

fn mark_finalized(env: &Env, instrument: &mut Instrument) {
    instrument.status = InstrumentStatus::Finalized;
    set_instrument(env, instrument);
    env.events().publish(
        (INSTRUMENT_FINALIZED,),
        (instrument.id, env.ledger().timestamp()),
    );
}
