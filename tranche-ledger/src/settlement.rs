//! Flows that move the payment asset in or out of custody, apart from
//! dividend deposits.

use shared::errors::Error;
use shared::events::{
    DIVIDEND_WITHDRAWN, DUST_SWEPT, PROCEEDS_COLLECTED, UNITS_PURCHASED, UNITS_REFUNDED,
};
use shared::types::{Amount, InstrumentId};
use soroban_sdk::{log, Address, Env};

use crate::balances;
use crate::dividends::withdrawable_of;
use crate::guard::ReentrancyGuard;
use crate::payment;
use crate::storage::{
    get_dust, get_instrument, get_proceeds, get_purchase, get_withdrawn, has_distributed,
    set_dust, set_proceeds, set_purchase, set_withdrawn,
};
use crate::validation::{
    require_not_paused, require_open, require_transferable, validate_amount, validate_target,
};

/// Pay out everything `holder` can currently withdraw on `id`.
///
/// The withdrawn ledger is bumped before the payment is pushed; if the asset
/// reports failure the bump is reversed before returning the error.
pub fn withdraw(env: &Env, holder: &Address, id: InstrumentId) -> Result<Amount, Error> {
    let _guard = ReentrancyGuard::acquire(env)?;
    get_instrument(env, id)?;

    let amount = withdrawable_of(env, id, holder)?;
    if amount == 0 {
        return Err(Error::NothingToWithdraw);
    }

    let withdrawn = get_withdrawn(env, id, holder);
    let updated = withdrawn.checked_add(amount).ok_or(Error::Overflow)?;
    set_withdrawn(env, id, holder, updated);

    if !payment::push(env, holder, amount)?.is_success() {
        set_withdrawn(env, id, holder, withdrawn);
        log!(env, "withdrawal rolled back", id, amount);
        return Err(Error::ExternalTransferFailed);
    }

    env.events()
        .publish((DIVIDEND_WITHDRAWN,), (id, holder.clone(), amount));
    Ok(amount)
}

/// Primary sale: issue `units` to `buyer` at the instrument's unit price.
/// Returns the price paid.
pub fn buy(env: &Env, buyer: &Address, id: InstrumentId, units: Amount) -> Result<Amount, Error> {
    let _guard = ReentrancyGuard::acquire(env)?;
    require_not_paused(env)?;
    validate_amount(units)?;

    let mut instrument = get_instrument(env, id)?;
    require_transferable(env, &instrument)?;
    if instrument.unit_price == 0 {
        return Err(Error::InvalidInput);
    }
    let cost = units
        .checked_mul(instrument.unit_price)
        .ok_or(Error::Overflow)?;
    let proceeds = get_proceeds(env, id)
        .checked_add(cost)
        .ok_or(Error::Overflow)?;
    let mut purchase = get_purchase(env, id, buyer);
    purchase.units = purchase.units.checked_add(units).ok_or(Error::Overflow)?;
    purchase.paid = purchase.paid.checked_add(cost).ok_or(Error::Overflow)?;

    balances::issue(env, &mut instrument, buyer, units)?;
    set_proceeds(env, id, proceeds);
    set_purchase(env, id, buyer, &purchase);
    env.events()
        .publish((UNITS_PURCHASED,), (id, buyer.clone(), units, cost));

    payment::pull(env, buyer, cost)?.into_result()?;
    Ok(cost)
}

/// Hand back `units` bought in the primary sale for what was paid for them.
///
/// Only units on the holder's purchase record qualify, refunded pro-rata at
/// the price actually paid. Only possible until the first dividend deposit;
/// after that refunds are closed for good.
pub fn emergency_refund(
    env: &Env,
    holder: &Address,
    id: InstrumentId,
    units: Amount,
) -> Result<Amount, Error> {
    let _guard = ReentrancyGuard::acquire(env)?;
    require_not_paused(env)?;
    if has_distributed(env) {
        return Err(Error::RefundsClosed);
    }
    validate_amount(units)?;

    let mut instrument = get_instrument(env, id)?;
    require_open(&instrument)?;
    let mut purchase = get_purchase(env, id, holder);
    if purchase.units < units {
        return Err(Error::NotPurchased);
    }
    let refund = if units == purchase.units {
        purchase.paid
    } else {
        purchase
            .paid
            .checked_mul(units)
            .ok_or(Error::Overflow)?
            / purchase.units
    };
    if refund == 0 {
        return Err(Error::NothingToWithdraw);
    }
    let proceeds = get_proceeds(env, id);
    if refund > proceeds {
        return Err(Error::InsufficientProceeds);
    }

    balances::retire(env, &mut instrument, holder, units)?;
    set_proceeds(env, id, proceeds - refund);
    purchase.units -= units;
    purchase.paid -= refund;
    set_purchase(env, id, holder, &purchase);
    env.events()
        .publish((UNITS_REFUNDED,), (id, holder.clone(), units, refund));

    payment::push(env, holder, refund)?.into_result()?;
    Ok(refund)
}

/// Release an instrument's sale proceeds. They back emergency refunds until
/// distribution starts, so this is refused before then.
pub fn collect_proceeds(env: &Env, id: InstrumentId, to: &Address) -> Result<Amount, Error> {
    let _guard = ReentrancyGuard::acquire(env)?;
    if !has_distributed(env) {
        return Err(Error::DistributionNotStarted);
    }
    validate_target(env, to)?;
    get_instrument(env, id)?;

    let amount = get_proceeds(env, id);
    if amount == 0 {
        return Err(Error::NothingToWithdraw);
    }
    set_proceeds(env, id, 0);
    env.events()
        .publish((PROCEEDS_COLLECTED,), (id, to.clone(), amount));

    payment::push(env, to, amount)?.into_result()?;
    Ok(amount)
}

/// Send accumulated rounding dust to `to`.
pub fn sweep_dust(env: &Env, to: &Address) -> Result<Amount, Error> {
    let _guard = ReentrancyGuard::acquire(env)?;
    validate_target(env, to)?;

    let amount = get_dust(env);
    if amount == 0 {
        return Err(Error::NothingToWithdraw);
    }
    set_dust(env, 0);
    env.events().publish((DUST_SWEPT,), (to.clone(), amount));

    payment::push(env, to, amount)?.into_result()?;
    Ok(amount)
}
