//! Senior/junior payout waterfall.
//!
//! A deposit aimed at a senior tranche fills the senior up to its per-unit
//! cap first; only the excess reaches the junior. Partial fills never cross
//! tiers, and everything that can fail is checked before any accumulator is
//! written.

use shared::errors::Error;
use shared::events::WATERFALL_SPILL;
use shared::types::{Allocation, Amount, Instrument, TrancheLink};
use soroban_sdk::{log, Env, I256};

use crate::dividends::{accrue, add_dust};
use crate::fixed_point;
use crate::storage::{get_instrument, get_magnified_per_share, set_magnified_per_share};
use crate::validation::require_open;

/// Split `amount` between the senior of `link` and its junior sibling.
///
/// `senior` must already be validated as open with a non-zero supply.
pub fn route_deposit(
    env: &Env,
    link: &TrancheLink,
    senior: &Instrument,
    amount: Amount,
) -> Result<Allocation, Error> {
    let supply = senior.total_supply;
    if link.senior_cap == 0 {
        accrue(env, senior.id, amount, supply)?;
        return Ok(allocation(link, amount, 0));
    }

    let acc = get_magnified_per_share(env, senior.id);
    let remaining = remaining_capacity(env, &acc, link.senior_cap)?;
    // A capacity beyond i128 range exceeds any single deposit.
    let capacity_total = match remaining.checked_mul(supply) {
        Some(capacity) if amount >= capacity => capacity,
        _ => {
            accrue(env, senior.id, amount, supply)?;
            return Ok(allocation(link, amount, 0));
        }
    };

    let spill = amount - capacity_total;
    let junior = if spill > 0 {
        let junior = get_instrument(env, link.junior_id)?;
        require_open(&junior)?;
        if junior.total_supply == 0 {
            return Err(Error::NoHolders);
        }
        Some(junior)
    } else {
        None
    };

    fill_to_cap(env, senior.id, &acc, link.senior_cap, capacity_total, supply)?;
    if let Some(junior) = junior {
        accrue(env, junior.id, spill, junior.total_supply)?;
        log!(env, "waterfall spill", senior.id, junior.id, spill);
        env.events()
            .publish((WATERFALL_SPILL,), (senior.id, junior.id, spill));
    }

    Ok(allocation(link, capacity_total, spill))
}

/// Asset units per senior unit still owed before the cap is reached
pub fn remaining_capacity(env: &Env, acc: &I256, cap: Amount) -> Result<Amount, Error> {
    let paid = fixed_point::demagnify(env, acc)?;
    Ok(cap.saturating_sub(paid).max(0))
}

/// Raise the senior accumulator to exactly `cap * M`. The accumulator is
/// never lowered, and the part of `consumed` the top-up cannot pay out is
/// booked as dust.
fn fill_to_cap(
    env: &Env,
    senior_id: u64,
    acc: &I256,
    cap: Amount,
    consumed: Amount,
    supply: Amount,
) -> Result<(), Error> {
    let target = fixed_point::magnify(env, cap);
    if *acc >= target {
        return add_dust(env, consumed);
    }
    let step = target.sub(acc);
    set_magnified_per_share(env, senior_id, &target);
    let distributable = fixed_point::distributable_bound(env, &step, supply)?;
    add_dust(env, consumed - distributable)
}

fn allocation(link: &TrancheLink, accrued: Amount, spilled: Amount) -> Allocation {
    Allocation {
        instrument_id: link.senior_id,
        accrued,
        sibling_id: Some(link.junior_id),
        spilled,
    }
}
