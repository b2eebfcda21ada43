//! Scaled-integer arithmetic for the dividend accumulators.
//!
//! Per-share values are kept multiplied by [`MAGNITUDE`] in 256-bit host
//! integers so that `acc * balance + correction` never leaves range.

use shared::constants::MAGNITUDE;
use shared::errors::Error;
use shared::types::Amount;
use soroban_sdk::{Env, I256};

pub fn zero(env: &Env) -> I256 {
    I256::from_i32(env, 0)
}

pub fn wide(env: &Env, value: Amount) -> I256 {
    I256::from_i128(env, value)
}

fn magnitude(env: &Env) -> I256 {
    I256::from_i128(env, MAGNITUDE)
}

/// `floor(amount * M / supply)`, the per-share step for one deposit
pub fn per_share_step(env: &Env, amount: Amount, supply: Amount) -> Result<I256, Error> {
    if supply == 0 {
        return Err(Error::DivisionByZero);
    }
    Ok(wide(env, amount).mul(&magnitude(env)).div(&wide(env, supply)))
}

/// `acc + floor(amount * M / supply)`
pub fn increment(env: &Env, acc: &I256, amount: Amount, supply: Amount) -> Result<I256, Error> {
    Ok(acc.add(&per_share_step(env, amount, supply)?))
}

/// `max(0, floor((acc * balance + correction) / M))`
pub fn entitlement(
    env: &Env,
    acc: &I256,
    balance: Amount,
    correction: &I256,
) -> Result<Amount, Error> {
    let raw = acc.mul(&wide(env, balance)).add(correction);
    if raw <= zero(env) {
        return Ok(0);
    }
    // Non-negative, so truncating division is floor division.
    raw.div(&magnitude(env)).to_i128().ok_or(Error::Overflow)
}

/// Correction offset for `units` moving at the current accumulator value
pub fn correction_delta(env: &Env, acc: &I256, units: Amount) -> I256 {
    acc.mul(&wide(env, units))
}

/// Whole asset units already paid per share
pub fn demagnify(env: &Env, acc: &I256) -> Result<Amount, Error> {
    acc.div(&magnitude(env)).to_i128().ok_or(Error::Overflow)
}

pub fn magnify(env: &Env, units: Amount) -> I256 {
    wide(env, units).mul(&magnitude(env))
}

/// `ceil(step * supply / M)`: the most a per-share step can ever pay out
/// across `supply` units.
pub fn distributable_bound(env: &Env, step: &I256, supply: Amount) -> Result<Amount, Error> {
    let m = magnitude(env);
    let scaled = step.mul(&wide(env, supply));
    if scaled <= zero(env) {
        return Ok(0);
    }
    scaled
        .add(&m)
        .sub(&I256::from_i32(env, 1))
        .div(&m)
        .to_i128()
        .ok_or(Error::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_matches_floor_division() {
        let env = Env::default();
        let acc = increment(&env, &zero(&env), 1_000_000, 1_000).unwrap();
        assert_eq!(acc, magnify(&env, 1_000));

        let acc = increment(&env, &acc, 1, 3).unwrap();
        let expected = magnify(&env, 1_000).add(&wide(&env, MAGNITUDE / 3));
        assert_eq!(acc, expected);
    }

    #[test]
    fn test_increment_rejects_zero_supply() {
        let env = Env::default();
        assert_eq!(
            increment(&env, &zero(&env), 10, 0),
            Err(Error::DivisionByZero)
        );
    }

    #[test]
    fn test_entitlement_floors_and_clamps() {
        let env = Env::default();
        let acc = increment(&env, &zero(&env), 10, 3).unwrap();

        // 3.33.. per unit, 2 units -> 6
        assert_eq!(entitlement(&env, &acc, 2, &zero(&env)).unwrap(), 6);

        // A correction larger than the accrued value never goes negative
        let correction = wide(&env, -1).mul(&magnify(&env, 100));
        assert_eq!(entitlement(&env, &acc, 2, &correction).unwrap(), 0);
    }

    #[test]
    fn test_correction_keeps_entitlement_across_debit() {
        let env = Env::default();
        let acc = increment(&env, &zero(&env), 500, 100).unwrap();
        let before = entitlement(&env, &acc, 40, &zero(&env)).unwrap();

        // Moving 15 units away adds acc * 15 back to the correction
        let correction = correction_delta(&env, &acc, 15);
        let after = entitlement(&env, &acc, 25, &correction).unwrap();
        assert_eq!(before, 200);
        assert_eq!(after, before);
    }

    #[test]
    fn test_demagnify_and_bound() {
        let env = Env::default();
        let step = per_share_step(&env, 7, 2).unwrap();
        assert_eq!(demagnify(&env, &step).unwrap(), 3);
        assert_eq!(distributable_bound(&env, &step, 2).unwrap(), 7);
        assert_eq!(distributable_bound(&env, &zero(&env), 2).unwrap(), 0);
    }

    #[test]
    fn test_large_values_stay_in_range() {
        let env = Env::default();
        // 10^30 asset units over a single unit of supply
        let huge: Amount = 1_000_000_000_000_000_000_000_000_000_000;
        let acc = increment(&env, &zero(&env), huge, 1).unwrap();
        assert_eq!(entitlement(&env, &acc, 1, &zero(&env)).unwrap(), huge);
    }
}
