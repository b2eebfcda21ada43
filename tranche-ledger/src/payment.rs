//! Calls into the payment asset.
//!
//! The asset is invoked dynamically instead of through the typed token
//! client so that assets which answer `transfer` with a status value can be
//! told apart from ones that trap.

use shared::errors::Error;
use shared::types::Amount;
use soroban_sdk::{log, symbol_short, Address, Env, IntoVal, TryFromVal, Val, Vec};

use crate::storage::get_payment_asset;

/// What the payment asset reported back for one transfer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransferOutcome {
    /// Void return or an explicit `true`
    Success,
    /// The call trapped or answered `false`
    Failure,
    /// The call returned something that is neither void nor a bool.
    NoSignal,
}

impl TransferOutcome {
    /// Compatibility policy: an asset that returns an unrecognised value but
    /// did not fail counts as having moved the funds.
    pub fn is_success(self) -> bool {
        !matches!(self, TransferOutcome::Failure)
    }

    pub fn into_result(self) -> Result<(), Error> {
        if self.is_success() {
            Ok(())
        } else {
            Err(Error::ExternalTransferFailed)
        }
    }
}

/// Move `amount` from `from` into the ledger's custody
pub fn pull(env: &Env, from: &Address, amount: Amount) -> Result<TransferOutcome, Error> {
    transfer(env, from, &env.current_contract_address(), amount)
}

/// Move `amount` out of custody to `to`
pub fn push(env: &Env, to: &Address, amount: Amount) -> Result<TransferOutcome, Error> {
    transfer(env, &env.current_contract_address(), to, amount)
}

fn transfer(
    env: &Env,
    from: &Address,
    to: &Address,
    amount: Amount,
) -> Result<TransferOutcome, Error> {
    let asset = get_payment_asset(env)?;
    let args: Vec<Val> = (from.clone(), to.clone(), amount).into_val(env);
    let outcome = match env.try_invoke_contract::<Val, Error>(
        &asset,
        &symbol_short!("transfer"),
        args,
    ) {
        Ok(Ok(value)) => classify(env, value),
        Ok(Err(_)) => TransferOutcome::NoSignal,
        Err(_) => TransferOutcome::Failure,
    };
    if outcome != TransferOutcome::Success {
        log!(env, "payment asset transfer outcome", outcome as u32, amount);
    }
    Ok(outcome)
}

fn classify(env: &Env, value: Val) -> TransferOutcome {
    if <()>::try_from_val(env, &value).is_ok() {
        return TransferOutcome::Success;
    }
    match bool::try_from_val(env, &value) {
        Ok(true) => TransferOutcome::Success,
        Ok(false) => TransferOutcome::Failure,
        Err(_) => TransferOutcome::NoSignal,
    }
}
