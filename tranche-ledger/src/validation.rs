use shared::errors::Error;
use shared::types::{Amount, Instrument};
use soroban_sdk::{Address, Env};

use crate::storage::{get_admin, is_paused};

/// Load the admin and require its signature
pub fn require_admin(env: &Env) -> Result<Address, Error> {
    let admin = get_admin(env)?;
    admin.require_auth();
    Ok(admin)
}

pub fn require_not_paused(env: &Env) -> Result<(), Error> {
    if is_paused(env) {
        return Err(Error::Paused);
    }
    Ok(())
}

/// Reject zero (`ZeroAmount`) and negative (`InvalidInput`) quantities
pub fn validate_amount(amount: Amount) -> Result<(), Error> {
    if amount == 0 {
        return Err(Error::ZeroAmount);
    }
    if amount < 0 {
        return Err(Error::InvalidInput);
    }
    Ok(())
}

pub fn require_open(instrument: &Instrument) -> Result<(), Error> {
    if instrument.is_finalized() {
        return Err(Error::Finalized);
    }
    Ok(())
}

/// Units stop moving once the instrument has matured.
pub fn require_transferable(env: &Env, instrument: &Instrument) -> Result<(), Error> {
    require_open(instrument)?;
    if instrument.is_matured(env.ledger().timestamp()) {
        return Err(Error::MaturedInstrument);
    }
    Ok(())
}

/// The ledger's own address plays the role of the null target: units or
/// funds sent there cannot be recovered by anyone.
pub fn validate_target(env: &Env, to: &Address) -> Result<(), Error> {
    if *to == env.current_contract_address() {
        return Err(Error::ZeroAddressTarget);
    }
    Ok(())
}
