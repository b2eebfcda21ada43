use shared::errors::Error;
use shared::events::{INSTRUMENT_CREATED, TERMS_UPDATED, TRANCHE_LINKED};
use shared::types::{
    Amount, Hash, Instrument, InstrumentId, InstrumentStatus, TrancheLink, TrancheTerms,
};
use soroban_sdk::{symbol_short, Address, Env, String};

use crate::balances;
use crate::storage::{
    get_instrument, instrument_exists, set_instrument, set_tranche_link, tranche_link_exists,
};
use crate::validation::require_open;

/// Register a new instrument and issue its initial supply to `issuer`.
#[allow(clippy::too_many_arguments)]
pub fn create_instrument(
    env: &Env,
    issuer: &Address,
    id: InstrumentId,
    initial_supply: Amount,
    max_supply: Option<Amount>,
    unit_price: Amount,
    uri: String,
    fingerprint: Hash,
) -> Result<Instrument, Error> {
    validate_new_id(env, id)?;
    validate_terms(initial_supply, max_supply, unit_price)?;

    let mut instrument = Instrument {
        id,
        issuer: issuer.clone(),
        total_supply: 0,
        max_supply,
        unit_price,
        maturity: 0,
        status: InstrumentStatus::Created,
        uri,
        fingerprint: fingerprint.clone(),
    };
    set_instrument(env, &instrument);
    env.events()
        .publish((INSTRUMENT_CREATED,), (id, issuer.clone(), fingerprint));

    if initial_supply > 0 {
        balances::issue(env, &mut instrument, issuer, initial_supply)?;
    }
    Ok(instrument)
}

/// Register a senior/junior pair under `parent_id`. Each tranche is capped
/// at its initial supply.
pub fn create_tranche_pair(
    env: &Env,
    issuer: &Address,
    parent_id: InstrumentId,
    terms: TrancheTerms,
) -> Result<TrancheLink, Error> {
    if terms.senior_id == terms.junior_id
        || parent_id == terms.senior_id
        || parent_id == terms.junior_id
        || terms.senior_cap < 0
    {
        return Err(Error::InvalidInput);
    }
    validate_new_id(env, parent_id)?;
    validate_new_id(env, terms.senior_id)?;
    validate_new_id(env, terms.junior_id)?;
    validate_terms(terms.senior_supply, Some(terms.senior_supply), terms.senior_price)?;
    validate_terms(terms.junior_supply, Some(terms.junior_supply), terms.junior_price)?;

    create_instrument(
        env,
        issuer,
        terms.senior_id,
        terms.senior_supply,
        Some(terms.senior_supply),
        terms.senior_price,
        terms.uri.clone(),
        terms.fingerprint.clone(),
    )?;
    create_instrument(
        env,
        issuer,
        terms.junior_id,
        terms.junior_supply,
        Some(terms.junior_supply),
        terms.junior_price,
        terms.uri,
        terms.fingerprint,
    )?;

    let link = TrancheLink {
        parent_id,
        senior_id: terms.senior_id,
        junior_id: terms.junior_id,
        senior_cap: terms.senior_cap,
    };
    set_tranche_link(env, &link);
    env.events().publish(
        (TRANCHE_LINKED,),
        (parent_id, link.senior_id, link.junior_id, link.senior_cap),
    );
    Ok(link)
}

pub fn set_maturity(env: &Env, id: InstrumentId, maturity: u64) -> Result<(), Error> {
    let mut instrument = get_instrument(env, id)?;
    require_open(&instrument)?;
    instrument.maturity = maturity;
    set_instrument(env, &instrument);
    env.events()
        .publish((TERMS_UPDATED, symbol_short!("maturity")), (id, maturity));
    Ok(())
}

pub fn set_unit_price(env: &Env, id: InstrumentId, unit_price: Amount) -> Result<(), Error> {
    if unit_price < 0 {
        return Err(Error::InvalidInput);
    }
    let mut instrument = get_instrument(env, id)?;
    require_open(&instrument)?;
    instrument.unit_price = unit_price;
    set_instrument(env, &instrument);
    env.events()
        .publish((TERMS_UPDATED, symbol_short!("price")), (id, unit_price));
    Ok(())
}

pub fn set_metadata_uri(env: &Env, id: InstrumentId, uri: String) -> Result<(), Error> {
    let mut instrument = get_instrument(env, id)?;
    require_open(&instrument)?;
    instrument.uri = uri.clone();
    set_instrument(env, &instrument);
    env.events()
        .publish((TERMS_UPDATED, symbol_short!("uri")), (id, uri));
    Ok(())
}

/// Ids are shared between instruments and tranche parents.
fn validate_new_id(env: &Env, id: InstrumentId) -> Result<(), Error> {
    if instrument_exists(env, id) || tranche_link_exists(env, id) {
        return Err(Error::AlreadyExists);
    }
    Ok(())
}

fn validate_terms(
    initial_supply: Amount,
    max_supply: Option<Amount>,
    unit_price: Amount,
) -> Result<(), Error> {
    if initial_supply < 0 {
        return Err(Error::InvalidSupply);
    }
    if let Some(max_supply) = max_supply {
        if max_supply < initial_supply {
            return Err(Error::InvalidSupply);
        }
    }
    if unit_price < 0 {
        return Err(Error::InvalidInput);
    }
    Ok(())
}
