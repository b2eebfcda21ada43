use shared::errors::Error;
use shared::types::{Amount, Instrument, InstrumentId, PauseState, Purchase, TrancheLink};
use soroban_sdk::{contracttype, Address, Env, I256};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    PaymentAsset,
    PauseState,
    /// Set once the first deposit succeeds; closes emergency refunds
    HasDistributed,
    /// Floor-division remainder held in custody
    Dust,
    /// Reentrancy lock
    Locked,
    Instrument(InstrumentId),
    /// parent_id -> senior/junior pair
    TrancheLink(InstrumentId),
    /// tranche id -> parent_id
    TrancheParent(InstrumentId),
    Balance(InstrumentId, Address),
    MagnifiedPerShare(InstrumentId),
    Correction(InstrumentId, Address),
    Withdrawn(InstrumentId, Address),
    /// Sale proceeds held in custody for an instrument
    Proceeds(InstrumentId),
    /// Primary-sale record per holder, backing emergency refunds
    Purchase(InstrumentId, Address),
}

// ---------- Process-wide state ----------

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
}

pub fn get_admin(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(Error::NotInitialized)
}

pub fn has_admin(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Admin)
}

pub fn set_payment_asset(env: &Env, asset: &Address) {
    env.storage().instance().set(&DataKey::PaymentAsset, asset);
}

pub fn get_payment_asset(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::PaymentAsset)
        .ok_or(Error::NotInitialized)
}

pub fn set_pause_state(env: &Env, state: &PauseState) {
    env.storage().instance().set(&DataKey::PauseState, state);
}

pub fn get_pause_state(env: &Env) -> PauseState {
    env.storage()
        .instance()
        .get(&DataKey::PauseState)
        .unwrap_or(PauseState {
            paused: false,
            paused_at: 0,
        })
}

pub fn is_paused(env: &Env) -> bool {
    get_pause_state(env).paused
}

pub fn has_distributed(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::HasDistributed)
        .unwrap_or(false)
}

pub fn mark_distributed(env: &Env) {
    env.storage().instance().set(&DataKey::HasDistributed, &true);
}

pub fn get_dust(env: &Env) -> Amount {
    env.storage().instance().get(&DataKey::Dust).unwrap_or(0)
}

pub fn set_dust(env: &Env, dust: Amount) {
    env.storage().instance().set(&DataKey::Dust, &dust);
}

pub fn is_locked(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Locked)
}

pub fn set_locked(env: &Env) {
    env.storage().instance().set(&DataKey::Locked, &true);
}

pub fn clear_locked(env: &Env) {
    env.storage().instance().remove(&DataKey::Locked);
}

// ---------- Instrument registry ----------

pub fn set_instrument(env: &Env, instrument: &Instrument) {
    env.storage()
        .persistent()
        .set(&DataKey::Instrument(instrument.id), instrument);
}

pub fn get_instrument(env: &Env, id: InstrumentId) -> Result<Instrument, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Instrument(id))
        .ok_or(Error::NotFound)
}

pub fn instrument_exists(env: &Env, id: InstrumentId) -> bool {
    env.storage().persistent().has(&DataKey::Instrument(id))
}

pub fn set_tranche_link(env: &Env, link: &TrancheLink) {
    let storage = env.storage().persistent();
    storage.set(&DataKey::TrancheLink(link.parent_id), link);
    storage.set(&DataKey::TrancheParent(link.senior_id), &link.parent_id);
    storage.set(&DataKey::TrancheParent(link.junior_id), &link.parent_id);
}

pub fn get_tranche_link(env: &Env, parent_id: InstrumentId) -> Option<TrancheLink> {
    env.storage()
        .persistent()
        .get(&DataKey::TrancheLink(parent_id))
}

pub fn tranche_link_exists(env: &Env, parent_id: InstrumentId) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::TrancheLink(parent_id))
}

/// Link of the pair an instrument belongs to, if any
pub fn get_link_of(env: &Env, id: InstrumentId) -> Option<TrancheLink> {
    let parent_id: InstrumentId = env
        .storage()
        .persistent()
        .get(&DataKey::TrancheParent(id))?;
    get_tranche_link(env, parent_id)
}

// ---------- Balance ledger ----------

pub fn get_balance(env: &Env, id: InstrumentId, holder: &Address) -> Amount {
    env.storage()
        .persistent()
        .get(&DataKey::Balance(id, holder.clone()))
        .unwrap_or(0)
}

pub fn set_balance(env: &Env, id: InstrumentId, holder: &Address, balance: Amount) {
    let key = DataKey::Balance(id, holder.clone());
    if balance == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &balance);
    }
}

// ---------- Dividend state ----------

pub fn get_magnified_per_share(env: &Env, id: InstrumentId) -> I256 {
    env.storage()
        .persistent()
        .get(&DataKey::MagnifiedPerShare(id))
        .unwrap_or_else(|| I256::from_i32(env, 0))
}

pub fn set_magnified_per_share(env: &Env, id: InstrumentId, value: &I256) {
    env.storage()
        .persistent()
        .set(&DataKey::MagnifiedPerShare(id), value);
}

pub fn get_correction(env: &Env, id: InstrumentId, holder: &Address) -> I256 {
    env.storage()
        .persistent()
        .get(&DataKey::Correction(id, holder.clone()))
        .unwrap_or_else(|| I256::from_i32(env, 0))
}

pub fn set_correction(env: &Env, id: InstrumentId, holder: &Address, value: &I256) {
    env.storage()
        .persistent()
        .set(&DataKey::Correction(id, holder.clone()), value);
}

pub fn get_withdrawn(env: &Env, id: InstrumentId, holder: &Address) -> Amount {
    env.storage()
        .persistent()
        .get(&DataKey::Withdrawn(id, holder.clone()))
        .unwrap_or(0)
}

pub fn set_withdrawn(env: &Env, id: InstrumentId, holder: &Address, amount: Amount) {
    env.storage()
        .persistent()
        .set(&DataKey::Withdrawn(id, holder.clone()), &amount);
}

// ---------- Settlement ----------

pub fn get_proceeds(env: &Env, id: InstrumentId) -> Amount {
    env.storage()
        .persistent()
        .get(&DataKey::Proceeds(id))
        .unwrap_or(0)
}

pub fn set_proceeds(env: &Env, id: InstrumentId, amount: Amount) {
    env.storage()
        .persistent()
        .set(&DataKey::Proceeds(id), &amount);
}

pub fn get_purchase(env: &Env, id: InstrumentId, holder: &Address) -> Purchase {
    env.storage()
        .persistent()
        .get(&DataKey::Purchase(id, holder.clone()))
        .unwrap_or(Purchase { units: 0, paid: 0 })
}

pub fn set_purchase(env: &Env, id: InstrumentId, holder: &Address, purchase: &Purchase) {
    let key = DataKey::Purchase(id, holder.clone());
    if purchase.units == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, purchase);
    }
}
