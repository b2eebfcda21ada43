#![no_std]

use shared::{
    errors::Error,
    events::{CONTRACT_PAUSED, CONTRACT_RESUMED},
    types::{
        Allocation, Amount, BatchResult, Hash, Instrument, InstrumentId, PauseState, Purchase,
        TrancheLink, TrancheTerms,
    },
};
use soroban_sdk::{contract, contractimpl, contractmeta, Address, Env, String, Vec};

mod balances;
mod dividends;
mod fixed_point;
mod guard;
mod payment;
mod registry;
mod settlement;
mod storage;
mod validation;
mod waterfall;


use storage::*;
use validation::require_admin;

contractmeta!(key = "name", val = "Tranche Ledger Contract");

#[contract]
pub struct TrancheLedgerContract;

#[contractimpl]
impl TrancheLedgerContract {
    /// Initialize the ledger
    ///
    /// # Arguments
    /// * `admin` - Issuer and administrator of every instrument
    /// * `payment_asset` - Token contract used for deposits, sales and payouts
    pub fn initialize(env: Env, admin: Address, payment_asset: Address) -> Result<(), Error> {
        if has_admin(&env) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();
        set_admin(&env, &admin);
        set_payment_asset(&env, &payment_asset);
        Ok(())
    }

    // ---------- Instrument registry ----------

    /// Register an instrument. A non-zero `initial_supply` is issued to the admin.
    ///
    /// # Errors
    /// * `AlreadyExists` - The id is taken by an instrument or tranche parent
    /// * `InvalidSupply` - `max_supply` is below `initial_supply`
    pub fn create_instrument(
        env: Env,
        id: InstrumentId,
        initial_supply: Amount,
        max_supply: Option<Amount>,
        unit_price: Amount,
        uri: String,
        fingerprint: Hash,
    ) -> Result<Instrument, Error> {
        let admin = require_admin(&env)?;
        registry::create_instrument(
            &env,
            &admin,
            id,
            initial_supply,
            max_supply,
            unit_price,
            uri,
            fingerprint,
        )
    }

    /// Register a linked senior/junior pair under `parent_id`.
    ///
    /// Deposits aimed at the senior id fill the senior up to
    /// `terms.senior_cap` per unit and spill the rest to the junior.
    pub fn create_tranche_pair(
        env: Env,
        parent_id: InstrumentId,
        terms: TrancheTerms,
    ) -> Result<TrancheLink, Error> {
        let admin = require_admin(&env)?;
        registry::create_tranche_pair(&env, &admin, parent_id, terms)
    }

    pub fn set_maturity(env: Env, id: InstrumentId, maturity: u64) -> Result<(), Error> {
        require_admin(&env)?;
        registry::set_maturity(&env, id, maturity)
    }

    pub fn set_unit_price(env: Env, id: InstrumentId, unit_price: Amount) -> Result<(), Error> {
        require_admin(&env)?;
        registry::set_unit_price(&env, id, unit_price)
    }

    pub fn set_metadata_uri(env: Env, id: InstrumentId, uri: String) -> Result<(), Error> {
        require_admin(&env)?;
        registry::set_metadata_uri(&env, id, uri)
    }

    pub fn get_instrument(env: Env, id: InstrumentId) -> Result<Instrument, Error> {
        storage::get_instrument(&env, id)
    }

    pub fn exists(env: Env, id: InstrumentId) -> bool {
        instrument_exists(&env, id)
    }

    pub fn total_supply(env: Env, id: InstrumentId) -> Result<Amount, Error> {
        Ok(storage::get_instrument(&env, id)?.total_supply)
    }

    pub fn metadata_hash(env: Env, id: InstrumentId) -> Result<Hash, Error> {
        Ok(storage::get_instrument(&env, id)?.fingerprint)
    }

    pub fn uri(env: Env, id: InstrumentId) -> Result<String, Error> {
        Ok(storage::get_instrument(&env, id)?.uri)
    }

    /// The other tranche of the pair `id` belongs to
    pub fn sibling(env: Env, id: InstrumentId) -> Option<InstrumentId> {
        let link = get_link_of(&env, id)?;
        if link.senior_id == id {
            Some(link.junior_id)
        } else {
            Some(link.senior_id)
        }
    }

    pub fn get_tranche_link(env: Env, parent_id: InstrumentId) -> Result<TrancheLink, Error> {
        storage::get_tranche_link(&env, parent_id).ok_or(Error::NotFound)
    }

    // ---------- Balance ledger ----------

    /// Issue new units to `to` (admin only)
    pub fn issue(env: Env, to: Address, id: InstrumentId, amount: Amount) -> Result<(), Error> {
        require_admin(&env)?;
        validation::require_not_paused(&env)?;
        let mut instrument = storage::get_instrument(&env, id)?;
        validation::require_transferable(&env, &instrument)?;
        balances::issue(&env, &mut instrument, &to, amount)
    }

    /// Move units between holders. Dividends already earned stay with `from`.
    ///
    /// # Errors
    /// * `MaturedInstrument` - The instrument reached its maturity
    /// * `ZeroAddressTarget` - `to` is the ledger itself
    /// * `InsufficientBalance` - `from` holds fewer than `amount` units
    pub fn transfer(
        env: Env,
        from: Address,
        to: Address,
        id: InstrumentId,
        amount: Amount,
    ) -> Result<(), Error> {
        from.require_auth();
        balances::transfer(&env, &from, &to, id, amount)
    }

    pub fn burn(env: Env, holder: Address, id: InstrumentId, amount: Amount) -> Result<(), Error> {
        holder.require_auth();
        balances::burn(&env, &holder, id, amount)
    }

    /// Force-close one holder after off-chain settlement (admin only).
    /// Returns the units removed.
    pub fn finalize_holder(env: Env, id: InstrumentId, holder: Address) -> Result<Amount, Error> {
        require_admin(&env)?;
        balances::finalize_holder(&env, id, &holder)
    }

    /// Force-close up to `MAX_BATCH_SIZE` holders in one call (admin only)
    pub fn finalize_holders(
        env: Env,
        id: InstrumentId,
        holders: Vec<Address>,
    ) -> Result<BatchResult, Error> {
        require_admin(&env)?;
        balances::finalize_holders(&env, id, &holders)
    }

    pub fn balance_of(env: Env, holder: Address, id: InstrumentId) -> Amount {
        get_balance(&env, id, &holder)
    }

    // ---------- Dividends ----------

    /// Deposit `amount` of the payment asset as dividends on `id`.
    ///
    /// # Errors
    /// * `NoHolders` - Nothing has been issued, or a spill hits an empty junior
    /// * `Finalized` - The instrument was force-closed
    /// * `ExternalTransferFailed` - The payment asset refused the pull
    pub fn deposit(
        env: Env,
        depositor: Address,
        id: InstrumentId,
        amount: Amount,
    ) -> Result<Allocation, Error> {
        depositor.require_auth();
        dividends::deposit(&env, &depositor, id, amount)
    }

    pub fn withdrawable_of(env: Env, id: InstrumentId, holder: Address) -> Result<Amount, Error> {
        storage::get_instrument(&env, id)?;
        dividends::withdrawable_of(&env, id, &holder)
    }

    pub fn accumulative_of(env: Env, id: InstrumentId, holder: Address) -> Result<Amount, Error> {
        storage::get_instrument(&env, id)?;
        dividends::accumulative_of(&env, id, &holder)
    }

    pub fn withdrawn_of(env: Env, id: InstrumentId, holder: Address) -> Amount {
        get_withdrawn(&env, id, &holder)
    }

    /// Running per-share dividend value, scaled by `MAGNITUDE`
    pub fn magnified_per_share(env: Env, id: InstrumentId) -> soroban_sdk::I256 {
        get_magnified_per_share(&env, id)
    }

    // ---------- Settlement ----------

    /// Pay out the caller's withdrawable dividends on `id`
    pub fn withdraw(env: Env, holder: Address, id: InstrumentId) -> Result<Amount, Error> {
        holder.require_auth();
        settlement::withdraw(&env, &holder, id)
    }

    /// Buy `units` at the instrument's unit price
    pub fn buy(env: Env, buyer: Address, id: InstrumentId, units: Amount) -> Result<Amount, Error> {
        buyer.require_auth();
        settlement::buy(&env, &buyer, id, units)
    }

    /// Hand back purchased `units` for what was paid for them. Closed once any
    /// dividend deposit has succeeded.
    ///
    /// # Errors
    /// * `NotPurchased` - `holder` did not buy that many units in the sale
    /// * `RefundsClosed` - A dividend deposit has already succeeded
    pub fn emergency_refund(
        env: Env,
        holder: Address,
        id: InstrumentId,
        units: Amount,
    ) -> Result<Amount, Error> {
        holder.require_auth();
        settlement::emergency_refund(&env, &holder, id, units)
    }

    pub fn collect_proceeds(env: Env, id: InstrumentId, to: Address) -> Result<Amount, Error> {
        require_admin(&env)?;
        settlement::collect_proceeds(&env, id, &to)
    }

    pub fn sweep_dust(env: Env, to: Address) -> Result<Amount, Error> {
        require_admin(&env)?;
        settlement::sweep_dust(&env, &to)
    }

    pub fn proceeds_of(env: Env, id: InstrumentId) -> Amount {
        get_proceeds(&env, id)
    }

    /// Units `holder` bought on `id` that are still refundable, and what was paid
    pub fn purchase_of(env: Env, id: InstrumentId, holder: Address) -> Purchase {
        get_purchase(&env, id, &holder)
    }

    pub fn dust(env: Env) -> Amount {
        get_dust(&env)
    }

    pub fn has_distributed(env: Env) -> bool {
        storage::has_distributed(&env)
    }

    // ---------- Administration ----------

    /// Pause issuance, transfers, deposits and refunds. Withdrawals stay open.
    pub fn pause(env: Env) -> Result<(), Error> {
        let admin = require_admin(&env)?;
        let now = env.ledger().timestamp();
        set_pause_state(
            &env,
            &PauseState {
                paused: true,
                paused_at: now,
            },
        );
        env.events().publish((CONTRACT_PAUSED,), (admin, now));
        Ok(())
    }

    pub fn unpause(env: Env) -> Result<(), Error> {
        let admin = require_admin(&env)?;
        let state = get_pause_state(&env);
        set_pause_state(
            &env,
            &PauseState {
                paused: false,
                paused_at: state.paused_at,
            },
        );
        env.events()
            .publish((CONTRACT_RESUMED,), (admin, env.ledger().timestamp()));
        Ok(())
    }

    pub fn is_paused(env: Env) -> bool {
        storage::is_paused(&env)
    }

    pub fn get_admin(env: Env) -> Result<Address, Error> {
        storage::get_admin(&env)
    }
}
