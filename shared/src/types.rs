use soroban_sdk::{contracttype, Address, BytesN, String};

pub type Amount = i128;
pub type InstrumentId = u64;
pub type Hash = BytesN<32>;

/// Lifecycle of an instrument. Transitions only move forward.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum InstrumentStatus {
    /// Registered, no units issued yet
    Created = 0,
    /// Units have been issued; transfers and deposits are live
    Active = 1,
    /// Every position was force-closed; read-only except withdrawals
    Finalized = 2,
}

/// Terms and supply of a tokenized note or tranche.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Instrument {
    pub id: InstrumentId,
    pub issuer: Address,
    pub total_supply: Amount,
    /// `None` means issuance is unbounded
    pub max_supply: Option<Amount>,
    /// Issue price per unit, in payment-asset units
    pub unit_price: Amount,
    /// Ledger timestamp after which units stop moving; 0 = perpetual
    pub maturity: u64,
    pub status: InstrumentStatus,
    pub uri: String,
    /// Fingerprint of the off-chain loan documents, fixed at creation
    pub fingerprint: Hash,
}

impl Instrument {
    pub fn is_finalized(&self) -> bool {
        self.status == InstrumentStatus::Finalized
    }

    pub fn is_matured(&self, now: u64) -> bool {
        self.maturity != 0 && now >= self.maturity
    }
}

/// Senior/junior pair registered under a parent id.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TrancheLink {
    pub parent_id: InstrumentId,
    pub senior_id: InstrumentId,
    pub junior_id: InstrumentId,
    /// Maximum cumulative payout per senior unit; 0 = uncapped
    pub senior_cap: Amount,
}

/// Creation terms for a linked tranche pair.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TrancheTerms {
    pub senior_id: InstrumentId,
    pub junior_id: InstrumentId,
    pub senior_supply: Amount,
    pub junior_supply: Amount,
    pub senior_price: Amount,
    pub junior_price: Amount,
    pub senior_cap: Amount,
    pub uri: String,
    pub fingerprint: Hash,
}

/// Where a deposit ended up after waterfall routing.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Allocation {
    pub instrument_id: InstrumentId,
    pub accrued: Amount,
    pub sibling_id: Option<InstrumentId>,
    pub spilled: Amount,
}

/// Units a holder bought in the primary sale and what they paid for them.
/// Emergency refunds are bounded by this record.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Purchase {
    pub units: Amount,
    pub paid: Amount,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PauseState {
    pub paused: bool,
    pub paused_at: u64,
}

/// Outcome counters for batched operations
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchResult {
    pub total: u32,
    pub successful: u32,
    pub failed: u32,
}
