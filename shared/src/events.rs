use soroban_sdk::{symbol_short, Symbol};

// Registry
pub const INSTRUMENT_CREATED: Symbol = symbol_short!("inst_new");
pub const TRANCHE_LINKED: Symbol = symbol_short!("tr_link");
pub const TERMS_UPDATED: Symbol = symbol_short!("terms");

// Balance ledger
pub const UNITS_ISSUED: Symbol = symbol_short!("issued");
pub const UNITS_TRANSFERRED: Symbol = symbol_short!("transfer");
pub const UNITS_BURNED: Symbol = symbol_short!("burned");
pub const HOLDER_FINALIZED: Symbol = symbol_short!("fin_hold");
pub const INSTRUMENT_FINALIZED: Symbol = symbol_short!("fin_inst");
pub const BATCH_COMPLETED: Symbol = symbol_short!("batch_ok");

// Distribution
pub const DIVIDENDS_DEPOSITED: Symbol = symbol_short!("div_dep");
pub const WATERFALL_SPILL: Symbol = symbol_short!("spill");
pub const DISTRIBUTION_STARTED: Symbol = symbol_short!("dist_on");
pub const DIVIDEND_WITHDRAWN: Symbol = symbol_short!("withdrawn");

// Settlement
pub const UNITS_PURCHASED: Symbol = symbol_short!("bought");
pub const UNITS_REFUNDED: Symbol = symbol_short!("refunded");
pub const PROCEEDS_COLLECTED: Symbol = symbol_short!("proceeds");
pub const DUST_SWEPT: Symbol = symbol_short!("dust");

// Administration
pub const CONTRACT_PAUSED: Symbol = symbol_short!("paused");
pub const CONTRACT_RESUMED: Symbol = symbol_short!("unpaused");
