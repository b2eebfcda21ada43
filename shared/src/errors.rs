use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    InvalidInput = 4,
    NotFound = 5,
    Paused = 6,
    Reentrant = 7,
    Overflow = 8,

    // Registry errors
    AlreadyExists = 100,
    InvalidSupply = 101,

    // Balance ledger errors
    InsufficientBalance = 200,
    ZeroAmount = 201,
    ZeroAddressTarget = 202,
    MaturedInstrument = 203,
    Finalized = 204,
    BatchEmpty = 205,
    BatchLimitExceeded = 206,

    // Distribution errors
    NoHolders = 300,
    DivisionByZero = 301,
    NothingToWithdraw = 302,

    // Settlement errors
    ExternalTransferFailed = 400,
    RefundsClosed = 401,
    InsufficientProceeds = 402,
    DistributionNotStarted = 403,
    NotPurchased = 404,
}
