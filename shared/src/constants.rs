/// Fixed-point scale applied to per-share dividend accumulators.
///
/// Large enough that a one-unit deposit over a supply of 10^18 units still
/// moves the accumulator, while `acc * balance` stays far inside 256 bits for
/// any realistic cumulative payout.
pub const MAGNITUDE: i128 = 1_000_000_000_000_000_000_000_000;

/// Maximum number of holders processed by one batched finalization call.
pub const MAX_BATCH_SIZE: u32 = 100;
