use shared::errors::Error;
use soroban_sdk::Env;

use crate::storage::{clear_locked, is_locked, set_locked};

/// Holds the contract-wide lock for the duration of one critical section.
///
/// The lock is released when the guard is dropped, so every return path of
/// the guarded entry point (including `?` propagation) clears it.
pub struct ReentrancyGuard<'a> {
    env: &'a Env,
}

impl<'a> ReentrancyGuard<'a> {
    pub fn acquire(env: &'a Env) -> Result<Self, Error> {
        if is_locked(env) {
            return Err(Error::Reentrant);
        }
        set_locked(env);
        Ok(Self { env })
    }
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        clear_locked(self.env);
    }
}
