//! In-memory payment attempt store
//!
//! Tracks deposit attempts through their lifecycle and holds the
//! per-reservation in-flight lease that rejects concurrent double submits.
//! State is process-local; a restart forgets unfinished attempts, which is
//! acceptable because the gateway is the system of record for money.

use crate::domain::payment::PaymentAttempt;
use crate::shared::error::{AppError, AppResult};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

/// Store for payment attempts and in-flight reservation leases
#[derive(Default)]
pub struct AttemptStore {
    attempts: Mutex<HashMap<String, PaymentAttempt>>,
    in_flight: Mutex<HashSet<String>>,
}

impl AttemptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update an attempt, keyed by its attempt id
    pub fn record(&self, attempt: &PaymentAttempt) {
        recover(self.attempts.lock()).insert(attempt.attempt_id.clone(), attempt.clone());
    }

    /// Look up an attempt
    pub fn get(&self, attempt_id: &str) -> Option<PaymentAttempt> {
        recover(self.attempts.lock()).get(attempt_id).cloned()
    }

    /// All attempts recorded for one reservation, oldest first
    pub fn for_reservation(&self, reservation_id: &str) -> Vec<PaymentAttempt> {
        let mut attempts: Vec<PaymentAttempt> = recover(self.attempts.lock())
            .values()
            .filter(|attempt| attempt.reservation_id == reservation_id)
            .cloned()
            .collect();
        attempts.sort_by_key(|attempt| attempt.created_at);
        attempts
    }

    /// Take the in-flight lease for a reservation. Fails with
    /// `DuplicateAttempt` while another authorization holds it; the lease
    /// releases itself on drop.
    pub fn lease(store: &Arc<AttemptStore>, reservation_id: &str) -> AppResult<ReservationLease> {
        let mut in_flight = recover(store.in_flight.lock());
        if !in_flight.insert(reservation_id.to_string()) {
            return Err(AppError::DuplicateAttempt(reservation_id.to_string()));
        }
        drop(in_flight);

        Ok(ReservationLease {
            store: Arc::clone(store),
            reservation_id: reservation_id.to_string(),
        })
    }
}

/// Exclusive in-flight marker for one reservation's payment
pub struct ReservationLease {
    store: Arc<AttemptStore>,
    reservation_id: String,
}

impl Drop for ReservationLease {
    fn drop(&mut self) {
        recover(self.store.in_flight.lock()).remove(&self.reservation_id);
    }
}

/// A poisoned lock only means another thread panicked mid-update; the data
/// is plain maps and still usable.
fn recover<'a, T>(result: Result<MutexGuard<'a, T>, std::sync::PoisonError<MutexGuard<'a, T>>>) -> MutexGuard<'a, T> {
    match result {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
