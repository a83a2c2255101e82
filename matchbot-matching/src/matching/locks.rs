use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::models::UserId;
use crate::store::interactions::canonical_pair;

const DEFAULT_STRIPES: usize = 64;

/// Striped mutexes keyed by unordered user pair.
///
/// `(a, b)` and `(b, a)` always map to the same stripe, so two decisions about the same pair
/// never interleave. Unrelated pairs may share a stripe.
pub struct PairLocks {
    stripes: Vec<Mutex<()>>,
}

impl PairLocks {
    pub fn new(stripes: usize) -> Self {
        Self {
            stripes: (0..stripes.max(1)).map(|_| Mutex::new(())).collect(),
        }
    }

    fn stripe(&self, a: UserId, b: UserId) -> usize {
        let mut hasher = DefaultHasher::new();
        canonical_pair(a, b).hash(&mut hasher);
        (hasher.finish() % self.stripes.len() as u64) as usize
    }

    /// Block until the pair's stripe is free. A poisoned stripe is recovered, it guards no data.
    pub fn lock(&self, a: UserId, b: UserId) -> MutexGuard<'_, ()> {
        self.stripes[self.stripe(a, b)]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for PairLocks {
    fn default() -> Self {
        Self::new(DEFAULT_STRIPES)
    }
}
