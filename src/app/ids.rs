//! Application id sources.
//!
//! Every application draws its `uid` from an [`IdSource`] when it is created.
//! The default source is shared by the whole process, so ids stay unique
//! across factories; tests inject their own.

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_APP_UID: AtomicU64 = AtomicU64::new(0);

/// Supplies application ids.
pub trait IdSource {
    /// Returns the next id. Successive calls never repeat.
    fn next_id(&self) -> u64;
}

/// Process-wide monotonic counter starting at 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessIds;

impl IdSource for ProcessIds {
    fn next_id(&self) -> u64 {
        NEXT_APP_UID.fetch_add(1, Ordering::Relaxed)
    }
}

/// Local counter, for deterministic ids in tests.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: Cell<u64>,
}

impl SequentialIds {
    #[must_use]
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: Cell::new(first),
        }
    }

    /// Restarts the sequence at 0.
    pub fn reset(&self) {
        self.next.set(0);
    }
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> u64 {
        let id = self.next.get();
        self.next.set(id + 1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_ids_increase() {
        let a = ProcessIds.next_id();
        let b = ProcessIds.next_id();
        assert!(b > a);
    }

    #[test]
    fn sequential_ids_reset() {
        let ids = SequentialIds::starting_at(5);
        assert_eq!(ids.next_id(), 5);
        assert_eq!(ids.next_id(), 6);
        ids.reset();
        assert_eq!(ids.next_id(), 0);
    }
}
