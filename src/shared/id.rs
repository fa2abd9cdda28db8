//! Identifier sequence owned by a single facility layout

use std::sync::atomic::{AtomicU32, Ordering};

/// Monotonic counter handing out spot numbers.
///
/// Every facility builds its spots from its own sequence, so two facilities
/// in the same process number their spots independently.
#[derive(Debug)]
pub struct IdSequence {
    next: AtomicU32,
}

impl IdSequence {
    /// Sequence whose first value is `1`.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u32) -> Self {
        Self {
            next: AtomicU32::new(first),
        }
    }

    pub fn next(&self) -> u32 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }

    /// Value the next call to [`IdSequence::next`] will return.
    pub fn peek(&self) -> u32 {
        self.next.load(Ordering::SeqCst)
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}
