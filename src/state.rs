//! Draw state — the value that travels inside a share link.
//!
//! DESIGN
//! ======
//! A `DrawState` is a plain `Copy` value. Every participant rebuilds their own
//! copy by decoding the token they hold, so there is no shared instance and no
//! locking. Two holders of the same token who both draw will diverge; whichever
//! link gets passed on next wins.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::pool::{Pool, PoolItem};

/// Remaining-items mask plus an advisory creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DrawState {
    /// Bit `i` set means pool item `i` has not been drawn yet.
    pub remaining: u32,
    /// Milliseconds since the Unix epoch when the draw was created.
    pub created_at: Option<u64>,
}

impl DrawState {
    #[must_use]
    pub fn new(remaining: u32) -> Self {
        Self {
            remaining,
            created_at: None,
        }
    }

    /// Seed a state with every pool item available.
    #[must_use]
    pub fn fresh(pool: &Pool, created_at: Option<u64>) -> Self {
        Self {
            remaining: pool.full_mask(),
            created_at,
        }
    }

    #[must_use]
    pub fn with_created_at(mut self, created_at: u64) -> Self {
        self.created_at = Some(created_at);
        self
    }

    #[must_use]
    pub fn remaining_count(&self) -> u32 {
        self.remaining.count_ones()
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Pool items already drawn, in pool order.
    #[must_use]
    pub fn drawn_items<'p>(&self, pool: &'p Pool) -> Vec<&'p PoolItem> {
        pool.items_in(pool.full_mask() & !self.remaining)
            .map(|(_, item)| item)
            .collect()
    }

    /// Pool items still available, in pool order.
    #[must_use]
    pub fn remaining_items<'p>(&self, pool: &'p Pool) -> Vec<&'p PoolItem> {
        pool.items_in(self.remaining)
            .map(|(_, item)| item)
            .collect()
    }
}

/// Current wall-clock time in epoch milliseconds, or 0 if the clock is before 1970.
#[must_use]
pub fn now_ms() -> u64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    u64::try_from(dur.as_millis()).unwrap_or(0)
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
