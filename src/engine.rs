//! Draw engine — the single state transition.
//!
//! DESIGN
//! ======
//! `draw` looks only at the items still available, asks an [`IndexSource`]
//! for a uniform position among them, and clears that one bit. It never
//! stamps time, never touches I/O, and keeps no state between calls.
//!
//! Calling `draw` twice on the same input can pick different items. That is
//! the stateless race: two holders of one link each remove a bit from their
//! own copy and whichever link is shared next wins. Preventing it would need
//! an external store with compare-and-swap, which this crate does not have.

use std::sync::Arc;

use rand::Rng;
use tracing::debug;

use crate::pool::{Pool, PoolItem};
use crate::state::DrawState;

/// Uniform index source; injected so tests can use seeded or scripted values.
pub trait IndexSource {
    /// Return an index in `0..len`. `len` is always at least 1.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// Adapts any `rand::Rng` into an [`IndexSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl<R: Rng> IndexSource for RngSource<R> {
    fn pick_index(&mut self, len: usize) -> usize {
        self.0.random_range(0..len)
    }
}

/// Result of one draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOutcome {
    Picked(Pick),
    /// Nothing left to draw. A normal terminal result.
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pick {
    /// Pool index of the drawn item.
    pub index: usize,
    pub item: PoolItem,
    /// State to encode and publish after this draw.
    pub next: DrawState,
}

impl DrawOutcome {
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }
}

/// Stateless draw over one pool.
#[derive(Debug, Clone)]
pub struct DrawEngine {
    pool: Arc<Pool>,
}

impl DrawEngine {
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool }
    }

    /// Draw one available item uniformly at random.
    ///
    /// Out-of-range answers from `source` wrap around.
    pub fn draw<S: IndexSource + ?Sized>(&self, state: &DrawState, source: &mut S) -> DrawOutcome {
        let available: Vec<(usize, &PoolItem)> = self.pool.items_in(state.remaining).collect();
        if available.is_empty() {
            debug!(remaining = state.remaining, "draw on exhausted state");
            return DrawOutcome::Exhausted;
        }

        let slot = if available.len() == 1 {
            0
        } else {
            source.pick_index(available.len()) % available.len()
        };
        let (index, item) = available[slot];

        let next = DrawState {
            remaining: state.remaining & !(1_u32 << index),
            created_at: state.created_at,
        };
        debug!(index, left = next.remaining_count(), "item drawn");

        DrawOutcome::Picked(Pick {
            index,
            item: item.clone(),
            next,
        })
    }

    /// Draw using the thread-local RNG.
    #[must_use]
    pub fn draw_random(&self, state: &DrawState) -> DrawOutcome {
        self.draw(state, &mut RngSource(rand::rng()))
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
