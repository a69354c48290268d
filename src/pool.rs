//! Item pool — the fixed, ordered set of drawable items.
//!
//! DESIGN
//! ======
//! A `Pool` is built once, validated, and then shared read-only (usually as
//! `Arc<Pool>`) by the codec and the engine. Index position is the only
//! identity the compact token grammar knows about, so reordering a pool
//! invalidates every outstanding compact link.
//!
//! Labels and ids must be unique across the pool. Legacy tokens name items by
//! label or id, and a duplicate would make that lookup ambiguous.

use std::collections::HashSet;

/// Widest pool a single `u32` mask can describe.
pub const MAX_POOL_SIZE: usize = 32;

/// Labels of the built-in nine-item pool.
pub const REFERENCE_LABELS: [&str; 9] = [
    "Alpha", "Bravo", "Charlie", "Delta", "Echo", "Foxtrot", "Golf", "Hotel", "India",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("pool must contain at least one item")]
    Empty,
    #[error("pool has {0} items; at most {MAX_POOL_SIZE} fit in a mask")]
    TooLarge(usize),
    #[error("pool item {0} has a blank label")]
    BlankLabel(usize),
    #[error("pool item {0} has no usable id; its label needs a letter or digit")]
    BlankId(usize),
    #[error("duplicate pool key: {0}")]
    Duplicate(String),
}

/// A single drawable item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolItem {
    pub id: String,
    pub label: String,
}

impl PoolItem {
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// Build an item whose id is the slug of its label.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        Self::new(slugify(label), label.trim())
    }
}

/// Immutable ordered pool of at most [`MAX_POOL_SIZE`] items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    items: Vec<PoolItem>,
}

impl Pool {
    /// Validate and wrap a list of items.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError`] when the list is empty, too large, has a blank
    /// label or id, or repeats a label or id.
    pub fn new(items: Vec<PoolItem>) -> Result<Self, PoolError> {
        if items.is_empty() {
            return Err(PoolError::Empty);
        }
        if items.len() > MAX_POOL_SIZE {
            return Err(PoolError::TooLarge(items.len()));
        }

        let mut seen = HashSet::new();
        for (index, item) in items.iter().enumerate() {
            if item.label.trim().is_empty() {
                return Err(PoolError::BlankLabel(index));
            }
            if item.id.trim().is_empty() {
                return Err(PoolError::BlankId(index));
            }
            if !seen.insert(item.label.as_str()) {
                return Err(PoolError::Duplicate(item.label.clone()));
            }
            // An id equal to its own label is one key, not two.
            if item.id != item.label && !seen.insert(item.id.as_str()) {
                return Err(PoolError::Duplicate(item.id.clone()));
            }
        }

        Ok(Self { items })
    }

    /// Build a pool from display labels, deriving ids from them.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Pool::new`].
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Result<Self, PoolError> {
        Self::new(
            labels
                .iter()
                .map(|label| PoolItem::from_label(label.as_ref()))
                .collect(),
        )
    }

    /// Parse a comma-separated label list such as `"a, b, c"`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Pool::new`]; empty segments count as blank labels.
    pub fn parse_list(raw: &str) -> Result<Self, PoolError> {
        let labels: Vec<&str> = raw.split(',').map(str::trim).collect();
        if labels.len() == 1 && labels[0].is_empty() {
            return Err(PoolError::Empty);
        }
        Self::from_labels(labels.as_slice())
    }

    /// The built-in nine-item pool.
    #[must_use]
    pub fn reference() -> Self {
        Self {
            items: REFERENCE_LABELS
                .iter()
                .map(|label| PoolItem::from_label(label))
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PoolItem> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PoolItem> {
        self.items.iter()
    }

    /// Mask with one bit set per pool item: `2^N - 1`.
    #[must_use]
    pub fn full_mask(&self) -> u32 {
        if self.items.len() >= MAX_POOL_SIZE {
            u32::MAX
        } else {
            (1_u32 << self.items.len()) - 1
        }
    }

    /// Find the index of the item whose id or label equals `key`.
    #[must_use]
    pub fn index_of(&self, key: &str) -> Option<usize> {
        if key.is_empty() {
            return None;
        }
        self.items
            .iter()
            .position(|item| item.id == key || item.label == key)
    }

    /// Items whose bits are set in `mask`, in pool order.
    pub fn items_in(&self, mask: u32) -> impl Iterator<Item = (usize, &PoolItem)> {
        self.items
            .iter()
            .enumerate()
            .filter(move |(index, _)| mask & (1_u32 << index) != 0)
    }
}

fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut pending_dash = false;
    for ch in label.trim().chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
#[path = "pool_test.rs"]
mod tests;
