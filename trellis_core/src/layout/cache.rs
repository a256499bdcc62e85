// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node measurement cache.

use kurbo::Size;

use super::AvailableSpace;
use crate::style::Direction;
use crate::value::OptionalScalar;

/// Number of generic measurement slots per node.
pub const MEASUREMENT_SLOTS: usize = 8;

/// The constraints a node was sized under.
///
/// Owner sizes are part of the key because percentage margins, paddings and
/// insets resolve against them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CacheKey {
    /// Available width of the call.
    pub width: AvailableSpace,
    /// Available height of the call.
    pub height: AvailableSpace,
    /// Percentage reference for width-relative properties.
    pub owner_width: OptionalScalar,
    /// Percentage reference for height-relative properties.
    pub owner_height: OptionalScalar,
}

/// A cached measurement: its key and the resulting border-box size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CacheEntry {
    /// Constraints of the call.
    pub key: CacheKey,
    /// Resulting border-box size.
    pub computed: Size,
}

/// Memo of prior sizing calls for one node.
///
/// One slot holds the last full layout (children positioned); eight more hold
/// size-only measurements, replaced round-robin. Lookups require an exact
/// match of the whole [`CacheKey`], including available-space modes.
#[derive(Clone, Copy, Debug, Default)]
pub struct LayoutCache {
    layout: Option<CacheEntry>,
    measurements: [Option<CacheEntry>; MEASUREMENT_SLOTS],
    next_slot: usize,
    direction: Option<Direction>,
}

impl LayoutCache {
    /// Drops every entry.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layout.is_none() && self.measurements.iter().all(Option::is_none)
    }

    /// Returns the cached full layout for these constraints.
    #[must_use]
    pub fn layout(&self, key: CacheKey) -> Option<CacheEntry> {
        self.layout.filter(|e| e.key == key)
    }

    /// Returns a cached size for these constraints, from either the layout
    /// slot or a measurement slot.
    #[must_use]
    pub fn measurement(&self, key: CacheKey) -> Option<CacheEntry> {
        self.layout(key).or_else(|| {
            self.measurements
                .iter()
                .flatten()
                .find(|e| e.key == key)
                .copied()
        })
    }

    /// Records a full layout.
    pub fn store_layout(&mut self, entry: CacheEntry) {
        self.layout = Some(entry);
    }

    /// Records a measurement, evicting the oldest slot once all are used.
    pub fn store_measurement(&mut self, entry: CacheEntry) {
        self.measurements[self.next_slot] = Some(entry);
        self.next_slot = (self.next_slot + 1) % MEASUREMENT_SLOTS;
    }

    /// Clears the cache if it was filled under a different owner direction.
    pub(crate) fn sync_direction(&mut self, direction: Direction) {
        if self.direction != Some(direction) {
            self.clear();
            self.direction = Some(direction);
        }
    }
}
