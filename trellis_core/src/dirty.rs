// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change-tracking channel constants.
//!
//! Invalidation for layout itself is carried by each node's dirty flag and
//! measurement cache, which propagate to ancestors. Alongside that, the store
//! records *why* nodes changed in a [`understory_dirty`] tracker, one channel
//! per category of change. All channels are local-only: only the explicitly
//! marked node appears in the drain output.
//!
//! # Consumption
//!
//! Each [`NodeStore::compute_layout`](crate::node::NodeStore::compute_layout)
//! call drains every channel and surfaces the result in
//! [`LayoutChanges`](crate::layout::LayoutChanges), so hosts can tell a restyle
//! apart from a content invalidation without querying dirty state directly.

use understory_dirty::Channel;

/// A style property changed.
pub const STYLE: Channel = Channel::new(0);

/// Content changed: explicit `mark_dirty`, or a measure or baseline function
/// was attached or removed.
pub const MEASURE: Channel = Channel::new(1);

/// Tree topology changed (insert, remove, create, destroy).
pub const TOPOLOGY: Channel = Channel::new(2);
