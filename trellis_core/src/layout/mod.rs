// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout computation and its results.
//!
//! A layout pass runs in three stages:
//!
//! 1. **Flex layout** ([`NodeStore::compute_layout`]): recursive flexbox
//!    resolution. Children are first *measured* (bottom-up, sizes only) to
//!    find flex bases and line cross sizes, then *laid out* (top-down) with
//!    their final sizes as exact constraints. Every call consults the node's
//!    [`LayoutCache`], and subtrees whose cached layout matches the requested
//!    constraints are skipped.
//! 2. **Rounding**: results are snapped to the pixel grid given by
//!    [`LayoutConfig::point_scale_factor`](crate::config::LayoutConfig::point_scale_factor),
//!    deriving sizes from rounded absolute edges so adjacent boxes stay flush.
//! 3. **Publication**: rounded results are compared with the previously
//!    published ones; nodes whose geometry changed get their has-new-layout
//!    flag set and are listed in [`LayoutChanges::laid_out`].
//!
//! [`NodeStore::compute_layout`]: crate::node::NodeStore::compute_layout

mod cache;
mod compute;
mod flex;
mod round;

#[cfg(test)]
mod tests;

use alloc::vec::Vec;

use kurbo::{Insets, Point, Size};

use crate::style::{Direction, Edge};

pub use cache::{CacheEntry, CacheKey, LayoutCache, MEASUREMENT_SLOTS};

/// How an available-space value constrains a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeasureMode {
    /// No constraint.
    Undefined,
    /// The node must be exactly this size.
    Exactly,
    /// The node may be at most this size.
    AtMost,
}

/// Available space along one axis, with its measure mode.
///
/// Values refer to the node's border box: the parent has already subtracted
/// the node's margins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AvailableSpace {
    /// The node must be exactly this size.
    Exactly(f64),
    /// The node may be at most this size.
    AtMost(f64),
    /// No constraint (max-content).
    Undefined,
}

impl AvailableSpace {
    /// Returns the measure mode.
    #[must_use]
    pub const fn mode(self) -> MeasureMode {
        match self {
            Self::Exactly(_) => MeasureMode::Exactly,
            Self::AtMost(_) => MeasureMode::AtMost,
            Self::Undefined => MeasureMode::Undefined,
        }
    }

    /// Returns the value, if constrained.
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Exactly(v) | Self::AtMost(v) => Some(v),
            Self::Undefined => None,
        }
    }

    /// Returns `true` for [`Exactly`](Self::Exactly).
    #[must_use]
    pub const fn is_exact(self) -> bool {
        matches!(self, Self::Exactly(_))
    }

    /// Shrinks a constrained value by `amount`, clamping at zero.
    #[must_use]
    pub fn shrink(self, amount: f64) -> Self {
        match self {
            Self::Exactly(v) => Self::Exactly((v - amount).max(0.0)),
            Self::AtMost(v) => Self::AtMost((v - amount).max(0.0)),
            Self::Undefined => Self::Undefined,
        }
    }
}

/// The computed geometry of a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutResult {
    /// Offset of the border box from the parent's border-box origin.
    pub location: Point,
    /// Border-box size.
    pub size: Size,
    /// Resolved margins (`x0` left, `y0` top, `x1` right, `y1` bottom).
    pub margin: Insets,
    /// Resolved border widths.
    pub border: Insets,
    /// Resolved paddings.
    pub padding: Insets,
    /// Direction the node was laid out in.
    pub direction: Direction,
    /// Baseline offset from the top edge, when the node took part in
    /// baseline alignment.
    pub baseline: Option<f64>,
}

impl LayoutResult {
    /// An empty layout at the origin.
    pub const ZERO: Self = Self {
        location: Point::ZERO,
        size: Size::ZERO,
        margin: Insets::ZERO,
        border: Insets::ZERO,
        padding: Insets::ZERO,
        direction: Direction::Inherit,
        baseline: None,
    };

    /// Returns the resolved margin on `edge`. `Start`/`End` use the layout
    /// direction; shorthand slots return zero.
    #[must_use]
    pub fn margin_edge(&self, edge: Edge) -> f64 {
        insets_edge(&self.margin, edge, self.direction)
    }

    /// Returns the resolved border width on `edge`.
    #[must_use]
    pub fn border_edge(&self, edge: Edge) -> f64 {
        insets_edge(&self.border, edge, self.direction)
    }

    /// Returns the resolved padding on `edge`.
    #[must_use]
    pub fn padding_edge(&self, edge: Edge) -> f64 {
        insets_edge(&self.padding, edge, self.direction)
    }

    /// Returns `true` if the published geometry differs from `other`.
    pub(crate) fn geometry_differs(&self, other: &Self) -> bool {
        self.location != other.location
            || self.size != other.size
            || self.margin != other.margin
            || self.border != other.border
            || self.padding != other.padding
            || self.direction != other.direction
    }
}

impl Default for LayoutResult {
    fn default() -> Self {
        Self::ZERO
    }
}

fn insets_edge(insets: &Insets, edge: Edge, direction: Direction) -> f64 {
    match edge.to_physical(direction) {
        Edge::Left => insets.x0,
        Edge::Top => insets.y0,
        Edge::Right => insets.x1,
        Edge::Bottom => insets.y1,
        _ => 0.0,
    }
}

/// The outcome of a single [`NodeStore::compute_layout`] call.
///
/// Node lists hold raw slot indices (see [`NodeId::index`]), in ascending
/// order.
///
/// [`NodeStore::compute_layout`]: crate::node::NodeStore::compute_layout
/// [`NodeId::index`]: crate::node::NodeId::index
#[derive(Clone, Debug, Default)]
pub struct LayoutChanges {
    /// Nodes whose published geometry changed in this pass.
    pub laid_out: Vec<u32>,
    /// Nodes restyled since the previous pass.
    pub restyled: Vec<u32>,
    /// Nodes explicitly invalidated since the previous pass.
    pub invalidated: Vec<u32>,
    /// Whether nodes were created, destroyed, attached or detached since the
    /// previous pass.
    pub topology_changed: bool,
    /// Measure-function invocations during this pass.
    pub measure_calls: u32,
    /// Cache hits during this pass.
    pub cache_hits: u32,
    /// The pass was a no-op: the root was clean and the request unchanged.
    pub skipped: bool,
}

impl LayoutChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.laid_out.clear();
        self.restyled.clear();
        self.invalidated.clear();
        self.topology_changed = false;
        self.measure_calls = 0;
        self.cache_hits = 0;
        self.skipped = false;
    }
}
