// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout pass entry points.
//!
//! A pass sizes the root from the caller's available space, runs the flex
//! algorithm over every dirty or constraint-changed subtree, rounds and
//! publishes the results, and finally drains the change-tracking channels
//! into the returned [`LayoutChanges`].
//!
//! Node lists in [`LayoutChanges`] use raw slot indices (`u32`) rather than
//! [`NodeId`] handles so that hosts can look results up through
//! [`layout_at`](NodeStore::layout_at) without paying for generation checks.

use alloc::vec::Vec;

use kurbo::Point;

use super::flex::{Constraints, PassContext, resolve_insets};
use super::{AvailableSpace, LayoutChanges};
use crate::dirty;
use crate::node::{NodeId, NodeStore, RootRequest};
use crate::style::{Dimension, Direction};
use crate::trace::{LayoutBeginEvent, LayoutSummary, Tracer};
use crate::value::OptionalScalar;

/// Root constraint on one axis.
///
/// A definite style size wins; otherwise a definite max size caps the root;
/// otherwise the root fills the available space minus its margins.
fn root_space(
    preferred: OptionalScalar,
    max: OptionalScalar,
    available: Option<f64>,
    margins: f64,
) -> AvailableSpace {
    if let Some(v) = preferred.get() {
        AvailableSpace::Exactly(v)
    } else if let Some(m) = max.get() {
        AvailableSpace::AtMost(m)
    } else if let Some(a) = available {
        AvailableSpace::Exactly((a - margins).max(0.0))
    } else {
        AvailableSpace::Undefined
    }
}

impl NodeStore {
    /// Lays out the tree rooted at `root`.
    ///
    /// `available_width` and `available_height` are the space offered to the
    /// root; `None` (or NaN) means unconstrained. `parent_direction` is what an
    /// inherited root direction resolves to.
    ///
    /// If the root is clean and the request matches the previous one, nothing
    /// is recomputed and the returned changes have `skipped` set. Otherwise
    /// only dirty subtrees and subtrees offered new constraints are
    /// recomputed; the rest are reused from their caches.
    ///
    /// # Panics
    ///
    /// Panics if `root` is stale.
    pub fn compute_layout(
        &mut self,
        root: NodeId,
        available_width: Option<f64>,
        available_height: Option<f64>,
        parent_direction: Direction,
    ) -> LayoutChanges {
        let mut tracer = Tracer::none();
        self.compute_layout_traced(
            root,
            available_width,
            available_height,
            parent_direction,
            &mut tracer,
        )
    }

    /// Like [`compute_layout`](Self::compute_layout), reporting progress to
    /// `tracer`.
    ///
    /// # Panics
    ///
    /// Panics if `root` is stale.
    pub fn compute_layout_traced(
        &mut self,
        root: NodeId,
        available_width: Option<f64>,
        available_height: Option<f64>,
        parent_direction: Direction,
        tracer: &mut Tracer<'_>,
    ) -> LayoutChanges {
        self.validate(root);
        let idx = root.idx;
        let available_width = available_width.filter(|v| !v.is_nan());
        let available_height = available_height.filter(|v| !v.is_nan());

        tracer.layout_begin(&LayoutBeginEvent {
            root: idx,
            available_width,
            available_height,
            direction: parent_direction,
        });

        let request = RootRequest {
            root: idx,
            width: available_width,
            height: available_height,
            direction: parent_direction,
        };
        let mut changes = LayoutChanges::default();
        if !self.dirty[idx as usize] && self.last_request == Some(request) {
            changes.skipped = true;
        } else {
            let mut ctx = PassContext::new(tracer);
            self.layout_root(idx, available_width, available_height, parent_direction, &mut ctx);
            changes.measure_calls = ctx.measure_calls;
            changes.cache_hits = ctx.cache_hits;
            self.round_and_publish(idx, &mut changes.laid_out);
            changes.laid_out.sort_unstable();
            self.last_request = Some(request);
        }

        self.drain_changes(&mut changes);

        tracer.layout_end(&LayoutSummary {
            root: idx,
            laid_out: changes.laid_out.len(),
            measure_calls: changes.measure_calls,
            cache_hits: changes.cache_hits,
            skipped: changes.skipped,
        });
        changes
    }

    fn layout_root(
        &mut self,
        idx: u32,
        available_width: Option<f64>,
        available_height: Option<f64>,
        parent_direction: Direction,
        ctx: &mut PassContext<'_, '_>,
    ) {
        let style = self.style[idx as usize];
        let owner_width = OptionalScalar::from_option(available_width);
        let owner_height = OptionalScalar::from_option(available_height);
        let direction = style.direction().resolve(parent_direction);
        let margin = resolve_insets(style.margin_edges(), direction, owner_width);

        let width = root_space(
            style.dimension(Dimension::Width).resolve(owner_width),
            style.max_dimension(Dimension::Width).resolve(owner_width),
            available_width,
            margin.x0 + margin.x1,
        );
        let height = root_space(
            style.dimension(Dimension::Height).resolve(owner_height),
            style.max_dimension(Dimension::Height).resolve(owner_height),
            available_height,
            margin.y0 + margin.y1,
        );
        let c = Constraints {
            width,
            height,
            owner_width,
            owner_height,
            direction: parent_direction,
        };
        self.layout_node(idx, c, true, ctx);

        let (dx, dy) = self.relative_offset(idx, direction, owner_width, owner_height);
        self.unrounded[idx as usize].location = Point::new(margin.x0 + dx, margin.y0 + dy);
    }

    /// Moves pending change records out of the tracker.
    fn drain_changes(&mut self, changes: &mut LayoutChanges) {
        changes.restyled = self
            .tracker
            .drain(dirty::STYLE)
            .deterministic()
            .run()
            .collect();
        changes.restyled.sort_unstable();

        changes.invalidated = self
            .tracker
            .drain(dirty::MEASURE)
            .deterministic()
            .run()
            .collect();
        changes.invalidated.sort_unstable();

        let topology: Vec<u32> = self
            .tracker
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();
        changes.topology_changed = !topology.is_empty();
    }
}
