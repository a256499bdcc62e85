// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The flexbox algorithm.
//!
//! [`NodeStore::layout_node`] is the single recursive entry point. It consults
//! the node's cache and otherwise sizes the node:
//!
//! - Measure-function leaves defer to the callback.
//! - Childless nodes size to their padding and border.
//! - Containers run the flex algorithm over their in-flow children: flex
//!   basis, line breaking, flexible lengths, cross sizes, then (when
//!   performing layout) main and cross placement, a final exact layout of
//!   every child, and absolute children last.
//!
//! Positions are computed along the flex axes, measured from each axis's
//! leading edge, and mapped to physical coordinates when written.

use alloc::vec::Vec;
use core::ops::Range;

use kurbo::{Insets, Point, Size};

use super::{AvailableSpace, CacheEntry, CacheKey, LayoutResult};
use crate::node::{INVALID, NodeStore};
use crate::style::{
    Align, Dimension, Direction, Display, Edge, Edges, FlexDirection, FlexWrap, Justify, Overflow,
    PositionType, Style,
};
#[cfg(feature = "trace-rich")]
use crate::trace::NodeLayoutEvent;
use crate::trace::{CacheHitEvent, CacheKind, MeasureEvent, Tracer};
use crate::value::OptionalScalar;

/// Per-pass counters and the trace hook.
#[derive(Debug)]
pub(crate) struct PassContext<'t, 'a> {
    pub(crate) tracer: &'t mut Tracer<'a>,
    pub(crate) measure_calls: u32,
    pub(crate) cache_hits: u32,
}

impl<'t, 'a> PassContext<'t, 'a> {
    pub(crate) fn new(tracer: &'t mut Tracer<'a>) -> Self {
        Self {
            tracer,
            measure_calls: 0,
            cache_hits: 0,
        }
    }
}

/// What a parent hands to a child.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Constraints {
    /// Available border-box width, margins already removed.
    pub(crate) width: AvailableSpace,
    /// Available border-box height, margins already removed.
    pub(crate) height: AvailableSpace,
    /// Reference for percentages of the child's width-relative properties.
    pub(crate) owner_width: OptionalScalar,
    /// Reference for percentages of the child's height-relative properties.
    pub(crate) owner_height: OptionalScalar,
    /// Resolved direction of the parent.
    pub(crate) direction: Direction,
}

impl Constraints {
    fn cache_key(&self) -> CacheKey {
        CacheKey {
            width: self.width,
            height: self.height,
            owner_width: self.owner_width,
            owner_height: self.owner_height,
        }
    }
}

// ---------------------------------------------------------------------------
// Box-model helpers
// ---------------------------------------------------------------------------

/// Resolves the four physical sides of an edge group; unset or auto sides are 0.
pub(crate) fn resolve_insets(edges: &Edges, direction: Direction, reference: OptionalScalar) -> Insets {
    let side = |edge| edges.resolve_value(edge, direction, reference).unwrap_or(0.0);
    Insets::new(
        side(Edge::Left),
        side(Edge::Top),
        side(Edge::Right),
        side(Edge::Bottom),
    )
}

fn non_negative(insets: Insets) -> Insets {
    Insets::new(
        insets.x0.max(0.0),
        insets.y0.max(0.0),
        insets.x1.max(0.0),
        insets.y1.max(0.0),
    )
}

fn sum_insets(a: Insets, b: Insets) -> Insets {
    Insets::new(a.x0 + b.x0, a.y0 + b.y0, a.x1 + b.x1, a.y1 + b.y1)
}

fn side(insets: &Insets, edge: Edge) -> f64 {
    match edge {
        Edge::Left => insets.x0,
        Edge::Top => insets.y0,
        Edge::Right => insets.x1,
        Edge::Bottom => insets.y1,
        _ => 0.0,
    }
}

fn leading(insets: &Insets, axis: FlexDirection) -> f64 {
    side(insets, axis.leading_edge())
}

fn trailing(insets: &Insets, axis: FlexDirection) -> f64 {
    side(insets, axis.trailing_edge())
}

fn axis_total(insets: &Insets, axis: FlexDirection) -> f64 {
    if axis.is_row() {
        insets.x0 + insets.x1
    } else {
        insets.y0 + insets.y1
    }
}

fn along(size: Size, axis: FlexDirection) -> f64 {
    if axis.is_row() { size.width } else { size.height }
}

fn size_from_axes(main: f64, cross: f64, main_axis: FlexDirection) -> Size {
    if main_axis.is_row() {
        Size::new(main, cross)
    } else {
        Size::new(cross, main)
    }
}

/// Min/max constraints of one axis plus the padding-and-border floor.
#[derive(Clone, Copy, Debug)]
struct AxisBounds {
    min: OptionalScalar,
    max: OptionalScalar,
    floor: f64,
}

impl AxisBounds {
    fn of(style: &Style, dimension: Dimension, reference: OptionalScalar, floor: f64) -> Self {
        Self {
            min: style.min_dimension(dimension).resolve(reference),
            max: style.max_dimension(dimension).resolve(reference),
            floor,
        }
    }

    /// Applies max, then min, then the floor.
    fn clamp(self, value: f64) -> f64 {
        let mut v = value;
        if let Some(max) = self.max.get()
            && v > max
        {
            v = max;
        }
        if let Some(min) = self.min.get()
            && v < min
        {
            v = min;
        }
        v.max(self.floor)
    }

    /// Turns the caller's constraint into the node's own: exact values are
    /// clamped, a definite preferred size becomes exact, and a max bound caps
    /// whatever is left.
    fn constrain(self, space: AvailableSpace, preferred: OptionalScalar) -> AvailableSpace {
        if let AvailableSpace::Exactly(v) = space {
            return AvailableSpace::Exactly(self.clamp(v));
        }
        if let Some(p) = preferred.get() {
            return AvailableSpace::Exactly(self.clamp(p));
        }
        match (space, self.max.get()) {
            (AvailableSpace::AtMost(v), Some(max)) => AvailableSpace::AtMost(v.min(max)),
            (AvailableSpace::Undefined, Some(max)) => AvailableSpace::AtMost(max),
            (space, _) => space,
        }
    }

    /// Final size on an axis given content that needs `content`.
    ///
    /// An upper bound caps the content before min and the floor apply, so a
    /// min size can exceed the available space.
    fn fit(self, space: AvailableSpace, content: f64) -> f64 {
        match space {
            AvailableSpace::Exactly(v) => v,
            AvailableSpace::AtMost(v) => self.clamp(content.min(v)),
            AvailableSpace::Undefined => self.clamp(content),
        }
    }

    fn shifted(self, amount: f64) -> (OptionalScalar, OptionalScalar) {
        (self.min - amount, self.max - amount)
    }
}

// ---------------------------------------------------------------------------
// Flex items and lines
// ---------------------------------------------------------------------------

/// Per-child scratch state of one container pass.
#[derive(Clone, Copy, Debug)]
struct FlexItem {
    idx: u32,
    direction: Direction,
    margin: Insets,
    /// Auto margins on the (leading, trailing) main-axis edges.
    auto_main: (bool, bool),
    /// Auto margins on the (leading, trailing) cross-axis edges.
    auto_cross: (bool, bool),
    align: Align,
    grow: f64,
    shrink: f64,
    basis: f64,
    main_bounds: AxisBounds,
    cross_bounds: AxisBounds,
    /// Cross size fixed by style (a definite dimension or an aspect ratio).
    definite_cross: bool,
    hypothetical: f64,
    target: f64,
    frozen: bool,
    violation: f64,
    cross: f64,
    /// Baseline plus top margin, for baseline alignment.
    ascent: f64,
    main_pos: f64,
    cross_pos: f64,
}

impl FlexItem {
    fn stretches(&self) -> bool {
        self.align == Align::Stretch
            && !self.definite_cross
            && !self.auto_cross.0
            && !self.auto_cross.1
    }
}

#[derive(Clone, Debug)]
struct FlexLine {
    items: Range<usize>,
    cross: f64,
    ascent: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Placement {
    Start,
    Center,
    End,
}

/// The container geometry absolute children are placed against.
#[derive(Clone, Copy, Debug)]
struct ContainingBox {
    size: Size,
    border: Insets,
    padding_border: Insets,
    direction: Direction,
    main_axis: FlexDirection,
    cross_axis: FlexDirection,
    justify: Justify,
    align_items: Align,
}

/// Distributes free space over one line's items until no clamp changes.
fn resolve_flexible_lengths(items: &mut [FlexItem], line_main: f64, main_axis: FlexDirection) {
    let margins: f64 = items.iter().map(|it| axis_total(&it.margin, main_axis)).sum();
    let hypothetical: f64 = items.iter().map(|it| it.hypothetical).sum();
    let growing = margins + hypothetical < line_main;

    for item in items.iter_mut() {
        item.target = item.hypothetical;
        let factor = if growing { item.grow } else { item.shrink };
        item.frozen = factor <= 0.0
            || (growing && item.basis > item.hypothetical)
            || (!growing && item.basis < item.hypothetical);
    }

    while items.iter().any(|it| !it.frozen) {
        let used: f64 = margins
            + items
                .iter()
                .map(|it| if it.frozen { it.target } else { it.basis })
                .sum::<f64>();
        let remaining = line_main - used;
        let grow_sum: f64 = items.iter().filter(|it| !it.frozen).map(|it| it.grow).sum();
        let shrink_sum: f64 = items
            .iter()
            .filter(|it| !it.frozen)
            .map(|it| it.shrink * it.basis)
            .sum();

        let mut total_violation = 0.0;
        for item in items.iter_mut().filter(|it| !it.frozen) {
            let share = if growing {
                remaining * item.grow / grow_sum.max(1.0)
            } else if shrink_sum > 0.0 {
                remaining * item.shrink * item.basis / shrink_sum
            } else {
                0.0
            };
            let unclamped = item.basis + share;
            item.target = item.main_bounds.clamp(unclamped);
            item.violation = item.target - unclamped;
            total_violation += item.violation;
        }

        for item in items.iter_mut().filter(|it| !it.frozen) {
            item.frozen = total_violation == 0.0
                || (total_violation > 0.0 && item.violation > 0.0)
                || (total_violation < 0.0 && item.violation < 0.0);
        }
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

impl NodeStore {
    /// Sizes the node at `idx` under `c`, and with `perform_layout` also
    /// positions its descendants.
    ///
    /// Returns the border-box size. Performing calls record the size in the
    /// node's working layout and clean the node.
    pub(crate) fn layout_node(
        &mut self,
        idx: u32,
        c: Constraints,
        perform_layout: bool,
        ctx: &mut PassContext<'_, '_>,
    ) -> Size {
        let i = idx as usize;
        self.cache[i].sync_direction(c.direction);

        let key = c.cache_key();
        let cache = &self.cache[i];
        let hit = cache
            .layout(key)
            .map(|e| (e, CacheKind::Layout))
            .or_else(|| {
                (!perform_layout)
                    .then(|| cache.measurement(key))
                    .flatten()
                    .map(|e| (e, CacheKind::Measurement))
            });
        if let Some((entry, kind)) = hit {
            ctx.cache_hits += 1;
            ctx.tracer.cache_hit(&CacheHitEvent {
                node: idx,
                kind,
                width: c.width,
                height: c.height,
            });
            if perform_layout {
                self.unrounded[i].size = entry.computed;
                self.dirty[i] = false;
            }
            return entry.computed;
        }

        let size = self.layout_impl(idx, c, perform_layout, ctx);
        let entry = CacheEntry { key, computed: size };
        if perform_layout {
            self.cache[i].store_layout(entry);
            self.unrounded[i].size = size;
            self.dirty[i] = false;
        } else {
            self.cache[i].store_measurement(entry);
        }

        #[cfg(feature = "trace-rich")]
        ctx.tracer.node_layout(&NodeLayoutEvent {
            node: idx,
            width: c.width,
            height: c.height,
            perform_layout,
            size,
        });
        size
    }

    fn layout_impl(
        &mut self,
        idx: u32,
        c: Constraints,
        perform_layout: bool,
        ctx: &mut PassContext<'_, '_>,
    ) -> Size {
        let i = idx as usize;
        let style = self.style[i];
        let direction = style.direction().resolve(c.direction);
        let margin = resolve_insets(style.margin_edges(), direction, c.owner_width);
        let padding = non_negative(resolve_insets(
            style.padding_edges(),
            direction,
            c.owner_width,
        ));
        let border = non_negative(resolve_insets(
            style.border_edges(),
            direction,
            OptionalScalar::UNDEFINED,
        ));
        let pb = sum_insets(padding, border);
        let (pb_w, pb_h) = (pb.x0 + pb.x1, pb.y0 + pb.y1);

        if perform_layout {
            let result = &mut self.unrounded[i];
            result.margin = margin;
            result.border = border;
            result.padding = padding;
            result.direction = direction;
            result.baseline = None;
        }

        let bounds_w = AxisBounds::of(&style, Dimension::Width, c.owner_width, pb_w);
        let bounds_h = AxisBounds::of(&style, Dimension::Height, c.owner_height, pb_h);
        let mut width = bounds_w.constrain(
            c.width,
            style.dimension(Dimension::Width).resolve(c.owner_width),
        );
        let mut height = bounds_h.constrain(
            c.height,
            style.dimension(Dimension::Height).resolve(c.owner_height),
        );
        if let Some(ratio) = style.resolved_aspect_ratio() {
            match (width, height) {
                (AvailableSpace::Exactly(w), h) if !h.is_exact() => {
                    height = AvailableSpace::Exactly(bounds_h.clamp(w / ratio));
                }
                (w, AvailableSpace::Exactly(h)) if !w.is_exact() => {
                    width = AvailableSpace::Exactly(bounds_w.clamp(h * ratio));
                }
                _ => {}
            }
        }

        if let Some(measure) = self.measure[i].clone() {
            if let (AvailableSpace::Exactly(w), AvailableSpace::Exactly(h)) = (width, height) {
                return Size::new(w, h);
            }
            let inner_w = width.shrink(pb_w);
            let inner_h = height.shrink(pb_h);
            let content = measure.call(self.handle(idx), inner_w, inner_h);
            ctx.measure_calls += 1;
            ctx.tracer.measure(&MeasureEvent {
                node: idx,
                width: inner_w,
                height: inner_h,
                size: content,
            });
            return Size::new(
                bounds_w.fit(width, content.width + pb_w),
                bounds_h.fit(height, content.height + pb_h),
            );
        }

        if self.first_child[i] == INVALID {
            return Size::new(bounds_w.fit(width, pb_w), bounds_h.fit(height, pb_h));
        }

        if !perform_layout
            && let (AvailableSpace::Exactly(w), AvailableSpace::Exactly(h)) = (width, height)
        {
            return Size::new(w, h);
        }

        self.layout_flex_container(
            idx,
            &style,
            direction,
            width,
            height,
            border,
            pb,
            (bounds_w, bounds_h),
            perform_layout,
            ctx,
        )
    }

    fn layout_flex_container(
        &mut self,
        idx: u32,
        style: &Style,
        direction: Direction,
        width: AvailableSpace,
        height: AvailableSpace,
        border: Insets,
        pb: Insets,
        (bounds_w, bounds_h): (AxisBounds, AxisBounds),
        perform_layout: bool,
        ctx: &mut PassContext<'_, '_>,
    ) -> Size {
        let main_axis = style.flex_direction().resolve(direction);
        let wrap = style.flex_wrap();
        let mut cross_axis = main_axis.cross(direction);
        if wrap == FlexWrap::WrapReverse {
            cross_axis = cross_axis.reversed();
        }
        let is_row = main_axis.is_row();
        let (main_space, cross_space) = if is_row { (width, height) } else { (height, width) };
        let (bounds_main, bounds_cross) = if is_row {
            (bounds_w, bounds_h)
        } else {
            (bounds_h, bounds_w)
        };
        let pb_main = axis_total(&pb, main_axis);
        let pb_cross = axis_total(&pb, cross_axis);
        let inner_main = main_space.shrink(pb_main);
        let inner_cross = cross_space.shrink(pb_cross);
        let owner_w = OptionalScalar::from_option(width.shrink(pb.x0 + pb.x1).value());
        let owner_h = OptionalScalar::from_option(height.shrink(pb.y0 + pb.y1).value());
        let child_constraints = |w: AvailableSpace, h: AvailableSpace| Constraints {
            width: w,
            height: h,
            owner_width: owner_w,
            owner_height: owner_h,
            direction,
        };
        let along_axes = |main: AvailableSpace, cross: AvailableSpace| {
            if is_row { (main, cross) } else { (cross, main) }
        };
        let scroll = style.overflow() == Overflow::Scroll;
        let align_items = match style.align_items() {
            Align::Auto => Align::FlexStart,
            align => align,
        };

        // Partition children.
        let mut items = Vec::new();
        let mut absolute = Vec::new();
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            let child_style = &self.style[child as usize];
            let (display, position) = (child_style.display(), child_style.position_type());
            if display == Display::None {
                if perform_layout {
                    self.zero_subtree(child);
                }
            } else if position == PositionType::Absolute {
                absolute.push(child);
            } else {
                items.push(self.flex_item(
                    child,
                    direction,
                    main_axis,
                    cross_axis,
                    (owner_w, owner_h),
                    align_items,
                ));
            }
            child = self.next_sibling[child as usize];
        }

        // Flex basis.
        let (owner_main, owner_cross) = if is_row { (owner_w, owner_h) } else { (owner_h, owner_w) };
        for item in &mut items {
            let child_style = self.style[item.idx as usize];
            let basis = child_style
                .resolved_flex_basis(self.config.use_web_defaults)
                .resolve(owner_main);
            let main_dim = child_style.dimension(main_axis.dimension()).resolve(owner_main);
            let cross_dim = child_style.dimension(cross_axis.dimension()).resolve(owner_cross);
            let ratio = child_style.resolved_aspect_ratio();

            let basis = if let Some(b) = basis.get() {
                b
            } else if let Some(m) = main_dim.get() {
                m
            } else if let (Some(r), Some(cr)) = (ratio, cross_dim.get()) {
                if is_row { cr * r } else { cr / r }
            } else {
                let cross_avail = cross_measure_space(item, inner_cross, cross_axis, true, scroll);
                let (w, h) = along_axes(AvailableSpace::Undefined, cross_avail);
                let size = self.layout_node(item.idx, child_constraints(w, h), false, ctx);
                along(size, main_axis)
            };
            item.basis = basis.max(item.main_bounds.floor);
            item.hypothetical = item.main_bounds.clamp(item.basis);
        }

        // Line breaking.
        let mut ranges = Vec::new();
        let limit = if wrap == FlexWrap::NoWrap {
            None
        } else {
            inner_main.value()
        };
        let mut start = 0;
        let mut line_used = 0.0;
        for (k, item) in items.iter().enumerate() {
            let outer = item.hypothetical + axis_total(&item.margin, main_axis);
            if let Some(limit) = limit
                && k > start
                && line_used + outer > limit
            {
                ranges.push(start..k);
                start = k;
                line_used = 0.0;
            }
            line_used += outer;
        }
        if start < items.len() {
            ranges.push(start..items.len());
        }

        // Flexible lengths and cross sizes, per line.
        let (min_inner_main, max_inner_main) = bounds_main.shifted(pb_main);
        let mut lines = Vec::with_capacity(ranges.len());
        let mut content_main: f64 = 0.0;
        for range in ranges {
            let line_items = &mut items[range.clone()];
            let content: f64 = line_items
                .iter()
                .map(|it| it.hypothetical + axis_total(&it.margin, main_axis))
                .sum();
            let total_grow: f64 = line_items.iter().map(|it| it.grow).sum();
            let line_main = match inner_main {
                AvailableSpace::Exactly(v) => v,
                space => {
                    if let Some(min) = min_inner_main.get()
                        && content < min
                    {
                        min
                    } else if let Some(max) = max_inner_main.get()
                        && content > max
                    {
                        max
                    } else if total_grow <= 0.0 {
                        content
                    } else {
                        match space {
                            AvailableSpace::AtMost(v) => v,
                            _ => content,
                        }
                    }
                }
            };
            resolve_flexible_lengths(line_items, line_main, main_axis);

            let mut line_cross: f64 = 0.0;
            let mut max_ascent: f64 = 0.0;
            let mut max_descent: f64 = 0.0;
            let mut used_main = 0.0;
            for item in line_items.iter_mut() {
                used_main += item.target + axis_total(&item.margin, main_axis);
                let cross_margin = axis_total(&item.margin, cross_axis);
                let cross_avail = cross_measure_space(
                    item,
                    inner_cross,
                    cross_axis,
                    wrap == FlexWrap::NoWrap,
                    scroll,
                );
                let (w, h) = along_axes(AvailableSpace::Exactly(item.target), cross_avail);
                let size = self.layout_node(item.idx, child_constraints(w, h), false, ctx);
                item.cross = along(size, cross_axis);
                let outer = item.cross + cross_margin;
                if item.align == Align::Baseline {
                    item.ascent = self.child_baseline(item.idx, size) + item.margin.y0;
                    max_ascent = max_ascent.max(item.ascent);
                    max_descent = max_descent.max(outer - item.ascent);
                } else {
                    line_cross = line_cross.max(outer);
                }
            }
            line_cross = line_cross.max(max_ascent + max_descent);
            if wrap == FlexWrap::NoWrap
                && let AvailableSpace::Exactly(v) = inner_cross
            {
                line_cross = v;
            }
            content_main = content_main.max(used_main);
            lines.push(FlexLine {
                items: range,
                cross: line_cross,
                ascent: max_ascent,
            });
        }

        // Container size.
        let content_cross: f64 = lines.iter().map(|l| l.cross).sum();
        let main_size = bounds_main.fit(main_space, content_main + pb_main);
        let cross_size = bounds_cross.fit(cross_space, content_cross + pb_cross);
        let size = size_from_axes(main_size, cross_size, main_axis);
        if !perform_layout {
            return size;
        }

        // Align lines.
        let inner_cross_size = cross_size - pb_cross;
        let line_count = lines.len() as f64;
        let free_cross = inner_cross_size - content_cross;
        let mut cross_lead = 0.0;
        let mut line_gap = 0.0;
        if wrap != FlexWrap::NoWrap && !lines.is_empty() {
            match style.align_content() {
                Align::FlexEnd => cross_lead = free_cross,
                Align::Center => cross_lead = free_cross / 2.0,
                Align::Stretch if free_cross > 0.0 => {
                    for line in &mut lines {
                        line.cross += free_cross / line_count;
                    }
                }
                Align::SpaceBetween if lines.len() > 1 => {
                    line_gap = free_cross.max(0.0) / (line_count - 1.0);
                }
                Align::SpaceAround => {
                    line_gap = free_cross.max(0.0) / line_count;
                    cross_lead = line_gap / 2.0;
                }
                Align::SpaceEvenly => {
                    line_gap = free_cross.max(0.0) / (line_count + 1.0);
                    cross_lead = line_gap;
                }
                _ => {}
            }
        }

        let inner_main_size = main_size - pb_main;
        let mut cross_cursor = leading(&pb, cross_axis) + cross_lead;
        for line in &lines {
            let line_items = &mut items[line.items.clone()];

            // Main axis.
            let used: f64 = line_items
                .iter()
                .map(|it| it.target + axis_total(&it.margin, main_axis))
                .sum();
            let free = inner_main_size - used;
            let n = line_items.len() as f64;
            let auto_margins = line_items
                .iter()
                .map(|it| usize::from(it.auto_main.0) + usize::from(it.auto_main.1))
                .sum::<usize>() as f64;
            let mut main_lead = 0.0;
            let mut between = 0.0;
            let mut auto_share = 0.0;
            if free > 0.0 && auto_margins > 0.0 {
                auto_share = free / auto_margins;
            } else {
                match style.justify_content() {
                    Justify::FlexStart => {}
                    Justify::Center => main_lead = free / 2.0,
                    Justify::FlexEnd => main_lead = free,
                    Justify::SpaceBetween => {
                        if line_items.len() > 1 {
                            between = free.max(0.0) / (n - 1.0);
                        }
                    }
                    Justify::SpaceAround => {
                        between = free.max(0.0) / n;
                        main_lead = between / 2.0;
                    }
                    Justify::SpaceEvenly => {
                        between = free.max(0.0) / (n + 1.0);
                        main_lead = between;
                    }
                }
            }
            let mut cursor = leading(&pb, main_axis) + main_lead;
            for item in line_items.iter_mut() {
                if item.auto_main.0 {
                    cursor += auto_share;
                }
                cursor += leading(&item.margin, main_axis);
                item.main_pos = cursor;
                cursor += item.target + trailing(&item.margin, main_axis) + between;
                if item.auto_main.1 {
                    cursor += auto_share;
                }
            }

            // Cross axis.
            for item in line_items.iter_mut() {
                let lead_margin = leading(&item.margin, cross_axis);
                let trail_margin = trailing(&item.margin, cross_axis);
                let free = line.cross - (item.cross + lead_margin + trail_margin);
                let offset = match item.auto_cross {
                    (true, true) => free.max(0.0) / 2.0,
                    (true, false) => free.max(0.0),
                    (false, true) => 0.0,
                    (false, false) => match item.align {
                        Align::Stretch if item.stretches() => {
                            item.cross = item
                                .cross_bounds
                                .clamp(line.cross - lead_margin - trail_margin);
                            0.0
                        }
                        Align::Center => free / 2.0,
                        Align::FlexEnd => free,
                        // Ascents are measured from the top edge, so a
                        // reversed cross axis places from the descent side.
                        Align::Baseline if cross_axis.is_reverse() => {
                            free - (line.ascent - item.ascent)
                        }
                        Align::Baseline => line.ascent - item.ascent,
                        _ => 0.0,
                    },
                };
                item.cross_pos = cross_cursor + offset + lead_margin;
            }
            cross_cursor += line.cross + line_gap;
        }

        // Final layout of in-flow children.
        for item in &items {
            let (w, h) = along_axes(
                AvailableSpace::Exactly(item.target),
                AvailableSpace::Exactly(item.cross),
            );
            self.layout_node(item.idx, child_constraints(w, h), true, ctx);

            let main = if main_axis.is_reverse() {
                main_size - item.main_pos - item.target
            } else {
                item.main_pos
            };
            let cross = if cross_axis.is_reverse() {
                cross_size - item.cross_pos - item.cross
            } else {
                item.cross_pos
            };
            let (x, y) = if is_row { (main, cross) } else { (cross, main) };
            let (dx, dy) = self.relative_offset(item.idx, item.direction, owner_w, owner_h);
            let result = &mut self.unrounded[item.idx as usize];
            result.location = Point::new(x + dx, y + dy);
            result.baseline = (item.align == Align::Baseline).then_some(item.ascent - item.margin.y0);
        }

        // Absolute children.
        let containing = ContainingBox {
            size,
            border,
            padding_border: pb,
            direction,
            main_axis,
            cross_axis,
            justify: style.justify_content(),
            align_items,
        };
        for child in absolute {
            self.layout_absolute(child, &containing, ctx);
        }

        size
    }

    fn flex_item(
        &self,
        idx: u32,
        direction: Direction,
        main_axis: FlexDirection,
        cross_axis: FlexDirection,
        (owner_w, owner_h): (OptionalScalar, OptionalScalar),
        align_items: Align,
    ) -> FlexItem {
        let style = &self.style[idx as usize];
        let child_direction = style.direction().resolve(direction);
        let margin = resolve_insets(style.margin_edges(), child_direction, owner_w);
        let padding = non_negative(resolve_insets(
            style.padding_edges(),
            child_direction,
            owner_w,
        ));
        let border = non_negative(resolve_insets(
            style.border_edges(),
            child_direction,
            OptionalScalar::UNDEFINED,
        ));
        let pb = sum_insets(padding, border);
        let is_auto = |edge| style.margin_edges().resolve(edge, child_direction).is_auto();

        let align = match style.align_self() {
            Align::Auto => align_items,
            align => align,
        };
        let align = match align {
            Align::Baseline if !main_axis.is_row() => Align::FlexStart,
            Align::Auto | Align::SpaceBetween | Align::SpaceAround | Align::SpaceEvenly => {
                Align::FlexStart
            }
            align => align,
        };

        let (owner_main, owner_cross) = if main_axis.is_row() {
            (owner_w, owner_h)
        } else {
            (owner_h, owner_w)
        };
        let cross_dimension = cross_axis.dimension();

        FlexItem {
            idx,
            direction: child_direction,
            margin,
            auto_main: (
                is_auto(main_axis.leading_edge()),
                is_auto(main_axis.trailing_edge()),
            ),
            auto_cross: (
                is_auto(cross_axis.leading_edge()),
                is_auto(cross_axis.trailing_edge()),
            ),
            align,
            grow: style.resolved_flex_grow(),
            shrink: style.resolved_flex_shrink(self.config.use_web_defaults),
            basis: 0.0,
            main_bounds: AxisBounds::of(
                style,
                main_axis.dimension(),
                owner_main,
                axis_total(&pb, main_axis),
            ),
            cross_bounds: AxisBounds::of(
                style,
                cross_dimension,
                owner_cross,
                axis_total(&pb, cross_axis),
            ),
            definite_cross: style.dimension(cross_dimension).resolve(owner_cross).is_defined()
                || style.resolved_aspect_ratio().is_some(),
            hypothetical: 0.0,
            target: 0.0,
            frozen: false,
            violation: 0.0,
            cross: 0.0,
            ascent: 0.0,
            main_pos: 0.0,
            cross_pos: 0.0,
        }
    }

    /// Baseline of a child from its capability, falling back to its height.
    fn child_baseline(&self, idx: u32, size: Size) -> f64 {
        match &self.baseline[idx as usize] {
            Some(f) => f.call(self.handle(idx), size.width, size.height),
            None => size.height,
        }
    }

    /// Offset applied to a relatively positioned node. Left and top win over
    /// right and bottom.
    pub(crate) fn relative_offset(
        &self,
        idx: u32,
        direction: Direction,
        owner_w: OptionalScalar,
        owner_h: OptionalScalar,
    ) -> (f64, f64) {
        let style = &self.style[idx as usize];
        if style.position_type() != PositionType::Relative {
            return (0.0, 0.0);
        }
        let position = style.position_edges();
        let inset = |lead: Edge, trail: Edge, reference: OptionalScalar| {
            match (
                position.resolve_value(lead, direction, reference).get(),
                position.resolve_value(trail, direction, reference).get(),
            ) {
                (Some(v), _) => v,
                (None, Some(v)) => -v,
                (None, None) => 0.0,
            }
        };
        (
            inset(Edge::Left, Edge::Right, owner_w),
            inset(Edge::Top, Edge::Bottom, owner_h),
        )
    }

    fn layout_absolute(&mut self, idx: u32, parent: &ContainingBox, ctx: &mut PassContext<'_, '_>) {
        let style = self.style[idx as usize];
        let direction = style.direction().resolve(parent.direction);
        let padding_w = (parent.size.width - parent.border.x0 - parent.border.x1).max(0.0);
        let padding_h = (parent.size.height - parent.border.y0 - parent.border.y1).max(0.0);
        let (ref_w, ref_h) = (OptionalScalar::new(padding_w), OptionalScalar::new(padding_h));
        let margin = resolve_insets(style.margin_edges(), direction, ref_w);
        let position = style.position_edges();
        let left = position.resolve_value(Edge::Left, direction, ref_w).get();
        let right = position.resolve_value(Edge::Right, direction, ref_w).get();
        let top = position.resolve_value(Edge::Top, direction, ref_h).get();
        let bottom = position.resolve_value(Edge::Bottom, direction, ref_h).get();
        let (margin_w, margin_h) = (margin.x0 + margin.x1, margin.y0 + margin.y1);

        let mut width = style.dimension(Dimension::Width).resolve(ref_w).get();
        let mut height = style.dimension(Dimension::Height).resolve(ref_h).get();
        if width.is_none()
            && let (Some(l), Some(r)) = (left, right)
        {
            width = Some((padding_w - l - r - margin_w).max(0.0));
        }
        if height.is_none()
            && let (Some(t), Some(b)) = (top, bottom)
        {
            height = Some((padding_h - t - b - margin_h).max(0.0));
        }
        if let Some(ratio) = style.resolved_aspect_ratio() {
            match (width, height) {
                (Some(w), None) => height = Some(w / ratio),
                (None, Some(h)) => width = Some(h * ratio),
                _ => {}
            }
        }

        let c = Constraints {
            width: width.map_or(
                AvailableSpace::AtMost((padding_w - margin_w).max(0.0)),
                AvailableSpace::Exactly,
            ),
            height: height.map_or(AvailableSpace::Undefined, AvailableSpace::Exactly),
            owner_width: ref_w,
            owner_height: ref_h,
            direction: parent.direction,
        };
        let size = self.layout_node(idx, c, true, ctx);

        let align = match style.align_self() {
            Align::Auto => parent.align_items,
            align => align,
        };
        let x = match (left, right) {
            (Some(l), _) => parent.border.x0 + l + margin.x0,
            (None, Some(r)) => parent.size.width - parent.border.x1 - r - margin.x1 - size.width,
            (None, None) => absolute_flow_offset(parent, true, size.width, &margin, align),
        };
        let y = match (top, bottom) {
            (Some(t), _) => parent.border.y0 + t + margin.y0,
            (None, Some(b)) => parent.size.height - parent.border.y1 - b - margin.y1 - size.height,
            (None, None) => absolute_flow_offset(parent, false, size.height, &margin, align),
        };
        self.unrounded[idx as usize].location = Point::new(x, y);
    }

    /// Resets the working layout of a hidden subtree and cleans it.
    pub(crate) fn zero_subtree(&mut self, idx: u32) {
        let mut stack = Vec::new();
        stack.push(idx);
        while let Some(n) = stack.pop() {
            let i = n as usize;
            self.unrounded[i] = LayoutResult::ZERO;
            self.dirty[i] = false;
            self.cache[i].clear();
            let mut child = self.first_child[i];
            while child != INVALID {
                stack.push(child);
                child = self.next_sibling[child as usize];
            }
        }
    }
}

/// Cross-axis space offered when measuring an item.
///
/// Stretched items in a container with a definite cross size are measured at
/// that size when `allow_exact` is set; everything else gets an upper bound,
/// or no bound at all inside a scrolling container.
fn cross_measure_space(
    item: &FlexItem,
    inner_cross: AvailableSpace,
    cross_axis: FlexDirection,
    allow_exact: bool,
    scroll: bool,
) -> AvailableSpace {
    let margin = axis_total(&item.margin, cross_axis);
    match inner_cross {
        AvailableSpace::Exactly(v) if allow_exact && item.stretches() => {
            AvailableSpace::Exactly((v - margin).max(0.0))
        }
        _ if scroll => AvailableSpace::Undefined,
        AvailableSpace::Exactly(v) | AvailableSpace::AtMost(v) => {
            AvailableSpace::AtMost((v - margin).max(0.0))
        }
        AvailableSpace::Undefined => AvailableSpace::Undefined,
    }
}

/// Offset of an absolute child without insets on one physical axis, from the
/// container's justification (main axis) or the child's alignment (cross).
fn absolute_flow_offset(
    parent: &ContainingBox,
    horizontal: bool,
    child: f64,
    margin: &Insets,
    align: Align,
) -> f64 {
    let is_main = parent.main_axis.is_row() == horizontal;
    let axis = if is_main {
        parent.main_axis
    } else {
        parent.cross_axis
    };
    let placement = if is_main {
        match parent.justify {
            Justify::Center => Placement::Center,
            Justify::FlexEnd => Placement::End,
            _ => Placement::Start,
        }
    } else {
        match align {
            Align::Center => Placement::Center,
            Align::FlexEnd => Placement::End,
            _ => Placement::Start,
        }
    };
    let container = if horizontal {
        parent.size.width
    } else {
        parent.size.height
    };
    let lead_pb = leading(&parent.padding_border, axis);
    let trail_pb = trailing(&parent.padding_border, axis);
    let lead_margin = leading(margin, axis);
    let trail_margin = trailing(margin, axis);
    let from_leading = match placement {
        Placement::Start => lead_pb + lead_margin,
        Placement::Center => {
            lead_pb
                + (container - lead_pb - trail_pb - child - lead_margin - trail_margin) / 2.0
                + lead_margin
        }
        Placement::End => container - trail_pb - trail_margin - child,
    };
    if axis.is_reverse() {
        container - from_leading - child
    } else {
        from_leading
    }
}
