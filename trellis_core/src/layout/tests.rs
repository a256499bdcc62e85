// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scenario tests for whole layout passes.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use kurbo::Size;

use super::AvailableSpace;
use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::node::{BaselineFunction, MeasureFunction, NodeId, NodeStore};
use crate::style::{
    Align, Dimension, Direction, Display, Edge, FlexDirection, FlexWrap, Justify, PositionType,
    Style,
};
use crate::value::Length;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn node(
    store: &mut NodeStore,
    f: impl FnOnce(&mut Style) -> Result<(), LayoutError>,
) -> NodeId {
    let id = store.create_node();
    store.update_style(id, f).unwrap();
    id
}

fn child(
    store: &mut NodeStore,
    parent: NodeId,
    f: impl FnOnce(&mut Style) -> Result<(), LayoutError>,
) -> NodeId {
    let id = node(store, f);
    store.add_child(parent, id).unwrap();
    id
}

fn set_size(s: &mut Style, width: f64, height: f64) -> Result<(), LayoutError> {
    s.set_dimension(Dimension::Width, Length::Points(width))?;
    s.set_dimension(Dimension::Height, Length::Points(height))
}

fn row(s: &mut Style, width: f64, height: f64) -> Result<(), LayoutError> {
    s.set_flex_direction(FlexDirection::Row);
    set_size(s, width, height)
}

/// `(x, y, width, height)` of the published layout.
fn frame(store: &NodeStore, id: NodeId) -> (f64, f64, f64, f64) {
    let layout = store.layout(id);
    (
        layout.location.x,
        layout.location.y,
        layout.size.width,
        layout.size.height,
    )
}

fn counting_measure(size: Size) -> (MeasureFunction, Rc<Cell<u32>>) {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let f = MeasureFunction::new(move |_, _, _| {
        counter.set(counter.get() + 1);
        size
    });
    (f, calls)
}

fn layout(store: &mut NodeStore, root: NodeId) -> super::LayoutChanges {
    store.compute_layout(root, None, None, Direction::Ltr)
}

// ---------------------------------------------------------------------------
// Flexible lengths
// ---------------------------------------------------------------------------

#[test]
fn grow_splits_free_space_by_factor() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| row(s, 300.0, 100.0));
    let a = child(&mut store, root, |s| s.set_flex_grow(1.0));
    let b = child(&mut store, root, |s| s.set_flex_grow(2.0));
    layout(&mut store, root);

    assert_eq!(frame(&store, a), (0.0, 0.0, 100.0, 100.0));
    assert_eq!(frame(&store, b), (100.0, 0.0, 200.0, 100.0));
}

#[test]
fn shrink_splits_overflow_by_scaled_factor() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| row(s, 300.0, 50.0));
    let a = child(&mut store, root, |s| {
        s.set_dimension(Dimension::Width, Length::Points(200.0))?;
        s.set_flex_shrink(1.0)
    });
    let b = child(&mut store, root, |s| {
        s.set_dimension(Dimension::Width, Length::Points(200.0))?;
        s.set_flex_shrink(1.0)
    });
    layout(&mut store, root);

    assert_eq!(frame(&store, a), (0.0, 0.0, 150.0, 50.0));
    assert_eq!(frame(&store, b), (150.0, 0.0, 150.0, 50.0));
}

#[test]
fn native_defaults_do_not_shrink_but_web_defaults_do() {
    for (config, expected) in [(LayoutConfig::DEFAULT, 200.0), (LayoutConfig::web(), 150.0)] {
        let mut store = NodeStore::with_config(config);
        let root = node(&mut store, |s| row(s, 300.0, 50.0));
        let a = child(&mut store, root, |s| {
            s.set_dimension(Dimension::Width, Length::Points(200.0))
        });
        let _b = child(&mut store, root, |s| {
            s.set_dimension(Dimension::Width, Length::Points(200.0))
        });
        layout(&mut store, root);
        assert_eq!(
            store.layout(a).size.width,
            expected,
            "unexpected width with {config:?}"
        );
    }
}

#[test]
fn max_constraint_freezes_item_and_redistributes() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| row(s, 300.0, 10.0));
    let a = child(&mut store, root, |s| {
        s.set_flex_grow(1.0)?;
        s.set_max_dimension(Dimension::Width, Length::Points(50.0))
    });
    let b = child(&mut store, root, |s| s.set_flex_grow(1.0));
    layout(&mut store, root);

    assert_eq!(frame(&store, a), (0.0, 0.0, 50.0, 10.0));
    assert_eq!(frame(&store, b), (50.0, 0.0, 250.0, 10.0));
}

#[test]
fn min_constraint_stops_shrinking() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| row(s, 200.0, 10.0));
    let a = child(&mut store, root, |s| {
        s.set_dimension(Dimension::Width, Length::Points(200.0))?;
        s.set_min_dimension(Dimension::Width, Length::Points(150.0))?;
        s.set_flex_shrink(1.0)
    });
    let b = child(&mut store, root, |s| {
        s.set_dimension(Dimension::Width, Length::Points(200.0))?;
        s.set_flex_shrink(1.0)
    });
    layout(&mut store, root);

    assert_eq!(store.layout(a).size.width, 150.0);
    assert_eq!(store.layout(b).size.width, 50.0);
}

#[test]
fn flex_shorthand_sets_zero_basis() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| row(s, 300.0, 10.0));
    let a = child(&mut store, root, |s| {
        s.set_dimension(Dimension::Width, Length::Points(100.0))?;
        s.set_flex(1.0)
    });
    let b = child(&mut store, root, |s| s.set_flex(1.0));
    layout(&mut store, root);

    // Both bases are zero, so the width of `a` is ignored.
    assert_eq!(store.layout(a).size.width, 150.0);
    assert_eq!(store.layout(b).size.width, 150.0);
}

#[test]
fn percentages_resolve_against_parent() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| row(s, 200.0, 100.0));
    let a = child(&mut store, root, |s| {
        s.set_dimension(Dimension::Width, Length::Percent(50.0))?;
        s.set_dimension(Dimension::Height, Length::Percent(25.0))
    });
    layout(&mut store, root);

    assert_eq!(frame(&store, a), (0.0, 0.0, 100.0, 25.0));
}

// ---------------------------------------------------------------------------
// Justification and alignment
// ---------------------------------------------------------------------------

#[test]
fn space_between_distributes_gaps() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| {
        s.set_justify_content(Justify::SpaceBetween);
        row(s, 300.0, 10.0)
    });
    let widths = [100.0, 80.0, 80.0];
    let kids: Vec<_> = widths
        .iter()
        .map(|w| child(&mut store, root, |s| s.set_dimension(Dimension::Width, Length::Points(*w))))
        .collect();
    layout(&mut store, root);

    let xs: Vec<_> = kids.iter().map(|k| store.layout(*k).location.x).collect();
    assert_eq!(xs, [0.0, 120.0, 220.0]);
}

#[test]
fn justify_variants() {
    let cases = [
        (Justify::FlexStart, [0.0, 60.0]),
        (Justify::Center, [90.0, 150.0]),
        (Justify::FlexEnd, [180.0, 240.0]),
        (Justify::SpaceAround, [45.0, 195.0]),
        (Justify::SpaceEvenly, [60.0, 180.0]),
    ];
    for (justify, expected) in cases {
        let mut store = NodeStore::new();
        let root = node(&mut store, |s| {
            s.set_justify_content(justify);
            row(s, 300.0, 10.0)
        });
        let a = child(&mut store, root, |s| s.set_dimension(Dimension::Width, Length::Points(60.0)));
        let b = child(&mut store, root, |s| s.set_dimension(Dimension::Width, Length::Points(60.0)));
        layout(&mut store, root);
        assert_eq!(
            [store.layout(a).location.x, store.layout(b).location.x],
            expected,
            "positions for {justify:?}"
        );
    }
}

#[test]
fn single_item_space_between_packs_to_start() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| {
        s.set_justify_content(Justify::SpaceBetween);
        row(s, 300.0, 10.0)
    });
    let a = child(&mut store, root, |s| s.set_dimension(Dimension::Width, Length::Points(60.0)));
    layout(&mut store, root);
    assert_eq!(store.layout(a).location.x, 0.0);
}

#[test]
fn auto_margins_absorb_free_space() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| {
        s.set_justify_content(Justify::FlexEnd);
        row(s, 300.0, 100.0)
    });
    let a = child(&mut store, root, |s| {
        set_size(s, 100.0, 20.0)?;
        s.set_margin(Edge::Left, Length::Auto)?;
        s.set_margin(Edge::Right, Length::Auto)?;
        s.set_margin(Edge::Vertical, Length::Auto)
    });
    layout(&mut store, root);

    // Auto margins center the item on both axes and override justification.
    assert_eq!(frame(&store, a), (100.0, 40.0, 100.0, 20.0));
}

#[test]
fn stretch_fills_cross_axis_minus_margins() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| set_size(s, 200.0, 100.0));
    let a = child(&mut store, root, |s| {
        s.set_dimension(Dimension::Height, Length::Points(20.0))?;
        s.set_margin(Edge::Left, Length::Points(10.0))
    });
    let b = child(&mut store, root, |s| {
        s.set_align_self(Align::Center);
        set_size(s, 50.0, 20.0)
    });
    let c = child(&mut store, root, |s| {
        s.set_align_self(Align::FlexEnd);
        set_size(s, 50.0, 20.0)
    });
    layout(&mut store, root);

    assert_eq!(frame(&store, a), (10.0, 0.0, 190.0, 20.0));
    assert_eq!(frame(&store, b), (75.0, 20.0, 50.0, 20.0));
    assert_eq!(frame(&store, c), (150.0, 40.0, 50.0, 20.0));
}

#[test]
fn min_size_beyond_available_space_is_used_for_placement() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| {
        s.set_align_items(Align::Center);
        set_size(s, 100.0, 100.0)
    });
    let a = child(&mut store, root, |s| {
        s.set_min_dimension(Dimension::Width, Length::Points(150.0))?;
        s.set_dimension(Dimension::Height, Length::Points(10.0))
    });
    layout(&mut store, root);

    // Overflows both sides equally.
    assert_eq!(frame(&store, a), (-25.0, 0.0, 150.0, 10.0));
}

#[test]
fn baseline_alignment_lines_up_baselines() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| {
        s.set_align_items(Align::Baseline);
        row(s, 200.0, 100.0)
    });
    let a = child(&mut store, root, |s| set_size(s, 20.0, 40.0));
    let b = child(&mut store, root, |s| set_size(s, 20.0, 20.0));
    store.set_baseline_function(a, Some(BaselineFunction::new(|_, _, _| 30.0)));
    layout(&mut store, root);

    assert_eq!(frame(&store, a), (0.0, 0.0, 20.0, 40.0));
    assert_eq!(frame(&store, b), (20.0, 10.0, 20.0, 20.0));
    assert_eq!(store.layout(a).baseline, Some(30.0));
    assert_eq!(store.layout(b).baseline, Some(20.0));
}

#[test]
fn baseline_alignment_survives_wrap_reverse() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| {
        s.set_flex_direction(FlexDirection::Row);
        s.set_flex_wrap(FlexWrap::WrapReverse);
        s.set_align_items(Align::Baseline);
        s.set_dimension(Dimension::Width, Length::Points(100.0))
    });
    let a = child(&mut store, root, |s| set_size(s, 20.0, 40.0));
    let b = child(&mut store, root, |s| set_size(s, 20.0, 20.0));
    store.set_baseline_function(a, Some(BaselineFunction::new(|_, _, _| 30.0)));
    store.set_baseline_function(b, Some(BaselineFunction::new(|_, _, _| 10.0)));
    layout(&mut store, root);

    assert_eq!(store.layout(root).size.height, 40.0);
    assert_eq!(frame(&store, a), (0.0, 0.0, 20.0, 40.0));
    assert_eq!(frame(&store, b), (20.0, 20.0, 20.0, 20.0));
    let baseline_y = |id| {
        let layout = store.layout(id);
        layout.location.y + layout.baseline.unwrap_or(f64::NAN)
    };
    assert_eq!(baseline_y(a), baseline_y(b));
}

#[test]
fn baseline_in_column_falls_back_to_flex_start() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| {
        s.set_align_items(Align::Baseline);
        set_size(s, 200.0, 100.0)
    });
    let a = child(&mut store, root, |s| set_size(s, 20.0, 40.0));
    layout(&mut store, root);
    assert_eq!(frame(&store, a), (0.0, 0.0, 20.0, 40.0));
    assert_eq!(store.layout(a).baseline, None);
}

// ---------------------------------------------------------------------------
// Wrapping
// ---------------------------------------------------------------------------

#[test]
fn wrap_breaks_lines_and_sizes_container() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| {
        s.set_flex_direction(FlexDirection::Row);
        s.set_flex_wrap(FlexWrap::Wrap);
        s.set_dimension(Dimension::Width, Length::Points(100.0))
    });
    let kids: Vec<_> = (0..3)
        .map(|_| child(&mut store, root, |s| set_size(s, 40.0, 20.0)))
        .collect();
    layout(&mut store, root);

    assert_eq!(frame(&store, kids[0]), (0.0, 0.0, 40.0, 20.0));
    assert_eq!(frame(&store, kids[1]), (40.0, 0.0, 40.0, 20.0));
    assert_eq!(frame(&store, kids[2]), (0.0, 20.0, 40.0, 20.0));
    assert_eq!(store.layout(root).size, Size::new(100.0, 40.0));
}

#[test]
fn wrap_reverse_stacks_lines_from_the_cross_end() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| {
        s.set_flex_direction(FlexDirection::Row);
        s.set_flex_wrap(FlexWrap::WrapReverse);
        s.set_dimension(Dimension::Width, Length::Points(100.0))
    });
    let kids: Vec<_> = (0..3)
        .map(|_| child(&mut store, root, |s| set_size(s, 40.0, 20.0)))
        .collect();
    layout(&mut store, root);

    assert_eq!(store.layout(kids[0]).location.y, 20.0);
    assert_eq!(store.layout(kids[2]).location.y, 0.0);
}

#[test]
fn align_content_places_lines() {
    let cases = [
        (Align::FlexStart, [0.0, 20.0]),
        (Align::Center, [30.0, 50.0]),
        (Align::FlexEnd, [60.0, 80.0]),
        (Align::SpaceBetween, [0.0, 80.0]),
        (Align::Stretch, [0.0, 50.0]),
    ];
    for (align, expected) in cases {
        let mut store = NodeStore::new();
        let root = node(&mut store, |s| {
            s.set_flex_wrap(FlexWrap::Wrap);
            s.set_align_content(align);
            row(s, 100.0, 100.0)
        });
        let kids: Vec<_> = (0..4)
            .map(|_| child(&mut store, root, |s| set_size(s, 50.0, 20.0)))
            .collect();
        layout(&mut store, root);
        assert_eq!(
            [store.layout(kids[0]).location.y, store.layout(kids[2]).location.y],
            expected,
            "line offsets for {align:?}"
        );
    }
}

// ---------------------------------------------------------------------------
// Directions
// ---------------------------------------------------------------------------

#[test]
fn rtl_flows_rows_from_the_right() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| row(s, 300.0, 50.0));
    let a = child(&mut store, root, |s| {
        s.set_dimension(Dimension::Width, Length::Points(100.0))?;
        s.set_margin(Edge::Start, Length::Points(10.0))
    });
    let b = child(&mut store, root, |s| s.set_dimension(Dimension::Width, Length::Points(50.0)));
    store.compute_layout(root, None, None, Direction::Rtl);

    assert_eq!(store.layout(a).location.x, 190.0);
    assert_eq!(store.layout(b).location.x, 140.0);
    assert_eq!(store.layout(a).direction, Direction::Rtl);
    assert_eq!(store.layout_margin(a, Edge::Start), 10.0);
    assert_eq!(store.layout_margin(a, Edge::Right), 10.0);
    assert_eq!(store.layout_margin(a, Edge::Left), 0.0);
}

#[test]
fn reversed_axes_mirror_positions() {
    let mut store = NodeStore::new();
    let column = node(&mut store, |s| {
        s.set_flex_direction(FlexDirection::ColumnReverse);
        set_size(s, 50.0, 300.0)
    });
    let a = child(&mut store, column, |s| s.set_dimension(Dimension::Height, Length::Points(100.0)));
    let b = child(&mut store, column, |s| s.set_dimension(Dimension::Height, Length::Points(50.0)));
    layout(&mut store, column);
    assert_eq!(store.layout(a).location.y, 200.0);
    assert_eq!(store.layout(b).location.y, 150.0);

    let row_root = node(&mut store, |s| {
        s.set_flex_direction(FlexDirection::RowReverse);
        set_size(s, 300.0, 50.0)
    });
    let c = child(&mut store, row_root, |s| s.set_dimension(Dimension::Width, Length::Points(100.0)));
    layout(&mut store, row_root);
    assert_eq!(store.layout(c).location.x, 200.0);
}

// ---------------------------------------------------------------------------
// Positioning
// ---------------------------------------------------------------------------

#[test]
fn relative_offsets_apply_and_static_ignores_insets() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| set_size(s, 100.0, 100.0));
    let rel = child(&mut store, root, |s| {
        s.set_position_type(PositionType::Relative);
        s.set_position(Edge::Left, Length::Points(10.0))?;
        s.set_position(Edge::Right, Length::Points(99.0))?;
        s.set_position(Edge::Bottom, Length::Points(5.0))?;
        set_size(s, 10.0, 10.0)
    });
    let stat = child(&mut store, root, |s| {
        s.set_position(Edge::Left, Length::Points(10.0))?;
        set_size(s, 10.0, 10.0)
    });
    layout(&mut store, root);

    assert_eq!(frame(&store, rel), (10.0, -5.0, 10.0, 10.0));
    assert_eq!(frame(&store, stat), (0.0, 10.0, 10.0, 10.0));
}

#[test]
fn absolute_children_use_insets_against_padding_box() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| {
        s.set_padding(Edge::All, Length::Points(10.0))?;
        s.set_border(Edge::All, Length::Points(2.0))?;
        set_size(s, 200.0, 200.0)
    });
    let in_flow = child(&mut store, root, |s| set_size(s, 30.0, 30.0));
    let leading = child(&mut store, root, |s| {
        s.set_position_type(PositionType::Absolute);
        s.set_position(Edge::Left, Length::Points(20.0))?;
        s.set_position(Edge::Top, Length::Points(30.0))?;
        set_size(s, 50.0, 40.0)
    });
    let trailing = child(&mut store, root, |s| {
        s.set_position_type(PositionType::Absolute);
        s.set_position(Edge::Right, Length::Points(10.0))?;
        s.set_position(Edge::Bottom, Length::Points(10.0))?;
        set_size(s, 50.0, 40.0)
    });
    let spanning = child(&mut store, root, |s| {
        s.set_position_type(PositionType::Absolute);
        s.set_position(Edge::Left, Length::Points(10.0))?;
        s.set_position(Edge::Right, Length::Points(10.0))?;
        s.set_dimension(Dimension::Height, Length::Points(5.0))
    });
    layout(&mut store, root);

    assert_eq!(frame(&store, in_flow), (12.0, 12.0, 30.0, 30.0));
    assert_eq!(frame(&store, leading), (22.0, 32.0, 50.0, 40.0));
    assert_eq!(frame(&store, trailing), (138.0, 148.0, 50.0, 40.0));
    assert_eq!(frame(&store, spanning), (12.0, 12.0, 176.0, 5.0));
}

#[test]
fn absolute_children_without_insets_follow_alignment() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| {
        s.set_justify_content(Justify::Center);
        s.set_align_items(Align::FlexEnd);
        s.set_padding(Edge::All, Length::Points(10.0))?;
        set_size(s, 200.0, 200.0)
    });
    let abs = child(&mut store, root, |s| {
        s.set_position_type(PositionType::Absolute);
        set_size(s, 50.0, 40.0)
    });
    layout(&mut store, root);

    // Column container: justify centers vertically, align-items pushes right.
    assert_eq!(frame(&store, abs), (140.0, 80.0, 50.0, 40.0));
}

#[test]
fn display_none_removes_item_from_flow() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| row(s, 300.0, 10.0));
    let hidden = child(&mut store, root, |s| s.set_dimension(Dimension::Width, Length::Points(100.0)));
    let shown = child(&mut store, root, |s| s.set_dimension(Dimension::Width, Length::Points(100.0)));
    layout(&mut store, root);
    assert_eq!(store.layout(shown).location.x, 100.0);

    store.clear_has_new_layout(hidden);
    store
        .update_style(hidden, |s| {
            s.set_display(Display::None);
            Ok(())
        })
        .unwrap();
    layout(&mut store, root);

    assert_eq!(store.layout(shown).location.x, 0.0);
    assert_eq!(store.layout(hidden).size, Size::ZERO);
    assert!(store.has_new_layout(hidden));
    assert!(!store.is_dirty(hidden));
}

#[test]
fn aspect_ratio_fills_undefined_axis() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| set_size(s, 200.0, 200.0));
    let a = child(&mut store, root, |s| {
        s.set_dimension(Dimension::Width, Length::Points(100.0))?;
        s.set_aspect_ratio(2.0)
    });
    layout(&mut store, root);
    assert_eq!(frame(&store, a), (0.0, 0.0, 100.0, 50.0));
}

#[test]
fn root_max_size_caps_content() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| {
        s.set_flex_direction(FlexDirection::Row);
        s.set_max_dimension(Dimension::Width, Length::Points(150.0))
    });
    let a = child(&mut store, root, |s| set_size(s, 100.0, 10.0));
    store.compute_layout(root, Some(300.0), Some(50.0), Direction::Ltr);
    assert_eq!(store.layout(root).size, Size::new(100.0, 50.0));
    assert_eq!(frame(&store, a), (0.0, 0.0, 100.0, 10.0));

    store
        .update_style(a, |s| s.set_dimension(Dimension::Width, Length::Points(200.0)))
        .unwrap();
    store.compute_layout(root, Some(300.0), Some(50.0), Direction::Ltr);
    assert_eq!(store.layout(root).size.width, 150.0);
}

#[test]
fn root_margins_offset_location() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| s.set_margin(Edge::All, Length::Points(5.0)));
    store.compute_layout(root, Some(100.0), Some(60.0), Direction::Ltr);
    assert_eq!(frame(&store, root), (5.0, 5.0, 90.0, 50.0));
}

// ---------------------------------------------------------------------------
// Measurement
// ---------------------------------------------------------------------------

#[test]
fn measure_function_sizes_leaf_with_padding() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| {
        s.set_flex_direction(FlexDirection::Row);
        s.set_align_items(Align::FlexStart);
        s.set_dimension(Dimension::Width, Length::Points(300.0))
    });
    let leaf = child(&mut store, root, |s| s.set_padding(Edge::All, Length::Points(5.0)));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let record = Rc::clone(&seen);
    store
        .set_measure_function(
            leaf,
            Some(MeasureFunction::new(move |_, w, h| {
                record.borrow_mut().push((w, h));
                Size::new(40.0, 10.0)
            })),
        )
        .unwrap();
    let changes = layout(&mut store, root);

    assert_eq!(frame(&store, leaf), (0.0, 0.0, 50.0, 20.0));
    assert_eq!(store.layout(root).size, Size::new(300.0, 20.0));
    assert_eq!(changes.measure_calls, 2);
    let seen = seen.borrow();
    assert_eq!(
        seen[0],
        (AvailableSpace::Undefined, AvailableSpace::Undefined),
        "flex basis is measured at max-content"
    );
    assert_eq!(
        seen[1],
        (AvailableSpace::Exactly(40.0), AvailableSpace::Undefined)
    );
}

#[test]
fn exact_leaves_skip_the_measure_function() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| set_size(s, 100.0, 100.0));
    let leaf = child(&mut store, root, |s| set_size(s, 10.0, 10.0));
    let (f, calls) = counting_measure(Size::new(99.0, 99.0));
    store.set_measure_function(leaf, Some(f)).unwrap();
    layout(&mut store, root);

    assert_eq!(calls.get(), 0);
    assert_eq!(store.layout(leaf).size, Size::new(10.0, 10.0));
}

// ---------------------------------------------------------------------------
// Incremental recompute
// ---------------------------------------------------------------------------

#[test]
fn unchanged_tree_is_not_laid_out_again() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| set_size(s, 200.0, 200.0));
    let leaf = child(&mut store, root, |_| Ok(()));
    let (f, calls) = counting_measure(Size::new(50.0, 20.0));
    store.set_measure_function(leaf, Some(f)).unwrap();

    let first = layout(&mut store, root);
    assert!(!first.skipped);
    assert!(first.topology_changed);
    assert_eq!(first.laid_out, [root.index(), leaf.index()]);
    assert_eq!(calls.get(), 1);

    let second = layout(&mut store, root);
    assert!(second.skipped);
    assert_eq!(second.measure_calls, 0);
    assert!(second.laid_out.is_empty());
    assert!(!second.topology_changed);
    assert_eq!(calls.get(), 1);

    store.mark_dirty(leaf);
    let third = layout(&mut store, root);
    assert!(!third.skipped);
    assert_eq!(third.invalidated, [leaf.index()]);
    assert_eq!(calls.get(), 2);
    assert!(third.laid_out.is_empty(), "geometry did not change");
}

#[test]
fn new_request_recomputes_clean_tree() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |_| Ok(()));
    let a = child(&mut store, root, |s| s.set_flex_grow(1.0));
    layout(&mut store, root);

    let changes = store.compute_layout(root, Some(80.0), Some(40.0), Direction::Ltr);
    assert!(!changes.skipped);
    assert_eq!(store.layout(a).size, Size::new(80.0, 40.0));
}

#[test]
fn dirty_propagation_is_local_to_the_mutated_path() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| set_size(s, 200.0, 200.0));
    let sibling = child(&mut store, root, |_| Ok(()));
    let (sibling_measure, sibling_calls) = counting_measure(Size::new(50.0, 20.0));
    store
        .set_measure_function(sibling, Some(sibling_measure))
        .unwrap();
    let outer = child(&mut store, root, |_| Ok(()));
    let inner = child(&mut store, outer, |_| Ok(()));
    let leaf = child(&mut store, inner, |_| Ok(()));
    let (leaf_measure, leaf_calls) = counting_measure(Size::new(30.0, 20.0));
    store.set_measure_function(leaf, Some(leaf_measure)).unwrap();
    layout(&mut store, root);

    for id in [root, sibling, outer, inner, leaf] {
        store.clear_has_new_layout(id);
    }
    let sibling_before = sibling_calls.get();
    let leaf_before = leaf_calls.get();

    store
        .update_style(leaf, |s| s.set_padding(Edge::All, Length::Points(5.0)))
        .unwrap();
    for id in [leaf, inner, outer, root] {
        assert!(store.is_dirty(id));
    }
    assert!(!store.is_dirty(sibling));

    let changes = layout(&mut store, root);
    assert_eq!(changes.restyled, [leaf.index()]);
    assert_eq!(sibling_calls.get(), sibling_before);
    assert!(leaf_calls.get() > leaf_before);
    assert!(!store.has_new_layout(sibling));
    for id in [leaf, inner, outer] {
        assert!(store.has_new_layout(id));
    }
    assert_eq!(store.layout(leaf).size.height, 30.0);
    assert!(changes.cache_hits > 0);
}

#[test]
fn clean_child_relayouts_when_percentage_reference_changes() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| row(s, 200.0, 100.0));
    let mid = child(&mut store, root, |s| {
        s.set_padding(Edge::Left, Length::Percent(10.0))?;
        set_size(s, 100.0, 100.0)
    });
    let leaf = child(&mut store, mid, |s| set_size(s, 10.0, 10.0));
    layout(&mut store, root);
    assert_eq!(store.layout_padding(mid, Edge::Left), 20.0);
    assert_eq!(store.layout(leaf).location.x, 20.0);

    store
        .update_style(root, |s| s.set_dimension(Dimension::Width, Length::Points(400.0)))
        .unwrap();
    assert!(!store.is_dirty(mid));
    layout(&mut store, root);

    assert_eq!(store.layout(mid).size, Size::new(100.0, 100.0));
    assert_eq!(store.layout_padding(mid, Edge::Left), 40.0);
    assert_eq!(store.layout(leaf).location.x, 40.0);
}

#[test]
fn config_change_forces_relayout() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| row(s, 100.0, 10.0));
    let kids: Vec<_> = (0..3)
        .map(|_| child(&mut store, root, |s| s.set_flex_grow(1.0)))
        .collect();
    layout(&mut store, root);
    assert_eq!(store.layout(kids[0]).size.width, 33.0);

    store.set_config(LayoutConfig::DEFAULT.with_point_scale_factor(0.0));
    let changes = layout(&mut store, root);
    assert!(!changes.skipped);
    assert_eq!(store.layout(kids[0]).size.width, 100.0 / 3.0);
}

// ---------------------------------------------------------------------------
// Rounding
// ---------------------------------------------------------------------------

#[test]
fn rounding_keeps_adjacent_edges_flush() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| row(s, 100.0, 10.0));
    let kids: Vec<_> = (0..3)
        .map(|_| child(&mut store, root, |s| s.set_flex_grow(1.0)))
        .collect();
    layout(&mut store, root);

    let frames: Vec<_> = kids.iter().map(|k| frame(&store, *k)).collect();
    assert_eq!(frames[0], (0.0, 0.0, 33.0, 10.0));
    assert_eq!(frames[1], (33.0, 0.0, 34.0, 10.0));
    assert_eq!(frames[2], (67.0, 0.0, 33.0, 10.0));
    for pair in frames.windows(2) {
        assert_eq!(pair[0].0 + pair[0].2, pair[1].0, "boxes must touch");
    }
}

#[test]
fn rounding_uses_point_scale_factor() {
    let mut store = NodeStore::with_config(LayoutConfig::DEFAULT.with_point_scale_factor(2.0));
    let root = node(&mut store, |s| row(s, 100.0, 10.0));
    let kids: Vec<_> = (0..3)
        .map(|_| child(&mut store, root, |s| s.set_flex_grow(1.0)))
        .collect();
    layout(&mut store, root);

    let widths: Vec<_> = kids.iter().map(|k| store.layout(*k).size.width).collect();
    assert_eq!(widths, [33.5, 33.0, 33.5]);
}

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

#[test]
#[should_panic(expected = "stale NodeId")]
fn layout_of_destroyed_root_panics() {
    let mut store = NodeStore::new();
    let root = store.create_node();
    store.destroy_node(root);
    layout(&mut store, root);
}

#[test]
fn removed_child_can_be_laid_out_as_root() {
    let mut store = NodeStore::new();
    let root = node(&mut store, |s| set_size(s, 100.0, 100.0));
    let a = child(&mut store, root, |s| s.set_flex_grow(1.0));
    layout(&mut store, root);
    assert_eq!(store.layout(a).size, Size::new(100.0, 100.0));

    assert!(store.remove_child(root, a));
    assert_eq!(store.layout(a).size, Size::ZERO);
    store.compute_layout(a, Some(40.0), Some(30.0), Direction::Ltr);
    assert_eq!(frame(&store, a), (0.0, 0.0, 40.0, 30.0));
}

#[cfg(feature = "trace")]
#[test]
fn tracer_reports_pass_events() {
    use crate::trace::{LayoutSummary, LayoutTraceSink, MeasureEvent, Tracer};

    #[derive(Default)]
    struct Recorder {
        measured: Vec<u32>,
        summaries: Vec<LayoutSummary>,
    }
    impl LayoutTraceSink for Recorder {
        fn on_measure(&mut self, e: &MeasureEvent) {
            self.measured.push(e.node);
        }
        fn on_layout_end(&mut self, s: &LayoutSummary) {
            self.summaries.push(*s);
        }
    }

    let mut store = NodeStore::new();
    let root = node(&mut store, |s| set_size(s, 100.0, 100.0));
    let leaf = child(&mut store, root, |_| Ok(()));
    let (f, _) = counting_measure(Size::new(10.0, 10.0));
    store.set_measure_function(leaf, Some(f)).unwrap();

    let mut sink = Recorder::default();
    let mut tracer = Tracer::new(&mut sink);
    store.compute_layout_traced(root, None, None, Direction::Ltr, &mut tracer);
    store.compute_layout_traced(root, None, None, Direction::Ltr, &mut tracer);
    drop(tracer);

    assert_eq!(sink.measured, [leaf.index()]);
    assert_eq!(sink.summaries.len(), 2);
    assert!(!sink.summaries[0].skipped);
    assert!(sink.summaries[1].skipped);
}
