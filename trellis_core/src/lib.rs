// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flexbox layout for trees of boxes.
//!
//! `trellis_core` computes the position and size of every node in a tree from
//! flexbox-style [`Style`](style::Style) properties. It is `no_std`
//! compatible (with `alloc`) and uses array-based struct-of-arrays storage
//! with index handles for cache-friendly traversal.
//!
//! # Architecture
//!
//! The crate is organized around an incremental layout pass:
//!
//! ```text
//!   style setters / insert_child / mark_dirty
//!       │  (dirty flag + cache invalidation up to the root)
//!       ▼
//!   NodeStore::compute_layout(root, width, height, direction)
//!       │
//!       ├──► flex layout (cache hits skip clean subtrees)
//!       ├──► rounding to the pixel grid
//!       └──► publication ──► LayoutChanges
//!                               │
//!                               ▼
//!                host reads layout(id) / layout_at(idx)
//! ```
//!
//! **[`node`]**: Struct-of-arrays node tree with generational handles.
//! Styles and capabilities (measure and baseline functions) are set by the
//! caller; layouts are computed by the layout pass.
//!
//! **[`style`]**: The closed set of layout properties, with domain-checked
//! setters and the default tables.
//!
//! **[`value`]**: [`Length`](value::Length) units and
//! [`OptionalScalar`](value::OptionalScalar), the engine's undefined-aware
//! number.
//!
//! **[`layout`]**: The flexbox algorithm, the per-node measurement cache, the
//! rounding pass and the published [`LayoutResult`](layout::LayoutResult).
//!
//! **[`dirty`]**: Change-tracking channels via `understory_dirty`, drained
//! into [`LayoutChanges`](layout::LayoutChanges) after every pass.
//!
//! **[`config`]**: Per-store [`LayoutConfig`](config::LayoutConfig).
//!
//! **[`shared`]**: [`SharedTree`](shared::SharedTree), a shared handle that
//! reports reentrant access from callbacks as an error.
//!
//! **[`trace`]**: [`LayoutTraceSink`](trace::LayoutTraceSink) trait and event
//! types for layout instrumentation, with zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Example
//!
//! ```
//! use trellis_core::node::NodeStore;
//! use trellis_core::style::{Dimension, Direction, FlexDirection};
//! use trellis_core::value::Length;
//!
//! let mut store = NodeStore::new();
//! let root = store.create_node();
//! store
//!     .update_style(root, |s| {
//!         s.set_flex_direction(FlexDirection::Row);
//!         s.set_dimension(Dimension::Width, Length::Points(300.0))?;
//!         s.set_dimension(Dimension::Height, Length::Points(100.0))
//!     })
//!     .unwrap();
//!
//! let a = store.create_node();
//! let b = store.create_node();
//! store.update_style(a, |s| s.set_flex_grow(1.0)).unwrap();
//! store.update_style(b, |s| s.set_flex_grow(2.0)).unwrap();
//! store.add_child(root, a).unwrap();
//! store.add_child(root, b).unwrap();
//!
//! store.compute_layout(root, None, None, Direction::Ltr);
//! assert_eq!(store.layout(a).size.width, 100.0);
//! assert_eq!(store.layout(b).size.width, 200.0);
//! assert_eq!(store.layout(b).location.x, 100.0);
//! ```
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-node
//!   layout events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod config;
pub mod dirty;
pub mod error;
pub mod layout;
pub mod node;
pub mod shared;
pub mod style;
pub mod trace;
pub mod value;
