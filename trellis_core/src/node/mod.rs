// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout tree data model.
//!
//! A *node* is a box in a layout tree. Each node has:
//!
//! - An identity ([`NodeId`]), a generational handle that becomes stale when
//!   the node is destroyed, preventing use-after-free bugs at the API level.
//! - Topology: parent, first/last-child, and sibling links forming an ordered
//!   tree.
//! - **Inputs** set by the caller: a [`Style`](crate::style::Style), and
//!   optionally a [`MeasureFunction`] (leaves only) and a
//!   [`BaselineFunction`].
//! - **Computed results** produced by
//!   [`compute_layout`](NodeStore::compute_layout): a published, rounded
//!   [`LayoutResult`](crate::layout::LayoutResult), the has-new-layout flag,
//!   and the per-node [`LayoutCache`](crate::layout::LayoutCache).
//!
//! Nodes are stored in struct-of-arrays layout with index-based handles
//! for cache-friendly traversal.
//!
//! # Dirty tracking
//!
//! Any mutation that can change layout sets the node's dirty flag, clears its
//! cache and propagates both to ancestors. The reason for the change is also
//! recorded in a [`dirty`](crate::dirty) channel:
//!
//! - **STYLE**: a style mutation that changed at least one property.
//! - **MEASURE**: an explicit [`mark_dirty`](NodeStore::mark_dirty) or a
//!   capability change.
//! - **TOPOLOGY**: structural changes (insert/remove child, create/destroy
//!   node).

mod id;
mod measure;
mod store;
mod traverse;

pub use id::{INVALID, NodeId};
pub use measure::{BaselineFunction, MeasureFunction};
pub use store::NodeStore;
pub use traverse::{Children, DepthFirst};

pub(crate) use store::RootRequest;
