// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measurement and baseline capabilities.
//!
//! Leaf content the engine cannot size on its own (text, images, native
//! widgets) is sized by a host-provided [`MeasureFunction`]. A
//! [`BaselineFunction`] reports where a node's first baseline sits for
//! `Align::Baseline`. Both are optional per node and cheap to clone.

use alloc::rc::Rc;
use core::fmt;

use kurbo::Size;

use super::id::NodeId;
use crate::layout::AvailableSpace;

/// Sizes a leaf node's content.
///
/// Called with the node and the available content-box width and height,
/// each carrying its [`MeasureMode`](crate::layout::MeasureMode). Returns the
/// content size; negative or NaN components are treated as zero.
///
/// A measure function may only be attached to a childless node.
#[derive(Clone)]
pub struct MeasureFunction(Rc<dyn Fn(NodeId, AvailableSpace, AvailableSpace) -> Size>);

impl MeasureFunction {
    /// Wraps a closure.
    pub fn new(f: impl Fn(NodeId, AvailableSpace, AvailableSpace) -> Size + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub(crate) fn call(&self, node: NodeId, width: AvailableSpace, height: AvailableSpace) -> Size {
        let size = (self.0)(node, width, height);
        Size::new(sanitize(size.width), sanitize(size.height))
    }
}

impl fmt::Debug for MeasureFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeasureFunction").finish_non_exhaustive()
    }
}

/// Reports a node's baseline.
///
/// Called with the node and its laid-out border-box width and height; returns
/// the baseline offset from the node's top edge.
#[derive(Clone)]
pub struct BaselineFunction(Rc<dyn Fn(NodeId, f64, f64) -> f64>);

impl BaselineFunction {
    /// Wraps a closure.
    pub fn new(f: impl Fn(NodeId, f64, f64) -> f64 + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub(crate) fn call(&self, node: NodeId, width: f64, height: f64) -> f64 {
        let baseline = (self.0)(node, width, height);
        if baseline.is_finite() { baseline } else { height }
    }
}

impl fmt::Debug for BaselineFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaselineFunction").finish_non_exhaustive()
    }
}

fn sanitize(v: f64) -> f64 {
    if v.is_nan() || v < 0.0 { 0.0 } else { v }
}
