// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel-grid rounding and publication of working layouts.
//!
//! Positions and sizes are derived from rounded *absolute* edges rather than
//! rounded independently, so two boxes that touch before rounding still touch
//! afterwards.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Size};

use crate::node::{INVALID, NodeStore};

impl NodeStore {
    /// Rounds the working layout of the subtree at `root` and publishes it.
    ///
    /// Nodes whose published geometry changed get their has-new-layout flag
    /// set and are appended to `laid_out`.
    pub(crate) fn round_and_publish(&mut self, root: u32, laid_out: &mut Vec<u32>) {
        let scale = self.config.point_scale_factor;
        let rounds = self.config.rounds();
        let snap = |v: f64| {
            if rounds {
                (v * scale).round() / scale
            } else {
                v
            }
        };

        // (node, unrounded absolute origin of its parent)
        let mut stack = Vec::new();
        stack.push((root, Point::ZERO));
        while let Some((idx, parent_origin)) = stack.pop() {
            let i = idx as usize;
            let working = self.unrounded[i];
            let origin = parent_origin + working.location.to_vec2();
            let end = origin + working.size.to_vec2();

            let mut published = working;
            published.location = Point::new(
                snap(origin.x) - snap(parent_origin.x),
                snap(origin.y) - snap(parent_origin.y),
            );
            published.size = Size::new(snap(end.x) - snap(origin.x), snap(end.y) - snap(origin.y));
            published.baseline = working
                .baseline
                .map(|b| snap(origin.y + b) - snap(origin.y));

            if published.geometry_differs(&self.layout[i]) {
                self.has_new_layout[i] = true;
                laid_out.push(idx);
            }
            self.layout[i] = published;

            let mut child = self.first_child[i];
            while child != INVALID {
                stack.push((child, origin));
                child = self.next_sibling[child as usize];
            }
        }
    }
}
