// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-store layout configuration.

use crate::style::Style;

/// Configuration shared by every node of a [`NodeStore`](crate::node::NodeStore).
///
/// Changing the configuration of a populated store marks every node dirty.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Device pixels per layout point used by the rounding pass.
    ///
    /// Published positions and sizes are snapped to multiples of
    /// `1 / point_scale_factor`. Zero (or any non-positive value) disables
    /// rounding and publishes the raw results.
    pub point_scale_factor: f64,
    /// Start new nodes from [`Style::WEB_DEFAULT`] and resolve unset shrink
    /// factors to 1, as CSS does.
    pub use_web_defaults: bool,
}

impl LayoutConfig {
    /// Rounding to whole points, native defaults.
    pub const DEFAULT: Self = Self {
        point_scale_factor: 1.0,
        use_web_defaults: false,
    };

    /// Rounding to whole points, web defaults.
    #[must_use]
    pub const fn web() -> Self {
        Self {
            use_web_defaults: true,
            ..Self::DEFAULT
        }
    }

    /// Returns a copy with a different rounding scale.
    #[must_use]
    pub const fn with_point_scale_factor(mut self, factor: f64) -> Self {
        self.point_scale_factor = factor;
        self
    }

    /// Returns `true` when the rounding pass runs.
    #[must_use]
    pub fn rounds(&self) -> bool {
        self.point_scale_factor > 0.0
    }

    /// The style table new nodes start from.
    #[must_use]
    pub const fn default_style(&self) -> Style {
        if self.use_web_defaults {
            Style::WEB_DEFAULT
        } else {
            Style::DEFAULT
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
