// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recoverable errors reported by the node store and style setters.
//!
//! Contract violations (stale handles, attaching a node that already has a
//! parent, creating a cycle) are programming errors and panic instead.

use core::fmt;

/// Errors returned by fallible tree and style operations.
///
/// Every operation returning a `LayoutError` leaves the tree untouched when it
/// fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayoutError {
    /// A style setter received a value outside the property's domain.
    InvalidPropertyValue {
        /// Name of the rejected property.
        property: &'static str,
    },
    /// A measure function was attached to a node with children, or a child
    /// was attached to a node with a measure function.
    MeasureFunctionConflict,
    /// The tree was accessed from inside a callback of an active layout pass.
    ReentrantLayout,
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPropertyValue { property } => {
                write!(f, "invalid value for style property `{property}`")
            }
            Self::MeasureFunctionConflict => {
                write!(f, "measure functions are only allowed on childless nodes")
            }
            Self::ReentrantLayout => write!(f, "layout tree accessed during an active layout pass"),
        }
    }
}

impl core::error::Error for LayoutError {}
