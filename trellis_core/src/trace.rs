// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for layout passes.
//!
//! This module provides a [`LayoutTraceSink`] trait with per-event methods
//! that the layout engine calls as a pass progresses. All method bodies default
//! to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn LayoutTraceSink`. When the `trace`
//! feature is **off**, every `Tracer` method compiles to nothing (zero
//! overhead). When **on**, each method performs a single `Option` branch
//! before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates the per-node [`NodeLayoutEvent`]
//!   and the corresponding `LayoutTraceSink` method.

use kurbo::Size;

use crate::layout::AvailableSpace;
use crate::style::Direction;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which cache slot satisfied a lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CacheKind {
    /// The full-layout slot.
    Layout,
    /// A size-only measurement slot.
    Measurement,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a layout pass starts.
#[derive(Clone, Copy, Debug)]
pub struct LayoutBeginEvent {
    /// Raw slot index of the root.
    pub root: u32,
    /// Available width given by the caller.
    pub available_width: Option<f64>,
    /// Available height given by the caller.
    pub available_height: Option<f64>,
    /// Direction inherited by the root.
    pub direction: Direction,
}

/// Emitted after a node was sized or laid out without a cache hit.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct NodeLayoutEvent {
    /// Raw slot index of the node.
    pub node: u32,
    /// Available width of the call.
    pub width: AvailableSpace,
    /// Available height of the call.
    pub height: AvailableSpace,
    /// Whether children were positioned (as opposed to a size-only call).
    pub perform_layout: bool,
    /// Resulting border-box size.
    pub size: Size,
}

/// Emitted after each measure-function invocation.
#[derive(Clone, Copy, Debug)]
pub struct MeasureEvent {
    /// Raw slot index of the measured leaf.
    pub node: u32,
    /// Width constraint passed to the function (content box).
    pub width: AvailableSpace,
    /// Height constraint passed to the function (content box).
    pub height: AvailableSpace,
    /// Size returned by the function, after sanitizing.
    pub size: Size,
}

/// Emitted when a cache lookup succeeds.
#[derive(Clone, Copy, Debug)]
pub struct CacheHitEvent {
    /// Raw slot index of the node.
    pub node: u32,
    /// Which slot matched.
    pub kind: CacheKind,
    /// Available width of the lookup.
    pub width: AvailableSpace,
    /// Available height of the lookup.
    pub height: AvailableSpace,
}

/// Per-pass summary, emitted when a layout pass ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutSummary {
    /// Raw slot index of the root.
    pub root: u32,
    /// Number of nodes whose published geometry changed.
    pub laid_out: usize,
    /// Measure-function invocations.
    pub measure_calls: u32,
    /// Cache hits.
    pub cache_hits: u32,
    /// Whether the pass was a no-op.
    pub skipped: bool,
}

// ---------------------------------------------------------------------------
// LayoutTraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the layout engine.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait LayoutTraceSink {
    /// Called when a layout pass starts.
    fn on_layout_begin(&mut self, e: &LayoutBeginEvent) {
        _ = e;
    }

    /// Called after each measure-function invocation.
    fn on_measure(&mut self, e: &MeasureEvent) {
        _ = e;
    }

    /// Called when a cache lookup succeeds.
    fn on_cache_hit(&mut self, e: &CacheHitEvent) {
        _ = e;
    }

    /// Called with the per-pass summary.
    fn on_layout_end(&mut self, s: &LayoutSummary) {
        _ = s;
    }

    /// Called for every node computed without a cache hit (requires
    /// `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_node_layout(&mut self, e: &NodeLayoutEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`LayoutTraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl LayoutTraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`LayoutTraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn LayoutTraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn LayoutTraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn LayoutTraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`LayoutBeginEvent`].
    #[inline]
    pub fn layout_begin(&mut self, e: &LayoutBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_layout_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`MeasureEvent`].
    #[inline]
    pub fn measure(&mut self, e: &MeasureEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_measure(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CacheHitEvent`].
    #[inline]
    pub fn cache_hit(&mut self, e: &CacheHitEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_cache_hit(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LayoutSummary`].
    #[inline]
    pub fn layout_end(&mut self, s: &LayoutSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_layout_end(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits a [`NodeLayoutEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn node_layout(&mut self, e: &NodeLayoutEvent) {
        if let Some(s) = &mut self.sink {
            s.on_node_layout(e);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
