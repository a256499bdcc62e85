// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation, topology, and style management.

use alloc::vec::Vec;

use understory_dirty::{CycleHandling, DirtyTracker};

use super::id::{INVALID, NodeId};
use super::measure::{BaselineFunction, MeasureFunction};
use super::traverse::{Children, DepthFirst};
use crate::config::LayoutConfig;
use crate::dirty;
use crate::error::LayoutError;
use crate::layout::{LayoutCache, LayoutResult};
use crate::style::{Edge, Style};

/// The arguments of the last completed layout pass, for no-op detection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct RootRequest {
    pub(crate) root: u32,
    pub(crate) width: Option<f64>,
    pub(crate) height: Option<f64>,
    pub(crate) direction: crate::style::Direction,
}

/// Struct-of-arrays storage for all nodes of one or more layout trees.
///
/// Nodes are addressed by [`NodeId`] handles. Internally, each node occupies
/// a slot in parallel arrays. Destroyed nodes are recycled via a free list,
/// and generation counters prevent stale handle access.
///
/// Every node starts dirty. Mutations that can change layout mark the node
/// dirty, clear its measurement cache and propagate dirtiness to ancestors;
/// [`compute_layout`](Self::compute_layout) cleans every node it lays out.
#[derive(Debug)]
pub struct NodeStore {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) last_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,
    pub(crate) child_count: Vec<u32>,

    // -- Inputs (set by callers) --
    pub(crate) style: Vec<Style>,
    pub(crate) measure: Vec<Option<MeasureFunction>>,
    pub(crate) baseline: Vec<Option<BaselineFunction>>,

    // -- Layout state (written by compute_layout) --
    pub(crate) unrounded: Vec<LayoutResult>,
    pub(crate) layout: Vec<LayoutResult>,
    pub(crate) cache: Vec<LayoutCache>,
    pub(crate) dirty: Vec<bool>,
    pub(crate) has_new_layout: Vec<bool>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Change tracking --
    pub(crate) tracker: DirtyTracker<u32>,

    // -- Configuration --
    pub(crate) config: LayoutConfig,
    pub(crate) last_request: Option<RootRequest>,
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeStore {
    /// Creates an empty node store with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::DEFAULT)
    }

    /// Creates an empty node store with the given configuration.
    #[must_use]
    pub fn with_config(config: LayoutConfig) -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            last_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            child_count: Vec::new(),
            style: Vec::new(),
            measure: Vec::new(),
            baseline: Vec::new(),
            unrounded: Vec::new(),
            layout: Vec::new(),
            cache: Vec::new(),
            dirty: Vec::new(),
            has_new_layout: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            tracker: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            config,
            last_request: None,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> LayoutConfig {
        self.config
    }

    /// Replaces the configuration and marks every live node dirty.
    ///
    /// Existing styles are kept; only nodes created afterwards start from the
    /// new configuration's default style table.
    pub fn set_config(&mut self, config: LayoutConfig) {
        self.config = config;
        for idx in 0..self.len {
            if !self.free_list.contains(&idx) {
                self.dirty[idx as usize] = true;
                self.cache[idx as usize].clear();
            }
        }
        self.last_request = None;
    }

    // -- Allocation API --

    /// Creates a new node and returns its handle.
    ///
    /// The node starts dirty, with the configuration's default style, no
    /// children, no capabilities and no parent.
    pub fn create_node(&mut self) -> NodeId {
        let style = self.config.default_style();
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            let i = idx as usize;
            self.generation[i] += 1;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.last_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.child_count[i] = 0;
            self.style[i] = style;
            self.measure[i] = None;
            self.baseline[i] = None;
            self.unrounded[i] = LayoutResult::ZERO;
            self.layout[i] = LayoutResult::ZERO;
            self.cache[i].clear();
            self.dirty[i] = true;
            self.has_new_layout[i] = false;
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.last_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.child_count.push(0);
            self.style.push(style);
            self.measure.push(None);
            self.baseline.push(None);
            self.unrounded.push(LayoutResult::ZERO);
            self.layout.push(LayoutResult::ZERO);
            self.cache.push(LayoutCache::default());
            self.dirty.push(true);
            self.has_new_layout.push(false);
            self.generation.push(0);
            idx
        };

        self.tracker.mark(idx, dirty::TOPOLOGY);
        self.handle(idx)
    }

    /// Destroys a node, freeing its slot for reuse.
    ///
    /// If the node is attached, it is detached first and its parent is marked
    /// dirty. Use [`destroy_subtree`](Self::destroy_subtree) to release a node
    /// together with its descendants.
    ///
    /// # Panics
    ///
    /// Panics if the node has children or if the handle is stale.
    pub fn destroy_node(&mut self, id: NodeId) {
        self.validate(id);
        let idx = id.idx;
        assert!(
            self.first_child[idx as usize] == INVALID,
            "cannot destroy node with children"
        );
        let p = self.parent[idx as usize];
        if p != INVALID {
            self.unlink_from_parent(idx);
            self.invalidate(p);
            self.tracker.mark(p, dirty::TOPOLOGY);
        }
        self.release(idx);
    }

    /// Destroys a node and all of its descendants.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn destroy_subtree(&mut self, id: NodeId) {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        if p != INVALID {
            self.unlink_from_parent(id.idx);
            self.invalidate(p);
            self.tracker.mark(p, dirty::TOPOLOGY);
        }

        let mut stack = Vec::new();
        stack.push(id.idx);
        while let Some(idx) = stack.pop() {
            let mut child = self.first_child[idx as usize];
            while child != INVALID {
                stack.push(child);
                child = self.next_sibling[child as usize];
            }
            self.parent[idx as usize] = INVALID;
            self.first_child[idx as usize] = INVALID;
            self.last_child[idx as usize] = INVALID;
            self.next_sibling[idx as usize] = INVALID;
            self.prev_sibling[idx as usize] = INVALID;
            self.child_count[idx as usize] = 0;
            self.release(idx);
        }
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    // -- Topology API --

    /// Inserts `child` into `parent`'s child list at `index`.
    ///
    /// Marks `parent` (and its ancestors) dirty.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::MeasureFunctionConflict`] if `parent` has a
    /// measure function. Nothing is changed in that case.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, if `child` already has a parent, if
    /// `index` is past the end of the child list, or if `child` is `parent`
    /// or one of its ancestors.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), LayoutError> {
        self.validate(parent);
        self.validate(child);
        let p = parent.idx;
        let c = child.idx;
        if self.measure[p as usize].is_some() {
            return Err(LayoutError::MeasureFunctionConflict);
        }
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        assert!(
            index <= self.child_count[p as usize] as usize,
            "child index {index} out of range (count {})",
            self.child_count[p as usize]
        );
        let mut ancestor = p;
        while ancestor != INVALID {
            assert!(ancestor != c, "cannot insert a node into its own subtree");
            ancestor = self.parent[ancestor as usize];
        }

        // Find the sibling currently at `index`; INVALID means append.
        let mut next = self.first_child[p as usize];
        for _ in 0..index {
            next = self.next_sibling[next as usize];
        }
        let prev = if next == INVALID {
            self.last_child[p as usize]
        } else {
            self.prev_sibling[next as usize]
        };

        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = prev;
        self.next_sibling[c as usize] = next;
        if prev == INVALID {
            self.first_child[p as usize] = c;
        } else {
            self.next_sibling[prev as usize] = c;
        }
        if next == INVALID {
            self.last_child[p as usize] = c;
        } else {
            self.prev_sibling[next as usize] = c;
        }
        self.child_count[p as usize] += 1;

        if self.last_request.is_some_and(|r| r.root == c) {
            self.last_request = None;
        }
        self.invalidate(p);
        self.tracker.mark(p, dirty::TOPOLOGY);
        Ok(())
    }

    /// Appends `child` as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::MeasureFunctionConflict`] if `parent` has a
    /// measure function.
    ///
    /// # Panics
    ///
    /// As [`insert_child`](Self::insert_child).
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), LayoutError> {
        self.validate(parent);
        let count = self.child_count[parent.idx as usize] as usize;
        self.insert_child(parent, count, child)
    }

    /// Detaches `child` from `parent`.
    ///
    /// Returns `false` (and changes nothing) if `child` is not a child of
    /// `parent`. Otherwise the parent is marked dirty and the child's layout
    /// is reset and marked dirty, ready to be laid out as a root or attached
    /// elsewhere.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        self.validate(parent);
        self.validate(child);
        let p = parent.idx;
        let c = child.idx;
        if self.parent[c as usize] != p {
            return false;
        }
        self.unlink_from_parent(c);
        self.invalidate(p);
        self.unrounded[c as usize] = LayoutResult::ZERO;
        self.layout[c as usize] = LayoutResult::ZERO;
        self.invalidate(c);
        self.tracker.mark(p, dirty::TOPOLOGY);
        true
    }

    /// Returns the parent of a node, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        (p != INVALID).then(|| self.handle(p))
    }

    /// Returns an iterator over the direct children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns the number of direct children.
    #[must_use]
    pub fn child_count(&self, id: NodeId) -> usize {
        self.validate(id);
        self.child_count[id.idx as usize] as usize
    }

    /// Returns the child at `index`, if any.
    #[must_use]
    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).nth(index)
    }

    /// Returns a pre-order iterator over the subtree rooted at `id`.
    #[must_use]
    pub fn depth_first(&self, id: NodeId) -> DepthFirst<'_> {
        self.validate(id);
        DepthFirst::new(self, id.idx)
    }

    /// Returns the handles of root nodes (those with no parent).
    #[must_use]
    pub fn roots(&self) -> Vec<NodeId> {
        let mut roots = Vec::new();
        for idx in 0..self.len {
            if self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx) {
                roots.push(self.handle(idx));
            }
        }
        roots
    }

    // -- Style API --

    /// Returns the style of a node.
    #[must_use]
    pub fn style(&self, id: NodeId) -> &Style {
        self.validate(id);
        &self.style[id.idx as usize]
    }

    /// Replaces the style of a node.
    ///
    /// Marks the node dirty if the style differs from the current one.
    pub fn set_style(&mut self, id: NodeId, style: Style) {
        self.validate(id);
        let idx = id.idx;
        if self.style[idx as usize] != style {
            self.style[idx as usize] = style;
            self.invalidate(idx);
            self.tracker.mark(idx, dirty::STYLE);
        }
    }

    /// Edits the style of a node in place.
    ///
    /// The closure works on a copy, which is committed only if it returns
    /// `Ok`. An unchanged style does not dirty the node.
    ///
    /// # Errors
    ///
    /// Returns the closure's error; the node is left untouched.
    pub fn update_style(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut Style) -> Result<(), LayoutError>,
    ) -> Result<(), LayoutError> {
        self.validate(id);
        let mut style = self.style[id.idx as usize];
        f(&mut style)?;
        self.set_style(id, style);
        Ok(())
    }

    // -- Capability API --

    /// Attaches or removes the measure function of a node.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::MeasureFunctionConflict`] when attaching a
    /// function to a node with children. Removing always succeeds.
    pub fn set_measure_function(
        &mut self,
        id: NodeId,
        measure: Option<MeasureFunction>,
    ) -> Result<(), LayoutError> {
        self.validate(id);
        let idx = id.idx;
        if measure.is_some() && self.child_count[idx as usize] > 0 {
            return Err(LayoutError::MeasureFunctionConflict);
        }
        self.measure[idx as usize] = measure;
        self.mark_dirty(id);
        Ok(())
    }

    /// Returns `true` if the node has a measure function.
    #[must_use]
    pub fn has_measure_function(&self, id: NodeId) -> bool {
        self.validate(id);
        self.measure[id.idx as usize].is_some()
    }

    /// Attaches or removes the baseline function of a node.
    pub fn set_baseline_function(&mut self, id: NodeId, baseline: Option<BaselineFunction>) {
        self.validate(id);
        self.baseline[id.idx as usize] = baseline;
        self.mark_dirty(id);
    }

    /// Returns `true` if the node has a baseline function.
    #[must_use]
    pub fn has_baseline_function(&self, id: NodeId) -> bool {
        self.validate(id);
        self.baseline[id.idx as usize].is_some()
    }

    // -- Dirty state --

    /// Marks a node dirty, for example after its measured content changed.
    ///
    /// Clears the node's measurement cache and walks up the ancestors doing
    /// the same, stopping at the first ancestor that is already dirty.
    pub fn mark_dirty(&mut self, id: NodeId) {
        self.validate(id);
        self.invalidate(id.idx);
        self.tracker.mark(id.idx, dirty::MEASURE);
    }

    /// Returns whether the node needs layout.
    #[must_use]
    pub fn is_dirty(&self, id: NodeId) -> bool {
        self.validate(id);
        self.dirty[id.idx as usize]
    }

    /// Returns whether the node's published layout changed since the flag was
    /// last cleared.
    #[must_use]
    pub fn has_new_layout(&self, id: NodeId) -> bool {
        self.validate(id);
        self.has_new_layout[id.idx as usize]
    }

    /// Clears the has-new-layout flag. The engine only ever sets it.
    pub fn clear_has_new_layout(&mut self, id: NodeId) {
        self.validate(id);
        self.has_new_layout[id.idx as usize] = false;
    }

    // -- Layout results --

    /// Returns the published layout of a node.
    ///
    /// Only meaningful after a [`compute_layout`](Self::compute_layout) pass
    /// covering this node.
    #[must_use]
    pub fn layout(&self, id: NodeId) -> &LayoutResult {
        self.validate(id);
        &self.layout[id.idx as usize]
    }

    /// Returns the resolved margin of a node on `edge`.
    #[must_use]
    pub fn layout_margin(&self, id: NodeId, edge: Edge) -> f64 {
        self.layout(id).margin_edge(edge)
    }

    /// Returns the resolved border width of a node on `edge`.
    #[must_use]
    pub fn layout_border(&self, id: NodeId, edge: Edge) -> f64 {
        self.layout(id).border_edge(edge)
    }

    /// Returns the resolved padding of a node on `edge`.
    #[must_use]
    pub fn layout_padding(&self, id: NodeId, edge: Edge) -> f64 {
        self.layout(id).padding_edge(edge)
    }

    /// Returns the published layout at raw slot `idx`.
    ///
    /// Accepts indices as found in [`LayoutChanges`](crate::layout::LayoutChanges),
    /// skipping generation validation.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn layout_at(&self, idx: u32) -> &LayoutResult {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        &self.layout[idx as usize]
    }

    // -- Internal helpers --

    /// Builds a handle for a live slot.
    pub(crate) fn handle(&self, idx: u32) -> NodeId {
        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            id.idx < self.len
                && self.generation[id.idx as usize] == id.generation
                && !self.free_list.contains(&id.idx),
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Sets the dirty flag and clears the cache of `idx` and its ancestors,
    /// stopping at the first ancestor that is already dirty.
    pub(crate) fn invalidate(&mut self, idx: u32) {
        self.dirty[idx as usize] = true;
        self.cache[idx as usize].clear();
        let mut p = self.parent[idx as usize];
        while p != INVALID && !self.dirty[p as usize] {
            self.dirty[p as usize] = true;
            self.cache[p as usize].clear();
            p = self.parent[p as usize];
        }
    }

    /// Removes `idx` from its parent's child list without touching dirty state.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        } else {
            // Was last child.
            self.last_child[p as usize] = prev;
        }

        self.child_count[p as usize] -= 1;
        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }

    /// Frees a detached, childless slot.
    fn release(&mut self, idx: u32) {
        self.measure[idx as usize] = None;
        self.baseline[idx as usize] = None;
        self.tracker.remove_key(idx);

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;
        self.free_list.push(idx);
        if self.last_request.is_some_and(|r| r.root == idx) {
            self.last_request = None;
        }
        self.tracker.mark(idx, dirty::TOPOLOGY);
    }
}
