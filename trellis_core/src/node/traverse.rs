// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use alloc::vec::Vec;

use super::id::{INVALID, NodeId};
use super::store::NodeStore;

/// An iterator over the direct children of a node.
///
/// Created by [`NodeStore::children`].
#[derive(Debug)]
pub struct Children<'a> {
    store: &'a NodeStore,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(store: &'a NodeStore, first: u32) -> Self {
        Self {
            store,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.store.next_sibling[idx as usize];
        Some(self.store.handle(idx))
    }
}

/// A pre-order iterator over a subtree, including its root.
///
/// Uses an explicit stack, so arbitrarily deep trees do not grow the call
/// stack. Created by [`NodeStore::depth_first`].
#[derive(Debug)]
pub struct DepthFirst<'a> {
    store: &'a NodeStore,
    stack: Vec<u32>,
}

impl<'a> DepthFirst<'a> {
    pub(crate) fn new(store: &'a NodeStore, root: u32) -> Self {
        let mut stack = Vec::new();
        stack.push(root);
        Self { store, stack }
    }
}

impl Iterator for DepthFirst<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let idx = self.stack.pop()?;
        // Push children last-to-first so the first child is visited next.
        let mut child = self.store.last_child[idx as usize];
        while child != INVALID {
            self.stack.push(child);
            child = self.store.prev_sibling[child as usize];
        }
        Some(self.store.handle(idx))
    }
}
