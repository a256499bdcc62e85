// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared ownership of a node store.
//!
//! Hosts whose measure or baseline callbacks need to consult the tree can
//! hold it through a [`SharedTree`]. Every access goes through a `RefCell`
//! borrow, so an access issued from inside an active layout pass is reported
//! as [`LayoutError::ReentrantLayout`] instead of corrupting state.

use alloc::rc::Rc;
use core::cell::RefCell;

use crate::error::LayoutError;
use crate::layout::LayoutChanges;
use crate::node::{NodeId, NodeStore};
use crate::style::Direction;

/// A cloneable handle to a [`NodeStore`].
///
/// Clones refer to the same store.
#[derive(Clone, Debug, Default)]
pub struct SharedTree(Rc<RefCell<NodeStore>>);

impl SharedTree {
    /// Wraps a store.
    #[must_use]
    pub fn new(store: NodeStore) -> Self {
        Self(Rc::new(RefCell::new(store)))
    }

    /// Runs [`NodeStore::compute_layout`].
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ReentrantLayout`] if the store is already in
    /// use, for example when called from a measure function.
    pub fn compute_layout(
        &self,
        root: NodeId,
        available_width: Option<f64>,
        available_height: Option<f64>,
        parent_direction: Direction,
    ) -> Result<LayoutChanges, LayoutError> {
        let mut store = self
            .0
            .try_borrow_mut()
            .map_err(|_| LayoutError::ReentrantLayout)?;
        Ok(store.compute_layout(root, available_width, available_height, parent_direction))
    }

    /// Calls `f` with shared access to the store.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ReentrantLayout`] if the store is mutably
    /// borrowed, which includes the whole duration of a layout pass.
    pub fn read<R>(&self, f: impl FnOnce(&NodeStore) -> R) -> Result<R, LayoutError> {
        let store = self
            .0
            .try_borrow()
            .map_err(|_| LayoutError::ReentrantLayout)?;
        Ok(f(&store))
    }

    /// Calls `f` with exclusive access to the store.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ReentrantLayout`] if the store is borrowed.
    pub fn update<R>(&self, f: impl FnOnce(&mut NodeStore) -> R) -> Result<R, LayoutError> {
        let mut store = self
            .0
            .try_borrow_mut()
            .map_err(|_| LayoutError::ReentrantLayout)?;
        Ok(f(&mut store))
    }
}
