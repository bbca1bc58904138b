// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Collection: an ordered registry of widget items.
//!
//! Composite widgets (menus, toolbars, radio groups, selects) need to know
//! their items in visual order, but items register in whatever order the host
//! mounts them and can be reordered later. [`Collection`] keeps a record per
//! item and asks the host for document order **on every ordered read**, so a
//! reorder in the host is reflected without notifying the collection.
//!
//! - Each registration gets a fresh [`ItemId`]. The id stays valid until
//!   [`Collection::unregister`], even if the item's data or node changes.
//! - [`Collection::merge`] updates some fields of an item without changing its
//!   identity or its registration position.
//! - [`Collection::read_all`] returns items in host document order
//!   ([`ReadOrder::Document`]) or in registration order
//!   ([`ReadOrder::Registration`]).
//!
//! The host supplies document order through the [`DocumentOrder`] trait.
//!
//! ```rust
//! use core::cmp::Ordering;
//! use understory_collection::{Collection, DocumentOrder, ReadOrder};
//!
//! // Host where a node's value is its position.
//! struct Positions;
//! impl DocumentOrder<u32> for Positions {
//!     fn compare_document_position(&self, a: u32, b: u32) -> Ordering {
//!         a.cmp(&b)
//!     }
//! }
//!
//! let mut items = Collection::new();
//! items.register(30_u32, "Copy");
//! items.register(10, "Undo");
//! items.register(20, "Redo");
//!
//! let labels: Vec<_> = items
//!     .read_all(ReadOrder::Document, &Positions)
//!     .iter()
//!     .map(|item| item.data)
//!     .collect();
//! assert_eq!(labels, ["Undo", "Redo", "Copy"]);
//! ```
//!
//! ## Features
//!
//! - `dom_adapter`: implements [`DocumentOrder`] for `understory_dom::Document`
//!   (see [`adapters::dom`]).
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::cmp::Ordering;

#[cfg(feature = "dom_adapter")]
pub mod adapters;

/// Host-provided document order.
pub trait DocumentOrder<K> {
    /// Compare the positions of two nodes in the document.
    ///
    /// Ancestors precede descendants. Only called for nodes that
    /// [`is_placed`](Self::is_placed) accepts.
    fn compare_document_position(&self, a: K, b: K) -> Ordering;

    /// Whether the node is currently part of the document.
    ///
    /// Items whose node was removed before they were unregistered are read
    /// after all placed items, in registration order.
    fn is_placed(&self, node: K) -> bool {
        let _ = node;
        true
    }
}

impl<K, T: DocumentOrder<K> + ?Sized> DocumentOrder<K> for &T {
    fn compare_document_position(&self, a: K, b: K) -> Ordering {
        (**self).compare_document_position(a, b)
    }

    fn is_placed(&self, node: K) -> bool {
        (**self).is_placed(node)
    }
}

/// Opaque handle to a registered item.
///
/// Handles are never reused within one collection.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u32);

/// Order used by [`Collection::read_all`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReadOrder {
    /// Host document order, recomputed on every read.
    #[default]
    Document,
    /// The order items were first registered.
    Registration,
}

/// A registered item.
#[derive(Clone, Debug, PartialEq)]
pub struct Item<K, D> {
    /// Handle returned at registration.
    pub id: ItemId,
    /// The host node the item renders to.
    pub node: K,
    /// Caller data (value, disabled flag, text value, ...).
    pub data: D,
}

/// Registry of items for one composite widget instance.
#[derive(Clone, Debug)]
pub struct Collection<K, D> {
    /// Registration order.
    items: Vec<Item<K, D>>,
    next_id: u32,
}

impl<K, D> Default for Collection<K, D> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_id: 0,
        }
    }
}

impl<K, D> Collection<K, D> {
    /// Number of registered items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no items are registered.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Item<K, D>> {
        self.items.iter()
    }
}

impl<K: Copy + PartialEq, D> Collection<K, D> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node with its data and return a fresh handle.
    pub fn register(&mut self, node: K, data: D) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.items.push(Item { id, node, data });
        tracing::trace!(?id, count = self.items.len(), "collection item registered");
        id
    }

    /// Register under an existing handle.
    ///
    /// If the handle is still registered its record is overwritten in place;
    /// otherwise the item is appended.
    pub fn register_with(&mut self, id: ItemId, node: K, data: D) {
        match self.index_of(id) {
            Some(i) => self.items[i] = Item { id, node, data },
            None => {
                self.next_id = self.next_id.max(id.0.wrapping_add(1));
                self.items.push(Item { id, node, data });
            }
        }
    }

    /// Overwrite an item's data. Returns the previous data if the item exists.
    pub fn set(&mut self, id: ItemId, data: D) -> Option<D> {
        let i = self.index_of(id)?;
        Some(core::mem::replace(&mut self.items[i].data, data))
    }

    /// Update selected fields of an item's data in place.
    ///
    /// Returns `false` if the item is not registered.
    pub fn merge(&mut self, id: ItemId, f: impl FnOnce(&mut D)) -> bool {
        match self.get_mut(id) {
            Some(item) => {
                f(&mut item.data);
                true
            }
            None => false,
        }
    }

    /// Point an item at a different host node.
    pub fn set_node(&mut self, id: ItemId, node: K) -> bool {
        match self.get_mut(id) {
            Some(item) => {
                item.node = node;
                true
            }
            None => false,
        }
    }

    /// Remove an item. Subsequent reads no longer include it.
    pub fn unregister(&mut self, id: ItemId) -> Option<Item<K, D>> {
        let i = self.index_of(id)?;
        let item = self.items.remove(i);
        tracing::trace!(?id, count = self.items.len(), "collection item unregistered");
        Some(item)
    }

    /// Look up an item.
    pub fn get(&self, id: ItemId) -> Option<&Item<K, D>> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Look up an item mutably.
    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Item<K, D>> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Handle of the item rendering to `node`, if any.
    pub fn position_of(&self, node: K) -> Option<ItemId> {
        self.items.iter().find(|item| item.node == node).map(|item| item.id)
    }

    /// All items in the requested order.
    ///
    /// Document order is computed from `host` on each call. Items sharing a
    /// node are ordered by handle; items the host no longer places come last,
    /// in registration order.
    pub fn read_all(&self, order: ReadOrder, host: &impl DocumentOrder<K>) -> Vec<&Item<K, D>> {
        if order == ReadOrder::Registration {
            return self.items.iter().collect();
        }
        let (mut placed, detached): (Vec<&Item<K, D>>, Vec<&Item<K, D>>) =
            self.items.iter().partition(|item| host.is_placed(item.node));
        placed.sort_by(|a, b| {
            host.compare_document_position(a.node, b.node)
                .then_with(|| a.id.cmp(&b.id))
        });
        placed.extend(detached);
        placed
    }

    fn index_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }
}
