// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Layer: who gets dismissed when the user clicks, tabs, or presses Escape.
//!
//! ## Overview
//!
//! Every mounted overlay (menu, popover, dialog, select) is a **layer**. Layers
//! belong to the document that owns their body node and are stacked low→high
//! in mount order. Remounting or updating a layer never reorders it.
//!
//! [`LayerStacks`] keeps one stack per owning document, created on first mount
//! and dropped when its last layer unmounts. It resolves three interactions:
//!
//! - **Pointer down outside** ([`LayerStacks::pointer_down`]): each
//!   participating layer whose body (or a descendant layer's body) does not
//!   contain the target is offered a [`DismissReason::Pointer`] dismissal.
//! - **Focus moving outside** ([`LayerStacks::focus_in`]): the same rule with
//!   [`DismissReason::Focus`].
//! - **Escape** ([`LayerStacks::escape`]): only the topmost layer is offered a
//!   [`DismissReason::Escape`] dismissal.
//!
//! Each offer goes through a caller hook `(layer, reason) -> bool`; returning
//! `true` suppresses that layer's dismissal (the `onPointerDownOutside`,
//! `onFocusOutside`, `onEscapeKeyDown` convention). Dispatch returns the
//! resulting [`Dismissals`], topmost first, and leaves acting on them to the
//! caller.
//!
//! ## Isolation
//!
//! A layer mounted with `isolation` (modal behavior) shadows everything below
//! it. Only the highest isolating layer and the layers above it
//! **participate** in outside-pointer and outside-focus handling. While any
//! isolating layer is mounted:
//!
//! - the document body's `pointer-events` is forced to `none` (its previous
//!   value is remembered and restored when the last isolating layer goes away);
//! - participating layer bodies get `pointer-events: auto`;
//! - shadowed layer bodies get `pointer-events: none`.
//!
//! Without isolation no layer carries an override.
//!
//! ## Listener arming
//!
//! The event that mounts a layer must not also dismiss it. Every structural
//! change (mount, unmount, isolation change) **disarms** the document's
//! listeners; the host re-arms them with [`LayerStacks::tick`] on its next
//! turn of the event loop. Events dispatched while disarmed are ignored.
//!
//! ## Nesting
//!
//! Layers rendered into a portal are not inside their logical parent in the
//! host tree. Passing [`LayerOptions::parent`] makes a target inside a child
//! layer count as inside all of its ancestors, so interacting with a submenu
//! never dismisses its parent menu.
//!
//! ```rust
//! use understory_layer::{DismissReason, LayerHost, LayerOptions, LayerStacks, PointerEvents};
//!
//! // A host where node `n` contains only itself.
//! #[derive(Default)]
//! struct Flat { body: Option<PointerEvents> }
//! impl LayerHost<u32> for Flat {
//!     fn contains(&self, a: u32, n: u32) -> bool { a == n }
//!     fn is_alive(&self, _: u32) -> bool { true }
//!     fn body_pointer_events(&self) -> Option<PointerEvents> { self.body }
//!     fn set_body_pointer_events(&mut self, v: Option<PointerEvents>) { self.body = v; }
//!     fn set_pointer_events(&mut self, _: u32, _: Option<PointerEvents>) {}
//! }
//!
//! let mut host = Flat::default();
//! let mut layers = LayerStacks::new();
//! let menu = layers.mount(&mut host, "doc", 10, LayerOptions::default()).unwrap();
//!
//! // The click that opened the menu is not seen.
//! assert!(layers.pointer_down(&host, "doc", 99, |_, _| false).is_empty());
//!
//! layers.tick("doc");
//! let dismissed = layers.pointer_down(&host, "doc", 99, |_, _| false);
//! assert_eq!(dismissed[0].layer, menu);
//! assert_eq!(dismissed[0].reason, DismissReason::Pointer);
//! ```
//!
//! ## Features
//!
//! - `dom_adapter`: implements [`LayerHost`] for `understory_dom::Document`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(feature = "dom_adapter")]
pub mod adapters;
mod stack;
mod types;

pub use stack::LayerStacks;
pub use types::{
    DismissReason, Dismissal, Dismissals, LayerHost, LayerId, LayerOptions, PointerEvents,
};

/// Misuse of [`LayerStacks`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerError {
    /// The layer was never mounted or has been unmounted.
    #[error("layer {0:?} is not mounted")]
    UnknownLayer(LayerId),
    /// A logical parent must be mounted in the same document.
    #[error("parent layer {0:?} is not mounted in this document")]
    ForeignParent(LayerId),
}
