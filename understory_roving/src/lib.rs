// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Roving: one tab stop per group, arrows for the rest.
//!
//! A roving focus group is a container (toolbar, menu, radio group, tab list)
//! whose items are reachable by Tab only through a single **tab stop**; once
//! inside, arrow keys, Home/End, and PageUp/PageDown move focus among the
//! focusable items in document order.
//!
//! [`RovingFocusGroup`] owns:
//!
//! - an [`understory_collection::Collection`] of items with their
//!   [`RovingItem`] flags;
//! - the tab stop, as an [`understory_state::Controllable`] so owners may
//!   control it;
//! - the "tabbing out" flag set by Shift+Tab, which takes the container out of
//!   the tab order until it blurs;
//! - whether the most recent focus came from a pointer press, so that keyboard
//!   entry into the container can be redirected to an item while pointer entry
//!   is left alone.
//!
//! Hosts implement [`FocusHost`] (active element, focus) and
//! [`DocumentOrder`](understory_collection::DocumentOrder), then forward item
//! and container events to the group.
//!
//! ## Navigation intents
//!
//! Keys map to a [`FocusIntent`] through [`focus_intent`], filtered by the
//! group's [`Orientation`]:
//!
//! | Key | Intent |
//! |---|---|
//! | `ArrowLeft`, `ArrowUp` | [`FocusIntent::Prev`] |
//! | `ArrowRight`, `ArrowDown` | [`FocusIntent::Next`] |
//! | `Home`, `PageUp` | [`FocusIntent::First`] |
//! | `End`, `PageDown` | [`FocusIntent::Last`] |
//!
//! A vertical group ignores left/right arrows and a horizontal group ignores
//! up/down arrows.
//!
//! ```rust
//! use understory_roving::{FocusIntent, Key, Orientation, focus_intent};
//!
//! assert_eq!(focus_intent(Key::ArrowDown, None), Some(FocusIntent::Next));
//! assert_eq!(focus_intent(Key::ArrowLeft, Some(Orientation::Vertical)), None);
//! assert_eq!(focus_intent(Key::PageUp, Some(Orientation::Horizontal)), Some(FocusIntent::First));
//! ```
//!
//! ## Features
//!
//! - `dom_adapter`: implements [`FocusHost`] for `understory_dom::Document`
//!   and adds [`adapters::dom::sync_tab_indices`].
//! - `serde`: derives `Serialize`/`Deserialize` for [`RovingOptions`] and
//!   [`Orientation`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(feature = "dom_adapter")]
pub mod adapters;
mod group;
mod keys;

pub use group::{
    FocusHost, FocusIntent, Orientation, PointerDown, RovingFocusGroup, RovingItem,
    RovingOptions, focus_first, focus_intent,
};
pub use keys::{Key, KeyEvent, Modifiers};

use understory_collection::ItemId;

/// Misuse of a [`RovingFocusGroup`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RovingError {
    /// The item handle is not registered with this group.
    #[error("item {0:?} is not registered with this roving focus group")]
    UnknownItem(ItemId),
}
