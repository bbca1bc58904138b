// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory State: value ownership and composition helpers for widgets.
//!
//! Widgets built on the Understory interaction engines expose most of their
//! state (open, checked, selected value, current tab stop) in two modes:
//!
//! - **Uncontrolled**: the widget owns the value and starts from a default.
//! - **Controlled**: the owner passes the value in and is told about requested
//!   changes, but the widget never overwrites it.
//!
//! [`Controllable`] merges both modes behind one getter/setter pair. Setting a
//! value equal to the current one is a no-op and does not notify.
//!
//! ```rust
//! use understory_state::Controllable;
//!
//! let mut open = Controllable::uncontrolled(false);
//! let mut seen = Vec::new();
//! assert!(open.set(true, |v| seen.push(*v)));
//! assert!(!open.set(true, |v| seen.push(*v)));
//! assert_eq!(seen, [true]);
//!
//! // A controlled value only changes when the owner syncs it.
//! let mut checked = Controllable::controlled(false);
//! checked.set(true, |_| {});
//! assert!(!*checked.get());
//! checked.sync(Some(true));
//! assert!(*checked.get());
//! ```
//!
//! The crate also provides:
//!
//! - [`Store`] and [`Selection`]: a tree-scoped value with selector polling so
//!   consumers only see the slices they read change.
//! - [`compose`]: event handler chaining, class and style merging, and
//!   multi-owner element references.
//! - [`CheckedState`]: the tri-state used by checkboxes and checkbox menu items.
//!
//! ## Features
//!
//! - `serde`: derives `Serialize`/`Deserialize` for [`CheckedState`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod checked;
pub mod compose;
mod controllable;
mod store;

pub use checked::CheckedState;
pub use controllable::Controllable;
pub use store::{Selection, Store};
