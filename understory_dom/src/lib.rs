// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory DOM: a minimal, headless host document.
//!
//! The interaction engines in this workspace (collections, roving focus,
//! dismissable layers, anchored positioning) never talk to a real browser or
//! windowing toolkit. They reach the host through small traits instead. This
//! crate is one host: an in-memory element tree with just enough document
//! semantics to drive them.
//!
//! - A generational element tree with a single `body` root.
//! - Document order ([`Document::compare_document_position`]) derived from
//!   the tree structure on every call, so reordering is reflected immediately.
//! - An active element and a `focus` operation that can fail (disabled,
//!   hidden, or non-focusable elements refuse focus).
//! - Per-element `pointer-events` overrides with inheritance, and a body-level
//!   override that layers use for modal isolation.
//! - CSS custom properties and layout rects, set by the embedder or by the
//!   positioning engine.
//!
//! It does not lay anything out, render anything, or dispatch events. The
//! embedder decides which node an event targets and calls the engines.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_dom::{Document, Element, FocusOptions};
//!
//! let mut doc = Document::new();
//! let list = doc.append(doc.body(), Element::default());
//! let first = doc.append(list, Element::focusable());
//! let second = doc.append(list, Element::focusable().with_rect(Rect::new(0.0, 20.0, 80.0, 40.0)));
//!
//! assert!(doc.compare_document_position(first, second).is_lt());
//! assert!(doc.focus(second, FocusOptions::default()));
//! assert_eq!(doc.active_element(), Some(second));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod document;
mod types;

pub use document::Document;
pub use types::{DocumentId, Element, ElementFlags, FocusOptions, NodeId, PointerEvents};
