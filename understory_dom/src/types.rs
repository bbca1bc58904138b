// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document: node identifiers, element flags, and style state.

use alloc::collections::BTreeMap;
use alloc::string::String;
use core::sync::atomic::{AtomicU64, Ordering};

use kurbo::Rect;

/// Identifier for a node in a [`Document`](crate::Document) (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Identity of an owning document.
///
/// Engines that keep per-document state (for example the dismissable layer
/// stack) key it by this value so that popup windows with their own document
/// get independent state.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct DocumentId(u64);

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

impl DocumentId {
    pub(crate) fn fresh() -> Self {
        Self(NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

bitflags::bitflags! {
    /// Element flags controlling focusability.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// Element can receive focus.
        const FOCUSABLE = 0b0000_0001;
        /// Element is disabled; it refuses focus even when focusable.
        const DISABLED  = 0b0000_0010;
        /// Element is not rendered; it refuses focus.
        const HIDDEN    = 0b0000_0100;
    }
}

impl Default for ElementFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// Value of the `pointer-events` style property.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerEvents {
    /// The element is a pointer target again, even below a `none` ancestor.
    Auto,
    /// The element and (unless overridden) its descendants are not pointer targets.
    None,
}

/// Options for [`Document::focus`](crate::Document::focus).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FocusOptions {
    /// Do not scroll the element into view.
    pub prevent_scroll: bool,
}

impl FocusOptions {
    /// Focus without scrolling.
    pub const fn prevent_scroll() -> Self {
        Self {
            prevent_scroll: true,
        }
    }
}

/// Element state held by each node.
#[derive(Clone, Debug, Default)]
pub struct Element {
    /// Optional debug label (also used as text content by demos and tests).
    pub label: Option<String>,
    /// Focusability flags.
    pub flags: ElementFlags,
    /// Current `tabIndex`, when one has been assigned.
    pub tab_index: Option<i32>,
    /// Border-box rect in document coordinates.
    pub rect: Rect,
    /// Inline `pointer-events` override, `None` meaning "inherit".
    pub pointer_events: Option<PointerEvents>,
    /// Computed `z-index`, when the element establishes one.
    pub z_index: Option<i32>,
    /// Inline style properties, including custom `--name` properties.
    pub properties: BTreeMap<String, String>,
}

impl Element {
    /// An element that accepts focus.
    pub fn focusable() -> Self {
        Self {
            flags: ElementFlags::FOCUSABLE,
            ..Self::default()
        }
    }

    /// Attach a label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the border-box rect.
    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    /// Mark the element disabled.
    pub fn disabled(mut self) -> Self {
        self.flags |= ElementFlags::DISABLED;
        self
    }

    /// Set the computed z-index.
    pub fn with_z_index(mut self, z: i32) -> Self {
        self.z_index = Some(z);
        self
    }

    /// Whether `focus()` on this element can succeed.
    pub fn accepts_focus(&self) -> bool {
        self.flags.contains(ElementFlags::FOCUSABLE)
            && !self
                .flags
                .intersects(ElementFlags::DISABLED | ElementFlags::HIDDEN)
    }
}
