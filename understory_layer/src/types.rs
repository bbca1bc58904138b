// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use smallvec::SmallVec;

/// Identifier of a mounted layer. Never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub(crate) u64);

/// Value of a `pointer-events` override.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerEvents {
    /// Pointer target even below a `none` ancestor.
    Auto,
    /// Not a pointer target.
    None,
}

/// Options supplied when mounting a layer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LayerOptions {
    /// Block outside pointer interaction with everything below this layer.
    pub isolation: bool,
    /// Logical parent, for layers portalled out of their parent's subtree.
    pub parent: Option<LayerId>,
}

impl LayerOptions {
    /// Modal layer.
    pub fn isolated() -> Self {
        Self {
            isolation: true,
            parent: None,
        }
    }

    /// Set the logical parent.
    pub fn with_parent(mut self, parent: LayerId) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// Why a layer is being dismissed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DismissReason {
    /// Escape key.
    Escape,
    /// Pointer down outside.
    Pointer,
    /// Focus moved outside.
    Focus,
}

impl DismissReason {
    /// The reason as the string reported to consumers.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Escape => "escape",
            Self::Pointer => "pointer",
            Self::Focus => "focus",
        }
    }
}

/// A layer that should be dismissed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dismissal {
    /// The layer.
    pub layer: LayerId,
    /// Why.
    pub reason: DismissReason,
}

/// Dismissals produced by one event, topmost layer first.
pub type Dismissals = SmallVec<[Dismissal; 2]>;

/// Host document operations used by the layer stack.
pub trait LayerHost<K> {
    /// Whether `node` is `ancestor` or inside it.
    fn contains(&self, ancestor: K, node: K) -> bool;

    /// Whether the node is still mounted.
    fn is_alive(&self, node: K) -> bool;

    /// Current inline `pointer-events` of the document body.
    fn body_pointer_events(&self) -> Option<PointerEvents>;

    /// Set or clear the body's inline `pointer-events`.
    fn set_body_pointer_events(&mut self, value: Option<PointerEvents>);

    /// Set or clear a node's inline `pointer-events`.
    fn set_pointer_events(&mut self, node: K, value: Option<PointerEvents>);
}
