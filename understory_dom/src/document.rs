// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: structure, order, focus, and style state.

use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;

use kurbo::Rect;

use crate::types::{DocumentId, Element, ElementFlags, FocusOptions, NodeId, PointerEvents};

/// An in-memory element tree rooted at a `body` node.
///
/// Node identifiers are generational: removing a node makes every copy of its
/// [`NodeId`] stale, even if the slot is later reused.
///
/// ## Example
///
/// ```rust
/// use understory_dom::{Document, Element};
///
/// let mut doc = Document::new();
/// let menu = doc.append(doc.body(), Element::default());
/// let item = doc.append(menu, Element::focusable().with_label("Undo"));
///
/// assert!(doc.contains(menu, item));
/// doc.remove(menu);
/// assert!(!doc.is_alive(item));
/// ```
pub struct Document {
    id: DocumentId,
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    body: NodeId,
    active: Option<NodeId>,
    last_focus_options: Option<FocusOptions>,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("id", &self.id)
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    element: Element,
}

impl Document {
    /// Create a document containing only its `body`.
    pub fn new() -> Self {
        let body = Node {
            generation: 1,
            parent: None,
            children: Vec::new(),
            element: Element {
                label: Some(String::from("body")),
                ..Element::default()
            },
        };
        Self {
            id: DocumentId::fresh(),
            nodes: alloc::vec![Some(body)],
            generations: alloc::vec![1],
            free_list: Vec::new(),
            body: NodeId::new(0, 1),
            active: None,
            last_focus_options: None,
        }
    }

    /// Identity of this document.
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// The root `body` node.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Append a new element as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is stale.
    pub fn append(&mut self, parent: NodeId, element: Element) -> NodeId {
        let index = self.children_of(parent).len();
        self.insert_at(parent, index, element)
    }

    /// Insert a new element as child `index` of `parent` (clamped to the child count).
    ///
    /// # Panics
    ///
    /// Panics if `parent` is stale.
    pub fn insert_at(&mut self, parent: NodeId, index: usize, element: Element) -> NodeId {
        assert!(self.is_alive(parent), "insert_at: stale parent {parent:?}");
        let node = |generation| Node {
            generation,
            parent: Some(parent),
            children: Vec::new(),
            element,
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(node(generation));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(node(generation)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Node slots are addressed with u32 indices."
        )]
        let id = NodeId::new(idx as u32, generation);
        let siblings = &mut self.node_mut(parent).children;
        let index = index.min(siblings.len());
        siblings.insert(index, id);
        id
    }

    /// Remove a node and its subtree.
    ///
    /// Removing the body is ignored. If the active element lived in the removed
    /// subtree, focus falls back to nothing.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) || id == self.body {
            return;
        }
        if self.active.is_some_and(|a| self.contains(id, a)) {
            tracing::trace!(?id, "active element removed; focus reset");
            self.active = None;
        }
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|c| *c != id);
        }
        self.free_subtree(id);
    }

    /// Move `id` to child position `index` of `new_parent`.
    ///
    /// Moving a node under itself or one of its descendants is ignored.
    pub fn move_to(&mut self, id: NodeId, new_parent: NodeId, index: usize) {
        if !self.is_alive(id)
            || !self.is_alive(new_parent)
            || id == self.body
            || self.contains(id, new_parent)
        {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|c| *c != id);
        }
        let siblings = &mut self.node_mut(new_parent).children;
        let index = index.min(siblings.len());
        siblings.insert(index, id);
        self.node_mut(id).parent = Some(new_parent);
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Returns the parent of a node if live, or `None` for the body or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Get the children of a node, or an empty slice if the node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Whether `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.is_alive(ancestor) || !self.is_alive(node) {
            return false;
        }
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.parent_of(n);
        }
        false
    }

    /// Compare two nodes by their position in a depth-first walk of the document.
    ///
    /// An ancestor precedes its descendants. Stale identifiers compare equal to
    /// everything, which leaves tie-breaking to the caller.
    pub fn compare_document_position(&self, a: NodeId, b: NodeId) -> Ordering {
        if a == b || !self.is_alive(a) || !self.is_alive(b) {
            return Ordering::Equal;
        }
        let pa = self.path_from_body(a);
        let pb = self.path_from_body(b);
        let shared = pa.iter().zip(pb.iter()).take_while(|(x, y)| x == y).count();
        match (pa.get(shared), pb.get(shared)) {
            // `a` is an ancestor of `b`.
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(&ca), Some(&cb)) => {
                let siblings = self.children_of(pa[shared - 1]);
                let ia = siblings.iter().position(|&c| c == ca);
                let ib = siblings.iter().position(|&c| c == cb);
                ia.cmp(&ib)
            }
            (None, None) => Ordering::Equal,
        }
    }

    /// Get the next node in depth-first order, or `None` at the end or for stale ids.
    pub fn next_depth_first(&self, current: NodeId) -> Option<NodeId> {
        let node = self.node_opt(current)?;
        if let Some(&first_child) = node.children.first() {
            return Some(first_child);
        }
        let mut n = current;
        while let Some(parent) = self.parent_of(n) {
            if let Some(next_sibling) = self.sibling(n, 1) {
                return Some(next_sibling);
            }
            n = parent;
        }
        None
    }

    /// Get the previous node in depth-first order, or `None` at the body or for stale ids.
    pub fn prev_depth_first(&self, current: NodeId) -> Option<NodeId> {
        if !self.is_alive(current) {
            return None;
        }
        match self.sibling(current, -1) {
            Some(mut n) => {
                while let Some(&last) = self.children_of(n).last() {
                    n = last;
                }
                Some(n)
            }
            None => self.parent_of(current),
        }
    }

    /// Element state of a live node.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node_opt(id).map(|n| &n.element)
    }

    /// Mutable element state of a live node.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.node_opt_mut(id).map(|n| &mut n.element)
    }

    /// Label of a live node.
    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.element(id).and_then(|e| e.label.as_deref())
    }

    /// Border-box rect of a live node.
    pub fn rect(&self, id: NodeId) -> Option<Rect> {
        self.element(id).map(|e| e.rect)
    }

    /// Update the border-box rect.
    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        if let Some(e) = self.element_mut(id) {
            e.rect = rect;
        }
    }

    /// Update element flags.
    ///
    /// If the active element becomes unable to hold focus, it is blurred.
    pub fn set_flags(&mut self, id: NodeId, flags: ElementFlags) {
        if let Some(e) = self.element_mut(id) {
            e.flags = flags;
        }
        if self.active == Some(id) && !self.element(id).is_some_and(Element::accepts_focus) {
            self.active = None;
        }
    }

    /// Current `tabIndex` of a live node.
    pub fn tab_index(&self, id: NodeId) -> Option<i32> {
        self.element(id).and_then(|e| e.tab_index)
    }

    /// Assign `tabIndex`.
    pub fn set_tab_index(&mut self, id: NodeId, tab_index: Option<i32>) {
        if let Some(e) = self.element_mut(id) {
            e.tab_index = tab_index;
        }
    }

    /// Inline `pointer-events` override of a live node.
    pub fn pointer_events(&self, id: NodeId) -> Option<PointerEvents> {
        self.element(id).and_then(|e| e.pointer_events)
    }

    /// Set or clear the inline `pointer-events` override.
    pub fn set_pointer_events(&mut self, id: NodeId, value: Option<PointerEvents>) {
        if let Some(e) = self.element_mut(id) {
            e.pointer_events = value;
        }
    }

    /// Effective `pointer-events` after inheritance (defaults to [`PointerEvents::Auto`]).
    pub fn effective_pointer_events(&self, id: NodeId) -> PointerEvents {
        let mut cur = Some(id);
        while let Some(n) = cur {
            if let Some(pe) = self.pointer_events(n) {
                return pe;
            }
            cur = self.parent_of(n);
        }
        PointerEvents::Auto
    }

    /// Read an inline style property.
    pub fn property(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)
            .and_then(|e| e.properties.get(name))
            .map(String::as_str)
    }

    /// Write an inline style property.
    pub fn set_property(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(e) = self.element_mut(id) {
            e.properties.insert(String::from(name), value.into());
        }
    }

    /// Remove an inline style property.
    pub fn remove_property(&mut self, id: NodeId, name: &str) {
        if let Some(e) = self.element_mut(id) {
            e.properties.remove(name);
        }
    }

    /// Computed z-index of a live node.
    pub fn z_index(&self, id: NodeId) -> Option<i32> {
        self.element(id).and_then(|e| e.z_index)
    }

    /// The focused element, if any.
    pub fn active_element(&self) -> Option<NodeId> {
        self.active.filter(|&a| self.is_alive(a))
    }

    /// Options passed to the most recent successful [`Document::focus`].
    pub fn last_focus_options(&self) -> Option<FocusOptions> {
        self.last_focus_options
    }

    /// Try to focus `id`. Returns whether it became the active element.
    pub fn focus(&mut self, id: NodeId, options: FocusOptions) -> bool {
        if !self.element(id).is_some_and(Element::accepts_focus) {
            return false;
        }
        if self.active != Some(id) {
            tracing::trace!(?id, label = ?self.label(id), "focus");
        }
        self.active = Some(id);
        self.last_focus_options = Some(options);
        true
    }

    /// Drop focus.
    pub fn blur(&mut self) {
        self.active = None;
    }

    // --- internals ---

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.idx())?
            .as_ref()
            .filter(|n| n.generation == id.1)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.idx())?
            .as_mut()
            .filter(|n| n.generation == id.1)
    }

    fn node(&self, id: NodeId) -> &Node {
        self.node_opt(id).expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.node_opt_mut(id).expect("dangling NodeId")
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = alloc::vec![id];
        while let Some(n) = stack.pop() {
            if let Some(node) = self.nodes[n.idx()].take() {
                stack.extend(node.children);
                self.free_list.push(n.idx());
            }
        }
    }

    fn sibling(&self, node: NodeId, step: isize) -> Option<NodeId> {
        let parent = self.parent_of(node)?;
        let siblings = &self.node(parent).children;
        let pos = siblings.iter().position(|&id| id == node)?;
        let target = pos.checked_add_signed(step)?;
        siblings.get(target).copied()
    }

    fn path_from_body(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut cur = Some(id);
        while let Some(n) = cur {
            path.push(n);
            cur = self.parent_of(n);
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(label: &str) -> Element {
        Element::focusable().with_label(label)
    }

    #[test]
    fn liveness_insert_remove_reuse() {
        let mut doc = Document::new();
        let a = doc.append(doc.body(), item("a"));
        assert!(doc.is_alive(a));

        doc.remove(a);
        assert!(!doc.is_alive(a));

        let b = doc.append(doc.body(), item("b"));
        assert!(doc.is_alive(b));
        assert!(!doc.is_alive(a));
        if a.0 == b.0 {
            assert!(b.1 > a.1, "generation must increase on reuse");
        }
    }

    #[test]
    fn depth_first_traversal() {
        let mut doc = Document::new();
        // body -> [a -> [c, d], b]
        let body = doc.body();
        let a = doc.append(body, item("a"));
        let b = doc.append(body, item("b"));
        let c = doc.append(a, item("c"));
        let d = doc.append(a, item("d"));

        assert_eq!(doc.next_depth_first(body), Some(a));
        assert_eq!(doc.next_depth_first(a), Some(c));
        assert_eq!(doc.next_depth_first(c), Some(d));
        assert_eq!(doc.next_depth_first(d), Some(b));
        assert_eq!(doc.next_depth_first(b), None);

        assert_eq!(doc.prev_depth_first(b), Some(d));
        assert_eq!(doc.prev_depth_first(d), Some(c));
        assert_eq!(doc.prev_depth_first(c), Some(a));
        assert_eq!(doc.prev_depth_first(a), Some(body));
        assert_eq!(doc.prev_depth_first(body), None);
    }

    #[test]
    fn document_position_follows_structure() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.append(body, item("a"));
        let b = doc.append(body, item("b"));
        let c = doc.append(a, item("c"));

        assert_eq!(doc.compare_document_position(a, b), Ordering::Less);
        assert_eq!(doc.compare_document_position(c, b), Ordering::Less);
        assert_eq!(doc.compare_document_position(a, c), Ordering::Less);
        assert_eq!(doc.compare_document_position(c, a), Ordering::Greater);

        // Moving `b` to the front flips the order without touching ids.
        doc.move_to(b, body, 0);
        assert_eq!(doc.compare_document_position(a, b), Ordering::Greater);
        assert_eq!(doc.compare_document_position(c, b), Ordering::Greater);
    }

    #[test]
    fn move_under_own_descendant_is_ignored() {
        let mut doc = Document::new();
        let a = doc.append(doc.body(), item("a"));
        let c = doc.append(a, item("c"));
        doc.move_to(a, c, 0);
        assert_eq!(doc.parent_of(a), Some(doc.body()));
        assert_eq!(doc.parent_of(c), Some(a));
    }

    #[test]
    fn focus_respects_flags() {
        let mut doc = Document::new();
        let plain = doc.append(doc.body(), Element::default());
        let ok = doc.append(doc.body(), item("ok"));
        let off = doc.append(doc.body(), item("off").disabled());

        assert!(!doc.focus(plain, FocusOptions::default()));
        assert!(!doc.focus(off, FocusOptions::default()));
        assert_eq!(doc.active_element(), None);

        assert!(doc.focus(ok, FocusOptions::prevent_scroll()));
        assert_eq!(doc.active_element(), Some(ok));
        assert_eq!(doc.last_focus_options(), Some(FocusOptions::prevent_scroll()));

        doc.set_flags(ok, ElementFlags::FOCUSABLE | ElementFlags::HIDDEN);
        assert_eq!(doc.active_element(), None);
    }

    #[test]
    fn removing_focused_subtree_resets_focus() {
        let mut doc = Document::new();
        let group = doc.append(doc.body(), Element::default());
        let a = doc.append(group, item("a"));
        assert!(doc.focus(a, FocusOptions::default()));
        doc.remove(group);
        assert_eq!(doc.active_element(), None);
        assert!(!doc.is_alive(a));
    }

    #[test]
    fn pointer_events_inherit_and_override() {
        let mut doc = Document::new();
        let body = doc.body();
        let layer = doc.append(body, Element::default());
        let inner = doc.append(layer, Element::default());
        let other = doc.append(body, Element::default());

        doc.set_pointer_events(body, Some(PointerEvents::None));
        assert_eq!(doc.effective_pointer_events(other), PointerEvents::None);
        assert_eq!(doc.effective_pointer_events(inner), PointerEvents::None);

        doc.set_pointer_events(layer, Some(PointerEvents::Auto));
        assert_eq!(doc.effective_pointer_events(inner), PointerEvents::Auto);
        assert_eq!(doc.effective_pointer_events(other), PointerEvents::None);
    }

    #[test]
    fn properties_round_trip() {
        let mut doc = Document::new();
        let n = doc.append(doc.body(), Element::default());
        doc.set_property(n, "--popper-available-width", "120px");
        assert_eq!(doc.property(n, "--popper-available-width"), Some("120px"));
        doc.remove_property(n, "--popper-available-width");
        assert_eq!(doc.property(n, "--popper-available-width"), None);
    }
}
