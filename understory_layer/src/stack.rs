// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-document layer stacks and dismissal dispatch.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::LayerError;
use crate::types::{
    DismissReason, Dismissal, Dismissals, LayerHost, LayerId, LayerOptions, PointerEvents,
};

#[derive(Clone, Debug)]
struct Layer<K> {
    id: LayerId,
    body: K,
    isolation: bool,
    parent: Option<LayerId>,
}

#[derive(Clone, Debug)]
struct Stack<K> {
    /// Low to high, in mount order.
    layers: Vec<Layer<K>>,
    /// Body `pointer-events` from before isolation took over.
    saved_body: Option<Option<PointerEvents>>,
    armed: bool,
    revision: u64,
}

impl<K: Copy> Stack<K> {
    fn new() -> Self {
        Self {
            layers: Vec::new(),
            saved_body: None,
            armed: false,
            revision: 0,
        }
    }

    fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    /// Index of the lowest participating layer.
    fn floor(&self) -> usize {
        self.layers.iter().rposition(|l| l.isolation).unwrap_or(0)
    }

    /// Whether `layer` is `ancestor` or a logical descendant of it.
    fn descends_from(&self, layer: &Layer<K>, ancestor: LayerId) -> bool {
        let mut cur = Some(layer.id);
        let mut steps = 0;
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.layers.len() {
                return false;
            }
            cur = self
                .index_of(id)
                .and_then(|i| self.layers[i].parent);
        }
        false
    }

    /// Whether `target` lies in `id`'s body or in the body of a layer nested under it.
    fn is_inside(&self, host: &impl LayerHost<K>, id: LayerId, target: K) -> bool {
        self.layers
            .iter()
            .any(|l| self.descends_from(l, id) && host.contains(l.body, target))
    }

    fn apply_pointer_events(&mut self, host: &mut impl LayerHost<K>) {
        match self.layers.iter().rposition(|l| l.isolation) {
            Some(floor) => {
                if self.saved_body.is_none() {
                    let saved = host.body_pointer_events();
                    tracing::debug!(?saved, "body pointer-events disabled for isolation");
                    self.saved_body = Some(saved);
                    host.set_body_pointer_events(Some(PointerEvents::None));
                }
                for (i, layer) in self.layers.iter().enumerate() {
                    let value = if i >= floor {
                        PointerEvents::Auto
                    } else {
                        PointerEvents::None
                    };
                    host.set_pointer_events(layer.body, Some(value));
                }
            }
            None => {
                if let Some(saved) = self.saved_body.take() {
                    tracing::debug!(?saved, "body pointer-events restored");
                    host.set_body_pointer_events(saved);
                }
                for layer in &self.layers {
                    host.set_pointer_events(layer.body, None);
                }
            }
        }
    }
}

/// Dismissable layer stacks for every owning document.
///
/// `D` identifies a document (for example `understory_dom::DocumentId`) and
/// `K` a node within it.
#[derive(Clone, Debug)]
pub struct LayerStacks<D, K> {
    stacks: HashMap<D, Stack<K>>,
    owners: HashMap<LayerId, D>,
    next_id: u64,
    clock: u64,
}

impl<D, K> Default for LayerStacks<D, K> {
    fn default() -> Self {
        Self {
            stacks: HashMap::new(),
            owners: HashMap::new(),
            next_id: 0,
            clock: 0,
        }
    }
}

impl<D, K> LayerStacks<D, K>
where
    D: Copy + Eq + Hash + Debug,
    K: Copy + Debug,
{
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a layer on top of `doc`'s stack.
    ///
    /// Listeners for `doc` are disarmed until the next [`LayerStacks::tick`].
    pub fn mount(
        &mut self,
        host: &mut impl LayerHost<K>,
        doc: D,
        body: K,
        options: LayerOptions,
    ) -> Result<LayerId, LayerError> {
        if let Some(parent) = options.parent {
            if self.owners.get(&parent) != Some(&doc) {
                return Err(LayerError::ForeignParent(parent));
            }
        }
        let id = LayerId(self.next_id);
        self.next_id += 1;
        let stack = self.stacks.entry(doc).or_insert_with(Stack::new);
        stack.layers.push(Layer {
            id,
            body,
            isolation: options.isolation,
            parent: options.parent,
        });
        self.owners.insert(id, doc);
        tracing::debug!(?doc, ?id, ?body, isolation = options.isolation, "layer mounted");
        self.changed(host, doc);
        Ok(id)
    }

    /// Change a layer's isolation in place. Its stack position is kept.
    pub fn set_isolation(
        &mut self,
        host: &mut impl LayerHost<K>,
        id: LayerId,
        isolation: bool,
    ) -> Result<(), LayerError> {
        let doc = self.doc_of(id).ok_or(LayerError::UnknownLayer(id))?;
        let stack = self
            .stacks
            .get_mut(&doc)
            .ok_or(LayerError::UnknownLayer(id))?;
        let i = stack.index_of(id).ok_or(LayerError::UnknownLayer(id))?;
        if stack.layers[i].isolation == isolation {
            return Ok(());
        }
        stack.layers[i].isolation = isolation;
        tracing::debug!(?id, isolation, "layer isolation changed");
        self.changed(host, doc);
        Ok(())
    }

    /// Remove a layer and revert its `pointer-events` override.
    pub fn unmount(&mut self, host: &mut impl LayerHost<K>, id: LayerId) -> Result<(), LayerError> {
        let doc = self.owners.remove(&id).ok_or(LayerError::UnknownLayer(id))?;
        let stack = self
            .stacks
            .get_mut(&doc)
            .ok_or(LayerError::UnknownLayer(id))?;
        let i = stack.index_of(id).ok_or(LayerError::UnknownLayer(id))?;
        let layer = stack.layers.remove(i);
        host.set_pointer_events(layer.body, None);
        tracing::debug!(?doc, ?id, remaining = stack.layers.len(), "layer unmounted");
        self.changed(host, doc);
        if self.stacks.get(&doc).is_some_and(|s| s.layers.is_empty()) {
            self.stacks.remove(&doc);
            tracing::debug!(?doc, "layer stack disposed");
        }
        Ok(())
    }

    /// Unmount every layer of `doc` whose body is no longer alive in `host`.
    pub fn prune(&mut self, host: &mut impl LayerHost<K>, doc: D) -> Vec<LayerId> {
        let dead: Vec<LayerId> = self
            .stacks
            .get(&doc)
            .map(|s| {
                s.layers
                    .iter()
                    .filter(|l| !host.is_alive(l.body))
                    .map(|l| l.id)
                    .collect()
            })
            .unwrap_or_default();
        for &id in &dead {
            tracing::debug!(?id, "pruning layer with detached body");
            // Ids came from the live stack, so this cannot fail.
            let _ = self.unmount(host, id);
        }
        dead
    }

    /// Arm listeners for `doc`. Hosts call this on the turn after a change.
    pub fn tick(&mut self, doc: D) {
        if let Some(stack) = self.stacks.get_mut(&doc) {
            stack.armed = true;
        }
    }

    /// Arm listeners for every document.
    pub fn tick_all(&mut self) {
        for stack in self.stacks.values_mut() {
            stack.armed = true;
        }
    }

    /// Whether `doc`'s listeners are armed.
    pub fn is_armed(&self, doc: D) -> bool {
        self.stacks.get(&doc).is_some_and(|s| s.armed)
    }

    /// Layers of `doc`, low to high.
    pub fn layers(&self, doc: D) -> Vec<LayerId> {
        self.stacks
            .get(&doc)
            .map(|s| s.layers.iter().map(|l| l.id).collect())
            .unwrap_or_default()
    }

    /// The topmost layer of `doc`.
    pub fn topmost(&self, doc: D) -> Option<LayerId> {
        self.stacks.get(&doc)?.layers.last().map(|l| l.id)
    }

    /// Whether `doc` has a stack at all.
    pub fn has_stack(&self, doc: D) -> bool {
        self.stacks.contains_key(&doc)
    }

    /// The document a layer belongs to.
    pub fn doc_of(&self, id: LayerId) -> Option<D> {
        self.owners.get(&id).copied()
    }

    /// A layer's body node.
    pub fn body(&self, id: LayerId) -> Result<K, LayerError> {
        let (stack, i) = self.locate(id)?;
        Ok(stack.layers[i].body)
    }

    /// Whether the layer takes part in outside-pointer and outside-focus handling.
    pub fn participates(&self, id: LayerId) -> Result<bool, LayerError> {
        let (stack, i) = self.locate(id)?;
        Ok(i >= stack.floor())
    }

    /// Whether the layer handles Escape.
    pub fn is_topmost(&self, id: LayerId) -> Result<bool, LayerError> {
        let (stack, i) = self.locate(id)?;
        Ok(i + 1 == stack.layers.len())
    }

    /// Change counter for `doc`; `0` when the document has no stack.
    ///
    /// Values are unique across the lifetime of this registry, so a poller can
    /// compare them for equality even across stack disposal.
    pub fn revision(&self, doc: D) -> u64 {
        self.stacks.get(&doc).map_or(0, |s| s.revision)
    }

    /// Resolve a pointer press on `target`.
    pub fn pointer_down(
        &self,
        host: &impl LayerHost<K>,
        doc: D,
        target: K,
        hook: impl FnMut(LayerId, DismissReason) -> bool,
    ) -> Dismissals {
        self.outside(host, doc, target, DismissReason::Pointer, hook)
    }

    /// Resolve focus moving to `target`.
    pub fn focus_in(
        &self,
        host: &impl LayerHost<K>,
        doc: D,
        target: K,
        hook: impl FnMut(LayerId, DismissReason) -> bool,
    ) -> Dismissals {
        self.outside(host, doc, target, DismissReason::Focus, hook)
    }

    /// Resolve an Escape key press. Only the topmost layer is considered.
    pub fn escape(&self, doc: D, mut hook: impl FnMut(LayerId, DismissReason) -> bool) -> Dismissals {
        let mut out = Dismissals::new();
        let Some(stack) = self.stacks.get(&doc).filter(|s| s.armed) else {
            return out;
        };
        if let Some(top) = stack.layers.last() {
            if hook(top.id, DismissReason::Escape) {
                tracing::trace!(layer = ?top.id, "escape dismissal suppressed");
            } else {
                tracing::debug!(layer = ?top.id, reason = "escape", "layer dismissed");
                out.push(Dismissal {
                    layer: top.id,
                    reason: DismissReason::Escape,
                });
            }
        }
        out
    }

    fn outside(
        &self,
        host: &impl LayerHost<K>,
        doc: D,
        target: K,
        reason: DismissReason,
        mut hook: impl FnMut(LayerId, DismissReason) -> bool,
    ) -> Dismissals {
        let mut out = Dismissals::new();
        let Some(stack) = self.stacks.get(&doc) else {
            return out;
        };
        if !stack.armed {
            tracing::trace!(?doc, ?target, "layer listeners not armed yet; event ignored");
            return out;
        }
        for layer in stack.layers[stack.floor()..].iter().rev() {
            if stack.is_inside(host, layer.id, target) {
                continue;
            }
            if hook(layer.id, reason) {
                tracing::trace!(layer = ?layer.id, reason = reason.as_str(), "dismissal suppressed");
                continue;
            }
            tracing::debug!(layer = ?layer.id, reason = reason.as_str(), "layer dismissed");
            out.push(Dismissal {
                layer: layer.id,
                reason,
            });
        }
        out
    }

    fn locate(&self, id: LayerId) -> Result<(&Stack<K>, usize), LayerError> {
        let doc = self.doc_of(id).ok_or(LayerError::UnknownLayer(id))?;
        let stack = self.stacks.get(&doc).ok_or(LayerError::UnknownLayer(id))?;
        let i = stack.index_of(id).ok_or(LayerError::UnknownLayer(id))?;
        Ok((stack, i))
    }

    fn changed(&mut self, host: &mut impl LayerHost<K>, doc: D) {
        self.clock += 1;
        if let Some(stack) = self.stacks.get_mut(&doc) {
            stack.armed = false;
            stack.revision = self.clock;
            stack.apply_pointer_events(host);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    /// Nodes are paths of digits: `12` is inside `1`.
    #[derive(Default)]
    struct Host {
        body: Option<PointerEvents>,
        overrides: Vec<(u32, Option<PointerEvents>)>,
        dead: Vec<u32>,
    }

    impl Host {
        fn override_of(&self, node: u32) -> Option<PointerEvents> {
            self.overrides
                .iter()
                .rev()
                .find(|(n, _)| *n == node)
                .and_then(|(_, v)| *v)
        }
    }

    impl LayerHost<u32> for Host {
        fn contains(&self, ancestor: u32, node: u32) -> bool {
            let mut n = node;
            loop {
                if n == ancestor {
                    return true;
                }
                if n < 10 {
                    return false;
                }
                n /= 10;
            }
        }
        fn is_alive(&self, node: u32) -> bool {
            !self.dead.contains(&node)
        }
        fn body_pointer_events(&self) -> Option<PointerEvents> {
            self.body
        }
        fn set_body_pointer_events(&mut self, value: Option<PointerEvents>) {
            self.body = value;
        }
        fn set_pointer_events(&mut self, node: u32, value: Option<PointerEvents>) {
            self.overrides.push((node, value));
        }
    }

    const DOC: u8 = 0;

    fn never(_: LayerId, _: DismissReason) -> bool {
        false
    }

    #[test]
    fn listeners_wait_for_tick() {
        let mut host = Host::default();
        let mut stacks = LayerStacks::new();
        let a = stacks.mount(&mut host, DOC, 1, LayerOptions::default()).unwrap();
        assert!(!stacks.is_armed(DOC));
        assert!(stacks.pointer_down(&host, DOC, 2, never).is_empty());
        assert!(stacks.escape(DOC, never).is_empty());

        stacks.tick(DOC);
        assert_eq!(
            stacks.escape(DOC, never).as_slice(),
            [Dismissal {
                layer: a,
                reason: DismissReason::Escape
            }]
        );

        // Mounting another layer disarms again.
        stacks.mount(&mut host, DOC, 3, LayerOptions::default()).unwrap();
        assert!(stacks.escape(DOC, never).is_empty());
    }

    #[test]
    fn escape_only_reaches_topmost() {
        let mut host = Host::default();
        let mut stacks = LayerStacks::new();
        let _a = stacks.mount(&mut host, DOC, 1, LayerOptions::default()).unwrap();
        let b = stacks.mount(&mut host, DOC, 2, LayerOptions::default()).unwrap();
        stacks.tick(DOC);
        let out = stacks.escape(DOC, never);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].layer, b);

        // Suppressed by the hook.
        assert!(stacks.escape(DOC, |_, _| true).is_empty());
    }

    #[test]
    fn pointer_inside_own_body_is_not_outside() {
        let mut host = Host::default();
        let mut stacks = LayerStacks::new();
        let a = stacks.mount(&mut host, DOC, 1, LayerOptions::default()).unwrap();
        stacks.tick(DOC);
        assert!(stacks.pointer_down(&host, DOC, 12, never).is_empty());
        let out = stacks.focus_in(&host, DOC, 2, never);
        assert_eq!(
            out.as_slice(),
            [Dismissal {
                layer: a,
                reason: DismissReason::Focus
            }]
        );
    }

    #[test]
    fn isolation_shadows_lower_layers_and_disables_body() {
        let mut host = Host {
            body: Some(PointerEvents::Auto),
            ..Host::default()
        };
        let mut stacks = LayerStacks::new();
        let low = stacks.mount(&mut host, DOC, 1, LayerOptions::default()).unwrap();
        let modal = stacks.mount(&mut host, DOC, 2, LayerOptions::isolated()).unwrap();
        let top = stacks.mount(&mut host, DOC, 3, LayerOptions::default()).unwrap();
        stacks.tick(DOC);

        assert_eq!(host.body, Some(PointerEvents::None));
        assert_eq!(host.override_of(1), Some(PointerEvents::None));
        assert_eq!(host.override_of(2), Some(PointerEvents::Auto));
        assert_eq!(host.override_of(3), Some(PointerEvents::Auto));
        assert_eq!(stacks.participates(low), Ok(false));
        assert_eq!(stacks.participates(modal), Ok(true));

        let layers: Vec<_> = stacks
            .pointer_down(&host, DOC, 9, never)
            .iter()
            .map(|d| d.layer)
            .collect();
        assert_eq!(layers, [top, modal]);

        stacks.unmount(&mut host, modal).unwrap();
        assert_eq!(host.body, Some(PointerEvents::Auto), "original value restored");
        assert_eq!(host.override_of(1), None);
        assert_eq!(host.override_of(2), None);
    }

    #[test]
    fn isolation_toggles_in_place() {
        let mut host = Host::default();
        let mut stacks = LayerStacks::new();
        let a = stacks.mount(&mut host, DOC, 1, LayerOptions::default()).unwrap();
        let b = stacks.mount(&mut host, DOC, 2, LayerOptions::default()).unwrap();
        stacks.set_isolation(&mut host, a, true).unwrap();
        assert_eq!(stacks.layers(DOC), [a, b]);
        assert_eq!(host.body, Some(PointerEvents::None));
        stacks.set_isolation(&mut host, a, false).unwrap();
        assert_eq!(host.body, None);
    }

    #[test]
    fn logical_children_count_as_inside() {
        let mut host = Host::default();
        let mut stacks = LayerStacks::new();
        let menu = stacks.mount(&mut host, DOC, 1, LayerOptions::default()).unwrap();
        let sub = stacks
            .mount(&mut host, DOC, 5, LayerOptions::default().with_parent(menu))
            .unwrap();
        stacks.tick(DOC);

        // Inside the submenu: neither is dismissed.
        assert!(stacks.pointer_down(&host, DOC, 51, never).is_empty());
        // Inside the parent menu only: the submenu is outside.
        let out = stacks.pointer_down(&host, DOC, 11, never);
        assert_eq!(out.iter().map(|d| d.layer).collect::<Vec<_>>(), [sub]);
    }

    #[test]
    fn stacks_are_per_document_and_disposed_when_empty() {
        let mut host = Host::default();
        let mut stacks = LayerStacks::new();
        let a = stacks.mount(&mut host, 0_u8, 1, LayerOptions::default()).unwrap();
        let b = stacks.mount(&mut host, 1_u8, 1, LayerOptions::default()).unwrap();
        assert_eq!(stacks.topmost(0), Some(a));
        assert_eq!(stacks.topmost(1), Some(b));
        assert_eq!(
            stacks.mount(&mut host, 1, 2, LayerOptions::default().with_parent(a)),
            Err(LayerError::ForeignParent(a))
        );

        let before = stacks.revision(0);
        stacks.unmount(&mut host, a).unwrap();
        assert!(!stacks.has_stack(0));
        assert_ne!(stacks.revision(0), before);
        assert_eq!(stacks.unmount(&mut host, a), Err(LayerError::UnknownLayer(a)));
    }

    #[test]
    fn prune_removes_detached_layers() {
        let mut host = Host::default();
        let mut stacks = LayerStacks::new();
        let a = stacks.mount(&mut host, DOC, 1, LayerOptions::isolated()).unwrap();
        let b = stacks.mount(&mut host, DOC, 2, LayerOptions::default()).unwrap();
        host.dead = vec![1];
        assert_eq!(stacks.prune(&mut host, DOC), [a]);
        assert_eq!(stacks.layers(DOC), [b]);
        assert_eq!(host.body, None, "isolation released by pruning");
    }
}
