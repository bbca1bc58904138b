// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`LayerHost`] for [`understory_dom::Document`].
//!
//! Stacks are keyed by [`understory_dom::DocumentId`], so a
//! `LayerStacks<DocumentId, NodeId>` serves any number of documents.

use understory_dom::{Document, NodeId, PointerEvents as DomPointerEvents};

use crate::{LayerHost, PointerEvents};

fn to_dom(value: PointerEvents) -> DomPointerEvents {
    match value {
        PointerEvents::Auto => DomPointerEvents::Auto,
        PointerEvents::None => DomPointerEvents::None,
    }
}

fn from_dom(value: DomPointerEvents) -> PointerEvents {
    match value {
        DomPointerEvents::Auto => PointerEvents::Auto,
        DomPointerEvents::None => PointerEvents::None,
    }
}

impl LayerHost<NodeId> for Document {
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        Self::contains(self, ancestor, node)
    }

    fn is_alive(&self, node: NodeId) -> bool {
        Self::is_alive(self, node)
    }

    fn body_pointer_events(&self) -> Option<PointerEvents> {
        self.pointer_events(self.body()).map(from_dom)
    }

    fn set_body_pointer_events(&mut self, value: Option<PointerEvents>) {
        let body = self.body();
        Self::set_pointer_events(self, body, value.map(to_dom));
    }

    fn set_pointer_events(&mut self, node: NodeId, value: Option<PointerEvents>) {
        Self::set_pointer_events(self, node, value.map(to_dom));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LayerOptions, LayerStacks};
    use understory_dom::{DocumentId, Element};

    #[test]
    fn isolation_blocks_the_document_outside_the_dialog() {
        let mut doc = Document::new();
        let body = doc.body();
        let page = doc.append(body, Element::focusable());
        let dialog = doc.append(body, Element::default());
        let button = doc.append(dialog, Element::focusable());

        let mut layers: LayerStacks<DocumentId, NodeId> = LayerStacks::new();
        let id = doc.id();
        let layer = layers
            .mount(&mut doc, id, dialog, LayerOptions::isolated())
            .unwrap();
        assert_eq!(doc.effective_pointer_events(page), DomPointerEvents::None);
        assert_eq!(doc.effective_pointer_events(button), DomPointerEvents::Auto);

        layers.unmount(&mut doc, layer).unwrap();
        assert_eq!(doc.pointer_events(body), None);
        assert_eq!(doc.pointer_events(dialog), None);
        assert_eq!(doc.effective_pointer_events(page), DomPointerEvents::Auto);
    }
}
