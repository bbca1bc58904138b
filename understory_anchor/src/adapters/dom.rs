// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchored content over an [`understory_dom::Document`].

use alloc::vec::Vec;

use kurbo::{Rect, Size};
use understory_dom::{Document, NodeId};

use crate::{Measurements, StyleSink, boundary_rect};

impl StyleSink<NodeId> for Document {
    fn set_property(&mut self, node: NodeId, name: &str, value: &str) {
        Self::set_property(self, node, name, value);
    }

    fn remove_property(&mut self, node: NodeId, name: &str) {
        Self::remove_property(self, node, name);
    }
}

/// Read anchor, content, and arrow geometry from `doc`.
///
/// A removed anchor measures as `None`, which keeps the content unpositioned.
/// The content size falls back to zero when it has no layout yet.
pub fn measure(
    doc: &Document,
    anchor: NodeId,
    content: NodeId,
    arrow: Option<NodeId>,
    viewport: Rect,
    boundaries: &[NodeId],
) -> Measurements {
    let clip: Vec<Rect> = boundaries.iter().filter_map(|b| doc.rect(*b)).collect();
    Measurements {
        anchor: doc.rect(anchor),
        content: doc.rect(content).map_or(Size::ZERO, |r| r.size()),
        arrow: arrow.and_then(|a| doc.rect(a)).map(|r| r.size()),
        boundary: boundary_rect(viewport, &clip),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnchoredContent, Placed, PositionOptions, apply_style};
    use understory_dom::Element;

    #[test]
    fn positions_document_content() {
        let mut doc = Document::new();
        let body = doc.body();
        let trigger = doc.append(
            body,
            Element::focusable()
                .with_label("trigger")
                .with_rect(Rect::new(50.0, 50.0, 90.0, 70.0)),
        );
        let popup = doc.append(
            body,
            Element::default()
                .with_label("popup")
                .with_rect(Rect::new(0.0, 0.0, 60.0, 30.0))
                .with_z_index(5),
        );

        let mut content = AnchoredContent::new(PositionOptions::default());
        content.set_z_index(doc.z_index(popup));
        let viewport = Rect::new(0.0, 0.0, 200.0, 200.0);
        let m = measure(&doc, trigger, popup, None, viewport, &[]);
        assert_eq!(content.update(&m), Some(Placed::First));

        apply_style(&mut doc, popup, &content.content_style());
        assert_eq!(doc.property(popup, "transform"), Some("translate(40px, 70px)"));
        assert_eq!(doc.property(popup, "z-index"), Some("5"));
        assert_eq!(doc.property(popup, "--popper-anchor-height"), Some("20px"));
    }

    #[test]
    fn removed_anchor_is_not_measured() {
        let mut doc = Document::new();
        let body = doc.body();
        let trigger = doc.append(body, Element::default().with_rect(Rect::new(0.0, 0.0, 1.0, 1.0)));
        let popup = doc.append(body, Element::default());
        doc.remove(trigger);
        let m = measure(&doc, trigger, popup, None, Rect::new(0.0, 0.0, 10.0, 10.0), &[]);
        assert_eq!(m.anchor, None);
        assert_eq!(m.content, Size::ZERO);
    }
}
