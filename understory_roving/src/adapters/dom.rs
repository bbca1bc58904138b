// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Roving focus against [`understory_dom::Document`].
//!
//! Document order comes from `understory_collection`'s adapter; this module
//! adds the focus host and writes the group's `tabIndex` values back into the
//! document.

use understory_dom::{Document, FocusOptions, NodeId};

use crate::{FocusHost, RovingFocusGroup};

impl FocusHost<NodeId> for Document {
    fn active_element(&self) -> Option<NodeId> {
        Self::active_element(self)
    }

    fn focus(&mut self, node: NodeId, prevent_scroll: bool) {
        let options = if prevent_scroll {
            FocusOptions::prevent_scroll()
        } else {
            FocusOptions::default()
        };
        Self::focus(self, node, options);
    }
}

/// Write `tabIndex` for the container and every registered item.
pub fn sync_tab_indices(doc: &mut Document, container: NodeId, group: &RovingFocusGroup<NodeId>) {
    doc.set_tab_index(container, Some(group.container_tab_index()));
    let tab_stop = group.tab_stop();
    for item in group.items().iter() {
        let index = if tab_stop == Some(item.node) { 0 } else { -1 };
        doc.set_tab_index(item.node, Some(index));
    }
}
