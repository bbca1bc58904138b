// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`DocumentOrder`] for [`understory_dom::Document`].

use core::cmp::Ordering;

use understory_dom::{Document, NodeId};

use crate::DocumentOrder;

impl DocumentOrder<NodeId> for Document {
    fn compare_document_position(&self, a: NodeId, b: NodeId) -> Ordering {
        Self::compare_document_position(self, a, b)
    }

    fn is_placed(&self, node: NodeId) -> bool {
        self.is_alive(node)
    }
}
