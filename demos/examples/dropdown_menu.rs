// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A dropdown menu with a submenu, wired end to end over `understory_dom`.
//!
//! This example shows how to combine:
//! - `understory_layer` for outside-click and Escape dismissal,
//! - `understory_anchor` to place the content under its trigger,
//! - `understory_menu` (on top of `understory_roving`) for keyboard focus
//!   and submenu hover intent.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p understory_demos --example dropdown_menu`

use kurbo::{Rect, Size};
use understory_anchor::adapters::dom::measure;
use understory_anchor::{Align, AnchoredContent, PositionOptions, Side, apply_style};
use understory_dom::{Document, DocumentId, Element, NodeId};
use understory_layer::{LayerOptions, LayerStacks};
use understory_menu::{
    KeyboardModality, MenuContent, MenuLevel, OPEN_CLOSE_DELAY_MS, SelectOutcome, Submenu,
    select_checkbox_item, select_item,
};
use understory_roving::{Key, KeyEvent};
use understory_state::{CheckedState, Controllable};

const VIEWPORT: Rect = Rect::new(0.0, 0.0, 400.0, 300.0);

fn label(doc: &Document, node: Option<NodeId>) -> &str {
    node.and_then(|n| doc.label(n)).unwrap_or("<none>")
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut doc = Document::new();
    let body = doc.body();
    let trigger = doc.append(
        body,
        Element::focusable()
            .with_label("Edit")
            .with_rect(Rect::new(20.0, 10.0, 80.0, 34.0)),
    );
    let content = doc.append(
        body,
        Element::focusable()
            .with_label("edit menu")
            .with_rect(Rect::new(0.0, 0.0, 160.0, 120.0)),
    );
    let undo = doc.append(content, Element::focusable().with_label("Undo"));
    let cut = doc.append(content, Element::focusable().with_label("Cut").disabled());
    let wrap = doc.append(content, Element::focusable().with_label("Word wrap"));
    let share = doc.append(
        content,
        Element::focusable()
            .with_label("Share")
            .with_rect(Rect::new(20.0, 130.0, 180.0, 150.0)),
    );
    let outside = doc.append(body, Element::focusable().with_label("canvas"));

    // Open by keyboard: focus lands on the first enabled item.
    let mut modality = KeyboardModality::new();
    modality.key_down();

    let mut layers: LayerStacks<DocumentId, NodeId> = LayerStacks::new();
    let doc_id = doc.id();
    let layer = layers
        .mount(&mut doc, doc_id, content, LayerOptions::isolated())
        .expect("fresh stack");

    let mut anchored = AnchoredContent::new(
        PositionOptions::default()
            .with_side_offset(4.0)
            .with_collision_padding(8.0),
    );
    let m = measure(&doc, trigger, content, None, VIEWPORT, &[]);
    if let Some(placed) = anchored.update(&m) {
        let style = anchored.content_style();
        apply_style(&mut doc, content, &style);
        tracing::info!(?placed, transform = %style.transform, "content positioned");
    }

    let mut menu = MenuContent::new(content, false);
    let ids = [
        menu.add_item(undo, false),
        menu.add_item(cut, true),
        menu.add_item(wrap, false),
        menu.add_item(share, false),
    ];
    let focused = menu.opened(&mut doc, &modality);
    tracing::info!(focused = label(&doc, focused), "menu opened");

    let down = KeyEvent::new(Key::ArrowDown);
    let next = menu.item_key_down(&mut doc, ids[0], down).expect("registered item");
    tracing::info!(focused = label(&doc, next), "ArrowDown skips the disabled item");

    // Toggle "Word wrap" twice; the menu stays open on the first toggle.
    let mut word_wrap = Controllable::uncontrolled(CheckedState::Unchecked);
    let outcome = select_checkbox_item(false, &mut word_wrap, || true, |_| {});
    assert_eq!(outcome, SelectOutcome::KeepOpen);
    let outcome = select_checkbox_item(false, &mut word_wrap, || false, |c| {
        tracing::info!(checked = ?c, "word wrap toggled");
    });
    tracing::info!(?outcome, "checkbox selected");

    // Hover "Share" for the submenu delay.
    let mut level = MenuLevel::new();
    level.set_open(true);
    let mut submenu = Submenu::new(&mut level);
    submenu.pointer_enter_trigger(0);
    let transition = submenu.tick(&mut level, OPEN_CLOSE_DELAY_MS);
    tracing::info!(?transition, phase = ?submenu.phase(&level), "submenu hover");

    let sub_content = doc.append(
        body,
        Element::focusable()
            .with_label("share menu")
            .with_rect(Rect::new(0.0, 0.0, 120.0, 60.0)),
    );
    let sub_layer = layers
        .mount(
            &mut doc,
            doc_id,
            sub_content,
            LayerOptions::default().with_parent(layer),
        )
        .expect("parent is mounted");
    let mut sub_anchor = AnchoredContent::new(
        PositionOptions::default().with_placement(Side::Right, Align::Start),
    );
    let m = measure(&doc, share, sub_content, None, VIEWPORT, &[]);
    if sub_anchor.update(&m).is_some() {
        let r = sub_anchor.result().expect("just placed");
        let rect = r.rect(Size::new(120.0, 60.0));
        tracing::info!(side = r.placement.side.as_str(), ?rect, "submenu positioned");
        apply_style(&mut doc, sub_content, &sub_anchor.content_style());
    }

    // The next turn of the event loop arms the listeners.
    layers.tick(doc_id);

    for d in layers.escape(doc_id, |_, _| false) {
        tracing::info!(layer = ?d.layer, reason = d.reason.as_str(), "dismissed");
        if d.layer == sub_layer {
            submenu.dismissed(&mut level, d.reason, OPEN_CLOSE_DELAY_MS + 1);
            layers.unmount(&mut doc, sub_layer).expect("mounted");
        }
    }

    for d in layers.pointer_down(&doc, doc_id, outside, |_, _| false) {
        tracing::info!(layer = ?d.layer, reason = d.reason.as_str(), "dismissed");
    }
    let outcome = select_item(false, || false);
    tracing::info!(?outcome, "undo selected");
    layers.unmount(&mut doc, layer).expect("mounted");
    anchored.unmount();
    sub_anchor.unmount();
    tracing::info!(active = label(&doc, doc.active_element()), "done");
}
