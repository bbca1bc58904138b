// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Menus driven against a real `understory_dom` document.

use kurbo::{Point, Rect};
use understory_dom::{Document, DocumentId, Element, NodeId};
use understory_layer::{DismissReason, LayerId, LayerOptions, LayerStacks};
use understory_menu::{
    KeyboardModality, MenuContent, MenuLevel, PointerRelease, Select, SelectItem, SelectOutcome,
    Submenu, SubmenuTransition, select_checkbox_item,
};
use understory_roving::{Key, KeyEvent};
use understory_state::{CheckedState, Controllable};

struct EditMenu {
    doc: Document,
    content: NodeId,
    undo: NodeId,
    redo: NodeId,
    copy: NodeId,
    menu: MenuContent<NodeId>,
}

fn edit_menu() -> EditMenu {
    let mut doc = Document::new();
    let body = doc.body();
    let content = doc.append(body, Element::focusable().with_label("content"));
    let undo = doc.append(content, Element::focusable().with_label("Undo"));
    let redo = doc.append(content, Element::focusable().with_label("Redo"));
    let cut = doc.append(content, Element::focusable().with_label("Cut").disabled());
    let copy = doc.append(content, Element::focusable().with_label("Copy"));

    let mut menu = MenuContent::new(content, false);
    menu.add_item(undo, false);
    menu.add_item(redo, false);
    menu.add_item(cut, true);
    menu.add_item(copy, false);
    EditMenu {
        doc,
        content,
        undo,
        redo,
        copy,
        menu,
    }
}

#[test]
fn keyboard_walks_enabled_items_without_wrapping() {
    let EditMenu {
        mut doc,
        undo,
        redo,
        copy,
        mut menu,
        ..
    } = edit_menu();
    let mut modality = KeyboardModality::new();
    modality.key_down();

    assert_eq!(menu.opened(&mut doc, &modality), Some(undo));
    assert_eq!(doc.active_element(), Some(undo));

    let ids: Vec<_> = menu.group().items().iter().map(|i| i.id).collect();
    let down = KeyEvent::new(Key::ArrowDown);
    assert_eq!(menu.item_key_down(&mut doc, ids[0], down), Ok(Some(redo)));
    assert_eq!(menu.item_key_down(&mut doc, ids[1], down), Ok(Some(copy)));
    assert_eq!(menu.item_key_down(&mut doc, ids[3], down), Ok(None));
    assert_eq!(doc.active_element(), Some(copy));
}

#[test]
fn pointer_open_leaves_focus_on_content() {
    let EditMenu {
        mut doc,
        content,
        undo,
        mut menu,
        ..
    } = edit_menu();
    let modality = KeyboardModality::new();
    assert_eq!(menu.opened(&mut doc, &modality), None);
    assert_eq!(doc.active_element(), Some(content));

    // Keys on the content itself jump to the edges.
    assert!(menu.content_key_down(&mut doc, KeyEvent::new(Key::Home)));
    assert_eq!(doc.active_element(), Some(undo));
    assert!(menu.content_key_down(&mut doc, KeyEvent::new(Key::Tab)));
    assert!(!menu.content_key_down(&mut doc, KeyEvent::new(Key::End).from_descendant()));
}

#[test]
fn hovering_a_disabled_item_focuses_the_content() {
    let EditMenu {
        mut doc,
        content,
        mut menu,
        ..
    } = edit_menu();
    let ids: Vec<_> = menu.group().items().iter().map(|i| i.id).collect();
    menu.item_pointer_enter(&mut doc, ids[2]).unwrap();
    assert_eq!(doc.active_element(), Some(content));
    menu.item_pointer_enter(&mut doc, ids[1]).unwrap();
    assert_ne!(doc.active_element(), Some(content));
    menu.item_pointer_leave(&mut doc);
    assert_eq!(doc.active_element(), Some(content));
}

#[test]
fn nested_menus_dismiss_from_the_top() {
    let mut doc = Document::new();
    let body = doc.body();
    let outside = doc.append(body, Element::focusable().with_label("outside"));
    let outer = doc.append(body, Element::default().with_label("menu"));
    let outer_item = doc.append(outer, Element::focusable());
    // Portaled: a sibling of the parent menu in the tree.
    let inner = doc.append(body, Element::default().with_label("submenu"));
    let inner_item = doc.append(inner, Element::focusable());

    let mut layers: LayerStacks<DocumentId, NodeId> = LayerStacks::new();
    let id = doc.id();
    let menu = layers
        .mount(&mut doc, id, outer, LayerOptions::isolated())
        .unwrap();
    let submenu = layers
        .mount(&mut doc, id, inner, LayerOptions::default().with_parent(menu))
        .unwrap();
    layers.tick(id);

    assert!(layers.pointer_down(&doc, id, inner_item, |_, _| false).is_empty());
    assert!(layers.pointer_down(&doc, id, outer_item, |_, _| false).len() == 1);

    let dismissed = layers.pointer_down(&doc, id, outside, |_, _| false);
    let order: Vec<_> = dismissed.iter().map(|d| d.layer).collect();
    assert_eq!(order, [submenu, menu]);

    let escaped = layers.escape(id, |_, _| false);
    assert_eq!(escaped.len(), 1);
    assert_eq!(escaped[0].layer, submenu);

    // The submenu's own state closes on the escape dismissal.
    let mut level = MenuLevel::new();
    level.set_open(true);
    let mut sub = Submenu::new(&mut level);
    sub.trigger_key(&mut level, Key::ArrowRight);
    assert_eq!(
        sub.dismissed(&mut level, DismissReason::Escape, 0),
        Some(SubmenuTransition::Closed)
    );
    assert_eq!(level.open_submenu(), None);
}

#[test]
fn submenu_trigger_does_not_dismiss_its_own_submenu() {
    let mut doc = Document::new();
    let body = doc.body();
    let outer = doc.append(body, Element::default().with_label("menu"));
    let undo = doc.append(outer, Element::focusable().with_label("Undo"));
    let share = doc.append(outer, Element::focusable().with_label("Share"));
    let inner = doc.append(body, Element::default().with_label("share menu"));

    let mut layers: LayerStacks<DocumentId, NodeId> = LayerStacks::new();
    let id = doc.id();
    let menu = layers
        .mount(&mut doc, id, outer, LayerOptions::default())
        .unwrap();
    let submenu = layers
        .mount(&mut doc, id, inner, LayerOptions::default().with_parent(menu))
        .unwrap();
    layers.tick(id);

    let mut level = MenuLevel::new();
    level.set_open(true);
    let mut sub = Submenu::new(&mut level);
    sub.trigger_key(&mut level, Key::Enter);

    let guard = |target: NodeId| {
        move |layer: LayerId, reason: DismissReason| {
            layer == submenu && Submenu::is_trigger_target(share, target, reason)
        }
    };

    assert!(layers.pointer_down(&doc, id, share, guard(share)).is_empty());
    assert!(layers.focus_in(&doc, id, share, guard(share)).is_empty());
    assert!(sub.is_open(&level));

    // Any other item of the parent menu still dismisses the submenu.
    let dismissed = layers.pointer_down(&doc, id, undo, guard(undo));
    assert_eq!(dismissed.len(), 1);
    assert_eq!(dismissed[0].layer, submenu);
    assert_eq!(
        sub.dismissed(&mut level, dismissed[0].reason, 0),
        Some(SubmenuTransition::Closed)
    );
    assert_eq!(layers.escape(id, guard(share))[0].layer, submenu);
}

#[test]
fn controlled_checkbox_follows_the_owner() {
    let mut owner = CheckedState::Indeterminate;
    let mut checked = Controllable::controlled(owner);

    let outcome = select_checkbox_item(false, &mut checked, || false, |c| owner = c);
    assert_eq!(outcome, SelectOutcome::Close);
    assert_eq!(owner, CheckedState::Checked);
    // Nothing changes until the owner re-renders.
    assert_eq!(*checked.get(), CheckedState::Indeterminate);

    checked.sync(Some(owner));
    select_checkbox_item(false, &mut checked, || false, |c| owner = c);
    assert_eq!(owner, CheckedState::Unchecked);
}

#[test]
fn select_drag_release_and_keys() {
    let mut doc = Document::new();
    let body = doc.body();
    let list = doc.append(body, Element::default().with_rect(Rect::new(0.0, 30.0, 100.0, 130.0)));
    let apple = doc.append(list, Element::focusable());
    let banana = doc.append(list, Element::focusable());
    let cherry = doc.append(list, Element::focusable());

    let mut select: Select<NodeId, &str> = Select::new(None, None);
    select.add_item(apple, SelectItem::new("apple", "Apple"));
    select.add_item(banana, SelectItem::new("banana", "Banana").disabled());
    let cherry_id = select.add_item(cherry, SelectItem::new("cherry", "Cherry"));

    // A click without movement opens and swallows its own release.
    select.trigger_pointer_down(true, false, Point::new(5.0, 5.0));
    assert!(select.is_open());
    assert_eq!(select.pointer_up(true), PointerRelease::Suppress);

    doc.focus(apple, Default::default());
    assert!(select.content_key_down(&mut doc, KeyEvent::new(Key::ArrowDown)));
    assert_eq!(doc.active_element(), Some(cherry));
    assert!(select.content_key_down(&mut doc, KeyEvent::new(Key::ArrowDown)));
    assert_eq!(doc.active_element(), Some(cherry));

    assert_eq!(select.typeahead(&mut doc, 'a', 0), Some(apple));
    assert!(select.select(cherry_id));
    assert_eq!(select.value(), Some(&"cherry"));
    assert!(!select.is_open());

    // Press, drag away, release outside: closes.
    select.trigger_pointer_down(true, false, Point::new(5.0, 5.0));
    select.pointer_move(Point::new(5.0, 300.0));
    assert_eq!(select.pointer_up(false), PointerRelease::Close);
    assert!(!select.is_open());
}
