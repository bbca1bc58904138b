// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A fruit select and a fuzzy search box over the same document.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example select_and_search`

use kurbo::Point;
use understory_dom::{Document, Element, FocusOptions};
use understory_menu::{AutoComplete, Select, SelectItem, Suggestion};
use understory_roving::{Key, KeyEvent};

const FRUITS: [&str; 5] = ["Apple", "Apricot", "Banana", "Cherry", "Peach"];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut doc = Document::new();
    let body = doc.body();
    let list = doc.append(body, Element::default().with_label("listbox"));

    let mut select: Select<_, String> = Select::new(None, Some("banana".into()))
        .on_value_change(|v| tracing::info!(value = ?v, "select value changed"))
        .on_open_change(|open| tracing::info!(open, "select open changed"));
    let mut ids = Vec::new();
    for fruit in FRUITS {
        let node = doc.append(list, Element::focusable().with_label(fruit));
        let mut item = SelectItem::new(fruit.to_lowercase(), fruit);
        if fruit == "Cherry" {
            item = item.disabled();
        }
        ids.push((node, select.add_item(node, item)));
    }

    select.trigger_key_down(Key::ArrowDown);
    doc.focus(ids[2].0, FocusOptions::default());
    select.content_key_down(&mut doc, KeyEvent::new(Key::ArrowDown));
    let focused = doc.active_element().and_then(|n| doc.label(n));
    tracing::info!(?focused, "ArrowDown skipped the disabled item");

    let found = select.typeahead(&mut doc, 'a', 0);
    let found = select.typeahead(&mut doc, 'p', 100).or(found);
    tracing::info!(found = ?found.and_then(|n| doc.label(n)), "typeahead \"ap\"");
    if let Some((_, id)) = ids.iter().find(|(node, _)| Some(*node) == found) {
        select.select(*id);
    }

    // Press, drag off the list, release: the select closes without choosing.
    select.trigger_pointer_down(true, false, Point::new(10.0, 10.0));
    select.pointer_move(Point::new(10.0, 80.0));
    let release = select.pointer_up(false);
    tracing::info!(?release, value = ?select.value(), "drag released outside");

    let mut search = AutoComplete::new(None, "");
    let results = doc.append(body, Element::default().with_label("results"));
    for (i, fruit) in FRUITS.iter().enumerate() {
        let node = doc.append(results, Element::default().with_label(*fruit));
        let group = if i < 3 { 0 } else { 1 };
        search.add(node, Suggestion::new(*fruit).in_group(group));
    }
    search.set_value("ap", |v| tracing::info!(input = %v, "search input"));
    let listing: Vec<_> = search.refresh(&doc).to_vec();
    tracing::info!(shown = listing.len(), "suggestions ranked");
    search.input_key(Key::ArrowDown, |_| {});
    search.input_key(Key::Enter, |v| tracing::info!(chosen = %v, "suggestion committed"));
}
