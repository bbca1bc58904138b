// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Select: trigger toggling, the press-drag-release pointer session,
//! keyboard navigation in the list, and typeahead.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Vec2};
use understory_collection::{Collection, DocumentOrder, ItemId, ReadOrder};
use understory_roving::{FocusHost, FocusIntent, Key, KeyEvent, focus_first};
use understory_state::Controllable;

/// Pointer travel below which releasing after the opening press selects nothing.
pub const DRAG_THRESHOLD: f64 = 10.0;

/// Idle time after which the typeahead buffer starts over.
pub const TYPEAHEAD_RESET_MS: u64 = 1000;

/// Window-level events that close an open select.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectEvent {
    /// The window lost focus.
    WindowBlur,
    /// The window was resized.
    WindowResize,
}

/// What a pointer release after the opening press means.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointerRelease {
    /// The pointer barely moved: prevent the release from selecting.
    Suppress,
    /// The pointer was dragged and released outside the content: close.
    Close,
    /// Let the release reach the item under it.
    Pass,
}

/// Tracks a press on the trigger until the matching release.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SelectPointerSession {
    origin: Point,
    delta: Vec2,
}

impl SelectPointerSession {
    /// Start at the trigger press position (page coordinates).
    pub fn new(origin: Point) -> Self {
        Self {
            origin,
            delta: Vec2::ZERO,
        }
    }

    /// The pointer moved.
    pub fn pointer_move(&mut self, pos: Point) {
        self.delta = Vec2::new((pos.x - self.origin.x).abs(), (pos.y - self.origin.y).abs());
    }

    /// The pointer was released; `inside_content` says where.
    pub fn pointer_up(&self, inside_content: bool) -> PointerRelease {
        if self.delta.x < DRAG_THRESHOLD && self.delta.y < DRAG_THRESHOLD {
            PointerRelease::Suppress
        } else if inside_content {
            PointerRelease::Pass
        } else {
            PointerRelease::Close
        }
    }
}

/// Incremental type-to-find over item labels.
#[derive(Clone, Debug, Default)]
pub struct Typeahead {
    buffer: String,
    last: Option<u64>,
}

impl Typeahead {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current search string.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Append `ch` typed at `now`, first clearing a stale buffer.
    pub fn push(&mut self, ch: char, now: u64) -> &str {
        if self.last.is_some_and(|t| now.saturating_sub(t) >= TYPEAHEAD_RESET_MS) {
            self.buffer.clear();
        }
        self.buffer.push(ch);
        self.last = Some(now);
        &self.buffer
    }

    /// Forget the buffer.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.last = None;
    }

    /// Index of the next label matching the buffer, searching from `current`.
    ///
    /// A buffer of one repeated character ("aaa") cycles through labels
    /// starting with that character; the current item is skipped for
    /// single-character searches.
    pub fn find(&self, labels: &[&str], current: Option<usize>) -> Option<usize> {
        let mut chars = self.buffer.chars();
        let first = chars.next()?;
        let repeated = chars.clone().next().is_some() && chars.all(|c| c == first);
        let search: String = if repeated {
            first.to_lowercase().collect()
        } else {
            self.buffer.to_lowercase()
        };
        let single = search.chars().count() == 1;
        let len = labels.len();
        let start = current.unwrap_or(0);
        (0..len)
            .map(|step| (start + step) % len)
            .filter(|&i| !(single && Some(i) == current))
            .find(|&i| labels[i].to_lowercase().starts_with(&search))
            .filter(|&i| Some(i) != current)
    }
}

/// One option in a select list.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectItem<V> {
    /// Value committed when chosen.
    pub value: V,
    /// Disabled items are skipped by navigation and cannot be chosen.
    pub disabled: bool,
    /// Text used by typeahead.
    pub text: String,
}

impl<V> SelectItem<V> {
    /// An enabled item.
    pub fn new(value: V, text: impl Into<String>) -> Self {
        Self {
            value,
            disabled: false,
            text: text.into(),
        }
    }

    /// Mark disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

type Callback<T> = alloc::boxed::Box<dyn FnMut(&T)>;

/// State for one select widget.
pub struct Select<K, V> {
    value: Controllable<Option<V>>,
    open: Controllable<bool>,
    disabled: bool,
    looping: bool,
    items: Collection<K, SelectItem<V>>,
    session: Option<SelectPointerSession>,
    typeahead: Typeahead,
    on_value_change: Option<Callback<Option<V>>>,
    on_open_change: Option<Callback<bool>>,
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Select<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Select")
            .field("value", &self.value)
            .field("open", &self.open)
            .field("disabled", &self.disabled)
            .field("looping", &self.looping)
            .field("items", &self.items.len())
            .field("session", &self.session)
            .field("typeahead", &self.typeahead)
            .finish_non_exhaustive()
    }
}

impl<K: Copy + PartialEq, V: Clone + PartialEq> Select<K, V> {
    /// A closed select holding `value` (controlled) or starting at `default`.
    pub fn new(value: Option<Option<V>>, default: Option<V>) -> Self {
        Self {
            value: Controllable::from_props(value, default),
            open: Controllable::uncontrolled(false),
            disabled: false,
            looping: false,
            items: Collection::new(),
            session: None,
            typeahead: Typeahead::new(),
            on_value_change: None,
            on_open_change: None,
        }
    }

    /// Notify on value changes.
    pub fn on_value_change(mut self, f: impl FnMut(&Option<V>) + 'static) -> Self {
        self.on_value_change = Some(alloc::boxed::Box::new(f));
        self
    }

    /// Notify on open changes.
    pub fn on_open_change(mut self, f: impl FnMut(&bool) + 'static) -> Self {
        self.on_open_change = Some(alloc::boxed::Box::new(f));
        self
    }

    /// Wrap around at the ends of the list.
    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Disable the trigger.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Take the owner's controlled value.
    pub fn sync_value(&mut self, value: Option<Option<V>>) {
        self.value.sync(value);
    }

    /// Take the owner's controlled open state.
    pub fn sync_open(&mut self, open: Option<bool>) {
        self.open.sync(open);
    }

    /// Selected value.
    pub fn value(&self) -> Option<&V> {
        self.value.get().as_ref()
    }

    /// Whether the list is open.
    pub fn is_open(&self) -> bool {
        *self.open.get()
    }

    /// Registered items.
    pub fn items(&self) -> &Collection<K, SelectItem<V>> {
        &self.items
    }

    /// Register an item.
    pub fn add_item(&mut self, node: K, item: SelectItem<V>) -> ItemId {
        self.items.register(node, item)
    }

    /// Remove an item.
    pub fn remove_item(&mut self, id: ItemId) -> Option<SelectItem<V>> {
        self.items.unregister(id).map(|item| item.data)
    }

    /// Request an open state.
    pub fn set_open(&mut self, open: bool) -> bool {
        let cb = &mut self.on_open_change;
        let changed = self.open.set(open, |v| {
            if let Some(f) = cb {
                f(v);
            }
        });
        if changed && !open {
            self.typeahead.reset();
        }
        changed
    }

    /// A press on the trigger. Only the primary button without Ctrl toggles
    /// and starts a pointer session.
    pub fn trigger_pointer_down(&mut self, primary: bool, ctrl: bool, pos: Point) {
        if !primary || ctrl {
            return;
        }
        if !self.disabled {
            let open = !self.is_open();
            self.set_open(open);
        }
        self.session = Some(SelectPointerSession::new(pos));
    }

    /// A key on the trigger. Returns whether to prevent the default action.
    pub fn trigger_key_down(&mut self, key: Key) -> bool {
        if !matches!(key, Key::Enter | Key::Space | Key::ArrowDown) {
            return false;
        }
        if !self.disabled {
            let open = !self.is_open();
            self.set_open(open);
        }
        true
    }

    /// The pointer moved during a session.
    pub fn pointer_move(&mut self, pos: Point) {
        if let Some(session) = &mut self.session {
            session.pointer_move(pos);
        }
    }

    /// The pointer was released. Ends the session.
    pub fn pointer_up(&mut self, inside_content: bool) -> PointerRelease {
        let Some(session) = self.session.take() else {
            return PointerRelease::Pass;
        };
        let release = session.pointer_up(inside_content);
        if release == PointerRelease::Close {
            self.set_open(false);
        }
        release
    }

    /// Choose the item `id`, committing its value and closing.
    pub fn select(&mut self, id: ItemId) -> bool {
        let Some(item) = self.items.get(id) else {
            return false;
        };
        if item.data.disabled {
            return false;
        }
        let next = Some(item.data.value.clone());
        let cb = &mut self.on_value_change;
        self.value.set(next, |v| {
            if let Some(f) = cb {
                f(v);
            }
        });
        self.set_open(false);
        true
    }

    /// Whether the item carries the selected value.
    pub fn is_selected(&self, id: ItemId) -> bool {
        self.items
            .get(id)
            .is_some_and(|item| self.value() == Some(&item.data.value))
    }

    /// A window event; blur and resize close the list.
    pub fn window_event(&mut self, event: SelectEvent) {
        tracing::trace!(?event, "select closed by window event");
        self.set_open(false);
    }

    fn enabled_nodes(&self, host: &impl DocumentOrder<K>) -> Vec<(K, &str)> {
        self.items
            .read_all(ReadOrder::Document, host)
            .into_iter()
            .filter(|item| !item.data.disabled)
            .map(|item| (item.node, item.data.text.as_str()))
            .collect()
    }

    /// A key inside the open list. Returns whether to prevent the default
    /// action.
    pub fn content_key_down<H>(&mut self, host: &mut H, event: KeyEvent) -> bool
    where
        H: FocusHost<K> + DocumentOrder<K>,
    {
        if event.key == Key::Tab {
            return true;
        }
        let Some(intent) = select_intent(event.key) else {
            return false;
        };
        let active = host.active_element();
        let mut candidates: Vec<K> = self
            .enabled_nodes(&*host)
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        if matches!(intent, FocusIntent::Last | FocusIntent::Prev) {
            candidates.reverse();
        }
        let mut start = 0;
        if matches!(intent, FocusIntent::Prev | FocusIntent::Next) {
            let after = active
                .and_then(|a| candidates.iter().position(|&c| c == a))
                .map_or(0, |i| i + 1);
            if self.looping && !candidates.is_empty() {
                start = after % candidates.len();
            } else {
                candidates = candidates.split_off(after.min(candidates.len()));
            }
        }
        focus_first(host, &candidates, false, start);
        true
    }

    /// A printable character typed in the open list. Focuses and returns the
    /// matching item.
    pub fn typeahead<H>(&mut self, host: &mut H, ch: char, now: u64) -> Option<K>
    where
        H: FocusHost<K> + DocumentOrder<K>,
    {
        self.typeahead.push(ch, now);
        let enabled = self.enabled_nodes(&*host);
        let labels: Vec<&str> = enabled.iter().map(|(_, t)| *t).collect();
        let active = host.active_element();
        let current = active.and_then(|a| enabled.iter().position(|(n, _)| *n == a));
        let next = enabled[self.typeahead.find(&labels, current)?].0;
        host.focus(next, false);
        Some(next)
    }
}

/// Navigation intent for keys in an open select list.
pub fn select_intent(key: Key) -> Option<FocusIntent> {
    match key {
        Key::ArrowUp => Some(FocusIntent::Prev),
        Key::ArrowDown => Some(FocusIntent::Next),
        Key::PageUp | Key::Home => Some(FocusIntent::First),
        Key::PageDown | Key::End => Some(FocusIntent::Last),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_drag_suppresses_selection() {
        let mut s = SelectPointerSession::new(Point::new(100.0, 100.0));
        assert_eq!(s.pointer_up(true), PointerRelease::Suppress);
        s.pointer_move(Point::new(109.0, 91.0));
        assert_eq!(s.pointer_up(false), PointerRelease::Suppress);
        s.pointer_move(Point::new(100.0, 130.0));
        assert_eq!(s.pointer_up(true), PointerRelease::Pass);
        assert_eq!(s.pointer_up(false), PointerRelease::Close);
    }

    #[test]
    fn typeahead_buffer_resets_after_idle() {
        let mut t = Typeahead::new();
        t.push('a', 0);
        assert_eq!(t.push('p', 500), "ap");
        assert_eq!(t.push('b', 1_500), "b");
    }

    #[test]
    fn typeahead_finds_prefix_and_cycles() {
        let labels = ["Apple", "Banana", "Avocado", "apricot"];
        let mut t = Typeahead::new();
        t.push('a', 0);
        assert_eq!(t.find(&labels, None), Some(0));
        assert_eq!(t.find(&labels, Some(0)), Some(2));
        t.push('a', 10);
        assert_eq!(t.find(&labels, Some(2)), Some(3));

        let mut t = Typeahead::new();
        t.push('a', 0);
        t.push('v', 1);
        assert_eq!(t.find(&labels, Some(0)), Some(2));
        assert_eq!(t.find(&labels, Some(2)), None);
    }

    #[test]
    fn trigger_toggles_and_window_events_close() {
        let mut select: Select<u32, &str> = Select::new(None, None);
        select.trigger_pointer_down(true, true, Point::ZERO);
        assert!(!select.is_open());
        select.trigger_pointer_down(true, false, Point::ZERO);
        assert!(select.is_open());
        assert_eq!(select.pointer_up(true), PointerRelease::Suppress);
        select.window_event(SelectEvent::WindowResize);
        assert!(!select.is_open());

        assert!(select.trigger_key_down(Key::ArrowDown));
        assert!(select.is_open());
        assert!(!select.trigger_key_down(Key::ArrowUp));
    }

    #[test]
    fn select_commits_enabled_items() {
        let mut select: Select<u32, &str> = Select::new(None, Some("a"));
        let a = select.add_item(1, SelectItem::new("a", "A"));
        let b = select.add_item(2, SelectItem::new("b", "B"));
        let c = select.add_item(3, SelectItem::new("c", "C").disabled());
        assert!(select.is_selected(a));
        select.set_open(true);
        assert!(!select.select(c));
        assert!(select.is_open());
        assert!(select.select(b));
        assert_eq!(select.value(), Some(&"b"));
        assert!(!select.is_open());
    }
}
