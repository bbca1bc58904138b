// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The roving focus group state machine.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use understory_collection::{Collection, DocumentOrder, ItemId, ReadOrder};
use understory_state::Controllable;

use crate::RovingError;
use crate::keys::{Key, KeyEvent, Modifiers};

/// Host operations needed to move focus.
pub trait FocusHost<K> {
    /// The currently focused node, if any.
    fn active_element(&self) -> Option<K>;

    /// Ask the host to focus `node`. The host may refuse; callers observe the
    /// result through [`FocusHost::active_element`].
    fn focus(&mut self, node: K, prevent_scroll: bool);
}

/// Axis along which arrow keys move focus.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Left/right arrows.
    Horizontal,
    /// Up/down arrows.
    Vertical,
}

/// Configuration of a [`RovingFocusGroup`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RovingOptions {
    /// Restrict arrow keys to one axis; `None` accepts both.
    pub orientation: Option<Orientation>,
    /// Wrap from the last item to the first and back.
    pub looping: bool,
    /// Pass "prevent scroll" to the host when moving focus.
    pub prevent_scroll_on_focus: bool,
}

impl Default for RovingOptions {
    fn default() -> Self {
        Self {
            orientation: None,
            looping: false,
            prevent_scroll_on_focus: true,
        }
    }
}

impl RovingOptions {
    /// Set the orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    /// Enable or disable wrapping.
    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }
}

/// Per-item flags.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RovingItem {
    /// Whether the item can take focus. Unfocusable items keep their document
    /// position but are never candidates.
    pub focusable: bool,
    /// Whether the item carries the widget's current selection; keyboard entry
    /// into the group prefers it.
    pub active: bool,
}

impl Default for RovingItem {
    fn default() -> Self {
        Self {
            focusable: true,
            active: false,
        }
    }
}

impl RovingItem {
    /// A disabled item.
    pub fn disabled() -> Self {
        Self {
            focusable: false,
            active: false,
        }
    }

    /// A focusable item carrying the current selection.
    pub fn active() -> Self {
        Self {
            focusable: true,
            active: true,
        }
    }
}

/// Where keyboard navigation should go.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FocusIntent {
    /// First focusable item.
    First,
    /// Last focusable item.
    Last,
    /// Previous focusable item.
    Prev,
    /// Next focusable item.
    Next,
}

/// Map a key to a navigation intent, honoring the group orientation.
pub fn focus_intent(key: Key, orientation: Option<Orientation>) -> Option<FocusIntent> {
    match (key, orientation) {
        (Key::ArrowLeft | Key::ArrowRight, Some(Orientation::Vertical))
        | (Key::ArrowUp | Key::ArrowDown, Some(Orientation::Horizontal)) => None,
        (Key::ArrowLeft | Key::ArrowUp, _) => Some(FocusIntent::Prev),
        (Key::ArrowRight | Key::ArrowDown, _) => Some(FocusIntent::Next),
        (Key::Home | Key::PageUp, _) => Some(FocusIntent::First),
        (Key::End | Key::PageDown, _) => Some(FocusIntent::Last),
        _ => None,
    }
}

/// Result of a pointer press on an item.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PointerDown {
    /// The host should prevent the default action (focusing the element).
    pub prevent_default: bool,
}

/// Focus the first candidate that accepts focus, walking circularly from `start`.
///
/// Stops when the host's active element changes, or when the walk reaches the
/// element that was active before it began. Returns the newly focused node.
pub fn focus_first<K: Copy + PartialEq>(
    host: &mut impl FocusHost<K>,
    candidates: &[K],
    prevent_scroll: bool,
    start: usize,
) -> Option<K> {
    let len = candidates.len();
    if len == 0 {
        return None;
    }
    let previously_focused = host.active_element();
    for step in 0..len {
        let candidate = candidates[(start + step) % len];
        if Some(candidate) == previously_focused {
            return None;
        }
        host.focus(candidate, prevent_scroll);
        let now = host.active_element();
        if now != previously_focused {
            return now;
        }
    }
    None
}

type TabStopCallback<K> = Box<dyn FnMut(Option<K>)>;

/// Roving tab stop state for one container.
pub struct RovingFocusGroup<K> {
    options: RovingOptions,
    items: Collection<K, RovingItem>,
    tab_stop: Controllable<Option<K>>,
    on_tab_stop_change: Option<TabStopCallback<K>>,
    tabbing_out: bool,
    focus_from_pointer: bool,
}

impl<K: fmt::Debug> fmt::Debug for RovingFocusGroup<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RovingFocusGroup")
            .field("options", &self.options)
            .field("items", &self.items)
            .field("tab_stop", &self.tab_stop)
            .field("tabbing_out", &self.tabbing_out)
            .field("focus_from_pointer", &self.focus_from_pointer)
            .finish_non_exhaustive()
    }
}

impl<K: Copy + PartialEq + fmt::Debug> RovingFocusGroup<K> {
    /// Create an empty group with an unset, uncontrolled tab stop.
    pub fn new(options: RovingOptions) -> Self {
        Self {
            options,
            items: Collection::new(),
            tab_stop: Controllable::uncontrolled(None),
            on_tab_stop_change: None,
            tabbing_out: false,
            focus_from_pointer: false,
        }
    }

    /// Start from `node` as the (uncontrolled) tab stop.
    pub fn with_default_tab_stop(mut self, node: K) -> Self {
        self.tab_stop = Controllable::uncontrolled(Some(node));
        self
    }

    /// Let the owner control the tab stop.
    pub fn with_controlled_tab_stop(mut self, node: Option<K>) -> Self {
        self.tab_stop = Controllable::controlled(node);
        self
    }

    /// Called whenever the group requests a new tab stop.
    pub fn on_tab_stop_change(mut self, f: impl FnMut(Option<K>) + 'static) -> Self {
        self.on_tab_stop_change = Some(Box::new(f));
        self
    }

    /// Apply the owner's latest controlled tab stop (`None` for uncontrolled).
    pub fn sync_tab_stop(&mut self, controlled: Option<Option<K>>) {
        self.tab_stop.sync(controlled);
    }

    /// Current options.
    pub fn options(&self) -> &RovingOptions {
        &self.options
    }

    /// Replace options.
    pub fn set_options(&mut self, options: RovingOptions) {
        self.options = options;
    }

    /// Register an item.
    pub fn register(&mut self, node: K, item: RovingItem) -> ItemId {
        self.items.register(node, item)
    }

    /// Update an item's flags (for example when it becomes disabled).
    pub fn update_item(&mut self, id: ItemId, item: RovingItem) -> Result<(), RovingError> {
        self.items
            .set(id, item)
            .map(|_| ())
            .ok_or(RovingError::UnknownItem(id))
    }

    /// Remove an item; returns its node.
    pub fn unregister(&mut self, id: ItemId) -> Result<K, RovingError> {
        self.items
            .unregister(id)
            .map(|item| item.node)
            .ok_or(RovingError::UnknownItem(id))
    }

    /// The registered items.
    pub fn items(&self) -> &Collection<K, RovingItem> {
        &self.items
    }

    /// The current tab stop.
    pub fn tab_stop(&self) -> Option<K> {
        *self.tab_stop.get()
    }

    /// Number of focusable items.
    pub fn focusable_count(&self) -> usize {
        self.items.iter().filter(|item| item.data.focusable).count()
    }

    /// Whether Shift+Tab is taking focus out of the group.
    pub fn is_tabbing_out(&self) -> bool {
        self.tabbing_out
    }

    /// `tabIndex` for the container: `0` only when reachable and not tabbing out.
    pub fn container_tab_index(&self) -> i32 {
        if self.tabbing_out || self.focusable_count() == 0 {
            -1
        } else {
            0
        }
    }

    /// `tabIndex` for an item: `0` for the tab stop, `-1` otherwise.
    pub fn item_tab_index(&self, id: ItemId) -> Result<i32, RovingError> {
        let node = self.node_of(id)?;
        Ok(if self.tab_stop() == Some(node) { 0 } else { -1 })
    }

    /// A pointer press landed in the container.
    pub fn container_pointer_down(&mut self) {
        self.focus_from_pointer = true;
    }

    /// A pointer press landed on an item.
    ///
    /// The press also counts as a container press.
    pub fn item_pointer_down(&mut self, id: ItemId) -> Result<PointerDown, RovingError> {
        let item = self.items.get(id).ok_or(RovingError::UnknownItem(id))?;
        let (node, focusable) = (item.node, item.data.focusable);
        self.focus_from_pointer = true;
        if !focusable {
            return Ok(PointerDown {
                prevent_default: true,
            });
        }
        self.set_tab_stop(Some(node));
        Ok(PointerDown::default())
    }

    /// An item received focus.
    pub fn item_focus(&mut self, id: ItemId) -> Result<(), RovingError> {
        let node = self.node_of(id)?;
        self.set_tab_stop(Some(node));
        Ok(())
    }

    /// A key was pressed on an item. Returns the node that received focus.
    ///
    /// Keys with a navigation intent should have their default action
    /// prevented by the host even when focus does not move.
    pub fn item_key_down<H>(
        &mut self,
        host: &mut H,
        id: ItemId,
        event: KeyEvent,
    ) -> Result<Option<K>, RovingError>
    where
        H: FocusHost<K> + DocumentOrder<K>,
    {
        let node = self.node_of(id)?;
        if event.key == Key::Tab && event.modifiers.contains(Modifiers::SHIFT) {
            self.tabbing_out = true;
            return Ok(None);
        }
        if !event.at_target {
            return Ok(None);
        }
        let Some(intent) = focus_intent(event.key, self.options.orientation) else {
            return Ok(None);
        };
        if !event.modifiers.is_empty() {
            return Ok(None);
        }
        Ok(self.navigate(host, Some(node), intent))
    }

    /// Move focus from `from` according to `intent`.
    ///
    /// `Prev`/`Next` start after `from` (or at the edge when `from` is not a
    /// focusable item) and wrap only when looping.
    pub fn navigate<H>(&mut self, host: &mut H, from: Option<K>, intent: FocusIntent) -> Option<K>
    where
        H: FocusHost<K> + DocumentOrder<K>,
    {
        let mut candidates = self.focusable_nodes(&*host);
        if matches!(intent, FocusIntent::Last | FocusIntent::Prev) {
            candidates.reverse();
        }
        let mut start = 0;
        if matches!(intent, FocusIntent::Prev | FocusIntent::Next) {
            let after = from
                .and_then(|f| candidates.iter().position(|&c| c == f))
                .map_or(0, |i| i + 1);
            if self.options.looping {
                start = after;
            } else {
                candidates = candidates.split_off(after.min(candidates.len()));
            }
        }
        let focused = focus_first(
            host,
            &candidates,
            self.options.prevent_scroll_on_focus,
            start,
        )?;
        tracing::trace!(?intent, ?from, ?focused, "roving focus moved");
        self.set_tab_stop(Some(focused));
        Some(focused)
    }

    /// The container itself received focus.
    ///
    /// When focus arrived by keyboard at the container (not bubbled from an
    /// item) and the group is not being tabbed out of, focus is forwarded to
    /// the active item, the previous tab stop, or the first focusable item.
    /// `suppress_entry` is the owner's entry-focus hook result.
    pub fn container_focus<H>(&mut self, host: &mut H, at_target: bool, suppress_entry: bool) -> Option<K>
    where
        H: FocusHost<K> + DocumentOrder<K>,
    {
        let from_keyboard = !self.focus_from_pointer;
        self.focus_from_pointer = false;
        if !at_target || !from_keyboard || self.tabbing_out || suppress_entry {
            return None;
        }

        let focusable: Vec<(K, bool)> = self
            .items
            .read_all(ReadOrder::Document, &*host)
            .into_iter()
            .filter(|item| item.data.focusable)
            .map(|item| (item.node, item.data.active))
            .collect();
        let active = focusable.iter().find(|(_, a)| *a).map(|(n, _)| *n);
        let current = self
            .tab_stop()
            .filter(|t| focusable.iter().any(|(n, _)| n == t));
        let candidates: Vec<K> = active
            .into_iter()
            .chain(current)
            .chain(focusable.iter().map(|(n, _)| *n))
            .collect();

        let focused = focus_first(host, &candidates, self.options.prevent_scroll_on_focus, 0)?;
        tracing::trace!(?focused, "focus entered roving group");
        self.set_tab_stop(Some(focused));
        Some(focused)
    }

    /// The container lost focus.
    pub fn container_blur(&mut self) {
        self.tabbing_out = false;
    }

    fn node_of(&self, id: ItemId) -> Result<K, RovingError> {
        self.items
            .get(id)
            .map(|item| item.node)
            .ok_or(RovingError::UnknownItem(id))
    }

    fn focusable_nodes(&self, host: &impl DocumentOrder<K>) -> Vec<K> {
        self.items
            .read_all(ReadOrder::Document, host)
            .into_iter()
            .filter(|item| item.data.focusable)
            .map(|item| item.node)
            .collect()
    }

    fn set_tab_stop(&mut self, node: Option<K>) {
        let callback = &mut self.on_tab_stop_change;
        self.tab_stop.set(node, |next| {
            if let Some(f) = callback.as_mut() {
                f(*next);
            }
        });
    }
}
