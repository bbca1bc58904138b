// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Menu content: keyboard entry, item selection, and checkable items.

use core::fmt;

use understory_collection::{DocumentOrder, ItemId};
use understory_roving::{
    FocusHost, FocusIntent, Key, KeyEvent, Orientation, RovingFocusGroup, RovingItem,
    RovingOptions,
};
use understory_state::{CheckedState, Controllable};

use crate::MenuError;

/// Intent for a key pressed while the content itself (not an item) has focus.
///
/// Downward keys and `PageUp`/`Home` go to the first item; upward keys and
/// `PageDown`/`End` go to the last.
pub fn menu_content_intent(key: Key) -> Option<FocusIntent> {
    match key {
        Key::ArrowDown | Key::PageUp | Key::Home => Some(FocusIntent::First),
        Key::ArrowUp | Key::PageDown | Key::End => Some(FocusIntent::Last),
        _ => None,
    }
}

/// Whether a key activates the focused item.
pub fn is_select_key(key: Key) -> bool {
    matches!(key, Key::Enter | Key::Space)
}

/// Remembers whether the menu was last driven by keyboard or pointer.
///
/// A key press anywhere sets keyboard modality; the next pointer press or move
/// clears it. Content only moves focus to its first item on entry when opened
/// by keyboard.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyboardModality {
    keyboard: bool,
}

impl KeyboardModality {
    /// Pointer modality.
    pub fn new() -> Self {
        Self::default()
    }

    /// A key went down.
    pub fn key_down(&mut self) {
        self.keyboard = true;
    }

    /// The pointer was pressed or moved.
    pub fn pointer(&mut self) {
        self.keyboard = false;
    }

    /// Whether the last interaction was by keyboard.
    pub fn is_keyboard(&self) -> bool {
        self.keyboard
    }

    /// Entry-focus hook result: suppress unless opened by keyboard or the
    /// owner already suppressed.
    pub fn suppress_entry(&self, owner_suppressed: bool) -> bool {
        owner_suppressed || !self.keyboard
    }
}

/// What the host should do after an item was activated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Disabled item; nothing happened.
    Ignored,
    /// The selection hook asked to keep the menu open.
    KeepOpen,
    /// Close the menu.
    Close,
}

/// Activate an item. `on_select` returns `true` to keep the menu open.
pub fn select_item(disabled: bool, on_select: impl FnOnce() -> bool) -> SelectOutcome {
    if disabled {
        SelectOutcome::Ignored
    } else if on_select() {
        SelectOutcome::KeepOpen
    } else {
        SelectOutcome::Close
    }
}

/// Activate a checkbox item: indeterminate and unchecked become checked,
/// checked becomes unchecked.
///
/// A hook that keeps the menu open also skips the check change.
pub fn select_checkbox_item(
    disabled: bool,
    checked: &mut Controllable<CheckedState>,
    on_select: impl FnOnce() -> bool,
    on_checked_change: impl FnOnce(CheckedState),
) -> SelectOutcome {
    select_item(disabled, || {
        if on_select() {
            return true;
        }
        let next = checked.get().toggled();
        checked.set(next, |v| on_checked_change(*v));
        false
    })
}

/// Activate a radio item, making `value` the group's value.
pub fn select_radio_item<V: PartialEq + Clone>(
    disabled: bool,
    value: &V,
    group: &mut Controllable<V>,
    on_select: impl FnOnce() -> bool,
    on_value_change: impl FnOnce(&V),
) -> SelectOutcome {
    select_item(disabled, || {
        if on_select() {
            return true;
        }
        group.set(value.clone(), on_value_change);
        false
    })
}

/// Roving focus over a menu's items plus the content-level key rules.
pub struct MenuContent<K> {
    group: RovingFocusGroup<K>,
    content: K,
}

impl<K: fmt::Debug> fmt::Debug for MenuContent<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuContent")
            .field("content", &self.content)
            .field("group", &self.group)
            .finish()
    }
}

impl<K: Copy + PartialEq + fmt::Debug> MenuContent<K> {
    /// Vertical roving focus for the content node `content`.
    pub fn new(content: K, looping: bool) -> Self {
        let options = RovingOptions::default()
            .with_orientation(Orientation::Vertical)
            .with_looping(looping);
        Self {
            group: RovingFocusGroup::new(options),
            content,
        }
    }

    /// The content node.
    pub fn content(&self) -> K {
        self.content
    }

    /// The item group.
    pub fn group(&self) -> &RovingFocusGroup<K> {
        &self.group
    }

    /// Mutable access to the item group.
    pub fn group_mut(&mut self) -> &mut RovingFocusGroup<K> {
        &mut self.group
    }

    /// Register an item.
    pub fn add_item(&mut self, node: K, disabled: bool) -> ItemId {
        let item = if disabled {
            RovingItem::disabled()
        } else {
            RovingItem::default()
        };
        self.group.register(node, item)
    }

    /// The menu opened: focus the content, then let the roving group forward
    /// focus to the first item when opened by keyboard.
    pub fn opened<H>(&mut self, host: &mut H, modality: &KeyboardModality) -> Option<K>
    where
        H: FocusHost<K> + DocumentOrder<K>,
    {
        host.focus(self.content, true);
        self.group
            .container_focus(host, true, modality.suppress_entry(false))
    }

    /// A key pressed with the content focused.
    ///
    /// Returns whether the host should prevent the default action.
    pub fn content_key_down<H>(&mut self, host: &mut H, event: KeyEvent) -> bool
    where
        H: FocusHost<K> + DocumentOrder<K>,
    {
        if !event.at_target || !event.modifiers.is_empty() {
            return false;
        }
        if event.key == Key::Tab {
            return true;
        }
        let Some(intent) = menu_content_intent(event.key) else {
            return false;
        };
        self.group.navigate(host, None, intent);
        true
    }

    /// A key pressed on an item. Returns the node that received focus.
    pub fn item_key_down<H>(
        &mut self,
        host: &mut H,
        id: ItemId,
        event: KeyEvent,
    ) -> Result<Option<K>, MenuError>
    where
        H: FocusHost<K> + DocumentOrder<K>,
    {
        Ok(self.group.item_key_down(host, id, event)?)
    }

    /// The pointer entered an item: enabled items take focus, disabled ones
    /// hand it back to the content.
    pub fn item_pointer_enter(
        &mut self,
        host: &mut impl FocusHost<K>,
        id: ItemId,
    ) -> Result<(), MenuError> {
        let item = self
            .group
            .items()
            .get(id)
            .ok_or(MenuError::UnknownItem(id))?;
        if item.data.focusable {
            host.focus(item.node, true);
        } else {
            host.focus(self.content, true);
        }
        Ok(())
    }

    /// The pointer left an item; focus returns to the content.
    pub fn item_pointer_leave(&mut self, host: &mut impl FocusHost<K>) {
        host.focus(self.content, true);
    }
}
