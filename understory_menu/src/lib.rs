// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Menu: interaction state machines for menus, submenus, selects,
//! and autocompletes.
//!
//! Each machine composes the lower Understory engines and owns no rendering:
//!
//! - [`MenuContent`] wraps a vertical
//!   [`RovingFocusGroup`](understory_roving::RovingFocusGroup) with the menu's
//!   content-level keys (`Tab` is swallowed, arrows and Home/End jump to the
//!   first or last item) and pointer-driven focus.
//! - [`select_item`], [`select_checkbox_item`] and [`select_radio_item`]
//!   decide whether activation closes the menu and push checked/value
//!   changes through [`Controllable`](understory_state::Controllable).
//! - [`Submenu`] and [`MenuLevel`] implement hover intent with a
//!   [`OPEN_CLOSE_DELAY_MS`] debounce, keyboard open/close, and the
//!   one-open-submenu-per-level rule. Time is passed in by the host, and
//!   [`Submenu::next_deadline`] says when to call [`Submenu::tick`].
//! - [`Select`] tracks the trigger, the value, pointer drags that release on
//!   an item, and typeahead.
//! - [`AutoComplete`] ranks suggestions with [`default_matcher`] (or a custom
//!   [`Matcher`]) and moves a highlight through them.
//!
//! Dismissal is left to `understory_layer`: hosts forward a layer's
//! [`DismissReason`](understory_layer::DismissReason) to
//! [`Submenu::dismissed`] or close the menu directly.
//!
//! ```rust
//! use understory_menu::{MenuLevel, Submenu, SubmenuTransition, OPEN_CLOSE_DELAY_MS};
//!
//! let mut level = MenuLevel::new();
//! level.set_open(true);
//! let mut sub = Submenu::new(&mut level);
//!
//! sub.pointer_enter_trigger(0);
//! assert_eq!(sub.tick(&mut level, 10), None);
//! assert_eq!(
//!     sub.tick(&mut level, OPEN_CLOSE_DELAY_MS),
//!     Some(SubmenuTransition::Opened),
//! );
//! assert_eq!(level.open_submenu(), Some(sub.id()));
//! ```
//!
//! ## Features
//!
//! - `serde`: derives `Serialize`/`Deserialize` for [`Suggestion`] and
//!   [`SelectItem`], and enables `understory_state/serde`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod autocomplete;
mod menu;
mod select;
mod submenu;

pub use autocomplete::{
    AutoComplete, Matcher, Suggestion, default_matcher, filter_and_sort, process_input,
};
pub use menu::{
    KeyboardModality, MenuContent, SelectOutcome, is_select_key, menu_content_intent,
    select_checkbox_item, select_item, select_radio_item,
};
pub use select::{
    DRAG_THRESHOLD, PointerRelease, Select, SelectEvent, SelectItem, SelectPointerSession,
    TYPEAHEAD_RESET_MS, Typeahead, select_intent,
};
pub use submenu::{
    MenuLevel, OPEN_CLOSE_DELAY_MS, Submenu, SubmenuId, SubmenuPhase, SubmenuTransition,
    is_moving_toward_content,
};

use understory_collection::ItemId;
use understory_roving::RovingError;

/// Misuse of a menu state machine.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuError {
    /// The item handle is not registered with this menu.
    #[error("item {0:?} is not registered with this menu")]
    UnknownItem(ItemId),
    /// The underlying roving focus group rejected the call.
    #[error(transparent)]
    Roving(#[from] RovingError),
}
