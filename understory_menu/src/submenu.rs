// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Submenu open/close timing.
//!
//! Each submenu carries two cancelable deadlines, one to open and one to
//! close, in host milliseconds. The host calls [`Submenu::tick`] when the
//! earliest [`Submenu::next_deadline`] passes. Open state lives in the parent
//! [`MenuLevel`], which records at most one open submenu id, so opening a
//! submenu implicitly closes its siblings.

use kurbo::Rect;
use understory_layer::DismissReason;
use understory_roving::{FocusHost, Key};
use understory_state::Controllable;

/// Delay before a hovered trigger opens, or a left submenu closes.
pub const OPEN_CLOSE_DELAY_MS: u64 = 200;

/// Identifier of a submenu within its [`MenuLevel`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubmenuId(u32);

/// One level of a menu tree: whether it is open and which child is.
#[derive(Clone, Debug, Default)]
pub struct MenuLevel {
    open: bool,
    open_submenu: Option<SubmenuId>,
    next_id: u32,
}

impl MenuLevel {
    /// A closed level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the menu owning this level is open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open or close the owning menu. Closing forgets the open submenu.
    pub fn set_open(&mut self, open: bool) {
        self.open = open;
        if !open {
            self.open_submenu = None;
        }
    }

    /// The submenu currently recorded as open.
    pub fn open_submenu(&self) -> Option<SubmenuId> {
        self.open_submenu
    }

    fn allocate(&mut self) -> SubmenuId {
        let id = SubmenuId(self.next_id);
        self.next_id += 1;
        id
    }

    fn record(&mut self, id: SubmenuId, open: bool) {
        if open {
            self.open_submenu = Some(id);
        } else if self.open_submenu == Some(id) {
            self.open_submenu = None;
        }
    }
}

/// Where a submenu is in its open/close cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SubmenuPhase {
    /// Closed, nothing pending.
    Closed,
    /// Closed, open deadline pending.
    Opening,
    /// Open, nothing pending.
    Open,
    /// Open, close deadline pending.
    Closing,
}

/// An open-state change requested by a submenu.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SubmenuTransition {
    /// The submenu asked to open.
    Opened,
    /// The submenu asked to close.
    Closed,
}

/// True when a pointer leaving the trigger at `pointer_x` is heading toward
/// `content`, which sits to one side of `trigger`.
pub fn is_moving_toward_content(pointer_x: f64, trigger: Rect, content: Rect) -> bool {
    if pointer_x > trigger.x0 && pointer_x < trigger.x1 {
        return false;
    }
    let content_right = content.x1 > trigger.x1;
    let pointer_right = pointer_x > trigger.x1;
    content_right == pointer_right
}

/// Timing state for one submenu.
#[derive(Clone, Debug)]
pub struct Submenu {
    id: SubmenuId,
    disabled: bool,
    open: Controllable<bool>,
    open_at: Option<u64>,
    close_at: Option<u64>,
    pointer_inside: bool,
}

impl Submenu {
    /// A submenu whose open state is recorded in `level`.
    pub fn new(level: &mut MenuLevel) -> Self {
        Self {
            id: level.allocate(),
            disabled: false,
            open: Controllable::uncontrolled(false),
            open_at: None,
            close_at: None,
            pointer_inside: false,
        }
    }

    /// A submenu whose open state is owned by the caller.
    pub fn controlled(level: &mut MenuLevel, open: bool) -> Self {
        Self {
            open: Controllable::controlled(open),
            ..Self::new(level)
        }
    }

    /// Take the owner's latest `open` value.
    pub fn sync_open(&mut self, open: Option<bool>) {
        self.open.sync(open);
    }

    /// Mark the trigger disabled; hovering it no longer opens.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// This submenu's id.
    pub fn id(&self) -> SubmenuId {
        self.id
    }

    /// Whether the submenu is open.
    pub fn is_open(&self, level: &MenuLevel) -> bool {
        if self.open.is_controlled() {
            *self.open.get()
        } else {
            level.is_open() && level.open_submenu() == Some(self.id)
        }
    }

    /// Current phase.
    pub fn phase(&self, level: &MenuLevel) -> SubmenuPhase {
        match (self.is_open(level), self.open_at, self.close_at) {
            (true, _, Some(_)) => SubmenuPhase::Closing,
            (true, _, None) => SubmenuPhase::Open,
            (false, Some(_), _) => SubmenuPhase::Opening,
            (false, None, _) => SubmenuPhase::Closed,
        }
    }

    /// Whether the pointer is inside the submenu content.
    pub fn is_pointer_inside(&self) -> bool {
        self.pointer_inside
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<u64> {
        match (self.open_at, self.close_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Request an open state change, recording it in `level`.
    ///
    /// Returns the transition the owner should be told about, if any.
    pub fn set_open(&mut self, level: &mut MenuLevel, open: bool) -> Option<SubmenuTransition> {
        if !self.open.is_controlled() {
            let current = self.is_open(level);
            self.open.set(current, |_| {});
        }
        level.record(self.id, open);
        let changed = self.open.set(open, |next| {
            tracing::trace!(id = self.id.0, open = *next, "submenu open changed");
        });
        changed.then_some(if open {
            SubmenuTransition::Opened
        } else {
            SubmenuTransition::Closed
        })
    }

    fn debounce(&mut self, now: u64, open: bool) {
        let at = Some(now + OPEN_CLOSE_DELAY_MS);
        if open {
            self.open_at = at;
            self.close_at = None;
        } else {
            self.open_at = None;
            self.close_at = at;
        }
    }

    /// The pointer entered the trigger.
    pub fn pointer_enter_trigger(&mut self, now: u64) {
        if self.disabled {
            return;
        }
        self.debounce(now, true);
    }

    /// The pointer left the trigger.
    ///
    /// Closing is scheduled unless the pointer is heading toward the open
    /// content. Without measured content nothing is scheduled.
    pub fn pointer_leave_trigger(
        &mut self,
        now: u64,
        pointer_x: f64,
        trigger: Rect,
        content: Option<Rect>,
    ) {
        self.open_at = None;
        let Some(content) = content else {
            return;
        };
        if is_moving_toward_content(pointer_x, trigger, content) {
            return;
        }
        self.debounce(now, false);
    }

    /// The pointer reached the content; a pending close is canceled.
    pub fn pointer_enter_content(&mut self) {
        self.pointer_inside = true;
        self.close_at = None;
    }

    /// A key on the focused trigger. Enter, Space and `ArrowRight` open
    /// immediately.
    pub fn trigger_key(&mut self, level: &mut MenuLevel, key: Key) -> Option<SubmenuTransition> {
        if self.disabled || !matches!(key, Key::ArrowRight | Key::Enter | Key::Space) {
            return None;
        }
        self.open_at = None;
        self.close_at = None;
        self.set_open(level, true)
    }

    /// A key inside the open content. `ArrowLeft` closes and returns focus to
    /// `trigger`.
    pub fn content_key<K>(
        &mut self,
        level: &mut MenuLevel,
        host: &mut impl FocusHost<K>,
        trigger: K,
        key: Key,
    ) -> Option<SubmenuTransition> {
        if key != Key::ArrowLeft {
            return None;
        }
        let transition = self.set_open(level, false);
        host.focus(trigger, true);
        transition
    }

    /// The content's layer was dismissed.
    ///
    /// Focus moving outside closes after the usual delay so focus can pass
    /// through a sibling without flicker; other reasons close at once.
    pub fn dismissed(
        &mut self,
        level: &mut MenuLevel,
        reason: DismissReason,
        now: u64,
    ) -> Option<SubmenuTransition> {
        self.pointer_inside = false;
        match reason {
            DismissReason::Focus => {
                if self.close_at.is_none() {
                    self.close_at = Some(now + OPEN_CLOSE_DELAY_MS);
                }
                None
            }
            DismissReason::Escape | DismissReason::Pointer => self.set_open(level, false),
        }
    }

    /// Whether an outside dismissal of the submenu's layer should be
    /// suppressed because it landed on the submenu's own trigger.
    ///
    /// Pass this from the layer dispatch hook for the submenu's layer; the
    /// trigger already toggles the submenu, so dismissing as well would close
    /// and reopen it. Escape is never suppressed.
    pub fn is_trigger_target<K: PartialEq>(trigger: K, target: K, reason: DismissReason) -> bool {
        reason != DismissReason::Escape && trigger == target
    }

    /// Fire any deadline that has passed.
    pub fn tick(&mut self, level: &mut MenuLevel, now: u64) -> Option<SubmenuTransition> {
        if self.open_at.is_some_and(|at| at <= now) {
            self.open_at = None;
            return self.set_open(level, true);
        }
        if self.close_at.is_some_and(|at| at <= now) {
            self.close_at = None;
            return self.set_open(level, false);
        }
        None
    }

    /// Drop pending deadlines.
    pub fn unmount(&mut self) {
        self.open_at = None;
        self.close_at = None;
        self.pointer_inside = false;
    }
}
