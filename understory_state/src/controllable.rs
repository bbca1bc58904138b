// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Controlled/uncontrolled value merging.

/// A value that is either owned by the widget or supplied by its owner.
///
/// The mode is decided by whether a controlled value is present. In controlled
/// mode the internal copy is never touched by [`Controllable::set`]; the owner
/// is expected to call [`Controllable::sync`] with the value it settles on.
#[derive(Clone, Debug)]
pub struct Controllable<T> {
    internal: T,
    controlled: Option<T>,
}

impl<T: Default> Default for Controllable<T> {
    fn default() -> Self {
        Self::uncontrolled(T::default())
    }
}

impl<T> Controllable<T> {
    /// Widget-owned value starting at `default`.
    pub fn uncontrolled(default: T) -> Self {
        Self {
            internal: default,
            controlled: None,
        }
    }

    /// Owner-supplied value.
    pub fn controlled(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            internal: value.clone(),
            controlled: Some(value),
        }
    }

    /// Build from an optional controlled value and a default, the way a
    /// widget receives `value`/`defaultValue` props.
    pub fn from_props(controlled: Option<T>, default: T) -> Self {
        Self {
            internal: default,
            controlled,
        }
    }

    /// The effective value.
    pub fn get(&self) -> &T {
        self.controlled.as_ref().unwrap_or(&self.internal)
    }

    /// Whether the owner supplies the value.
    pub fn is_controlled(&self) -> bool {
        self.controlled.is_some()
    }

    /// Take the owner's latest controlled value (`None` means uncontrolled).
    ///
    /// Switching modes over a widget's lifetime is allowed but logged: the
    /// internal value is whatever it was when control was taken.
    pub fn sync(&mut self, controlled: Option<T>) {
        if self.controlled.is_some() != controlled.is_some() {
            tracing::warn!(
                from = if self.is_controlled() { "controlled" } else { "uncontrolled" },
                to = if controlled.is_some() { "controlled" } else { "uncontrolled" },
                "value switched between controlled and uncontrolled",
            );
        }
        self.controlled = controlled;
    }

    /// Request `next`.
    ///
    /// Returns whether `on_change` was called. Equal values are ignored.
    pub fn set(&mut self, next: T, on_change: impl FnOnce(&T)) -> bool
    where
        T: PartialEq,
    {
        if *self.get() == next {
            return false;
        }
        on_change(&next);
        if self.controlled.is_none() {
            self.internal = next;
        }
        true
    }

    /// Request a value computed from the current one.
    pub fn update(&mut self, f: impl FnOnce(&T) -> T, on_change: impl FnOnce(&T)) -> bool
    where
        T: PartialEq,
    {
        let next = f(self.get());
        self.set(next, on_change)
    }
}
