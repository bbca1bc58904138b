// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A shared value with revision tracking and selector polling.
//!
//! A menu root, for example, holds one [`Store`] with its open state and
//! keyboard modality; each item keeps a [`Selection`] of the slice it renders
//! from and polls it when the host asks it to refresh.

/// An observable value scoped to a widget subtree.
#[derive(Clone, Debug, Default)]
pub struct Store<T> {
    value: T,
    revision: u64,
}

impl<T> Store<T> {
    /// Create a store holding `value`.
    pub fn new(value: T) -> Self {
        Self { value, revision: 0 }
    }

    /// Current value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Monotonic counter bumped on every change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the value. Returns `false` (and keeps the revision) if it was equal.
    pub fn set(&mut self, value: T) -> bool
    where
        T: PartialEq,
    {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.revision += 1;
        true
    }

    /// Mutate in place; always counts as a change.
    pub fn update(&mut self, f: impl FnOnce(&mut T)) {
        f(&mut self.value);
        self.revision += 1;
    }

    /// Start observing a slice of this store.
    pub fn select<S: PartialEq>(&self, select: fn(&T) -> S) -> Selection<T, S> {
        Selection {
            select,
            last: Some(select(&self.value)),
            seen: self.revision,
        }
    }
}

/// A selector over a [`Store`] that remembers the last slice it reported.
#[derive(Clone, Debug)]
pub struct Selection<T, S> {
    select: fn(&T) -> S,
    last: Option<S>,
    seen: u64,
}

impl<T, S: PartialEq> Selection<T, S> {
    /// The slice as of the last poll.
    pub fn current(&self) -> Option<&S> {
        self.last.as_ref()
    }

    /// Re-run the selector if the store changed.
    ///
    /// Returns the new slice only when it differs from the previous one.
    pub fn poll(&mut self, store: &Store<T>) -> Option<&S> {
        if self.seen == store.revision && self.last.is_some() {
            return None;
        }
        self.seen = store.revision;
        let next = (self.select)(&store.value);
        if self.last.as_ref() == Some(&next) {
            return None;
        }
        self.last = Some(next);
        self.last.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct MenuRoot {
        open: bool,
        keyboard: bool,
    }

    #[test]
    fn selection_reports_only_its_slice() {
        let mut store = Store::new(MenuRoot::default());
        let mut open = store.select(|s| s.open);
        assert_eq!(open.current(), Some(&false));

        store.update(|s| s.keyboard = true);
        assert_eq!(open.poll(&store), None, "unrelated slice changed");

        store.update(|s| s.open = true);
        assert_eq!(open.poll(&store), Some(&true));
        assert_eq!(open.poll(&store), None, "nothing new since last poll");
    }

    #[test]
    fn equal_set_keeps_revision() {
        let mut store = Store::new(3_u8);
        assert!(!store.set(3));
        assert_eq!(store.revision(), 0);
        assert!(store.set(4));
        assert_eq!(store.revision(), 1);
    }
}
