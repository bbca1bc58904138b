// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Composition of handlers, class names, inline styles, and element references.
//!
//! A primitive attaches its own behavior to an element the caller may also
//! configure. These helpers decide who wins:
//!
//! - [`compose_handlers`]: the caller's handler runs first, and ours is skipped
//!   if it prevented default.
//! - [`merge_handlers`]: both run unconditionally.
//! - [`merge_class`] joins class lists; [`merge_style`] lets later entries win.
//! - [`ComposedRef`] forwards one element reference to several owners.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Events whose default action can be prevented.
pub trait Cancelable {
    /// Whether a handler already prevented the default action.
    fn default_prevented(&self) -> bool;
}

/// Run `first`, then `second` unless `first` prevented default.
pub fn compose_handlers<E: Cancelable + ?Sized>(
    mut first: impl FnMut(&mut E),
    mut second: impl FnMut(&mut E),
) -> impl FnMut(&mut E) {
    move |event: &mut E| {
        first(event);
        if !event.default_prevented() {
            second(event);
        }
    }
}

/// Run both handlers in order.
pub fn merge_handlers<E: ?Sized>(
    mut first: impl FnMut(&mut E),
    mut second: impl FnMut(&mut E),
) -> impl FnMut(&mut E) {
    move |event: &mut E| {
        first(event);
        second(event);
    }
}

/// Join two class lists with a single space, skipping empty ones.
pub fn merge_class(a: &str, b: &str) -> String {
    match (a.is_empty(), b.is_empty()) {
        (true, _) => String::from(b),
        (_, true) => String::from(a),
        _ => {
            let mut out = String::with_capacity(a.len() + b.len() + 1);
            out.push_str(a);
            out.push(' ');
            out.push_str(b);
            out
        }
    }
}

/// Merge inline style declarations; `overrides` replaces entries of `base`.
pub fn merge_style(
    base: &BTreeMap<String, String>,
    overrides: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut out = base.clone();
    out.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    out
}

/// An element reference shared by several owners.
///
/// Each owner registers a setter; [`ComposedRef::set`] forwards the element
/// (or `None` on detach) to all of them in registration order.
pub struct ComposedRef<K> {
    setters: Vec<Box<dyn FnMut(Option<K>)>>,
}

impl<K> fmt::Debug for ComposedRef<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposedRef")
            .field("owners", &self.setters.len())
            .finish()
    }
}

impl<K> Default for ComposedRef<K> {
    fn default() -> Self {
        Self {
            setters: Vec::new(),
        }
    }
}

impl<K: Copy> ComposedRef<K> {
    /// Create an empty ref.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an owner.
    pub fn with(mut self, setter: impl FnMut(Option<K>) + 'static) -> Self {
        self.setters.push(Box::new(setter));
        self
    }

    /// Forward the element to every owner.
    pub fn set(&mut self, node: Option<K>) {
        for setter in &mut self.setters {
            setter(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::Cell;

    #[derive(Default)]
    struct Click {
        prevented: bool,
        log: Vec<&'static str>,
    }

    impl Cancelable for Click {
        fn default_prevented(&self) -> bool {
            self.prevented
        }
    }

    #[test]
    fn composed_handler_respects_prevent_default() {
        let mut h = compose_handlers(
            |e: &mut Click| {
                e.log.push("user");
                e.prevented = true;
            },
            |e: &mut Click| e.log.push("ours"),
        );
        let mut e = Click::default();
        h(&mut e);
        assert_eq!(e.log, ["user"]);

        let mut h = compose_handlers(
            |e: &mut Click| e.log.push("user"),
            |e: &mut Click| e.log.push("ours"),
        );
        let mut e = Click::default();
        h(&mut e);
        assert_eq!(e.log, ["user", "ours"]);
    }

    #[test]
    fn merged_handlers_both_run() {
        let mut h = merge_handlers(
            |e: &mut Click| {
                e.prevented = true;
                e.log.push("a");
            },
            |e: &mut Click| e.log.push("b"),
        );
        let mut e = Click::default();
        h(&mut e);
        assert_eq!(e.log, ["a", "b"]);
    }

    #[test]
    fn class_and_style_merge() {
        assert_eq!(merge_class("item", "highlighted"), "item highlighted");
        assert_eq!(merge_class("", "x"), "x");
        assert_eq!(merge_class("x", ""), "x");

        let mut base = BTreeMap::new();
        base.insert(String::from("color"), String::from("red"));
        base.insert(String::from("top"), String::from("0"));
        let mut over = BTreeMap::new();
        over.insert(String::from("color"), String::from("blue"));
        let merged = merge_style(&base, &over);
        assert_eq!(merged.get("color").map(String::as_str), Some("blue"));
        assert_eq!(merged.get("top").map(String::as_str), Some("0"));
    }

    #[test]
    fn composed_ref_reaches_every_owner() {
        let a = Rc::new(Cell::new(None));
        let b = Rc::new(Cell::new(None));
        let (a2, b2) = (a.clone(), b.clone());
        let mut r = ComposedRef::new()
            .with(move |n| a2.set(n))
            .with(move |n| b2.set(n));
        r.set(Some(7_u32));
        assert_eq!((a.get(), b.get()), (Some(7), Some(7)));
        r.set(None);
        assert_eq!((a.get(), b.get()), (None, None));
    }
}
