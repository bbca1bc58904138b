// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Autocomplete: fuzzy matching, ranking, and keyboard selection among the
//! visible suggestions.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use understory_collection::{Collection, DocumentOrder, ItemId, ReadOrder};
use understory_roving::Key;
use understory_state::Controllable;

/// Scores `value` against processed `input`; zero or less hides the item.
pub type Matcher = fn(&str, &str) -> f64;

/// Normalize user input for matching.
pub fn process_input(input: &str) -> String {
    input.to_lowercase().trim().into()
}

/// Default scorer.
///
/// `input` must be a subsequence of `value` (case-insensitive on `value`).
/// Earlier and tighter matches score higher. Empty input matches everything
/// with weight 1.
pub fn default_matcher(value: &str, input: &str) -> f64 {
    let input: Vec<char> = input.chars().collect();
    if input.is_empty() {
        return 1.0;
    }
    let value: Vec<char> = value.to_lowercase().chars().collect();
    let mut i = 0;
    let mut weight = 0.0;
    let mut first = 0;
    let mut last = 0;
    for (j, c) in value.iter().enumerate() {
        if *c != input[i] {
            continue;
        }
        i += 1;
        let pos = (j + 1) as f64;
        weight += pos * pos;
        if i == 1 {
            first = j;
        }
        if i == input.len() {
            last = j;
            break;
        }
    }
    if i < input.len() {
        return 0.0;
    }
    let n = input.len() as f64;
    let compactness = n / (last - first + 1) as f64;
    compactness * (value.len() as f64 * n / weight)
}

/// Items whose score is positive, best first; ties keep their order.
/// Empty input returns every item unranked.
pub fn filter_and_sort<'a, T>(
    items: &'a [T],
    input: &str,
    value: impl Fn(&T) -> &str,
    matcher: Matcher,
) -> Vec<&'a T> {
    if input.is_empty() {
        return items.iter().collect();
    }
    let mut scored: Vec<(&T, f64)> = items
        .iter()
        .map(|item| (item, matcher(value(item), input)))
        .filter(|(_, w)| *w > 0.0)
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.into_iter().map(|(item, _)| item).collect()
}

/// One suggestion.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Suggestion {
    /// Text matched against and committed on choice.
    pub value: String,
    /// Group the suggestion is listed under.
    pub group: Option<u32>,
}

impl Suggestion {
    /// An ungrouped suggestion.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            group: None,
        }
    }

    /// Put the suggestion in `group`.
    pub fn in_group(mut self, group: u32) -> Self {
        self.group = Some(group);
        self
    }
}

/// Input value, suggestions, and the highlighted suggestion.
pub struct AutoComplete<K> {
    value: Controllable<String>,
    items: Collection<K, Suggestion>,
    matcher: Matcher,
    selected: Option<ItemId>,
    listing: Vec<ItemId>,
}

impl<K: fmt::Debug> fmt::Debug for AutoComplete<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoComplete")
            .field("value", &self.value)
            .field("items", &self.items.len())
            .field("selected", &self.selected)
            .field("listing", &self.listing)
            .finish_non_exhaustive()
    }
}

impl<K: Copy + PartialEq> AutoComplete<K> {
    /// Start from `value` (controlled) or `default`.
    pub fn new(value: Option<String>, default: impl Into<String>) -> Self {
        Self {
            value: Controllable::from_props(value, default.into()),
            items: Collection::new(),
            matcher: default_matcher,
            selected: None,
            listing: Vec::new(),
        }
    }

    /// Replace the scorer.
    pub fn with_matcher(mut self, matcher: Matcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Current input value.
    pub fn value(&self) -> &str {
        self.value.get()
    }

    /// Take the owner's controlled value.
    pub fn sync_value(&mut self, value: Option<String>) {
        self.value.sync(value);
    }

    /// The input changed. Call [`refresh`](Self::refresh) afterwards.
    pub fn set_value(&mut self, value: impl Into<String>, on_change: impl FnOnce(&String)) -> bool {
        self.value.set(value.into(), on_change)
    }

    /// Register a suggestion.
    pub fn add(&mut self, node: K, suggestion: Suggestion) -> ItemId {
        self.items.register(node, suggestion)
    }

    /// Remove a suggestion.
    pub fn remove(&mut self, id: ItemId) -> Option<Suggestion> {
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.listing.retain(|l| *l != id);
        self.items.unregister(id).map(|item| item.data)
    }

    /// Whether the suggestion matches the current input.
    pub fn is_shown(&self, id: ItemId) -> bool {
        let input = process_input(self.value());
        self.items
            .get(id)
            .is_some_and(|item| (self.matcher)(&item.data.value, &input) > 0.0)
    }

    /// The highlighted suggestion.
    pub fn selected(&self) -> Option<ItemId> {
        self.selected
    }

    /// Display order from the last refresh.
    pub fn listing(&self) -> &[ItemId] {
        &self.listing
    }

    /// Re-rank suggestions for the current input.
    ///
    /// Groups keep their document order; suggestions are ranked within each
    /// group. The best suggestion of the first non-empty group is highlighted.
    pub fn refresh(&mut self, host: &impl DocumentOrder<K>) -> &[ItemId] {
        let input = process_input(self.value.get());
        let ordered = self.items.read_all(ReadOrder::Document, host);
        let mut groups: Vec<(Option<u32>, Vec<(ItemId, &str)>)> = Vec::new();
        for item in ordered {
            let entry = (item.id, item.data.value.as_str());
            match groups.iter_mut().find(|(g, _)| *g == item.data.group) {
                Some((_, members)) => members.push(entry),
                None => groups.push((item.data.group, alloc::vec![entry])),
            }
        }
        let mut listing = Vec::new();
        for (_, members) in &groups {
            let ranked = filter_and_sort(members, &input, |entry| entry.1, self.matcher);
            listing.extend(ranked.into_iter().map(|entry| entry.0));
        }
        self.selected = listing.first().copied();
        self.listing = listing;
        &self.listing
    }

    /// A key in the input. Arrow keys cycle the highlight through the listing
    /// of the last [`refresh`](Self::refresh); Enter commits it. Returns
    /// whether the key was handled.
    pub fn input_key(&mut self, key: Key, on_change: impl FnOnce(&String)) -> bool {
        let Some(selected) = self.selected else {
            return false;
        };
        if !matches!(key, Key::ArrowDown | Key::ArrowUp | Key::Enter) {
            return false;
        }
        let shown = &self.listing;
        let Some(index) = shown.iter().position(|id| *id == selected) else {
            return false;
        };
        let len = shown.len();
        match key {
            Key::ArrowDown => self.selected = Some(shown[(index + 1) % len]),
            Key::ArrowUp => self.selected = Some(shown[(index + len - 1) % len]),
            _ => {
                let value = self
                    .items
                    .get(selected)
                    .map(|item| item.data.value.clone())
                    .unwrap_or_default();
                self.value.set(value, on_change);
            }
        }
        true
    }

    /// A suggestion was clicked; its value becomes the input.
    pub fn choose(&mut self, id: ItemId, on_change: impl FnOnce(&String)) -> bool {
        let Some(item) = self.items.get(id) else {
            return false;
        };
        let value = item.data.value.clone();
        self.value.set(value, on_change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cmp::Ordering;

    struct Ordinal;

    impl DocumentOrder<u32> for Ordinal {
        fn compare_document_position(&self, a: u32, b: u32) -> Ordering {
            a.cmp(&b)
        }
    }

    #[test]
    fn matcher_requires_subsequence() {
        assert_eq!(default_matcher("anything", ""), 1.0);
        assert_eq!(default_matcher("Apple", "pa"), 0.0);
        assert!(default_matcher("Apple", "ap") > 0.0);
        assert_eq!(process_input("  ApP "), "app");
    }

    #[test]
    fn prefix_and_compact_matches_rank_first() {
        let prefix = default_matcher("Cherry", "ch");
        let inner = default_matcher("Peach", "ch");
        let spread = default_matcher("Coach", "ch");
        assert!(prefix > inner, "{prefix} vs {inner}");
        assert!(inner > spread, "{inner} vs {spread}");

        let items = ["Peach", "Cherry", "Plum"];
        let ranked = filter_and_sort(&items, "ch", |s| *s, default_matcher);
        assert_eq!(ranked, [&"Cherry", &"Peach"]);
    }

    #[test]
    fn refresh_ranks_and_highlights() {
        let mut ac: AutoComplete<u32> = AutoComplete::new(None, "");
        let peach = ac.add(1, Suggestion::new("Peach"));
        let cherry = ac.add(2, Suggestion::new("Cherry"));
        let plum = ac.add(3, Suggestion::new("Plum"));

        assert_eq!(ac.refresh(&Ordinal), [peach, cherry, plum]);
        assert_eq!(ac.selected(), Some(peach));

        ac.set_value("CH", |_| {});
        assert_eq!(ac.refresh(&Ordinal), [cherry, peach]);
        assert!(!ac.is_shown(plum));
        assert_eq!(ac.selected(), Some(cherry));

        assert!(ac.input_key(Key::ArrowDown, |_| {}));
        assert_eq!(ac.selected(), Some(peach));
        assert!(ac.input_key(Key::ArrowUp, |_| {}));
        assert_eq!(ac.selected(), Some(cherry));
        assert!(ac.input_key(Key::Enter, |_| {}));
        assert_eq!(ac.value(), "Cherry");
        assert!(alloc::format!("{ac:?}").contains("items: 3"));
    }

    #[test]
    fn arrows_follow_the_ranking_not_the_document() {
        let mut ac: AutoComplete<u32> = AutoComplete::new(None, "ch");
        let loose = ac.add(1, Suggestion::new("xxxxch"));
        let exact = ac.add(2, Suggestion::new("ch"));
        let far = ac.add(3, Suggestion::new("xxxxxxxxxxxch"));
        assert_eq!(ac.refresh(&Ordinal), [exact, loose, far]);
        assert_eq!(ac.selected(), Some(exact));

        assert!(ac.input_key(Key::ArrowDown, |_| {}));
        assert_eq!(ac.selected(), Some(loose));
        assert!(ac.input_key(Key::ArrowDown, |_| {}));
        assert_eq!(ac.selected(), Some(far));
        assert!(ac.input_key(Key::ArrowDown, |_| {}));
        assert_eq!(ac.selected(), Some(exact));
        assert!(ac.input_key(Key::ArrowUp, |_| {}));
        assert_eq!(ac.selected(), Some(far));
    }

    #[test]
    fn groups_rank_independently() {
        let mut ac: AutoComplete<u32> = AutoComplete::new(None, "a");
        let x = ac.add(1, Suggestion::new("xa").in_group(1));
        let y = ac.add(2, Suggestion::new("ab").in_group(1));
        let z = ac.add(3, Suggestion::new("az").in_group(2));
        assert_eq!(ac.refresh(&Ordinal), [y, x, z]);
        assert!(ac.choose(z, |_| {}));
        assert_eq!(ac.value(), "az");
    }
}
