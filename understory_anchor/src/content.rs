// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Driver for one piece of anchored content.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use kurbo::{Rect, Size};

use crate::compute::{PlacementResult, compute_position};
use crate::types::{Align, PositionOptions, Side, UpdateStrategy};

/// Transform used until the first placement, parking the content off-screen.
pub const UNPOSITIONED_TRANSFORM: &str = "translate(0, -200vw)";
/// Width available to the content.
pub const AVAILABLE_WIDTH_VAR: &str = "--popper-available-width";
/// Height available to the content.
pub const AVAILABLE_HEIGHT_VAR: &str = "--popper-available-height";
/// Anchor width.
pub const ANCHOR_WIDTH_VAR: &str = "--popper-anchor-width";
/// Anchor height.
pub const ANCHOR_HEIGHT_VAR: &str = "--popper-anchor-height";
/// Transform origin.
pub const TRANSFORM_ORIGIN_VAR: &str = "--popper-transform-origin";

/// Something that may have moved the anchor or the content.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UpdateTrigger {
    /// The anchor or content changed size.
    Resize,
    /// An ancestor scrolled.
    Scroll,
    /// A new animation frame; only honored with [`UpdateStrategy::Always`].
    AnimationFrame,
}

/// Geometry read from the host before an update.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Measurements {
    /// Anchor rectangle, if the anchor is mounted.
    pub anchor: Option<Rect>,
    /// Content size.
    pub content: Size,
    /// Arrow size, if the content renders one.
    pub arrow: Option<Size>,
    /// Collision boundary, see [`boundary_rect`](crate::boundary_rect).
    pub boundary: Rect,
}

/// Outcome of a successful [`AnchoredContent::update`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Placed {
    /// First placement since mount; the `onPlaced` moment.
    First,
    /// A later recomputation.
    Moved,
}

/// Styles to apply to the content wrapper.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentStyle {
    /// CSS transform.
    pub transform: String,
    /// Z-index captured from the content.
    pub z_index: Option<i32>,
    /// Custom properties, empty until positioned.
    pub vars: Vec<(&'static str, String)>,
    /// Hide and disable pointer events because the anchor is detached.
    pub hidden: bool,
    /// Placed side.
    pub side: Side,
    /// Placed alignment.
    pub align: Align,
}

/// Inline style writes, provided by the host.
pub trait StyleSink<K> {
    /// Set a property on `node`.
    fn set_property(&mut self, node: K, name: &str, value: &str);
    /// Remove a property from `node`.
    fn remove_property(&mut self, node: K, name: &str);
}

/// Write `style` to `node`.
pub fn apply_style<K: Copy>(sink: &mut impl StyleSink<K>, node: K, style: &ContentStyle) {
    sink.set_property(node, "transform", &style.transform);
    match style.z_index {
        Some(z) => sink.set_property(node, "z-index", &z.to_string()),
        None => sink.remove_property(node, "z-index"),
    }
    for (name, value) in &style.vars {
        sink.set_property(node, name, value);
    }
    if style.hidden {
        sink.set_property(node, "visibility", "hidden");
        sink.set_property(node, "pointer-events", "none");
    } else {
        sink.remove_property(node, "visibility");
        sink.remove_property(node, "pointer-events");
    }
    sink.set_property(node, "data-side", style.side.as_str());
    sink.set_property(node, "data-align", style.align.as_str());
}

/// Keeps floating content attached to its anchor across layout changes.
///
/// The host reports [`UpdateTrigger`]s, then calls [`update`](Self::update)
/// with fresh [`Measurements`] and writes [`content_style`](Self::content_style).
#[derive(Clone, Debug)]
pub struct AnchoredContent {
    options: PositionOptions,
    z_index: Option<i32>,
    result: Option<PlacementResult>,
    has_arrow: bool,
    dirty: bool,
    mounted: bool,
}

impl AnchoredContent {
    /// Mount with `options`. The first [`update`](Self::update) always computes.
    pub fn new(options: PositionOptions) -> Self {
        Self {
            options,
            z_index: None,
            result: None,
            has_arrow: false,
            dirty: true,
            mounted: true,
        }
    }

    /// Current options.
    pub fn options(&self) -> &PositionOptions {
        &self.options
    }

    /// Replace options; marks the position dirty.
    pub fn set_options(&mut self, options: PositionOptions) {
        if self.options != options {
            self.options = options;
            self.dirty = true;
        }
    }

    /// Record the content's computed z-index.
    pub fn set_z_index(&mut self, z_index: Option<i32>) {
        self.z_index = z_index;
    }

    /// Report a trigger. Returns whether an update is now pending.
    pub fn notify(&mut self, trigger: UpdateTrigger) -> bool {
        if !self.mounted {
            return false;
        }
        if trigger == UpdateTrigger::AnimationFrame
            && self.options.update_strategy != UpdateStrategy::Always
        {
            return self.dirty;
        }
        self.dirty = true;
        true
    }

    /// Recompute the position if anything changed.
    ///
    /// Without an anchor the content stays unpositioned and the update stays
    /// pending.
    pub fn update(&mut self, m: &Measurements) -> Option<Placed> {
        if !self.mounted || !self.dirty {
            return None;
        }
        let anchor = m.anchor?;
        let result = compute_position(anchor, m.content, m.boundary, m.arrow, &self.options);
        let placed = if self.result.is_some() {
            Placed::Moved
        } else {
            tracing::debug!(
                side = result.placement.side.as_str(),
                align = result.placement.align.as_str(),
                "content placed"
            );
            Placed::First
        };
        self.result = Some(result);
        self.has_arrow = m.arrow.is_some();
        self.dirty = false;
        Some(placed)
    }

    /// Whether a placement has been computed.
    pub fn is_positioned(&self) -> bool {
        self.result.is_some()
    }

    /// Last placement.
    pub fn result(&self) -> Option<&PlacementResult> {
        self.result.as_ref()
    }

    /// Styles for the content wrapper.
    pub fn content_style(&self) -> ContentStyle {
        let Some(r) = &self.result else {
            return ContentStyle {
                transform: UNPOSITIONED_TRANSFORM.into(),
                z_index: self.z_index,
                vars: Vec::new(),
                hidden: false,
                side: self.options.side,
                align: self.options.align,
            };
        };
        let transform = if !self.options.avoid_flickering_arrow || self.has_arrow {
            format!("translate({}px, {}px)", r.x, r.y)
        } else {
            UNPOSITIONED_TRANSFORM.into()
        };
        ContentStyle {
            transform,
            z_index: self.z_index,
            vars: alloc::vec![
                (AVAILABLE_WIDTH_VAR, format!("{}px", r.available_width)),
                (AVAILABLE_HEIGHT_VAR, format!("{}px", r.available_height)),
                (ANCHOR_WIDTH_VAR, format!("{}px", r.anchor_width)),
                (ANCHOR_HEIGHT_VAR, format!("{}px", r.anchor_height)),
                (TRANSFORM_ORIGIN_VAR, r.transform_origin.to_string()),
            ],
            hidden: r.reference_hidden,
            side: r.placement.side,
            align: r.placement.align,
        }
    }

    /// Stop tracking. Later triggers and updates are ignored.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.dirty = false;
        self.result = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;

    fn measurements(anchor: Option<Rect>) -> Measurements {
        Measurements {
            anchor,
            content: Size::new(60.0, 30.0),
            arrow: None,
            boundary: Rect::new(0.0, 0.0, 200.0, 200.0),
        }
    }

    #[test]
    fn parked_until_anchor_measured() {
        let mut content = AnchoredContent::new(PositionOptions::default());
        assert_eq!(content.content_style().transform, UNPOSITIONED_TRANSFORM);
        assert_eq!(content.update(&measurements(None)), None);
        assert!(!content.is_positioned());

        let m = measurements(Some(Rect::new(50.0, 50.0, 90.0, 70.0)));
        assert_eq!(content.update(&m), Some(Placed::First));
        let style = content.content_style();
        assert_eq!(style.transform, "translate(40px, 70px)");
        assert!(style.vars.contains(&(ANCHOR_WIDTH_VAR, "40px".into())));
        assert!(style.vars.contains(&(AVAILABLE_HEIGHT_VAR, "130px".into())));
    }

    #[test]
    fn triggers_follow_update_strategy() {
        let mut content = AnchoredContent::new(PositionOptions::default());
        let m = measurements(Some(Rect::new(50.0, 50.0, 90.0, 70.0)));
        assert_eq!(content.update(&m), Some(Placed::First));
        assert_eq!(content.update(&m), None);
        assert!(!content.notify(UpdateTrigger::AnimationFrame));
        assert!(content.notify(UpdateTrigger::Scroll));
        assert_eq!(content.update(&m), Some(Placed::Moved));

        content.set_options(
            PositionOptions::default().with_update_strategy(UpdateStrategy::Always),
        );
        assert_eq!(content.update(&m), Some(Placed::Moved));
        assert!(content.notify(UpdateTrigger::AnimationFrame));

        content.unmount();
        assert!(!content.notify(UpdateTrigger::Resize));
        assert_eq!(content.update(&m), None);
        assert!(!content.is_positioned());
    }

    #[test]
    fn flickering_arrow_waits_for_arrow() {
        let opts = PositionOptions {
            avoid_flickering_arrow: true,
            ..PositionOptions::default()
        };
        let mut content = AnchoredContent::new(opts);
        let mut m = measurements(Some(Rect::new(50.0, 50.0, 90.0, 70.0)));
        content.update(&m);
        assert_eq!(content.content_style().transform, UNPOSITIONED_TRANSFORM);

        m.arrow = Some(Size::new(10.0, 5.0));
        content.notify(UpdateTrigger::Resize);
        content.update(&m);
        assert_eq!(content.content_style().transform, "translate(40px, 75px)");
    }

    #[derive(Default)]
    struct Sink(BTreeMap<String, String>);

    impl StyleSink<u32> for Sink {
        fn set_property(&mut self, _: u32, name: &str, value: &str) {
            self.0.insert(name.into(), value.into());
        }
        fn remove_property(&mut self, _: u32, name: &str) {
            self.0.remove(name);
        }
    }

    #[test]
    fn detached_anchor_hides_content() {
        let opts = PositionOptions::default().with_hide_when_detached(true);
        let mut content = AnchoredContent::new(opts);
        content.set_z_index(Some(50));
        content.update(&measurements(Some(Rect::new(50.0, -40.0, 90.0, -20.0))));

        let mut sink = Sink::default();
        apply_style(&mut sink, 7, &content.content_style());
        assert_eq!(sink.0.get("visibility").map(String::as_str), Some("hidden"));
        assert_eq!(sink.0.get("pointer-events").map(String::as_str), Some("none"));
        assert_eq!(sink.0.get("z-index").map(String::as_str), Some("50"));
        assert_eq!(sink.0.get("data-side").map(String::as_str), Some("bottom"));

        content.notify(UpdateTrigger::Scroll);
        content.update(&measurements(Some(Rect::new(50.0, 40.0, 90.0, 60.0))));
        apply_style(&mut sink, 7, &content.content_style());
        assert!(!sink.0.contains_key("visibility"));
    }
}
