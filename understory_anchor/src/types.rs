// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement vocabulary and positioning options.

use kurbo::{Rect, Size};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Axis {
    X,
    Y,
}

impl Axis {
    pub(crate) fn other(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }

    pub(crate) fn start(self, r: Rect) -> f64 {
        match self {
            Self::X => r.x0,
            Self::Y => r.y0,
        }
    }

    pub(crate) fn len(self, s: Size) -> f64 {
        match self {
            Self::X => s.width,
            Self::Y => s.height,
        }
    }
}

/// Side of the anchor the content is placed against.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    /// Above.
    Top,
    /// To the right.
    Right,
    /// Below.
    #[default]
    Bottom,
    /// To the left.
    Left,
}

impl Side {
    /// The side across the anchor.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
        }
    }

    /// The side's name as used in `data-side`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }

    /// Axis the content moves along to leave the anchor.
    pub(crate) fn axis(self) -> Axis {
        match self {
            Self::Top | Self::Bottom => Axis::Y,
            Self::Left | Self::Right => Axis::X,
        }
    }
}

/// Alignment of the content along the anchor's side.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    /// Leading edges line up.
    Start,
    /// Centers line up.
    #[default]
    Center,
    /// Trailing edges line up.
    End,
}

impl Align {
    /// The opposite alignment; `Center` stays.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::Center => Self::Center,
            Self::End => Self::Start,
        }
    }

    /// The alignment's name as used in `data-align`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Center => "center",
            Self::End => "end",
        }
    }
}

/// A side plus an alignment.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    /// Side.
    pub side: Side,
    /// Alignment.
    pub align: Align,
}

impl Placement {
    /// Create a placement.
    pub const fn new(side: Side, align: Align) -> Self {
        Self { side, align }
    }

    /// Same alignment on the opposite side.
    pub const fn flipped(self) -> Self {
        Self::new(self.side.opposite(), self.align)
    }

    /// Same side with the opposite alignment.
    pub const fn realigned(self) -> Self {
        Self::new(self.side, self.align.opposite())
    }
}

/// How far collision shifting may move content away from its anchor.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sticky {
    /// Stop shifting once the content would detach from the anchor.
    Partial,
    /// Keep the content inside the boundary at all costs.
    #[default]
    Always,
}

/// When the position is recomputed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UpdateStrategy {
    /// On resize and scroll only.
    #[default]
    Optimized,
    /// Also on every animation frame.
    Always,
}

/// Per-side collision padding.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Padding {
    /// Top.
    pub top: f64,
    /// Right.
    pub right: f64,
    /// Bottom.
    pub bottom: f64,
    /// Left.
    pub left: f64,
}

impl Padding {
    /// The same padding on every side.
    pub const fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }
}

impl From<f64> for Padding {
    fn from(v: f64) -> Self {
        Self::uniform(v)
    }
}

/// Inputs to [`compute_position`](crate::compute_position).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionOptions {
    /// Preferred side.
    pub side: Side,
    /// Gap between anchor and content.
    pub side_offset: f64,
    /// Preferred alignment.
    pub align: Align,
    /// Shift along the alignment axis.
    pub align_offset: f64,
    /// Shift and flip to stay inside the boundary.
    pub avoid_collisions: bool,
    /// Distance to keep from the boundary edges.
    pub collision_padding: Padding,
    /// Shift limit.
    pub sticky: Sticky,
    /// Hide the content when the anchor is clipped out of the boundary.
    pub hide_when_detached: bool,
    /// Minimum distance between the arrow and the content's corners.
    pub arrow_padding: f64,
    /// Keep the content off-screen until an arrow has been measured.
    pub avoid_flickering_arrow: bool,
    /// Recompute policy.
    pub update_strategy: UpdateStrategy,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            side: Side::Bottom,
            side_offset: 0.0,
            align: Align::Center,
            align_offset: 0.0,
            avoid_collisions: true,
            collision_padding: Padding::default(),
            sticky: Sticky::Always,
            hide_when_detached: false,
            arrow_padding: 0.0,
            avoid_flickering_arrow: false,
            update_strategy: UpdateStrategy::Optimized,
        }
    }
}

impl PositionOptions {
    /// Set side and alignment.
    pub fn with_placement(mut self, side: Side, align: Align) -> Self {
        self.side = side;
        self.align = align;
        self
    }

    /// Set the side offset.
    pub fn with_side_offset(mut self, offset: f64) -> Self {
        self.side_offset = offset;
        self
    }

    /// Set the alignment offset.
    pub fn with_align_offset(mut self, offset: f64) -> Self {
        self.align_offset = offset;
        self
    }

    /// Enable or disable collision avoidance.
    pub fn with_avoid_collisions(mut self, avoid: bool) -> Self {
        self.avoid_collisions = avoid;
        self
    }

    /// Set collision padding.
    pub fn with_collision_padding(mut self, padding: impl Into<Padding>) -> Self {
        self.collision_padding = padding.into();
        self
    }

    /// Set the shift limit.
    pub fn with_sticky(mut self, sticky: Sticky) -> Self {
        self.sticky = sticky;
        self
    }

    /// Hide when the anchor is clipped away.
    pub fn with_hide_when_detached(mut self, hide: bool) -> Self {
        self.hide_when_detached = hide;
        self
    }

    /// Set arrow padding.
    pub fn with_arrow_padding(mut self, padding: f64) -> Self {
        self.arrow_padding = padding;
        self
    }

    /// Keep the content off-screen until an arrow has been measured.
    pub fn with_avoid_flickering_arrow(mut self, avoid: bool) -> Self {
        self.avoid_flickering_arrow = avoid;
        self
    }

    /// Set the recompute policy.
    pub fn with_update_strategy(mut self, strategy: UpdateStrategy) -> Self {
        self.update_strategy = strategy;
        self
    }
}
