// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The placement pipeline.
//!
//! Stages run in a fixed order: offset, shift, flip, size, arrow, transform
//! origin, hide. Shift and flip only run with `avoid_collisions`. A flip
//! restarts offset and shift for the new placement.

use core::fmt;

use kurbo::{Point, Rect, Size};
use smallvec::SmallVec;

use crate::types::{Align, Axis, Padding, Placement, PositionOptions, Side, Sticky};

/// Where the arrow sits along the content edge facing the anchor.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ArrowData {
    /// Offset from the content's left edge, for top/bottom placements.
    pub x: Option<f64>,
    /// Offset from the content's top edge, for left/right placements.
    pub y: Option<f64>,
    /// Distance between the ideal arrow center and where it ended up.
    ///
    /// Non-zero means the arrow could not point at the anchor's center.
    pub center_offset: f64,
}

/// One component of a CSS `transform-origin`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum OriginComponent {
    /// A percentage of the content box.
    Percent(f64),
    /// A pixel length.
    Px(f64),
}

impl fmt::Display for OriginComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(v) => write!(f, "{v}%"),
            // Adding zero turns `-0` into `0`.
            Self::Px(v) => write!(f, "{}px", v + 0.0),
        }
    }
}

/// Point the content should grow from, next to the arrow tip or the anchor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TransformOrigin {
    /// Horizontal component.
    pub x: OriginComponent,
    /// Vertical component.
    pub y: OriginComponent,
}

impl fmt::Display for TransformOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x, self.y)
    }
}

/// Output of [`compute_position`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlacementResult {
    /// Final placement after flipping.
    pub placement: Placement,
    /// Content left edge.
    pub x: f64,
    /// Content top edge.
    pub y: f64,
    /// Arrow position, when an arrow was measured.
    pub arrow: Option<ArrowData>,
    /// The arrow cannot point at the anchor and should not be drawn.
    pub should_hide_arrow: bool,
    /// Growth origin for enter animations.
    pub transform_origin: TransformOrigin,
    /// Width available before the content would leave the boundary.
    pub available_width: f64,
    /// Height available before the content would leave the boundary.
    pub available_height: f64,
    /// Anchor width.
    pub anchor_width: f64,
    /// Anchor height.
    pub anchor_height: f64,
    /// The anchor is fully clipped by the boundary.
    pub reference_hidden: bool,
}

impl PlacementResult {
    /// Content rectangle at the computed position.
    pub fn rect(&self, content: Size) -> Rect {
        Rect::from_origin_size((self.x, self.y), content)
    }
}

/// Intersect the viewport with each collision boundary.
pub fn boundary_rect(viewport: Rect, boundaries: &[Rect]) -> Rect {
    boundaries.iter().fold(viewport, |acc, b| acc.intersect(*b))
}

/// Signed distance by which an element crosses each boundary edge; positive
/// means overflow.
#[derive(Copy, Clone, Debug)]
struct Overflow {
    top: f64,
    right: f64,
    bottom: f64,
    left: f64,
}

impl Overflow {
    fn detect(element: Rect, boundary: Rect, padding: &Padding) -> Self {
        Self {
            top: boundary.y0 - element.y0 + padding.top,
            right: element.x1 - boundary.x1 + padding.right,
            bottom: element.y1 - boundary.y1 + padding.bottom,
            left: boundary.x0 - element.x0 + padding.left,
        }
    }

    fn side(&self, side: Side) -> f64 {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }
}

fn coord(p: Point, axis: Axis) -> f64 {
    match axis {
        Axis::X => p.x,
        Axis::Y => p.y,
    }
}

fn set_coord(p: &mut Point, axis: Axis, v: f64) {
    match axis {
        Axis::X => p.x = v,
        Axis::Y => p.y = v,
    }
}

fn clamp(min: f64, v: f64, max: f64) -> f64 {
    min.max(v.min(max))
}

/// Content origin flush against `anchor` for `placement`.
fn initial_coords(anchor: Rect, content: Size, placement: Placement) -> Point {
    let center_x = anchor.x0 + anchor.width() / 2.0 - content.width / 2.0;
    let center_y = anchor.y0 + anchor.height() / 2.0 - content.height / 2.0;
    let mut p = match placement.side {
        Side::Top => Point::new(center_x, anchor.y0 - content.height),
        Side::Bottom => Point::new(center_x, anchor.y1),
        Side::Right => Point::new(anchor.x1, center_y),
        Side::Left => Point::new(anchor.x0 - content.width, center_y),
    };
    let axis = placement.side.axis().other();
    let common = axis.len(anchor.size()) / 2.0 - axis.len(content) / 2.0;
    let c = coord(p, axis);
    match placement.align {
        Align::Start => set_coord(&mut p, axis, c - common),
        Align::End => set_coord(&mut p, axis, c + common),
        Align::Center => {}
    }
    p
}

struct Pipeline<'a> {
    anchor: Rect,
    content: Size,
    boundary: Rect,
    arrow: Size,
    opts: &'a PositionOptions,
}

impl Pipeline<'_> {
    fn overflow_at(&self, p: Point) -> Overflow {
        Overflow::detect(
            Rect::from_origin_size(p, self.content),
            self.boundary,
            &self.opts.collision_padding,
        )
    }

    fn offset(&self, mut p: Point, placement: Placement) -> Point {
        let main = self.opts.side_offset + self.arrow.height;
        let main = match placement.side {
            Side::Top | Side::Left => -main,
            Side::Bottom | Side::Right => main,
        };
        match placement.side.axis() {
            Axis::Y => {
                p.x += self.opts.align_offset;
                p.y += main;
            }
            Axis::X => {
                p.x += main;
                p.y += self.opts.align_offset;
            }
        }
        p
    }

    /// Clamp along the alignment axis to stay inside the boundary.
    fn shift(&self, mut p: Point, placement: Placement) -> Point {
        let ov = self.overflow_at(p);
        let axis = placement.side.axis().other();
        let (min_side, max_side) = match axis {
            Axis::X => (Side::Left, Side::Right),
            Axis::Y => (Side::Top, Side::Bottom),
        };
        let c = coord(p, axis);
        let mut shifted = clamp(c + ov.side(min_side), c, c - ov.side(max_side));
        if self.opts.sticky == Sticky::Partial {
            let start = axis.start(self.anchor);
            let lo = start - axis.len(self.content);
            let hi = start + axis.len(self.anchor.size());
            if shifted < lo {
                shifted = lo;
            } else if shifted > hi {
                shifted = hi;
            }
        }
        set_coord(&mut p, axis, shifted);
        p
    }

    fn place(&self, placement: Placement) -> Point {
        let p = self.offset(initial_coords(self.anchor, self.content, placement), placement);
        if self.opts.avoid_collisions {
            self.shift(p, placement)
        } else {
            p
        }
    }

    /// Alignment-axis sides checked by flip, main side first.
    fn alignment_sides(&self, placement: Placement) -> (Side, Side) {
        let axis = placement.side.axis().other();
        let start = placement.align == Align::Start;
        let mut main = match axis {
            Axis::X if start => Side::Right,
            Axis::X => Side::Left,
            Axis::Y if start => Side::Bottom,
            Axis::Y => Side::Top,
        };
        if axis.len(self.anchor.size()) > axis.len(self.content) {
            main = main.opposite();
        }
        (main, main.opposite())
    }

    fn flip(&self, initial: Placement) -> (Placement, Point) {
        let mut candidates: SmallVec<[Placement; 4]> = SmallVec::new();
        candidates.push(initial);
        if initial.align == Align::Center {
            candidates.push(initial.flipped());
        } else {
            candidates.push(initial.realigned());
            candidates.push(initial.flipped());
            candidates.push(initial.flipped().realigned());
        }

        let mut records: SmallVec<[(Placement, [f64; 3]); 4]> = SmallVec::new();
        for &placement in &candidates {
            let p = self.place(placement);
            let ov = self.overflow_at(p);
            let (a, b) = self.alignment_sides(placement);
            let overflows = [ov.side(placement.side), ov.side(a), ov.side(b)];
            if overflows.iter().all(|o| *o <= 0.0) {
                return (placement, p);
            }
            records.push((placement, overflows));
        }

        // Prefer fitting on the main axis with the least alignment overflow,
        // then the smallest total overflow.
        let fallback = records
            .iter()
            .filter(|(_, o)| o[0] <= 0.0)
            .min_by(|a, b| a.1[1].total_cmp(&b.1[1]))
            .map(|(p, _)| *p)
            .or_else(|| {
                records
                    .iter()
                    .map(|(p, o)| (*p, o.iter().filter(|v| **v > 0.0).sum::<f64>()))
                    .min_by(|a, b| a.1.total_cmp(&b.1))
                    .map(|(p, _)| p)
            })
            .unwrap_or(initial);
        (fallback, self.place(fallback))
    }

    fn available(&self, p: Point, placement: Placement) -> (f64, f64) {
        let ov = self.overflow_at(p);
        let (w, h) = (self.content.width, self.content.height);
        let (height_side, width_side) = match placement.side.axis() {
            Axis::Y => (
                placement.side,
                if placement.align == Align::End {
                    Side::Left
                } else {
                    Side::Right
                },
            ),
            Axis::X => (
                if placement.align == Align::End {
                    Side::Top
                } else {
                    Side::Bottom
                },
                placement.side,
            ),
        };
        let max_h = h - ov.top - ov.bottom;
        let max_w = w - ov.left - ov.right;
        let mut avail_h = (h - ov.side(height_side)).min(max_h);
        let mut avail_w = (w - ov.side(width_side)).min(max_w);
        if self.opts.avoid_collisions {
            match placement.side.axis().other() {
                Axis::X => avail_w = max_w,
                Axis::Y => avail_h = max_h,
            }
        } else if placement.align == Align::Center {
            // Centered content grows symmetrically, so the tighter side wins twice.
            let symmetric = |lo: f64, hi: f64| {
                let (a, b) = (lo.max(0.0), hi.max(0.0));
                if a != 0.0 || b != 0.0 { a + b } else { lo.max(hi) }
            };
            match placement.side.axis() {
                Axis::Y => avail_w = w - 2.0 * symmetric(ov.left, ov.right),
                Axis::X => avail_h = h - 2.0 * symmetric(ov.top, ov.bottom),
            }
        }
        (avail_w, avail_h)
    }

    /// Arrow position plus the shift the content needs when the anchor is
    /// too small for the arrow to reach it.
    fn arrow(&self, p: Point, placement: Placement, realign: bool) -> (ArrowData, f64) {
        let axis = placement.side.axis().other();
        let c = coord(p, axis);
        let anchor_start = axis.start(self.anchor);
        let anchor_len = axis.len(self.anchor.size());
        let client = axis.len(self.content);
        let arrow_len = axis.len(self.arrow);

        let end_diff = anchor_len + anchor_start - c - client;
        let start_diff = c - anchor_start;
        let largest_padding = client / 2.0 - arrow_len / 2.0 - 1.0;
        let padding = self.opts.arrow_padding.min(largest_padding);
        let min = padding;
        let max = client - arrow_len - padding;
        let center = client / 2.0 - arrow_len / 2.0 + (end_diff / 2.0 - start_diff / 2.0);
        let offset = clamp(min, center, max);

        let realign = realign
            && placement.align != Align::Center
            && center != offset
            && anchor_len / 2.0 - padding - arrow_len / 2.0 < 0.0;
        let alignment_offset = if !realign {
            0.0
        } else if center < min {
            center - min
        } else {
            center - max
        };

        let mut data = ArrowData {
            center_offset: center - offset - alignment_offset,
            ..ArrowData::default()
        };
        match axis {
            Axis::X => data.x = Some(offset),
            Axis::Y => data.y = Some(offset),
        }
        (data, alignment_offset)
    }

    fn transform_origin(&self, placement: Placement, arrow: Option<&ArrowData>) -> TransformOrigin {
        let hidden = arrow.is_none_or(|a| a.center_offset != 0.0);
        let (aw, ah) = if hidden {
            (0.0, 0.0)
        } else {
            (self.arrow.width, self.arrow.height)
        };
        let no_arrow = OriginComponent::Percent(match placement.align {
            Align::Start => 0.0,
            Align::Center => 50.0,
            Align::End => 100.0,
        });
        let along = |v: Option<f64>, len: f64| {
            if hidden {
                no_arrow
            } else {
                OriginComponent::Px(v.unwrap_or(0.0) + len / 2.0)
            }
        };
        let (ax, ay) = arrow.map_or((None, None), |a| (a.x, a.y));
        match placement.side {
            Side::Bottom => TransformOrigin {
                x: along(ax, aw),
                y: OriginComponent::Px(-ah),
            },
            Side::Top => TransformOrigin {
                x: along(ax, aw),
                y: OriginComponent::Px(self.content.height + ah),
            },
            Side::Right => TransformOrigin {
                x: OriginComponent::Px(-ah),
                y: along(ay, ah),
            },
            Side::Left => TransformOrigin {
                x: OriginComponent::Px(self.content.width + ah),
                y: along(ay, ah),
            },
        }
    }

    fn reference_hidden(&self) -> bool {
        let ov = Overflow::detect(self.anchor, self.boundary, &self.opts.collision_padding);
        let (w, h) = (self.anchor.width(), self.anchor.height());
        ov.top - h >= 0.0 || ov.right - w >= 0.0 || ov.bottom - h >= 0.0 || ov.left - w >= 0.0
    }
}

/// Position `content` against `anchor` inside `boundary`.
///
/// `arrow` is the measured arrow size, if the content has one. Its height is
/// added to the side offset.
pub fn compute_position(
    anchor: Rect,
    content: Size,
    boundary: Rect,
    arrow: Option<Size>,
    opts: &PositionOptions,
) -> PlacementResult {
    let pipeline = Pipeline {
        anchor,
        content,
        boundary,
        arrow: arrow.unwrap_or(Size::ZERO),
        opts,
    };
    let initial = Placement::new(opts.side, opts.align);
    let (placement, mut p) = if opts.avoid_collisions {
        pipeline.flip(initial)
    } else {
        (initial, pipeline.place(initial))
    };
    if placement != initial {
        tracing::trace!(
            from = initial.side.as_str(),
            to = placement.side.as_str(),
            align = placement.align.as_str(),
            "flipped placement"
        );
    }

    let mut arrow_data = None;
    if arrow.is_some() {
        let (data, alignment_offset) = pipeline.arrow(p, placement, true);
        arrow_data = Some(data);
        if alignment_offset != 0.0 {
            let axis = placement.side.axis().other();
            let c = coord(p, axis);
            set_coord(&mut p, axis, c + alignment_offset);
            if opts.avoid_collisions {
                p = pipeline.shift(p, placement);
            }
            arrow_data = Some(pipeline.arrow(p, placement, false).0);
        }
    }
    let (available_width, available_height) = pipeline.available(p, placement);

    let should_hide_arrow = arrow_data.is_none_or(|a| a.center_offset != 0.0);
    let reference_hidden = opts.hide_when_detached && pipeline.reference_hidden();
    if reference_hidden {
        tracing::trace!("anchor clipped out of boundary");
    }

    PlacementResult {
        placement,
        x: p.x,
        y: p.y,
        arrow: arrow_data,
        should_hide_arrow,
        transform_origin: pipeline.transform_origin(placement, arrow_data.as_ref()),
        available_width,
        available_height,
        anchor_width: anchor.width(),
        anchor_height: anchor.height(),
        reference_hidden,
    }
}
