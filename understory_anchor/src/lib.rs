// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Anchor: keep floating content attached to an anchor.
//!
//! [`compute_position`] is a pure function from an anchor rectangle, a content
//! size, a collision boundary, and an optional arrow size to a
//! [`PlacementResult`]. It runs these stages in order:
//!
//! 1. **Offset**: push the content `side_offset + arrow height` away from the
//!    anchor and `align_offset` along it.
//! 2. **Shift** (with `avoid_collisions`): clamp along the alignment axis to
//!    stay inside the padded boundary. [`Sticky::Partial`] stops once the
//!    content would no longer overlap the anchor's span.
//! 3. **Flip** (with `avoid_collisions`): try the opposite alignment, the
//!    opposite side, then both, keeping the first placement that fits.
//!    When none fits, prefer one that fits on the main axis, else the one with
//!    the least total overflow.
//! 4. **Size**: how much width and height remain before the boundary.
//! 5. **Arrow**: where the arrow must sit to point at the anchor's center.
//! 6. **Transform origin**: the arrow tip, or the anchor-facing edge when the
//!    arrow is hidden.
//! 7. **Hide** (with `hide_when_detached`): whether the anchor is fully
//!    clipped.
//!
//! [`AnchoredContent`] wraps that function with the lifecycle of a mounted
//! popup: it parks the content off-screen until the anchor is measured,
//! recomputes on [`UpdateTrigger`]s, reports the first placement, and produces
//! the [`ContentStyle`] (transform, z-index, and `--popper-*` variables) to
//! write through a [`StyleSink`].
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use understory_anchor::{Align, PositionOptions, Side, compute_position};
//!
//! let anchor = Rect::new(50.0, 50.0, 90.0, 70.0);
//! let opts = PositionOptions::default().with_side_offset(4.0);
//! let r = compute_position(anchor, Size::new(60.0, 30.0), Rect::new(0.0, 0.0, 200.0, 200.0), None, &opts);
//!
//! assert_eq!((r.placement.side, r.placement.align), (Side::Bottom, Align::Center));
//! assert_eq!((r.x, r.y), (40.0, 74.0));
//! ```
//!
//! ## Features
//!
//! - `dom_adapter`: [`StyleSink`] and measurement for `understory_dom::Document`.
//! - `serde`: serialization for the option types.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(feature = "dom_adapter")]
pub mod adapters;
mod compute;
mod content;
mod types;

pub use compute::{
    ArrowData, OriginComponent, PlacementResult, TransformOrigin, boundary_rect, compute_position,
};
pub use content::{
    ANCHOR_HEIGHT_VAR, ANCHOR_WIDTH_VAR, AVAILABLE_HEIGHT_VAR, AVAILABLE_WIDTH_VAR,
    AnchoredContent, ContentStyle, Measurements, Placed, StyleSink, TRANSFORM_ORIGIN_VAR,
    UNPOSITIONED_TRANSFORM, UpdateTrigger, apply_style,
};
pub use types::{Align, Padding, Placement, PositionOptions, Side, Sticky, UpdateStrategy};
