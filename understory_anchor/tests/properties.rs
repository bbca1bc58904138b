// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement invariants over random geometry.

use kurbo::{Rect, Size};
use proptest::prelude::*;
use understory_anchor::{Placement, PositionOptions, Side, compute_position};

const BOUNDARY: Rect = Rect::new(0.0, 0.0, 1000.0, 1000.0);

proptest! {
    #[test]
    fn unobstructed_bottom_sits_under_the_anchor(
        x in 300.0..600.0f64,
        y in 100.0..500.0f64,
        aw in 1.0..100.0f64,
        ah in 1.0..100.0f64,
        cw in 1.0..200.0f64,
        ch in 1.0..200.0f64,
        gap in 0.0..50.0f64,
    ) {
        let anchor = Rect::new(x, y, x + aw, y + ah);
        let opts = PositionOptions::default().with_side_offset(gap);
        let r = compute_position(anchor, Size::new(cw, ch), BOUNDARY, None, &opts);
        prop_assert_eq!(r.placement, Placement::default());
        prop_assert_eq!(r.y, anchor.y1 + gap);
        prop_assert!((r.x + cw / 2.0 - anchor.center().x).abs() < 1e-9);
    }

    #[test]
    fn shifted_content_stays_inside_boundary(
        x in -200.0..1200.0f64,
        y in 0.0..950.0f64,
        aw in 1.0..100.0f64,
        cw in 1.0..400.0f64,
    ) {
        let anchor = Rect::new(x, y, x + aw, y + 20.0);
        let content = Size::new(cw, 40.0);
        let r = compute_position(anchor, content, BOUNDARY, None, &PositionOptions::default());
        prop_assert!(matches!(r.placement.side, Side::Top | Side::Bottom));
        prop_assert!(r.x >= BOUNDARY.x0 - 1e-9);
        prop_assert!(r.x + cw <= BOUNDARY.x1 + 1e-9);
    }
}
