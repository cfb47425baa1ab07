// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! Integration tests for quill-geom viewport bands.

use proptest::prelude::*;
use quill_geom::{Rect, Viewport};

#[test]
fn block_straddling_band_intersects() {
    let vp = Viewport::new(1000.0);
    let band = vp.middle_band(0.1);
    // 0..460 reaches into the band (450..550)
    assert!(Rect::new(0.0, 460.0).intersects(&band));
    // 0..450 ends exactly at the band's top edge
    assert!(!Rect::new(0.0, 450.0).intersects(&band));
}

proptest! {
    #[test]
    fn intersects_is_symmetric(a in -2000.0f64..2000.0, ha in 0.0f64..800.0,
                               b in -2000.0f64..2000.0, hb in 0.0f64..800.0) {
        let r1 = Rect::from_top_height(a, ha);
        let r2 = Rect::from_top_height(b, hb);
        prop_assert_eq!(r1.intersects(&r2), r2.intersects(&r1));
    }

    #[test]
    fn middle_band_sits_inside_viewport(h in 1.0f64..5000.0, ratio in 0.0f64..1.0) {
        let vp = Viewport::new(h);
        let band = vp.middle_band(ratio);
        prop_assert!(band.top() >= 0.0);
        prop_assert!(band.bottom() <= h + 1e-9);
        prop_assert!((band.center() - vp.center()).abs() < 1e-9);
    }
}
