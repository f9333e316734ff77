//! Property tests for pixel alignment and size constraints.

use boden_core::{Dip, Rect, RoundType, SIGNIFICANCE_BOUNDARY, Size};
use proptest::prelude::*;

fn scale() -> impl Strategy<Value = f64> {
    prop_oneof![Just(1.0), Just(1.25), Just(1.5), Just(2.0), Just(3.0), 0.5f64..4.0]
}

fn rect() -> impl Strategy<Value = Rect> {
    (-500.0f64..500.0, -500.0f64..500.0, 0.0f64..1000.0, 0.0f64..1000.0)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

proptest! {
    #[test]
    fn rounding_is_monotonic(r in rect(), s in scale()) {
        let down = Dip::pixel_align_rect(r, s, RoundType::Down, RoundType::Down);
        let nearest = Dip::pixel_align_rect(r, s, RoundType::Nearest, RoundType::Nearest);
        let up = Dip::pixel_align_rect(r, s, RoundType::Up, RoundType::Up);

        prop_assert!(down.x <= nearest.x && nearest.x <= up.x);
        prop_assert!(down.y <= nearest.y && nearest.y <= up.y);
        prop_assert!(down.width <= nearest.width && nearest.width <= up.width);
        prop_assert!(down.height <= nearest.height && nearest.height <= up.height);
    }

    #[test]
    fn alignment_is_stable(v in -1000.0f64..1000.0, s in scale()) {
        for round in [RoundType::Nearest, RoundType::Up, RoundType::Down] {
            let once = Dip::pixel_align(v, s, round);
            let twice = Dip::pixel_align(once, s, round);
            prop_assert!((once - twice).abs() < SIGNIFICANCE_BOUNDARY);
        }
    }

    #[test]
    fn alignment_stays_within_one_pixel(v in -1000.0f64..1000.0, s in scale()) {
        for round in [RoundType::Nearest, RoundType::Up, RoundType::Down] {
            let aligned = Dip::pixel_align(v, s, round);
            prop_assert!((aligned - v).abs() <= 1.0 / s + SIGNIFICANCE_BOUNDARY);
        }
    }

    #[test]
    fn maximum_beats_minimum(
        w in 0.0f64..1000.0,
        h in 0.0f64..1000.0,
        max_w in 0.0f64..500.0,
        max_h in 0.0f64..500.0,
        extra in 1.0f64..500.0,
    ) {
        let maximum = Size::new(max_w, max_h);
        let minimum = Size::new(max_w + extra, max_h + extra);

        let mut size = Size::new(w, h);
        size.apply_minimum(minimum);
        size.apply_maximum(maximum);

        prop_assert!(size.width <= maximum.width);
        prop_assert!(size.height <= maximum.height);
    }
}
