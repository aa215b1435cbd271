// Overlap of the target rectangle with the viewport, one axis at a time.
// See DESIGN.md: GeometryEvaluator

use crate::types::{OverlapFraction, Rect, ViewportSize};

/// Fraction of the segment `[elem_start, elem_end]` that lies inside `[0, viewport_extent]`.
///
/// Cases are checked in a fixed order: fully outside, fully inside, both edges cut,
/// leading edge cut, trailing edge cut. Zero-size elements are never visible.
pub fn axis_overlap(elem_start: f64, elem_end: f64, viewport_extent: f64) -> OverlapFraction {
    let elem_size = elem_end - elem_start;
    if elem_size == 0.0 || elem_size.is_nan() {
        return 0.0;
    }

    let fraction = if elem_start > viewport_extent || elem_end <= 0.0 {
        0.0
    } else if elem_start >= 0.0 && elem_end <= viewport_extent {
        1.0
    } else if elem_start < 0.0 && elem_end > viewport_extent {
        viewport_extent / elem_size
    } else if elem_start < 0.0 && elem_end <= viewport_extent {
        elem_end / elem_size
    } else if elem_start >= 0.0 && elem_end > viewport_extent {
        (viewport_extent - elem_start) / elem_size
    } else {
        0.0
    };

    // Inverted rects and negative viewports can push the ratio out of range.
    if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    }
}

pub fn vertical_overlap(rect: &Rect, viewport: &ViewportSize) -> OverlapFraction {
    axis_overlap(rect.top, rect.bottom, viewport.height)
}

pub fn horizontal_overlap(rect: &Rect, viewport: &ViewportSize) -> OverlapFraction {
    axis_overlap(rect.left, rect.right, viewport.width)
}

/// Rounds to two decimal places using the exact decimal value of `value`,
/// the way `Number.prototype.toFixed(2)` does.
///
/// `0.475` is stored as 0.47499999... and rounds down to 0.47. Exact ties
/// (odd multiples of 1/8, e.g. 0.125) round up to the larger candidate.
pub fn round_to_hundredths(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }

    // value * 8 is exact, so an odd integer here means the decimal expansion ends in 5.
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths.rem_euclid(2.0) == 1.0 {
        return (value * 100.0).ceil() / 100.0;
    }

    format!("{value:.2}").parse().unwrap_or(value)
}

/// Visible percentage of the element (0-100).
///
/// Each axis fraction is rounded to hundredths before multiplying, so reported
/// percentages move in the same steps as the browser probe this replaces.
pub fn percent_viewable(vertical: OverlapFraction, horizontal: OverlapFraction) -> f64 {
    round_to_hundredths(vertical) * round_to_hundredths(horizontal) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Overlap is always a fraction, whatever the inputs.
            #[test]
            fn overlap_is_bounded(
                start in -5_000.0f64..5_000.0,
                end in -5_000.0f64..5_000.0,
                extent in -100.0f64..5_000.0,
            ) {
                let fraction = axis_overlap(start, end, extent);
                prop_assert!(
                    (0.0..=1.0).contains(&fraction),
                    "axis_overlap({}, {}, {}) = {}",
                    start, end, extent, fraction
                );
            }

            /// Sliding an element across the viewport never yields more than
            /// the share the viewport can hold.
            #[test]
            fn overlap_never_exceeds_visible_share(
                start in -2_000.0f64..2_000.0,
                size in 1.0f64..2_000.0,
                extent in 1.0f64..2_000.0,
            ) {
                let fraction = axis_overlap(start, start + size, extent);
                let visible = (start + size).min(extent) - start.max(0.0);
                let expected = (visible.max(0.0) / size).min(1.0);
                prop_assert!(
                    (fraction - expected).abs() < 1e-9,
                    "start={} size={} extent={} fraction={} expected={}",
                    start, size, extent, fraction, expected
                );
            }

            /// Rounding moves a fraction by at most half a hundredth.
            #[test]
            fn hundredths_rounding_is_nearest(value in 0.0f64..=1.0) {
                let rounded = round_to_hundredths(value);
                prop_assert!(
                    (rounded - value).abs() <= 0.005 + 1e-12,
                    "round_to_hundredths({}) = {}",
                    value, rounded
                );
                prop_assert!((rounded * 100.0 - (rounded * 100.0).round()).abs() < 1e-9);
            }

            #[test]
            fn percent_is_bounded(v in 0.0f64..=1.0, h in 0.0f64..=1.0) {
                let percent = percent_viewable(v, h);
                prop_assert!((0.0..=100.0).contains(&percent));
            }
        }
    }

    #[test]
    fn fully_inside_flush() {
        assert_eq!(axis_overlap(0.0, 100.0, 100.0), 1.0);
        assert_eq!(axis_overlap(10.0, 90.0, 100.0), 1.0);
    }

    #[test]
    fn leading_edge_truncated() {
        assert_eq!(axis_overlap(-50.0, 50.0, 100.0), 0.5);
    }

    #[test]
    fn trailing_edge_truncated() {
        assert_eq!(axis_overlap(50.0, 150.0, 100.0), 0.5);
        assert!((axis_overlap(50.0, 200.0, 100.0) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn spans_whole_viewport() {
        assert_eq!(axis_overlap(-100.0, 300.0, 100.0), 0.25);
    }

    #[test]
    fn fully_outside() {
        assert_eq!(axis_overlap(200.0, 300.0, 100.0), 0.0);
        assert_eq!(axis_overlap(-300.0, -200.0, 100.0), 0.0);
        // Bottom edge exactly on the top of the viewport.
        assert_eq!(axis_overlap(-100.0, 0.0, 100.0), 0.0);
    }

    #[test]
    fn zero_size_element() {
        for x in [-10.0, 0.0, 50.0, 100.0, 500.0] {
            assert_eq!(axis_overlap(x, x, 100.0), 0.0);
        }
    }

    #[test]
    fn zero_viewport() {
        assert_eq!(axis_overlap(0.0, 100.0, 0.0), 0.0);
    }

    #[test]
    fn axes_read_matching_rect_edges() {
        let viewport = ViewportSize::new(200.0, 100.0);
        let rect = Rect::new(-50.0, 50.0, 0.0, 400.0);
        assert_eq!(vertical_overlap(&rect, &viewport), 0.5);
        assert_eq!(horizontal_overlap(&rect, &viewport), 0.5);
    }

    #[test]
    fn percent_rounds_each_axis_first() {
        // 1/3 rounds to 0.33 on each axis before multiplying.
        let third = 1.0 / 3.0;
        let percent = percent_viewable(third, third);
        assert!((percent - 0.33 * 0.33 * 100.0).abs() < 1e-12);
        assert!((percent - 10.89).abs() < 1e-9);

        assert_eq!(percent_viewable(1.0, 1.0), 100.0);
        assert_eq!(percent_viewable(0.5, 1.0), 50.0);
        assert_eq!(percent_viewable(0.0, 1.0), 0.0);
    }

    #[test]
    fn hundredths_rounding() {
        assert_eq!(round_to_hundredths(0.334), 0.33);
        assert_eq!(round_to_hundredths(0.996), 1.0);
        assert_eq!(round_to_hundredths(1.0), 1.0);
        assert_eq!(round_to_hundredths(0.0), 0.0);
    }

    #[test]
    fn hundredths_rounding_uses_stored_decimal_value() {
        // Stored just below the written tie, so these round down.
        assert_eq!(round_to_hundredths(3.0 / 40.0), 0.07);
        assert_eq!(round_to_hundredths(7.0 / 40.0), 0.17);
        assert_eq!(round_to_hundredths(17.0 / 40.0), 0.42);
        assert_eq!(round_to_hundredths(19.0 / 40.0), 0.47);
        assert_eq!(round_to_hundredths(29.0 / 40.0), 0.72);
    }

    #[test]
    fn hundredths_rounding_exact_ties_round_up() {
        assert_eq!(round_to_hundredths(0.125), 0.13);
        assert_eq!(round_to_hundredths(0.375), 0.38);
        assert_eq!(round_to_hundredths(0.625), 0.63);
        assert_eq!(round_to_hundredths(0.875), 0.88);
    }

    #[test]
    fn percent_for_partially_visible_element() {
        // 19px of a 40px element on screen.
        let v = axis_overlap(-21.0, 19.0, 600.0);
        assert_eq!(v, 19.0 / 40.0);
        assert!(percent_viewable(v, 1.0) < 48.0);
    }
}
