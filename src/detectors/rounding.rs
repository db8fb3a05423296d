//! Rounding Bottom (saucer)

use super::helpers::{linear_slope, mean, min_of};
use super::PatternDetector;
use crate::{KeyLevels, Pattern, PatternKind, PriceSeries};

pub const ROUNDING_MIN_BARS: usize = 30;
/// Width of the sliding window
pub const ROUNDING_WINDOW: usize = 20;
/// Largest accepted `||left slope| - |right slope|| / |left slope|`
pub const ROUNDING_MAX_ASYMMETRY: f64 = 0.5;

/// Rounding Bottom (bullish) - a gradual U on the lows
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundingBottomDetector;

impl PatternDetector for RoundingBottomDetector {
    fn name(&self) -> &'static str {
        "rounding_bottom"
    }

    fn min_bars(&self) -> usize {
        ROUNDING_MIN_BARS
    }

    /// Tolerance is not used; the shape test has its own fixed thresholds.
    fn detect(&self, series: &PriceSeries<'_>, _tolerance: f64) -> Vec<Pattern> {
        let lows = series.lows();
        let n = lows.len();
        let mut patterns = Vec::new();
        if n < ROUNDING_MIN_BARS {
            return patterns;
        }

        // The final start offset n - WINDOW is not visited
        for start in 0..n - ROUNDING_WINDOW {
            let end = start + ROUNDING_WINDOW - 1;
            let Some(asymmetry) = bowl_asymmetry(&lows[start..=end]) else {
                continue;
            };

            let bottom = min_of(&lows[start..=end]);
            let entry = lows[start];
            let current = lows[end];

            patterns.push(Pattern {
                kind: PatternKind::RoundingBottom,
                confidence: 1.0 - asymmetry,
                start_idx: start,
                end_idx: end,
                key_levels: KeyLevels::RoundingBottom {
                    bottom,
                    entry,
                    current,
                },
                description: format!(
                    "Bullish Rounding Bottom: Bottom={bottom:.2}, Current={current:.2}"
                ),
            });
        }

        patterns
    }
}

/// Checks a window for a U shape and returns the slope asymmetry of its sides.
///
/// The window is cut into integer thirds, the remainder going to the right
/// third. The middle must average below both sides, the left side must fall
/// and the right side must rise at comparable rates.
fn bowl_asymmetry(window: &[f64]) -> Option<f64> {
    let len = window.len();
    let left = &window[..len / 3];
    let middle = &window[len / 3..2 * len / 3];
    let right = &window[2 * len / 3..];

    let middle_mean = mean(middle);
    if middle_mean >= mean(left) || middle_mean >= mean(right) {
        return None;
    }

    let left_slope = linear_slope(left)?;
    let right_slope = linear_slope(right)?;
    if left_slope >= 0.0 || right_slope <= 0.0 {
        return None;
    }

    let asymmetry = (left_slope.abs() - right_slope.abs()).abs() / left_slope.abs();
    (asymmetry <= ROUNDING_MAX_ASYMMETRY).then_some(asymmetry)
}
