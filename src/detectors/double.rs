//! Double Top / Double Bottom
//!
//! Two extremes at roughly the same level separated by a meaningful retrace.

use super::helpers::{relative_diff, Extremum, EXTREMUM_WINDOW};
use super::PatternDetector;
use crate::{KeyLevels, Pattern, PatternKind, PriceSeries};

pub const DOUBLE_MIN_BARS: usize = 15;
/// Minimum distance between the two extremes
pub const DOUBLE_MIN_GAP: usize = 5;
/// Search horizon for the second extreme, measured from the first
pub const DOUBLE_MAX_GAP: usize = 20;
/// Trailing bars never tried as the first extreme
pub const DOUBLE_TAIL: usize = 10;
/// Required retrace between the extremes, relative to the first one.
/// Independent of the engine tolerance.
pub const DOUBLE_MIN_RETRACE: f64 = 0.02;

/// Double Top (bearish) - two matching peaks on the highs
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleTopDetector;

impl PatternDetector for DoubleTopDetector {
    fn name(&self) -> &'static str {
        "double_top"
    }

    fn min_bars(&self) -> usize {
        DOUBLE_MIN_BARS
    }

    fn detect(&self, series: &PriceSeries<'_>, tolerance: f64) -> Vec<Pattern> {
        scan(series.highs(), Extremum::Peak, tolerance)
            .into_iter()
            .map(|m| Pattern {
                kind: PatternKind::DoubleTop,
                confidence: m.confidence,
                start_idx: m.first_idx,
                end_idx: m.second_idx,
                key_levels: KeyLevels::DoubleTop {
                    peak1: m.first,
                    peak2: m.second,
                    support: m.between,
                },
                description: format!(
                    "Bearish Double Top: Peaks={:.2}, Support={:.2}",
                    m.first, m.between
                ),
            })
            .collect()
    }
}

/// Double Bottom (bullish) - two matching troughs on the lows
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleBottomDetector;

impl PatternDetector for DoubleBottomDetector {
    fn name(&self) -> &'static str {
        "double_bottom"
    }

    fn min_bars(&self) -> usize {
        DOUBLE_MIN_BARS
    }

    fn detect(&self, series: &PriceSeries<'_>, tolerance: f64) -> Vec<Pattern> {
        scan(series.lows(), Extremum::Trough, tolerance)
            .into_iter()
            .map(|m| Pattern {
                kind: PatternKind::DoubleBottom,
                confidence: m.confidence,
                start_idx: m.first_idx,
                end_idx: m.second_idx,
                key_levels: KeyLevels::DoubleBottom {
                    bottom1: m.first,
                    bottom2: m.second,
                    resistance: m.between,
                },
                description: format!(
                    "Bullish Double Bottom: Bottoms={:.2}, Resistance={:.2}",
                    m.first, m.between
                ),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
struct Pair {
    first_idx: usize,
    second_idx: usize,
    first: f64,
    second: f64,
    between: f64,
    confidence: f64,
}

/// Unlike the head-and-shoulders search there is no early exit: every
/// second extreme that matches the first produces its own pair.
fn scan(series: &[f64], polarity: Extremum, tolerance: f64) -> Vec<Pair> {
    let n = series.len();
    let mut found = Vec::new();
    if n < DOUBLE_MIN_BARS {
        return found;
    }

    for i in DOUBLE_MIN_GAP..n - DOUBLE_TAIL {
        if !polarity.is_local(series, i, EXTREMUM_WINDOW) {
            continue;
        }
        let first = series[i];

        for j in i + DOUBLE_MIN_GAP..(i + DOUBLE_MAX_GAP).min(n - 1) {
            if !polarity.is_local(series, j, EXTREMUM_WINDOW) {
                continue;
            }
            let second = series[j];

            let Some(diff) = relative_diff(first, second, first) else {
                continue;
            };
            if diff > tolerance {
                continue;
            }

            // Valley between two tops, or ridge between two bottoms, on the same series
            let between = polarity.opposite().extreme_of(&series[i..j]);
            match relative_diff(first, between, first) {
                Some(retrace) if retrace >= DOUBLE_MIN_RETRACE => {}
                _ => continue,
            }

            found.push(Pair {
                first_idx: i,
                second_idx: j,
                first,
                second,
                between,
                confidence: 1.0 - diff,
            });
        }
    }

    found
}
