//! Triple Top / Triple Bottom

use super::helpers::{relative_diff, Extremum, EXTREMUM_WINDOW};
use super::PatternDetector;
use crate::{KeyLevels, Pattern, PatternKind, PriceSeries};

pub const TRIPLE_MIN_BARS: usize = 25;
/// Minimum distance between consecutive extremes
pub const TRIPLE_MIN_GAP: usize = 5;
/// Search horizon for the next extreme, measured from the previous one
pub const TRIPLE_MAX_GAP: usize = 15;
/// Trailing bars never tried as the first extreme
pub const TRIPLE_FIRST_TAIL: usize = 20;
/// Trailing bars never tried as the second extreme
pub const TRIPLE_SECOND_TAIL: usize = 10;
/// Reported for every match regardless of how tight the three levels are
pub const TRIPLE_CONFIDENCE: f64 = 0.95;

/// Triple Top (bearish) - three matching peaks on the highs
#[derive(Debug, Clone, Copy, Default)]
pub struct TripleTopDetector;

impl PatternDetector for TripleTopDetector {
    fn name(&self) -> &'static str {
        "triple_top"
    }

    fn min_bars(&self) -> usize {
        TRIPLE_MIN_BARS
    }

    fn detect(&self, series: &PriceSeries<'_>, tolerance: f64) -> Vec<Pattern> {
        scan(series.highs(), Extremum::Peak, tolerance)
            .into_iter()
            .map(|m| Pattern {
                kind: PatternKind::TripleTop,
                confidence: TRIPLE_CONFIDENCE,
                start_idx: m.first_idx,
                end_idx: m.third_idx,
                key_levels: KeyLevels::TripleTop {
                    peak1: m.levels[0],
                    peak2: m.levels[1],
                    peak3: m.levels[2],
                    support: m.between,
                },
                description: format!(
                    "Bearish Triple Top: Peaks≈{:.2}, Support={:.2}",
                    m.average, m.between
                ),
            })
            .collect()
    }
}

/// Triple Bottom (bullish) - three matching troughs on the lows
#[derive(Debug, Clone, Copy, Default)]
pub struct TripleBottomDetector;

impl PatternDetector for TripleBottomDetector {
    fn name(&self) -> &'static str {
        "triple_bottom"
    }

    fn min_bars(&self) -> usize {
        TRIPLE_MIN_BARS
    }

    fn detect(&self, series: &PriceSeries<'_>, tolerance: f64) -> Vec<Pattern> {
        scan(series.lows(), Extremum::Trough, tolerance)
            .into_iter()
            .map(|m| Pattern {
                kind: PatternKind::TripleBottom,
                confidence: TRIPLE_CONFIDENCE,
                start_idx: m.first_idx,
                end_idx: m.third_idx,
                key_levels: KeyLevels::TripleBottom {
                    bottom1: m.levels[0],
                    bottom2: m.levels[1],
                    bottom3: m.levels[2],
                    resistance: m.between,
                },
                description: format!(
                    "Bullish Triple Bottom: Bottoms≈{:.2}, Resistance={:.2}",
                    m.average, m.between
                ),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
struct Triple {
    first_idx: usize,
    third_idx: usize,
    levels: [f64; 3],
    average: f64,
    between: f64,
}

/// Three stages: first extreme `i`, the first matching second extreme `j`
/// (stop at the first hit), then every third extreme `k` that keeps all
/// three within tolerance of their mean.
fn scan(series: &[f64], polarity: Extremum, tolerance: f64) -> Vec<Triple> {
    let n = series.len();
    let mut found = Vec::new();
    if n < TRIPLE_MIN_BARS {
        return found;
    }

    let is_extreme = |idx: usize| polarity.is_local(series, idx, EXTREMUM_WINDOW);

    for i in TRIPLE_MIN_GAP..n - TRIPLE_FIRST_TAIL {
        if !is_extreme(i) {
            continue;
        }
        let first = series[i];

        let second_end = (i + TRIPLE_MAX_GAP).min(n - TRIPLE_SECOND_TAIL);
        let Some(j) = (i + TRIPLE_MIN_GAP..second_end).find(|&j| {
            is_extreme(j)
                && relative_diff(series[j], first, first).is_some_and(|diff| diff <= tolerance)
        }) else {
            continue;
        };
        let second = series[j];

        for k in j + TRIPLE_MIN_GAP..(j + TRIPLE_MAX_GAP).min(n - 1) {
            if !is_extreme(k) {
                continue;
            }
            let third = series[k];

            let average = (first + second + third) / 3.0;
            let all_close = [first, second, third].iter().all(|&level| {
                relative_diff(level, average, average).is_some_and(|diff| diff <= tolerance)
            });
            if !all_close {
                continue;
            }

            // Covers both sub-ranges [i, j) and [j, k)
            let between = polarity.opposite().extreme_of(&series[i..k]);

            found.push(Triple {
                first_idx: i,
                third_idx: k,
                levels: [first, second, third],
                average,
                between,
            });
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Upper envelope of three tents with apexes at 6, 14 and 22
    fn triple_top_highs(n: usize) -> Vec<f64> {
        let apexes = [(6, 110.0), (14, 110.5), (22, 109.8)];
        (0..n)
            .map(|k| {
                apexes
                    .iter()
                    .map(|&(at, level): &(usize, f64)| level - 2.5 * (k as f64 - at as f64).abs())
                    .fold(f64::NEG_INFINITY, f64::max)
            })
            .collect()
    }

    #[test]
    fn test_triple_top_found() {
        let highs = triple_top_highs(40);
        let series = PriceSeries::new(&highs, &highs, &highs).unwrap();

        let found = TripleTopDetector.detect(&series, 0.02);
        assert_eq!(found.len(), 1);

        let p = &found[0];
        assert_eq!(p.kind, PatternKind::TripleTop);
        assert_eq!((p.start_idx, p.end_idx), (6, 22));
        assert_eq!(p.confidence, TRIPLE_CONFIDENCE);
        assert_eq!(p.key_levels.get("peak2"), Some(110.5));
        assert_eq!(p.key_levels.get("support"), Some(100.5));
    }

    #[test]
    fn test_triple_bottom_found() {
        let lows: Vec<f64> = triple_top_highs(40).iter().map(|h| 220.0 - h).collect();
        let series = PriceSeries::new(&lows, &lows, &lows).unwrap();

        let found = TripleBottomDetector.detect(&series, 0.02);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].confidence, TRIPLE_CONFIDENCE);
        assert_eq!(found[0].key_levels.get("bottom1"), Some(110.0));
        assert_eq!(found[0].key_levels.get("resistance"), Some(119.5));
    }

    #[test]
    fn test_earliest_second_peak_wins() {
        // Peaks at 12 and 17 both match the first; 12 is taken as peak2
        let apexes = [(6.0, 110.0), (12.0, 110.4), (17.0, 110.1), (24.0, 109.9)];
        let highs: Vec<f64> = (0..40)
            .map(|k| {
                apexes
                    .iter()
                    .map(|&(at, level): &(f64, f64)| level - 2.5 * (k as f64 - at).abs())
                    .fold(f64::NEG_INFINITY, f64::max)
            })
            .collect();
        let series = PriceSeries::new(&highs, &highs, &highs).unwrap();

        let found = TripleTopDetector.detect(&series, 0.02);
        let from_first: Vec<(usize, Option<f64>)> = found
            .iter()
            .filter(|p| p.start_idx == 6)
            .map(|p| (p.end_idx, p.key_levels.get("peak2")))
            .collect();
        assert_eq!(from_first, vec![(17, Some(110.4)), (24, Some(110.4))]);
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn test_third_peak_out_of_tolerance() {
        let mut highs = triple_top_highs(40);
        // Raise the third apex well above the other two
        for h in &mut highs[19..26] {
            *h += 8.0;
        }
        let series = PriceSeries::new(&highs, &highs, &highs).unwrap();
        assert!(TripleTopDetector.detect(&series, 0.02).is_empty());
    }

    #[test]
    fn test_short_series_is_empty() {
        let highs = vec![100.0; TRIPLE_MIN_BARS - 1];
        let series = PriceSeries::new(&highs, &highs, &highs).unwrap();
        assert!(TripleTopDetector.detect(&series, 0.02).is_empty());
        assert!(TripleBottomDetector.detect(&series, 0.02).is_empty());
    }
}
