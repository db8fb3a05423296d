//! Head and Shoulders / Inverse Head and Shoulders
//!
//! Three extremes where the middle one (the head) lies beyond two roughly
//! equal shoulders. The neckline is read from the opposite price series.

use super::helpers::{relative_diff, Extremum, EXTREMUM_WINDOW};
use super::PatternDetector;
use crate::{KeyLevels, Pattern, PatternKind, PriceSeries};

/// Shortest series either detector will look at
pub const HS_MIN_BARS: usize = 20;
/// Farthest a shoulder may sit from the head
pub const SHOULDER_REACH: usize = 10;
/// Closest a shoulder may sit to the head
pub const SHOULDER_GAP: usize = 3;
/// Head prominence (relative to the head) that earns the full prominence score
pub const FULL_PROMINENCE: f64 = 0.05;

// ============================================================
// HEAD AND SHOULDERS
// ============================================================

/// Head and Shoulders (bearish) - three peaks on the highs, neckline on the lows
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadAndShouldersDetector;

impl PatternDetector for HeadAndShouldersDetector {
    fn name(&self) -> &'static str {
        "head_and_shoulders"
    }

    fn min_bars(&self) -> usize {
        HS_MIN_BARS
    }

    fn detect(&self, series: &PriceSeries<'_>, tolerance: f64) -> Vec<Pattern> {
        scan(series.highs(), series.lows(), Extremum::Peak, tolerance)
            .into_iter()
            .map(|m| Pattern {
                kind: PatternKind::HeadAndShoulders,
                confidence: m.confidence,
                start_idx: m.left_idx,
                end_idx: m.right_idx,
                key_levels: m.levels(),
                description: format!(
                    "Bearish H&S: Head={:.2}, Neckline={:.2}",
                    m.head, m.neckline
                ),
            })
            .collect()
    }
}

// ============================================================
// INVERSE HEAD AND SHOULDERS
// ============================================================

/// Inverse Head and Shoulders (bullish) - three troughs on the lows, neckline on the highs
#[derive(Debug, Clone, Copy, Default)]
pub struct InverseHeadAndShouldersDetector;

impl PatternDetector for InverseHeadAndShouldersDetector {
    fn name(&self) -> &'static str {
        "inverse_head_and_shoulders"
    }

    fn min_bars(&self) -> usize {
        HS_MIN_BARS
    }

    fn detect(&self, series: &PriceSeries<'_>, tolerance: f64) -> Vec<Pattern> {
        scan(series.lows(), series.highs(), Extremum::Trough, tolerance)
            .into_iter()
            .map(|m| Pattern {
                kind: PatternKind::InverseHeadAndShoulders,
                confidence: m.confidence,
                start_idx: m.left_idx,
                end_idx: m.right_idx,
                key_levels: m.levels(),
                description: format!(
                    "Bullish IH&S: Head={:.2}, Neckline={:.2}",
                    m.head, m.neckline
                ),
            })
            .collect()
    }
}

// ============================================================
// SHARED SEARCH
// ============================================================

#[derive(Debug, Clone, Copy)]
struct Formation {
    left_idx: usize,
    right_idx: usize,
    head: f64,
    left_shoulder: f64,
    right_shoulder: f64,
    neckline: f64,
    confidence: f64,
}

impl Formation {
    fn levels(&self) -> KeyLevels {
        KeyLevels::HeadAndShoulders {
            head: self.head,
            left_shoulder: self.left_shoulder,
            right_shoulder: self.right_shoulder,
            neckline: self.neckline,
        }
    }
}

/// Every head index in `[10, n - 10)` is tried independently. Shoulders are
/// the first qualifying extreme in ascending order on each side; adjacent
/// heads may yield overlapping formations and all of them are kept.
fn scan(extremes: &[f64], neck: &[f64], polarity: Extremum, tolerance: f64) -> Vec<Formation> {
    let n = extremes.len();
    let mut found = Vec::new();
    if n < HS_MIN_BARS {
        return found;
    }

    for head_idx in SHOULDER_REACH..n - SHOULDER_REACH {
        let is_shoulder = |j: &usize| polarity.is_local(extremes, *j, EXTREMUM_WINDOW);

        let Some(left_idx) = (head_idx - SHOULDER_REACH..head_idx - SHOULDER_GAP).find(is_shoulder)
        else {
            continue;
        };
        let right_end = (head_idx + SHOULDER_REACH).min(n - 1);
        let Some(right_idx) = (head_idx + SHOULDER_GAP..right_end).find(is_shoulder) else {
            continue;
        };

        let head = extremes[head_idx];
        let left_shoulder = extremes[left_idx];
        let right_shoulder = extremes[right_idx];

        if !polarity.exceeds(head, left_shoulder) || !polarity.exceeds(head, right_shoulder) {
            continue;
        }

        let Some(shoulder_diff) = relative_diff(left_shoulder, right_shoulder, left_shoulder)
        else {
            continue;
        };
        if shoulder_diff > tolerance {
            continue;
        }

        let Some(confidence) = confidence(head, left_shoulder, right_shoulder, shoulder_diff)
        else {
            continue;
        };

        // Troughs (or peaks, for the inverse) flanking the head on the opposite series
        let neck_polarity = polarity.opposite();
        let left_neck = neck_polarity.extreme_of(&neck[left_idx..head_idx]);
        let right_neck = neck_polarity.extreme_of(&neck[head_idx..right_idx]);
        let neckline = (left_neck + right_neck) / 2.0;

        found.push(Formation {
            left_idx,
            right_idx,
            head,
            left_shoulder,
            right_shoulder,
            neckline,
            confidence,
        });
    }

    found
}

/// `0.6 * symmetry + 0.4 * prominence`, where prominence saturates once the head
/// sits 5% away from the shoulder average. `None` if the head price is not positive.
fn confidence(head: f64, left_shoulder: f64, right_shoulder: f64, shoulder_diff: f64) -> Option<f64> {
    let symmetry = 1.0 - shoulder_diff;
    let prominence = relative_diff(head, (left_shoulder + right_shoulder) / 2.0, head)?;
    let prominence_score = (prominence / FULL_PROMINENCE).min(1.0);
    Some(symmetry * 0.6 + prominence_score * 0.4)
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Left shoulder at 4 (110), head at 10 (120), right shoulder at 15 (109)
    fn hs_highs() -> Vec<f64> {
        vec![
            100.0, 102.0, 105.0, 107.0, 110.0, 106.0, 102.0, 104.0, 112.0, 116.0, 120.0, 112.0,
            104.0, 102.0, 105.0, 109.0, 105.0, 102.0, 100.0, 98.0, 96.0,
        ]
    }

    #[test]
    fn test_head_and_shoulders_found() {
        let highs = hs_highs();
        let lows: Vec<f64> = highs.iter().map(|h| h - 2.0).collect();
        let closes: Vec<f64> = highs.iter().map(|h| h - 1.0).collect();
        let series = PriceSeries::new(&highs, &lows, &closes).unwrap();

        let found = HeadAndShouldersDetector.detect(&series, 0.02);
        assert_eq!(found.len(), 1);

        let p = &found[0];
        assert_eq!(p.kind, PatternKind::HeadAndShoulders);
        assert_eq!((p.start_idx, p.end_idx), (4, 15));
        assert_eq!(p.key_levels.get("head"), Some(120.0));
        assert_eq!(p.key_levels.get("left_shoulder"), Some(110.0));
        assert_eq!(p.key_levels.get("right_shoulder"), Some(109.0));

        // min(lows[4..10]) = 100, min(lows[10..15]) = 100
        assert_eq!(p.key_levels.get("neckline"), Some(100.0));

        let expected = 0.6 * (1.0 - 1.0 / 110.0) + 0.4;
        assert!((p.confidence - expected).abs() < 1e-12);
    }

    #[test]
    fn test_uneven_shoulders_rejected() {
        let mut highs = hs_highs();
        highs[15] = 104.5; // right shoulder moves to 16 at 105, ~4.5% below the left
        highs[14] = 104.0;
        let lows: Vec<f64> = highs.iter().map(|h| h - 2.0).collect();
        let series = PriceSeries::new(&highs, &lows, &highs).unwrap();

        assert!(HeadAndShouldersDetector.detect(&series, 0.02).is_empty());
        assert!(!HeadAndShouldersDetector.detect(&series, 0.06).is_empty());
    }

    #[test]
    fn test_flat_head_reports_each_head_index() {
        // Head spread over 10 and 11, series long enough for both to be tried
        let mut highs = hs_highs();
        highs[11] = 120.0;
        highs.extend([94.0, 92.0, 90.0, 88.0, 86.0]);
        let lows: Vec<f64> = highs.iter().map(|h| h - 2.0).collect();
        let series = PriceSeries::new(&highs, &lows, &highs).unwrap();

        let found = HeadAndShouldersDetector.detect(&series, 0.02);
        assert_eq!(found.len(), 2);
        for p in &found {
            assert_eq!((p.start_idx, p.end_idx), (4, 15));
            assert_eq!(p.key_levels.get("head"), Some(120.0));
        }
        // Overlapping matches are kept as separate records
        assert_eq!(found[0], found[1]);
    }

    #[test]
    fn test_inverse_head_and_shoulders_found() {
        let lows: Vec<f64> = hs_highs().iter().map(|h| 230.0 - h).collect();
        let highs: Vec<f64> = lows.iter().map(|l| l + 2.0).collect();
        let series = PriceSeries::new(&highs, &lows, &lows).unwrap();

        let found = InverseHeadAndShouldersDetector.detect(&series, 0.02);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, PatternKind::InverseHeadAndShoulders);
        assert_eq!(found[0].key_levels.get("head"), Some(110.0));
        // max(highs[4..10]) = 130, max(highs[10..15]) = 130
        assert_eq!(found[0].key_levels.get("neckline"), Some(130.0));
    }

    #[test]
    fn test_short_series_is_empty() {
        let highs = vec![100.0; HS_MIN_BARS - 1];
        let series = PriceSeries::new(&highs, &highs, &highs).unwrap();
        assert!(HeadAndShouldersDetector.detect(&series, 0.02).is_empty());
        assert!(InverseHeadAndShouldersDetector.detect(&series, 0.02).is_empty());
    }

    #[test]
    fn test_confidence_guards_non_positive_head() {
        assert_eq!(confidence(0.0, 1.0, 1.0, 0.0), None);
        let c = confidence(120.0, 110.0, 110.0, 0.0).unwrap();
        assert!((c - 1.0).abs() < 1e-12);
    }
}
