//! Spike V - a sharp move into bar `i` followed by an equally sharp reversal.

use super::helpers::relative_change;
use super::PatternDetector;
use crate::{KeyLevels, Pattern, PatternKind, PriceSeries};

pub const SPIKE_MIN_BARS: usize = 10;
/// Bars measured on each side of the spike bar
pub const SPIKE_SPAN: usize = 5;
/// Minimum relative close-to-close move on each side
pub const SPIKE_MIN_MOVE: f64 = 0.05;
/// Move on the weaker side that earns full confidence
pub const SPIKE_FULL_MOVE: f64 = 0.10;

/// Spike V / inverted V on the closes. Emits both bullish and bearish kinds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpikeDetector;

impl PatternDetector for SpikeDetector {
    fn name(&self) -> &'static str {
        "spike_v"
    }

    fn min_bars(&self) -> usize {
        SPIKE_MIN_BARS
    }

    fn detect(&self, series: &PriceSeries<'_>, _tolerance: f64) -> Vec<Pattern> {
        let closes = series.closes();
        let n = closes.len();
        let mut patterns = Vec::new();
        if n < SPIKE_MIN_BARS {
            return patterns;
        }

        for i in SPIKE_SPAN..n - SPIKE_SPAN {
            let entry = closes[i - SPIKE_SPAN];
            let exit = closes[i + SPIKE_SPAN];
            let Some(before) = relative_change(entry, closes[i]) else {
                continue;
            };
            let Some(after) = relative_change(closes[i], exit) else {
                continue;
            };

            // Only detector whose score is clamped to 1.0
            let confidence = (before.abs().min(after.abs()) / SPIKE_FULL_MOVE).min(1.0);

            if before <= -SPIKE_MIN_MOVE && after >= SPIKE_MIN_MOVE {
                let spike_low = series.lows()[i];
                patterns.push(Pattern {
                    kind: PatternKind::SpikeBullish,
                    confidence,
                    start_idx: i - SPIKE_SPAN,
                    end_idx: i + SPIKE_SPAN,
                    key_levels: KeyLevels::SpikeLow {
                        spike_low,
                        entry,
                        exit,
                    },
                    description: format!(
                        "Bullish Spike: Low={spike_low:.2}, Recovery={:.1}%",
                        after * 100.0
                    ),
                });
            } else if before >= SPIKE_MIN_MOVE && after <= -SPIKE_MIN_MOVE {
                let spike_high = series.highs()[i];
                patterns.push(Pattern {
                    kind: PatternKind::SpikeBearish,
                    confidence,
                    start_idx: i - SPIKE_SPAN,
                    end_idx: i + SPIKE_SPAN,
                    key_levels: KeyLevels::SpikeHigh {
                        spike_high,
                        entry,
                        exit,
                    },
                    description: format!(
                        "Bearish Spike: High={spike_high:.2}, Drop={:.1}%",
                        after * 100.0
                    ),
                });
            }
        }

        patterns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullish_spike_is_clamped() {
        let closes = [100.0, 98.0, 95.0, 90.0, 85.0, 80.0, 85.0, 90.0, 95.0, 100.0, 105.0];
        let highs: Vec<f64> = closes.iter().map(|c| c + 1.0).collect();
        let lows: Vec<f64> = closes.iter().map(|c| c - 1.0).collect();
        let series = PriceSeries::new(&highs, &lows, &closes).unwrap();

        let found = SpikeDetector.detect(&series, 0.02);
        assert_eq!(found.len(), 1);

        let p = &found[0];
        assert_eq!(p.kind, PatternKind::SpikeBullish);
        assert_eq!((p.start_idx, p.end_idx), (0, 10));
        // raw score is 0.2 / 0.1 = 2.0
        assert_eq!(p.confidence, 1.0);
        assert_eq!(p.key_levels.get("spike_low"), Some(79.0));
        assert_eq!(p.key_levels.get("entry"), Some(100.0));
        assert_eq!(p.key_levels.get("exit"), Some(105.0));
        assert!(p.description.starts_with("Bullish Spike: Low=79.00"));
    }

    #[test]
    fn test_bearish_spike_partial_confidence() {
        // +8% into the spike, -6% out of it
        let closes = [100.0, 102.0, 104.0, 106.0, 107.0, 108.0, 106.0, 105.0, 104.0, 103.0, 101.52];
        let highs: Vec<f64> = closes.iter().map(|c| c + 1.0).collect();
        let series = PriceSeries::new(&highs, &closes, &closes).unwrap();

        let found = SpikeDetector.detect(&series, 0.02);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, PatternKind::SpikeBearish);
        assert_eq!(found[0].key_levels.get("spike_high"), Some(109.0));
        assert!((found[0].confidence - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_five_percent_moves_are_inclusive() {
        // Exactly -5% into bar 5 and +5% out of it
        let mut closes = vec![100.0; 5];
        closes.extend([95.0; 5]);
        closes.push(99.75);
        let series = PriceSeries::new(&closes, &closes, &closes).unwrap();

        let found = SpikeDetector.detect(&series, 0.02);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, PatternKind::SpikeBullish);
        assert!((found[0].confidence - 0.5).abs() < 1e-12);

        // Mirror: +5% in, -5% out
        let mut closes = vec![100.0; 5];
        closes.extend([105.0; 5]);
        closes.push(99.75);
        let series = PriceSeries::new(&closes, &closes, &closes).unwrap();

        let found = SpikeDetector.detect(&series, 0.02);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, PatternKind::SpikeBearish);
        assert!((found[0].confidence - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_non_positive_close_is_skipped() {
        let mut closes = vec![100.0; 11];
        closes[0] = 0.0;
        let series = PriceSeries::new(&closes, &closes, &closes).unwrap();
        assert!(SpikeDetector.detect(&series, 0.02).is_empty());
    }

    #[test]
    fn test_short_series_is_empty() {
        let closes = [100.0, 80.0, 60.0, 40.0, 60.0, 80.0, 100.0, 120.0, 140.0];
        let series = PriceSeries::new(&closes, &closes, &closes).unwrap();
        assert!(SpikeDetector.detect(&series, 0.02).is_empty());
    }
}
