//! # chartrev - Chart Reversal Pattern Detection
//!
//! Scans a chronological high/low/close series for classic reversal
//! formations and reports each match as a confidence-scored [`Pattern`].
//!
//! ## Quick Start
//!
//! ```rust
//! use chartrev::prelude::*;
//!
//! let closes = [100.0, 98.0, 95.0, 90.0, 85.0, 80.0, 85.0, 90.0, 95.0, 100.0, 105.0];
//! let highs: Vec<f64> = closes.iter().map(|c| c + 1.0).collect();
//! let lows: Vec<f64> = closes.iter().map(|c| c - 1.0).collect();
//!
//! let engine = PatternEngine::new(0.02, 10).unwrap();
//! let series = PriceSeries::new(&highs, &lows, &closes).unwrap();
//!
//! for pattern in engine.detect_all(&series) {
//!     println!("{} {:.0}%: {}", pattern.kind, pattern.confidence * 100.0, pattern.key_levels);
//! }
//! ```
//!
//! The engine is stateless apart from its configuration. It does no I/O and
//! can be shared freely across threads; see [`scan_parallel`].

use std::fmt;

pub mod detectors;
pub mod params;

pub mod prelude {
    pub use crate::{
        // Detectors
        detectors::*,
        // Parameters
        params::{get_period, get_ratio, ParamMeta, ParamType},
        // Parallel
        scan_parallel,
        // Engine
        BuiltinDetector,
        // Input
        Candle,
        Direction,
        EngineBuilder,
        EngineConfig,
        KeyLevels,
        // Types
        Pattern,
        PatternEngine,
        // Errors
        PatternError,
        PatternKind,
        Period,
        PriceSeries,
        Ratio,
        Result,
        ScanError,
        ScanResult,
        SeriesBuf,
    };
}

use detectors::*;

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, PatternError>;

/// Errors from configuration and input handling.
///
/// Detectors never fail: "no pattern here" is an empty result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PatternError {
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Series length mismatch: highs={highs}, lows={lows}, closes={closes}")]
    LengthMismatch {
        highs: usize,
        lows: usize,
        closes: usize,
    },

    #[error("Invalid candle at index {index}: {reason}")]
    InvalidCandle { index: usize, reason: &'static str },
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Fraction in range 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Ratio(f64);

impl Ratio {
    /// Create a new Ratio, validating the value is finite and in [0.0, 1.0]
    pub fn new(value: f64) -> Result<Self> {
        Self::for_field("Ratio", value)
    }

    /// Like [`Ratio::new`], naming `field` in the range error
    pub fn for_field(field: &'static str, value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(PatternError::InvalidValue(
                "Ratio cannot be NaN or infinite",
            ));
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(PatternError::OutOfRange {
                field,
                value,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl serde::Serialize for Ratio {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Ratio {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        Ratio::new(value).map_err(serde::de::Error::custom)
    }
}

/// Bar count (must be > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period(usize);

impl Period {
    pub fn new(value: usize) -> Result<Self> {
        if value == 0 {
            return Err(PatternError::InvalidValue("Period must be > 0"));
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: usize) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl serde::Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Period {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = usize::deserialize(d)?;
        Period::new(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================
// INPUT SERIES
// ============================================================

/// A bar that exposes the three prices the detectors read
pub trait Candle {
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;
}

impl<C: Candle + ?Sized> Candle for &C {
    fn high(&self) -> f64 {
        (**self).high()
    }

    fn low(&self) -> f64 {
        (**self).low()
    }

    fn close(&self) -> f64 {
        (**self).close()
    }
}

/// `(high, low, close)`
impl Candle for (f64, f64, f64) {
    fn high(&self) -> f64 {
        self.0
    }

    fn low(&self) -> f64 {
        self.1
    }

    fn close(&self) -> f64 {
        self.2
    }
}

/// Three index-aligned price columns, oldest first.
///
/// Equal lengths are checked on construction. Price sanity is only
/// checked by [`PriceSeries::validate`].
#[derive(Debug, Clone, Copy)]
pub struct PriceSeries<'a> {
    highs: &'a [f64],
    lows: &'a [f64],
    closes: &'a [f64],
}

impl<'a> PriceSeries<'a> {
    pub fn new(highs: &'a [f64], lows: &'a [f64], closes: &'a [f64]) -> Result<Self> {
        if highs.len() != lows.len() || highs.len() != closes.len() {
            return Err(PatternError::LengthMismatch {
                highs: highs.len(),
                lows: lows.len(),
                closes: closes.len(),
            });
        }
        Ok(Self { highs, lows, closes })
    }

    #[inline]
    pub fn highs(&self) -> &'a [f64] {
        self.highs
    }

    #[inline]
    pub fn lows(&self) -> &'a [f64] {
        self.lows
    }

    #[inline]
    pub fn closes(&self) -> &'a [f64] {
        self.closes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Checks every bar for finite prices with `low <= close <= high`.
    pub fn validate(&self) -> Result<()> {
        for index in 0..self.len() {
            let (high, low, close) = (self.highs[index], self.lows[index], self.closes[index]);

            let reason = if !(high.is_finite() && low.is_finite() && close.is_finite()) {
                "non-finite price"
            } else if high < low {
                "high < low"
            } else if close > high {
                "close > high"
            } else if close < low {
                "close < low"
            } else {
                continue;
            };

            return Err(PatternError::InvalidCandle { index, reason });
        }
        Ok(())
    }
}

/// Owned columns copied out of a bar slice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesBuf {
    highs: Vec<f64>,
    lows: Vec<f64>,
    closes: Vec<f64>,
}

impl SeriesBuf {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            highs: Vec::with_capacity(capacity),
            lows: Vec::with_capacity(capacity),
            closes: Vec::with_capacity(capacity),
        }
    }

    pub fn from_bars<T: Candle>(bars: &[T]) -> Self {
        let mut buf = Self::with_capacity(bars.len());
        for bar in bars {
            buf.push(bar);
        }
        buf
    }

    pub fn push<T: Candle>(&mut self, bar: T) {
        self.highs.push(bar.high());
        self.lows.push(bar.low());
        self.closes.push(bar.close());
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Borrow as a [`PriceSeries`]. Columns always have equal length here.
    pub fn as_series(&self) -> PriceSeries<'_> {
        PriceSeries {
            highs: &self.highs,
            lows: &self.lows,
            closes: &self.closes,
        }
    }
}

// ============================================================
// PATTERN MODEL
// ============================================================

/// Expected move after the pattern completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    Bullish,
    Bearish,
}

impl Direction {
    #[inline]
    pub fn is_bullish(self) -> bool {
        matches!(self, Direction::Bullish)
    }

    #[inline]
    pub fn is_bearish(self) -> bool {
        matches!(self, Direction::Bearish)
    }
}

/// Closed set of reported pattern types.
///
/// Serialized as its display label, e.g. `"Double Top"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PatternKind {
    #[serde(rename = "Head and Shoulders")]
    HeadAndShoulders,
    #[serde(rename = "Inverse Head and Shoulders")]
    InverseHeadAndShoulders,
    #[serde(rename = "Double Top")]
    DoubleTop,
    #[serde(rename = "Double Bottom")]
    DoubleBottom,
    #[serde(rename = "Triple Top")]
    TripleTop,
    #[serde(rename = "Triple Bottom")]
    TripleBottom,
    #[serde(rename = "Rounding Bottom")]
    RoundingBottom,
    #[serde(rename = "Spike V (Bullish)")]
    SpikeBullish,
    #[serde(rename = "Spike V (Bearish)")]
    SpikeBearish,
}

impl PatternKind {
    pub const ALL: [PatternKind; 9] = [
        PatternKind::HeadAndShoulders,
        PatternKind::InverseHeadAndShoulders,
        PatternKind::DoubleTop,
        PatternKind::DoubleBottom,
        PatternKind::TripleTop,
        PatternKind::TripleBottom,
        PatternKind::RoundingBottom,
        PatternKind::SpikeBullish,
        PatternKind::SpikeBearish,
    ];

    /// Display label
    pub fn as_str(self) -> &'static str {
        match self {
            PatternKind::HeadAndShoulders => "Head and Shoulders",
            PatternKind::InverseHeadAndShoulders => "Inverse Head and Shoulders",
            PatternKind::DoubleTop => "Double Top",
            PatternKind::DoubleBottom => "Double Bottom",
            PatternKind::TripleTop => "Triple Top",
            PatternKind::TripleBottom => "Triple Bottom",
            PatternKind::RoundingBottom => "Rounding Bottom",
            PatternKind::SpikeBullish => "Spike V (Bullish)",
            PatternKind::SpikeBearish => "Spike V (Bearish)",
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            PatternKind::InverseHeadAndShoulders
            | PatternKind::DoubleBottom
            | PatternKind::TripleBottom
            | PatternKind::RoundingBottom
            | PatternKind::SpikeBullish => Direction::Bullish,
            PatternKind::HeadAndShoulders
            | PatternKind::DoubleTop
            | PatternKind::TripleTop
            | PatternKind::SpikeBearish => Direction::Bearish,
        }
    }

    #[inline]
    pub fn is_bullish(self) -> bool {
        self.direction().is_bullish()
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named price levels of a match. The set of names and their order is fixed
/// per family.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum KeyLevels {
    HeadAndShoulders {
        head: f64,
        left_shoulder: f64,
        right_shoulder: f64,
        neckline: f64,
    },
    DoubleTop {
        peak1: f64,
        peak2: f64,
        support: f64,
    },
    DoubleBottom {
        bottom1: f64,
        bottom2: f64,
        resistance: f64,
    },
    TripleTop {
        peak1: f64,
        peak2: f64,
        peak3: f64,
        support: f64,
    },
    TripleBottom {
        bottom1: f64,
        bottom2: f64,
        bottom3: f64,
        resistance: f64,
    },
    RoundingBottom {
        bottom: f64,
        entry: f64,
        current: f64,
    },
    SpikeLow {
        spike_low: f64,
        entry: f64,
        exit: f64,
    },
    SpikeHigh {
        spike_high: f64,
        entry: f64,
        exit: f64,
    },
}

impl KeyLevels {
    /// `(name, price)` pairs in their defined order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        self.levels().into_iter()
    }

    fn levels(&self) -> Vec<(&'static str, f64)> {
        match *self {
            KeyLevels::HeadAndShoulders {
                head,
                left_shoulder,
                right_shoulder,
                neckline,
            } => vec![
                ("head", head),
                ("left_shoulder", left_shoulder),
                ("right_shoulder", right_shoulder),
                ("neckline", neckline),
            ],
            KeyLevels::DoubleTop {
                peak1,
                peak2,
                support,
            } => vec![("peak1", peak1), ("peak2", peak2), ("support", support)],
            KeyLevels::DoubleBottom {
                bottom1,
                bottom2,
                resistance,
            } => vec![
                ("bottom1", bottom1),
                ("bottom2", bottom2),
                ("resistance", resistance),
            ],
            KeyLevels::TripleTop {
                peak1,
                peak2,
                peak3,
                support,
            } => vec![
                ("peak1", peak1),
                ("peak2", peak2),
                ("peak3", peak3),
                ("support", support),
            ],
            KeyLevels::TripleBottom {
                bottom1,
                bottom2,
                bottom3,
                resistance,
            } => vec![
                ("bottom1", bottom1),
                ("bottom2", bottom2),
                ("bottom3", bottom3),
                ("resistance", resistance),
            ],
            KeyLevels::RoundingBottom {
                bottom,
                entry,
                current,
            } => vec![("bottom", bottom), ("entry", entry), ("current", current)],
            KeyLevels::SpikeLow {
                spike_low,
                entry,
                exit,
            } => vec![("spike_low", spike_low), ("entry", entry), ("exit", exit)],
            KeyLevels::SpikeHigh {
                spike_high,
                entry,
                exit,
            } => vec![("spike_high", spike_high), ("entry", entry), ("exit", exit)],
        }
    }

    /// Price of the level called `name`, if this family has one
    pub fn get(&self, name: &str) -> Option<f64> {
        self.iter()
            .find_map(|(level, price)| (level == name).then_some(price))
    }

    pub fn len(&self) -> usize {
        self.levels().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `Level Name: 123.45` pairs joined with `, `
impl fmt::Display for KeyLevels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, price)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {:.2}", humanize_level_name(name), price)?;
        }
        Ok(())
    }
}

/// `left_shoulder` -> `Left Shoulder`
pub fn humanize_level_name(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// One detected formation. Immutable once built.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Pattern {
    #[serde(rename = "pattern_type")]
    pub kind: PatternKind,
    /// Heuristic score, conventionally 0.0..=1.0 (only spikes are clamped)
    pub confidence: f64,
    pub start_idx: usize,
    pub end_idx: usize,
    pub key_levels: KeyLevels,
    pub description: String,
}

impl Pattern {
    #[inline]
    pub fn direction(&self) -> Direction {
        self.kind.direction()
    }

    #[inline]
    pub fn is_bullish(&self) -> bool {
        self.kind.is_bullish()
    }

    /// Number of bars spanned, inclusive of both ends
    #[inline]
    pub fn span(&self) -> usize {
        self.end_idx - self.start_idx + 1
    }
}

// ============================================================
// BUILTIN DETECTORS - generated via macro
// ============================================================

/// Macro to generate BuiltinDetector enum without boilerplate
macro_rules! define_builtin_detectors {
    (
        $(
            $variant:ident => $detector:ident
        ),* $(,)?
    ) => {
        /// All builtin detectors - static dispatch, declared in aggregation order
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum BuiltinDetector {
            $($variant),*
        }

        impl BuiltinDetector {
            /// Every detector, in the order [`PatternEngine::detect_all`] runs them
            pub const ALL: &'static [BuiltinDetector] = &[$(Self::$variant),*];

            #[inline]
            pub fn detect(self, series: &PriceSeries<'_>, tolerance: f64) -> Vec<Pattern> {
                match self {
                    $(Self::$variant => PatternDetector::detect(&$detector, series, tolerance)),*
                }
            }

            #[inline]
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => PatternDetector::name(&$detector)),*
                }
            }

            #[inline]
            pub fn min_bars(self) -> usize {
                match self {
                    $(Self::$variant => PatternDetector::min_bars(&$detector)),*
                }
            }
        }
    };
}

define_builtin_detectors! {
    HeadAndShoulders => HeadAndShouldersDetector,
    InverseHeadAndShoulders => InverseHeadAndShouldersDetector,
    DoubleTop => DoubleTopDetector,
    DoubleBottom => DoubleBottomDetector,
    TripleTop => TripleTopDetector,
    TripleBottom => TripleBottomDetector,
    RoundingBottom => RoundingBottomDetector,
    Spike => SpikeDetector,
}

// ============================================================
// PATTERN ENGINE
// ============================================================

pub const DEFAULT_TOLERANCE: f64 = 0.02;
pub const DEFAULT_MIN_BARS: usize = 10;

/// Engine configuration
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest fractional gap between two levels still treated as equal
    pub tolerance: Ratio,
    /// Documented minimum series length. Carried for callers; the
    /// detectors only apply their own length gates.
    pub min_bars: Period,
    /// Drop matches scoring below this in [`PatternEngine::scan`]
    pub min_confidence: Option<Ratio>,
    /// Run [`PriceSeries::validate`] in [`PatternEngine::scan`]
    pub validate_data: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tolerance: Ratio::new_const(DEFAULT_TOLERANCE),
            min_bars: Period::new_const(DEFAULT_MIN_BARS),
            min_confidence: None,
            validate_data: false,
        }
    }
}

/// Runs the eight reversal detectors over a price series.
#[derive(Debug, Clone, Default)]
pub struct PatternEngine {
    config: EngineConfig,
}

impl PatternEngine {
    /// Engine with the two core settings and nothing else enabled
    pub fn new(tolerance: f64, min_bars: usize) -> Result<Self> {
        EngineBuilder::new()
            .tolerance(tolerance)
            .min_bars(min_bars)
            .build()
    }

    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn tolerance(&self) -> f64 {
        self.config.tolerance.get()
    }

    #[inline]
    pub fn min_bars(&self) -> usize {
        self.config.min_bars.get()
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run a single detector with this engine's tolerance.
    pub fn detect(&self, detector: BuiltinDetector, series: &PriceSeries<'_>) -> Vec<Pattern> {
        if series.len() < detector.min_bars() {
            tracing::trace!(
                detector = detector.name(),
                bars = series.len(),
                need = detector.min_bars(),
                "series too short"
            );
            return Vec::new();
        }

        let found = detector.detect(series, self.tolerance());
        tracing::debug!(detector = detector.name(), found = found.len(), "detector finished");
        found
    }

    /// Every detector in fixed order, results concatenated as-is.
    ///
    /// No sorting, merging or filtering: overlapping matches from the same or
    /// different families all come through.
    pub fn detect_all(&self, series: &PriceSeries<'_>) -> Vec<Pattern> {
        let patterns: Vec<Pattern> = BuiltinDetector::ALL
            .iter()
            .flat_map(|&detector| self.detect(detector, series))
            .collect();

        tracing::debug!(
            bars = series.len(),
            patterns = patterns.len(),
            "reversal scan complete"
        );
        patterns
    }

    /// [`detect_all`](Self::detect_all) wrapped with the optional input check
    /// and minimum-confidence filter from the config.
    pub fn scan(&self, series: &PriceSeries<'_>) -> Result<Vec<Pattern>> {
        if self.config.validate_data {
            series.validate()?;
        }

        let mut patterns = self.detect_all(series);

        if let Some(min) = self.config.min_confidence {
            let total = patterns.len();
            patterns.retain(|p| p.confidence >= min.get());
            tracing::debug!(
                min_confidence = min.get(),
                kept = patterns.len(),
                dropped = total - patterns.len(),
                "confidence filter applied"
            );
        }

        Ok(patterns)
    }
}

// ============================================================
// BUILDER
// ============================================================

/// Builder for creating PatternEngine instances
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    tolerance: f64,
    min_bars: usize,
    min_confidence: Option<f64>,
    validate_data: bool,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            min_bars: DEFAULT_MIN_BARS,
            min_confidence: None,
            validate_data: false,
        }
    }

    /// Start from an existing (already validated) config
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.tolerance = config.tolerance.get();
        self.min_bars = config.min_bars.get();
        self.min_confidence = config.min_confidence.map(Ratio::get);
        self.validate_data = config.validate_data;
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn min_bars(mut self, min_bars: usize) -> Self {
        self.min_bars = min_bars;
        self
    }

    /// Set minimum confidence filter for `scan`
    pub fn min_confidence(mut self, confidence: f64) -> Self {
        self.min_confidence = Some(confidence);
        self
    }

    /// Enable/disable data validation in `scan`
    pub fn validate_data(mut self, enable: bool) -> Self {
        self.validate_data = enable;
        self
    }

    /// Build the engine
    pub fn build(self) -> Result<PatternEngine> {
        let tolerance = Ratio::for_field("tolerance", self.tolerance)?;
        let min_bars = Period::new(self.min_bars)
            .map_err(|_| PatternError::InvalidConfig("min_bars must be > 0".to_string()))?;
        let min_confidence = self
            .min_confidence
            .map(|c| Ratio::for_field("min_confidence", c))
            .transpose()?;

        Ok(PatternEngine::from_config(EngineConfig {
            tolerance,
            min_bars,
            min_confidence,
            validate_data: self.validate_data,
        }))
    }
}

// ============================================================
// PARALLEL SCANNING
// ============================================================

use rayon::prelude::*;

/// Result of scanning a single instrument
#[derive(Debug)]
pub struct ScanResult {
    pub symbol: String,
    pub patterns: Vec<Pattern>,
}

/// Error from scanning a single instrument
#[derive(Debug)]
pub struct ScanError {
    pub symbol: String,
    pub error: PatternError,
}

/// Parallel scanning of multiple instruments (or instrument/timeframe pairs).
///
/// Each series is scanned independently with [`PatternEngine::scan`].
pub fn scan_parallel<'s, 'a, I>(
    engine: &PatternEngine,
    instruments: I,
) -> (Vec<ScanResult>, Vec<ScanError>)
where
    I: IntoParallelIterator<Item = (&'s str, PriceSeries<'a>)>,
{
    let results: Vec<_> = instruments
        .into_par_iter()
        .map(|(symbol, series)| {
            engine
                .scan(&series)
                .map(|patterns| ScanResult {
                    symbol: symbol.to_string(),
                    patterns,
                })
                .map_err(|error| {
                    tracing::warn!(symbol, %error, "scan failed");
                    ScanError {
                        symbol: symbol.to_string(),
                        error,
                    }
                })
        })
        .collect();

    let mut successes = Vec::new();
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(r) => successes.push(r),
            Err(e) => errors.push(e),
        }
    }

    (successes, errors)
}

// ============================================================
// TESTS
// ============================================================
