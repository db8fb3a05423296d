//! Extremum primitives and numeric helpers shared across all detector modules.

// ============================================================
// THRESHOLDS
// ============================================================

/// Half-width of the window used by every local peak/trough test
pub const EXTREMUM_WINDOW: usize = 3;

// ============================================================
// EXTREMUM PRIMITIVES
// ============================================================

/// Returns true if `series[idx]` is the maximum of `series[idx - window..=idx + window]`.
///
/// Indices closer than `window` to either end are never peaks. Equality is
/// exact, so every index of a flat plateau passes on its own.
#[inline]
pub fn is_local_peak(series: &[f64], idx: usize, window: usize) -> bool {
    if idx < window || idx + window >= series.len() {
        return false;
    }
    series[idx] == max_of(&series[idx - window..=idx + window])
}

/// Minimum-based mirror of [`is_local_peak`].
#[inline]
pub fn is_local_trough(series: &[f64], idx: usize, window: usize) -> bool {
    if idx < window || idx + window >= series.len() {
        return false;
    }
    series[idx] == min_of(&series[idx - window..=idx + window])
}

/// Polarity of an extreme point.
///
/// Each top/bottom detector pair is one search parametrised by this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    Peak,
    Trough,
}

impl Extremum {
    #[inline]
    pub fn is_local(self, series: &[f64], idx: usize, window: usize) -> bool {
        match self {
            Extremum::Peak => is_local_peak(series, idx, window),
            Extremum::Trough => is_local_trough(series, idx, window),
        }
    }

    /// True if `a` lies strictly beyond `b` in this direction
    /// (above it for peaks, below it for troughs).
    #[inline]
    pub fn exceeds(self, a: f64, b: f64) -> bool {
        match self {
            Extremum::Peak => a > b,
            Extremum::Trough => a < b,
        }
    }

    /// Largest value for peaks, smallest for troughs.
    #[inline]
    pub fn extreme_of(self, values: &[f64]) -> f64 {
        match self {
            Extremum::Peak => max_of(values),
            Extremum::Trough => min_of(values),
        }
    }

    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Extremum::Peak => Extremum::Trough,
            Extremum::Trough => Extremum::Peak,
        }
    }
}

// ============================================================
// NUMERIC HELPERS
// ============================================================

#[inline]
pub fn max_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

#[inline]
pub fn min_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

/// `|a - b| / base`, or `None` when `base` is not positive.
///
/// Every price comparison goes through here so that a zero or negative
/// denominator turns into "no match" instead of an infinite ratio.
#[inline]
pub fn relative_diff(a: f64, b: f64, base: f64) -> Option<f64> {
    (base > 0.0).then(|| (a - b).abs() / base)
}

/// `(to - from) / from`, or `None` when `from` is not positive.
#[inline]
pub fn relative_change(from: f64, to: f64) -> Option<f64> {
    (from > 0.0).then(|| (to - from) / from)
}

/// Arithmetic mean. Returns NaN for an empty slice.
#[inline]
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Least-squares slope of `values` against `0, 1, 2, ...`.
///
/// Returns `None` for fewer than two points.
pub fn linear_slope(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(values);

    let (num, den) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(num, den), (x, &y)| {
            let dx = x as f64 - x_mean;
            (num + dx * (y - y_mean), den + dx * dx)
        });

    Some(num / den)
}

// ============================================================
// TESTS
// ============================================================
