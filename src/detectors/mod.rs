//! Chart reversal pattern detectors
//!
//! Every detector is a pure function of the price series and the engine
//! tolerance. None of them keeps state, and none sees another's output.
//!
//! # Pattern Families
//!
//! - **Head and Shoulders**: regular (bearish) and inverse (bullish)
//! - **Double**: Double Top, Double Bottom
//! - **Triple**: Triple Top, Triple Bottom
//! - **Rounding**: Rounding Bottom
//! - **Spike**: V and inverted V on the closes

use crate::{Pattern, PriceSeries};

pub mod helpers;

pub mod double;
pub mod head_shoulders;
pub mod rounding;
pub mod spike;
pub mod triple;

// Re-export all detectors for convenience
pub use double::*;
pub use head_shoulders::*;
pub use helpers::*;
pub use rounding::*;
pub use spike::*;
pub use triple::*;

/// A single pattern family search.
pub trait PatternDetector: Send + Sync {
    /// Stable snake_case identifier, used in logs
    fn name(&self) -> &'static str;

    /// Series length below which `detect` returns nothing.
    fn min_bars(&self) -> usize;

    /// Scans the whole series. An empty result is the normal "no pattern" answer.
    fn detect(&self, series: &PriceSeries<'_>, tolerance: f64) -> Vec<Pattern>;
}
