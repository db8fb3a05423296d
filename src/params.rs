//! Parameter metadata for the engine settings
//!
//! Lets callers discover the tunable knobs, build an [`EngineConfig`] from a
//! flat name/value map and sweep a setting over its search range.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use chartrev::prelude::*;
//!
//! for param in EngineConfig::param_meta() {
//!     println!("{}: {:?} (default: {})", param.name, param.param_type, param.default);
//! }
//!
//! let params = HashMap::from([("tolerance", 0.03)]);
//! let config = EngineConfig::from_params(&params).unwrap();
//! assert_eq!(config.tolerance.get(), 0.03);
//! ```

use std::collections::HashMap;

use crate::{EngineConfig, PatternError, Period, Ratio, Result, DEFAULT_MIN_BARS, DEFAULT_TOLERANCE};

// ============================================================
// PARAMETER TYPES
// ============================================================

/// Type of parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
  /// Fraction in 0.0..=1.0
  Ratio,
  /// Positive integer bar count
  Period,
}

/// Metadata for a single engine parameter
#[derive(Debug, Clone)]
pub struct ParamMeta {
  /// Parameter name, as used in [`EngineConfig::from_params`]
  pub name: &'static str,
  pub param_type: ParamType,
  pub default: f64,
  /// Search range: (min, max, step)
  pub range: (f64, f64, f64),
  pub description: &'static str,
}

impl ParamMeta {
  pub const fn ratio(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Ratio, default, range, description }
  }

  pub const fn period(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Period, default, range, description }
  }

  /// All values of the search range, both ends included.
  ///
  /// Values are computed as `min + k * step` so the float error does not
  /// accumulate across steps.
  pub fn generate_grid(&self) -> Vec<f64> {
    let (min, max, step) = self.range;
    if step <= 0.0 || max < min {
      return vec![min];
    }
    let steps = ((max - min) / step + 1e-9).floor() as usize;
    (0..=steps).map(|k| min + step * k as f64).collect()
  }

  /// Validate a value against the search range and the parameter type.
  ///
  /// Meant for grid search; configs built by [`EngineConfig::from_params`]
  /// only go through [`ParamMeta::check_type`].
  pub fn validate(&self, value: f64) -> Result<()> {
    let (min, max, _) = self.range;
    if !value.is_finite() {
      return Err(PatternError::InvalidValue("parameter cannot be NaN or infinite"));
    }
    if value < min || value > max {
      return Err(PatternError::OutOfRange { field: self.name, value, min, max });
    }
    self.check_type(value)
  }

  /// Checks only what the parameter type itself demands: a ratio in [0, 1]
  /// or a positive integer period
  pub fn check_type(&self, value: f64) -> Result<()> {
    match self.param_type {
      ParamType::Ratio => Ratio::for_field(self.name, value).map(|_| ()),
      ParamType::Period => {
        if !value.is_finite() || value < 1.0 || value.fract() != 0.0 {
          return Err(PatternError::InvalidValue("Period must be a positive integer"));
        }
        Ok(())
      },
    }
  }
}

// ============================================================
// ENGINE PARAMETERS
// ============================================================

static ENGINE_PARAMS: [ParamMeta; 3] = [
  ParamMeta::ratio(
    "tolerance",
    DEFAULT_TOLERANCE,
    (0.005, 0.05, 0.005),
    "Largest relative gap between two levels still counted as equal",
  ),
  ParamMeta::period(
    "min_bars",
    DEFAULT_MIN_BARS as f64,
    (5.0, 50.0, 5.0),
    "Documented minimum series length",
  ),
  ParamMeta::ratio(
    "min_confidence",
    0.7,
    (0.5, 0.95, 0.05),
    "Matches scoring below this are dropped by scan",
  ),
];

impl EngineConfig {
  /// Metadata for every key accepted by [`EngineConfig::from_params`]
  pub fn param_meta() -> &'static [ParamMeta] {
    &ENGINE_PARAMS
  }

  /// Builds a config from a flat parameter map.
  ///
  /// Missing keys keep their defaults; `min_confidence` stays unset unless
  /// given. Unknown keys and values the type cannot hold are rejected; the
  /// search ranges are not applied, so this accepts what [`crate::EngineBuilder`]
  /// accepts.
  pub fn from_params(params: &HashMap<&str, f64>) -> Result<Self> {
    for (&key, &value) in params {
      let meta = ENGINE_PARAMS
        .iter()
        .find(|m| m.name == key)
        .ok_or_else(|| PatternError::InvalidConfig(format!("unknown parameter '{key}'")))?;
      meta.check_type(value)?;
    }

    let defaults = EngineConfig::default();
    let min_confidence = match params.get("min_confidence") {
      Some(&value) => Some(Ratio::for_field("min_confidence", value)?),
      None => None,
    };

    Ok(Self {
      tolerance: get_ratio(params, "tolerance", defaults.tolerance.get())?,
      min_bars: get_period(params, "min_bars", defaults.min_bars.get())?,
      min_confidence,
      validate_data: defaults.validate_data,
    })
  }
}

// ============================================================
// PARAMETER VALUE HELPERS
// ============================================================

/// Helper to get a Ratio from params with default fallback
pub fn get_ratio(params: &HashMap<&str, f64>, key: &str, default: f64) -> Result<Ratio> {
  let value = params.get(key).copied().unwrap_or(default);
  Ratio::new(value)
}

/// Helper to get a Period from params with default fallback
pub fn get_period(params: &HashMap<&str, f64>, key: &str, default: usize) -> Result<Period> {
  let value = params.get(key).copied().unwrap_or(default as f64);
  if value.fract() != 0.0 || value < 0.0 {
    return Err(PatternError::InvalidValue("Period must be a positive integer"));
  }
  Period::new(value as usize)
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
  use super::*;
  use crate::EngineBuilder;

  #[test]
  fn test_engine_param_names() {
    let names: Vec<&str> = EngineConfig::param_meta().iter().map(|m| m.name).collect();
    assert_eq!(names, vec!["tolerance", "min_bars", "min_confidence"]);
  }

  #[test]
  fn test_defaults_are_inside_ranges() {
    for meta in EngineConfig::param_meta() {
      assert!(meta.validate(meta.default).is_ok(), "{} default out of range", meta.name);
    }
  }

  #[test]
  fn test_generate_grid() {
    let meta = ParamMeta::ratio("test", 0.5, (0.3, 0.7, 0.2), "Test");

    let grid = meta.generate_grid();
    assert_eq!(grid.len(), 3);
    assert!((grid[0] - 0.3).abs() < 1e-12);
    assert!((grid[1] - 0.5).abs() < 1e-12);
    assert!((grid[2] - 0.7).abs() < 1e-12);
  }

  #[test]
  fn test_tolerance_grid_keeps_last_step() {
    let grid = EngineConfig::param_meta()[0].generate_grid();
    assert_eq!(grid.len(), 10);
    assert!((grid[9] - 0.05).abs() < 1e-12);
  }

  #[test]
  fn test_validate_period() {
    let meta = ParamMeta::period("test", 14.0, (10.0, 20.0, 2.0), "Test");

    assert!(meta.validate(14.0).is_ok());
    assert!(meta.validate(20.0).is_ok());
    assert!(meta.validate(8.0).is_err());
    assert!(meta.validate(12.5).is_err());
    assert!(meta.validate(f64::NAN).is_err());
  }

  #[test]
  fn test_from_params_defaults() {
    let config = EngineConfig::from_params(&HashMap::new()).unwrap();
    assert_eq!(config, EngineConfig::default());
  }

  #[test]
  fn test_from_params_overrides() {
    let params = HashMap::from([("tolerance", 0.01), ("min_bars", 20.0), ("min_confidence", 0.8)]);
    let config = EngineConfig::from_params(&params).unwrap();

    assert_eq!(config.tolerance.get(), 0.01);
    assert_eq!(config.min_bars.get(), 20);
    assert_eq!(config.min_confidence.map(Ratio::get), Some(0.8));
  }

  #[test]
  fn test_from_params_rejects_unknown_and_invalid() {
    let unknown = HashMap::from([("window", 5.0)]);
    assert!(matches!(EngineConfig::from_params(&unknown), Err(PatternError::InvalidConfig(_))));

    let above_one = HashMap::from([("tolerance", 1.5)]);
    assert!(matches!(
      EngineConfig::from_params(&above_one),
      Err(PatternError::OutOfRange { field: "tolerance", .. })
    ));

    let fractional = HashMap::from([("min_bars", 12.5)]);
    assert!(EngineConfig::from_params(&fractional).is_err());

    let zero = HashMap::from([("min_bars", 0.0)]);
    assert!(EngineConfig::from_params(&zero).is_err());
  }

  #[test]
  fn test_from_params_accepts_values_outside_search_range() {
    let params = HashMap::from([("tolerance", 0.1), ("min_bars", 100.0), ("min_confidence", 0.3)]);
    let meta = EngineConfig::param_meta();
    assert!(meta.iter().all(|m| m.validate(params[m.name]).is_err()));

    let from_params = EngineConfig::from_params(&params).unwrap();
    let built = EngineBuilder::new()
      .tolerance(0.1)
      .min_bars(100)
      .min_confidence(0.3)
      .build()
      .unwrap();
    assert_eq!(&from_params, built.config());
  }

  #[test]
  fn test_get_period_helper() {
    let params = HashMap::from([("key1", 20.0), ("bad", 2.5)]);

    assert_eq!(get_period(&params, "key1", 14).unwrap().get(), 20);
    assert_eq!(get_period(&params, "key2", 14).unwrap().get(), 14);
    assert!(get_period(&params, "bad", 14).is_err());
  }

  #[test]
  fn test_get_ratio_helper() {
    let params = HashMap::from([("key1", 0.8)]);

    assert!((get_ratio(&params, "key1", 0.5).unwrap().get() - 0.8).abs() < f64::EPSILON);
    assert!((get_ratio(&params, "key2", 0.5).unwrap().get() - 0.5).abs() < f64::EPSILON);
  }
}
