//! Derived periodontal metrics.
//!
//! Everything here is a pure function of a [`ParsedDocument`](crate::ir::ParsedDocument)
//! and a [`MetricsConfig`](crate::config::MetricsConfig). Missing,
//! non-physical or degenerate inputs collapse to `None` so that a partially
//! annotated document still yields a complete, correctly spaced chart with
//! gaps. No function in this module returns `NaN` or an infinity.

mod series;

pub use series::{
    build_arch_series, build_rbl_series, build_relative_series, build_status_row,
    build_tla_series, ChartSeries, SeriesKind, Slot, StatusCell,
};

use serde::{Deserialize, Serialize};

use crate::ir::Arch;

/// Parameters of the distance normalization.
///
/// The scale was tuned empirically and differs between chart families, so
/// every parameter is configurable.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Divisor applied to in-range values.
    pub scale_factor: f64,
    /// Values at or above this are clamped to `max_normalized`.
    pub threshold: f64,
    /// Ceiling of the normalized range.
    pub max_normalized: f64,
}

impl NormalizeConfig {
    /// Canonical bone/CEJ distance normalization: `v / 150`, clamped at 300.
    pub const DISTANCE: Self = Self {
        scale_factor: 150.0,
        threshold: 300.0,
        max_normalized: 2.0,
    };

    /// Canonical tooth long-axis normalization: `v / 250`, clamped at 500.
    pub const TLA: Self = Self {
        scale_factor: 250.0,
        threshold: 500.0,
        max_normalized: 2.0,
    };

    /// Checks that the parameters describe a usable mapping.
    pub fn check(&self) -> Result<(), String> {
        if !(self.scale_factor.is_finite() && self.scale_factor > 0.0) {
            return Err(format!(
                "scale_factor must be a positive number, got {}",
                self.scale_factor
            ));
        }
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return Err(format!(
                "threshold must be a positive number, got {}",
                self.threshold
            ));
        }
        if !self.max_normalized.is_finite() {
            return Err(format!(
                "max_normalized must be finite, got {}",
                self.max_normalized
            ));
        }
        Ok(())
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self::DISTANCE
    }
}

/// Normalizes one value.
///
/// `None`, `NaN` and values `<= 0` are missing; values at or above the
/// threshold clamp to `max_normalized`; everything else is divided by the
/// scale factor.
pub fn normalize_value(value: Option<f64>, config: &NormalizeConfig) -> Option<f64> {
    let v = value.filter(|v| !v.is_nan())?;
    if v <= 0.0 {
        None
    } else if v >= config.threshold {
        Some(config.max_normalized)
    } else {
        finite(v / config.scale_factor)
    }
}

/// Normalizes a series, preserving gaps position for position.
pub fn normalize(values: &[Option<f64>], config: &NormalizeConfig) -> Vec<Option<f64>> {
    values
        .iter()
        .map(|&v| normalize_value(v, config))
        .collect()
}

/// Relative bone loss in percent: `|(cej - bone) / cej| * 100`.
///
/// `None` if either distance is missing or `cej` is zero.
pub fn percent_loss(cej: Option<f64>, bone: Option<f64>) -> Option<f64> {
    let (cej, bone) = (cej?, bone?);
    finite(((cej - bone) / cej).abs() * 100.0)
}

/// Maps a raw `y` into `[0, 2]` relative to a tooth's outline span.
///
/// Maxillary teeth map `min_y` to 0 and `max_y` to 2; mandibular teeth are
/// flipped so both arches point toward the gumline. Values outside the span
/// are clamped. Returns `None` for a non-finite `y` or an empty span.
pub fn transform_y(y: f64, min_y: f64, max_y: f64, arch: Arch) -> Option<f64> {
    let span = max_y - min_y;
    if !y.is_finite() || !span.is_finite() || span <= 0.0 {
        return None;
    }

    let fraction = match arch {
        Arch::Maxillary => (y - min_y) / span,
        Arch::Mandibular => (max_y - y) / span,
    };
    finite(fraction.clamp(0.0, 1.0) * 2.0)
}

/// Upper bound for a chart's value axis: the data maximum rounded up to one
/// decimal, plus one. `None` if the series has no values.
pub fn axis_max(values: &[Option<f64>]) -> Option<f64> {
    let max = values
        .iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .reduce(f64::max)?;
    finite((max * 10.0).ceil() / 10.0 + 1.0)
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}
