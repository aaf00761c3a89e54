//! Spike detection over a rolling window of raw samples.
//!
//! The window is min-max normalized on every read; samples whose normalized
//! value exceeds the threshold are spikes. The largest absolute z-score of
//! the window is reported alongside.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use ta::{Next, Period, Reset};

use super::SlidingWindow;
use crate::utils::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalConfig {
    /// Samples kept in the rolling window
    #[serde(default = "default_signal_window")]
    pub window: usize,
    /// Normalized level a sample must exceed to count as a spike
    #[serde(default = "default_peak_threshold")]
    pub peak_threshold: f64,
    /// Samples required before the window is analyzed
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
}

fn default_signal_window() -> usize {
    50
}
fn default_peak_threshold() -> f64 {
    0.85
}
fn default_min_samples() -> usize {
    10
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            window: default_signal_window(),
            peak_threshold: default_peak_threshold(),
            min_samples: default_min_samples(),
        }
    }
}

impl SignalConfig {
    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            return Err(Error::ConfigError("signal.window must be > 0".to_string()));
        }
        if self.min_samples < 2 || self.min_samples > self.window {
            return Err(Error::ConfigError(
                "signal.min_samples must be between 2 and signal.window".to_string(),
            ));
        }
        if !self.peak_threshold.is_finite() {
            return Err(Error::ConfigError("signal.peak_threshold must be finite".to_string()));
        }
        Ok(())
    }
}

/// Min-max scale into `[0, 1]`.
///
/// A constant series, or one whose range overflows, maps to all zeros.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range > 0.0 && range.is_finite() {
        values.iter().map(|v| (v - min) / range).collect()
    } else {
        vec![0.0; values.len()]
    }
}

/// Indices of values strictly above `threshold`.
pub fn detect_peaks(values: &[f64], threshold: f64) -> Vec<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, &v)| v > threshold)
        .map(|(i, _)| i)
        .collect()
}

/// Largest `|x - mean| / sample_std_dev`; `0.0` without spread.
fn max_z_score(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().mean();
    let sd = values.iter().std_dev();
    if !sd.is_finite() || sd <= 0.0 {
        return 0.0;
    }
    values.iter().map(|v| (v - mean).abs() / sd).fold(0.0, f64::max)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalSnapshot {
    pub samples: usize,
    /// Window positions (oldest = 0) above the peak threshold
    pub peaks: Vec<usize>,
    pub max_z_score: f64,
    /// Normalized value of the newest sample
    pub latest: f64,
}

impl SignalSnapshot {
    pub fn has_spikes(&self) -> bool {
        !self.peaks.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SignalReading {
    /// Not enough samples yet
    Warming { samples: usize, needed: usize },
    Ready(SignalSnapshot),
}

/// Rolling spike detector fed one sample at a time.
#[derive(Debug, Clone)]
pub struct SignalProcessor {
    config: SignalConfig,
    window: SlidingWindow,
}

impl SignalProcessor {
    pub fn new() -> Result<Self> {
        Self::with_config(SignalConfig::default())
    }

    pub fn with_config(config: SignalConfig) -> Result<Self> {
        config.validate()?;
        let window = SlidingWindow::new(config.window)?;
        Ok(Self { config, window })
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    pub fn feed(&mut self, value: f64) {
        self.window.add(value);
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn analyze(&self) -> SignalReading {
        let samples = self.window.len();
        if samples < self.config.min_samples {
            return SignalReading::Warming { samples, needed: self.config.min_samples };
        }

        let values: Vec<f64> = self.window.values().collect();
        let normalized = normalize(&values);
        SignalReading::Ready(SignalSnapshot {
            samples,
            peaks: detect_peaks(&normalized, self.config.peak_threshold),
            max_z_score: max_z_score(&values),
            latest: normalized.last().copied().unwrap_or(0.0),
        })
    }
}

impl Next<f64> for SignalProcessor {
    type Output = SignalReading;

    fn next(&mut self, input: f64) -> SignalReading {
        self.feed(input);
        self.analyze()
    }
}

impl Period for SignalProcessor {
    fn period(&self) -> usize {
        self.config.window
    }
}

impl Reset for SignalProcessor {
    fn reset(&mut self) {
        self.window.reset();
    }
}
