//! Per-tick feature extraction.
//!
//! Turns a raw `TimePoint` series into one `FeatureVector` per tick: three
//! rolling price means, one-step momentum, trailing volatility and the
//! volume/liquidity ratio.

use log::debug;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::indicators::SlidingWindow;
use crate::utils::error::{Error, Result};
use crate::utils::types::TimePoint;

const HOUR_MS: i64 = 60 * 60 * 1000;

/// Window sizes and lookback used by [`FeatureExtractor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Short moving-average window, in ticks
    #[serde(default = "default_short_window")]
    pub short_window: usize,
    /// Medium moving-average window, in ticks
    #[serde(default = "default_medium_window")]
    pub medium_window: usize,
    /// Long moving-average window, in ticks
    #[serde(default = "default_long_window")]
    pub long_window: usize,
    /// Trailing span for volatility, in milliseconds
    #[serde(default = "default_volatility_lookback_ms")]
    pub volatility_lookback_ms: i64,
}

fn default_short_window() -> usize {
    5
}
fn default_medium_window() -> usize {
    15
}
fn default_long_window() -> usize {
    60
}
fn default_volatility_lookback_ms() -> i64 {
    HOUR_MS
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            short_window: default_short_window(),
            medium_window: default_medium_window(),
            long_window: default_long_window(),
            volatility_lookback_ms: default_volatility_lookback_ms(),
        }
    }
}

/// Rolling price means at the three configured horizons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovingAverages {
    pub short: f64,
    pub medium: f64,
    pub long: f64,
}

/// Features derived for a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureVector {
    pub timestamp: i64,
    pub moving_averages: MovingAverages,
    pub momentum: f64,
    pub volatility: f64,
    pub liquidity_ratio: f64,
}

/// Stateless extractor; each call builds fresh windows.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    config: FeatureConfig,
}

impl FeatureExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FeatureConfig) -> Result<Self> {
        if config.volatility_lookback_ms < 0 {
            return Err(Error::InvalidArgument(
                "volatility_lookback_ms must be >= 0".to_string(),
            ));
        }
        // Surface zero-sized windows here rather than per call.
        SlidingWindow::new(config.short_window)?;
        SlidingWindow::new(config.medium_window)?;
        SlidingWindow::new(config.long_window)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Compute feature vectors for `data`, in input order.
    ///
    /// When `timestamps_to_compute` is non-empty only ticks whose timestamp is
    /// listed are emitted; the windows still consume every tick. Input is
    /// assumed sorted by timestamp but this is not enforced.
    ///
    /// Volatility scans the whole series for every tick, so the cost is
    /// quadratic in the series length.
    pub fn compute_features(
        &self,
        data: &[TimePoint],
        timestamps_to_compute: &[i64],
    ) -> Result<Vec<FeatureVector>> {
        let mut w_short = SlidingWindow::new(self.config.short_window)?;
        let mut w_medium = SlidingWindow::new(self.config.medium_window)?;
        let mut w_long = SlidingWindow::new(self.config.long_window)?;

        let mut vectors = Vec::with_capacity(if timestamps_to_compute.is_empty() {
            data.len()
        } else {
            timestamps_to_compute.len().min(data.len())
        });
        let mut prev_price: Option<f64> = None;

        for point in data {
            w_short.add(point.price);
            w_medium.add(point.price);
            w_long.add(point.price);

            let momentum = match prev_price {
                | Some(prev) if prev != 0.0 => (point.price - prev) / prev,
                | _ => 0.0,
            };
            prev_price = Some(point.price);

            let wanted = timestamps_to_compute.is_empty()
                || timestamps_to_compute.contains(&point.timestamp);
            if !wanted {
                continue;
            }

            vectors.push(FeatureVector {
                timestamp: point.timestamp,
                moving_averages: MovingAverages {
                    short: w_short.average(),
                    medium: w_medium.average(),
                    long: w_long.average(),
                },
                momentum,
                volatility: self.trailing_volatility(data, point.timestamp),
                liquidity_ratio: liquidity_ratio(point),
            });
        }

        debug!("computed {} feature vectors from {} ticks", vectors.len(), data.len());
        Ok(vectors)
    }

    /// Population standard deviation of prices within `[ts - lookback, ts]`.
    fn trailing_volatility(&self, data: &[TimePoint], ts: i64) -> f64 {
        let from = ts.saturating_sub(self.config.volatility_lookback_ms);
        let prices: Vec<f64> = data
            .iter()
            .filter(|p| p.timestamp >= from && p.timestamp <= ts)
            .map(|p| p.price)
            .collect();
        if prices.is_empty() {
            return 0.0;
        }
        prices.population_std_dev()
    }
}

fn liquidity_ratio(point: &TimePoint) -> f64 {
    if point.liquidity != 0.0 {
        point.volume / point.liquidity
    } else {
        0.0
    }
}
