//! Pairwise Pearson correlation across on-chain metric series.

use log::warn;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::utils::error::Result;
use crate::utils::types::OnChainMetric;

/// Pearson correlation coefficient of two equal-length series.
///
/// Returns `0.0` when the series are empty or differ in length, when either
/// one has zero variance, and when the sums overflow `f64`. That zero is a NaN-avoidance policy; it does not mean
/// the series are uncorrelated, so callers that need to tell the cases apart
/// must check their inputs themselves.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    if n == 0 || y.len() != n {
        return 0.0;
    }

    let mean_x = x.iter().mean();
    let mean_y = y.iter().mean();

    let (mut num, mut denom_x, mut denom_y) = (0.0, 0.0, 0.0);
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        num += dx * dy;
        denom_x += dx * dx;
        denom_y += dy * dy;
    }

    let denom = (denom_x * denom_y).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return 0.0;
    }
    let r = num / denom;
    if r.is_nan() {
        0.0
    } else {
        r
    }
}

/// Series that can be correlated against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricField {
    Volume,
    Liquidity,
    ActiveAddresses,
}

impl MetricField {
    pub const ALL: [MetricField; 3] =
        [MetricField::Volume, MetricField::Liquidity, MetricField::ActiveAddresses];

    fn extract(self, m: &OnChainMetric) -> f64 {
        match self {
            | MetricField::Volume => m.volume,
            | MetricField::Liquidity => m.liquidity,
            | MetricField::ActiveAddresses => m.active_addresses,
        }
    }
}

/// Coefficient for one pair of metric series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub pair: (MetricField, MetricField),
    pub coefficient: f64,
}

/// Source of historical metrics for a contract (an indexer or analytics API).
pub trait MetricsSource {
    fn fetch_metrics(&self, contract_address: &str, period_hours: u32) -> Result<Vec<OnChainMetric>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CorrelationAnalyzer;

impl CorrelationAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Correlate every unordered pair of metric series.
    ///
    /// Output order: (volume, liquidity), (volume, activeAddresses),
    /// (liquidity, activeAddresses). Empty input yields an empty list.
    pub fn analyze(&self, metrics: &[OnChainMetric]) -> Vec<CorrelationResult> {
        if metrics.is_empty() {
            return Vec::new();
        }
        if metrics.len() < 2 {
            warn!("correlation over a single sample is degenerate; coefficients will be 0");
        }

        let series: Vec<Vec<f64>> = MetricField::ALL
            .iter()
            .map(|field| metrics.iter().map(|m| field.extract(m)).collect())
            .collect();

        let mut results = Vec::with_capacity(3);
        for i in 0..MetricField::ALL.len() {
            for j in (i + 1)..MetricField::ALL.len() {
                results.push(CorrelationResult {
                    pair: (MetricField::ALL[i], MetricField::ALL[j]),
                    coefficient: pearson_correlation(&series[i], &series[j]),
                });
            }
        }
        results
    }

    /// Fetch metrics from `source` and correlate them.
    pub fn analyze_source<S: MetricsSource + ?Sized>(
        &self,
        source: &S,
        contract_address: &str,
        period_hours: u32,
    ) -> Result<Vec<CorrelationResult>> {
        let metrics = source.fetch_metrics(contract_address, period_hours)?;
        Ok(self.analyze(&metrics))
    }
}
