//! Weighted risk scoring for on-chain activity.
//!
//! The score is a linear combination of normalized signals mapped onto four
//! tiers. Weights and tier boundaries live in [`RiskConfig`] so the whole
//! policy can be tuned from the config file or overridden in tests.

use serde::{Deserialize, Serialize};

/// Normalized risk signals; ratios are expected in `0..=1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskInput {
    pub volume_change_ratio: f64,
    pub flashloan_detected: bool,
    pub smart_wallet_density: f64,
    pub sybil_overlap_score: f64,
}

/// Contribution of each signal to the raw score (before scaling by 100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskWeights {
    #[serde(default = "default_volume_change_weight")]
    pub volume_change: f64,
    #[serde(default = "default_flashloan_weight")]
    pub flashloan: f64,
    #[serde(default = "default_smart_wallet_weight")]
    pub smart_wallet: f64,
    #[serde(default = "default_sybil_overlap_weight")]
    pub sybil_overlap: f64,
}

fn default_volume_change_weight() -> f64 {
    0.25
}
fn default_flashloan_weight() -> f64 {
    0.35
}
fn default_smart_wallet_weight() -> f64 {
    0.2
}
fn default_sybil_overlap_weight() -> f64 {
    0.2
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            volume_change: default_volume_change_weight(),
            flashloan: default_flashloan_weight(),
            smart_wallet: default_smart_wallet_weight(),
            sybil_overlap: default_sybil_overlap_weight(),
        }
    }
}

/// Inclusive lower bounds of each tier on the 0..=100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    #[serde(default = "default_severe")]
    pub severe: f64,
    #[serde(default = "default_high")]
    pub high: f64,
    #[serde(default = "default_elevated")]
    pub elevated: f64,
}

fn default_severe() -> f64 {
    85.0
}
fn default_high() -> f64 {
    60.0
}
fn default_elevated() -> f64 {
    35.0
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self { severe: default_severe(), high: default_high(), elevated: default_elevated() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    #[serde(default)]
    pub weights: RiskWeights,
    #[serde(default)]
    pub thresholds: RiskThresholds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    Low,
    Elevated,
    High,
    Severe,
}

impl RiskLabel {
    pub fn description(&self) -> &'static str {
        match self {
            | RiskLabel::Severe => "Severe on-chain activity: flag and monitor immediately",
            | RiskLabel::High => "High risk detected: multiple anomalies present",
            | RiskLabel::Elevated => "Elevated risk: patterns show potential red flags",
            | RiskLabel::Low => "Low risk: on-chain activity appears stable",
        }
    }
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            | RiskLabel::Low => "Low",
            | RiskLabel::Elevated => "Elevated",
            | RiskLabel::High => "High",
            | RiskLabel::Severe => "Severe",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: f64,
    pub label: RiskLabel,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    config: RiskConfig,
}

impl RiskScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RiskConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Weighted score scaled to `0..=100`, rounded to one decimal.
    pub fn compute_risk_score(&self, input: &RiskInput) -> f64 {
        let w = &self.config.weights;
        let flashloan = if input.flashloan_detected { 1.0 } else { 0.0 };
        let raw = input.volume_change_ratio * w.volume_change
            + flashloan * w.flashloan
            + input.smart_wallet_density * w.smart_wallet
            + input.sybil_overlap_score * w.sybil_overlap;

        let scaled = (raw * 1000.0).round() / 10.0;
        if scaled.is_nan() {
            return 0.0;
        }
        scaled.clamp(0.0, 100.0)
    }

    pub fn map_score_to_label(&self, score: f64) -> RiskLabel {
        let t = &self.config.thresholds;
        match score {
            | s if s >= t.severe => RiskLabel::Severe,
            | s if s >= t.high => RiskLabel::High,
            | s if s >= t.elevated => RiskLabel::Elevated,
            | _ => RiskLabel::Low,
        }
    }

    pub fn assess(&self, input: &RiskInput) -> RiskAssessment {
        let score = self.compute_risk_score(input);
        let label = self.map_score_to_label(score);
        RiskAssessment { score, label, description: label.description().to_string() }
    }
}
