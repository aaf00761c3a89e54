//! Holder concentration and wallet value distribution.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::utils::types::{HolderInfo, TokenHolding};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionConfig {
    /// Holders kept in the summary's `top_holders`
    #[serde(default = "default_holder_limit")]
    pub holder_limit: usize,
    /// Size of the "top N" group whose share is measured
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Top-N share (%) above which concentration is High
    #[serde(default = "default_high_above")]
    pub high_above: f64,
    /// Top-N share (%) above which concentration is Moderate
    #[serde(default = "default_moderate_above")]
    pub moderate_above: f64,
}

fn default_holder_limit() -> usize {
    50
}
fn default_top_n() -> usize {
    10
}
fn default_high_above() -> f64 {
    80.0
}
fn default_moderate_above() -> f64 {
    50.0
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            holder_limit: default_holder_limit(),
            top_n: default_top_n(),
            high_above: default_high_above(),
            moderate_above: default_moderate_above(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcentrationLevel {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionSummary {
    pub top_holders: Vec<HolderInfo>,
    pub total_holders: usize,
    /// Percentage of supply held by the top N, two decimals
    pub top_share: f64,
    pub concentration_level: ConcentrationLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDistribution {
    pub symbol: String,
    pub value_usd: f64,
    pub percentage: f64,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Default)]
pub struct DistributionAnalyzer {
    config: DistributionConfig,
}

impl DistributionAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DistributionConfig) -> Self {
        Self { config }
    }

    /// Rank non-empty holders by balance and measure top-N concentration.
    pub fn summarize_holders(&self, holders: &[HolderInfo]) -> DistributionSummary {
        let mut ranked: Vec<HolderInfo> = holders.iter().filter(|h| h.amount > 0.0).cloned().collect();
        ranked.sort_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(Ordering::Equal));

        let total: f64 = ranked.iter().map(|h| h.amount).sum();
        let top: f64 = ranked.iter().take(self.config.top_n).map(|h| h.amount).sum();
        let share = if total > 0.0 { top / total * 100.0 } else { 0.0 };

        let concentration_level = if share > self.config.high_above {
            ConcentrationLevel::High
        } else if share > self.config.moderate_above {
            ConcentrationLevel::Moderate
        } else {
            ConcentrationLevel::Low
        };

        let total_holders = ranked.len();
        ranked.truncate(self.config.holder_limit);
        DistributionSummary {
            top_holders: ranked,
            total_holders,
            top_share: round2(share),
            concentration_level,
        }
    }

    /// USD value and portfolio share of each holding, two decimals.
    pub fn token_value_distribution(&self, holdings: &[TokenHolding]) -> Vec<TokenDistribution> {
        let total: f64 = holdings.iter().map(|h| h.amount * h.price_usd).sum();
        holdings
            .iter()
            .map(|h| {
                let value = h.amount * h.price_usd;
                let (value_usd, percentage) = if total == 0.0 {
                    (0.0, 0.0)
                } else {
                    (round2(value), round2(value / total * 100.0))
                };
                TokenDistribution { symbol: h.symbol.clone(), value_usd, percentage }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holder(wallet: &str, amount: f64) -> HolderInfo {
        HolderInfo { wallet: wallet.to_string(), amount }
    }

    #[test]
    fn test_single_whale_is_high() {
        let holders = vec![holder("whale", 900.0), holder("a", 0.0)];
        let s = DistributionAnalyzer::new().summarize_holders(&holders);
        assert_eq!(s.total_holders, 1);
        assert_eq!(s.top_share, 100.0);
        assert_eq!(s.concentration_level, ConcentrationLevel::High);
    }

    #[test]
    fn test_spread_holders_is_low() {
        let holders: Vec<HolderInfo> = (0..40).map(|i| holder(&format!("w{}", i), 10.0)).collect();
        let s = DistributionAnalyzer::new().summarize_holders(&holders);
        assert_eq!(s.total_holders, 40);
        assert_eq!(s.top_share, 25.0);
        assert_eq!(s.concentration_level, ConcentrationLevel::Low);
    }

    #[test]
    fn test_sorting_and_limit() {
        let cfg = DistributionConfig { holder_limit: 2, top_n: 2, ..Default::default() };
        let holders = vec![holder("c", 1.0), holder("a", 5.0), holder("b", 3.0), holder("d", 1.0)];
        let s = DistributionAnalyzer::with_config(cfg).summarize_holders(&holders);
        let wallets: Vec<&str> = s.top_holders.iter().map(|h| h.wallet.as_str()).collect();
        assert_eq!(wallets, vec!["a", "b"]);
        assert_eq!(s.total_holders, 4);
        assert_eq!(s.top_share, 80.0);
        assert_eq!(s.concentration_level, ConcentrationLevel::Moderate);
    }

    #[test]
    fn test_empty_holders() {
        let s = DistributionAnalyzer::new().summarize_holders(&[]);
        assert_eq!(s.top_share, 0.0);
        assert_eq!(s.concentration_level, ConcentrationLevel::Low);
    }

    #[test]
    fn test_token_value_distribution() {
        let holdings = vec![
            TokenHolding { symbol: "SOL".into(), amount: 2.0, price_usd: 150.0 },
            TokenHolding { symbol: "BONK".into(), amount: 1_000_000.0, price_usd: 0.0001 },
        ];
        let out = DistributionAnalyzer::new().token_value_distribution(&holdings);
        assert_eq!(out[0].value_usd, 300.0);
        assert_eq!(out[1].value_usd, 100.0);
        assert_eq!(out[0].percentage, 75.0);
        assert_eq!(out[1].percentage, 25.0);
    }

    #[test]
    fn test_token_value_distribution_zero_total() {
        let holdings = vec![TokenHolding { symbol: "DUST".into(), amount: 5.0, price_usd: 0.0 }];
        let out = DistributionAnalyzer::new().token_value_distribution(&holdings);
        assert_eq!(out[0].value_usd, 0.0);
        assert_eq!(out[0].percentage, 0.0);
    }
}
