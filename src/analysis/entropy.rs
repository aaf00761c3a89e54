//! Shannon-entropy concentration score over per-address event counts.
//!
//! A score near 0 means a handful of addresses produce almost all activity
//! (consolidated); near 100 means activity is spread evenly (fragmented).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::utils::types::TransferEvent;

/// Verdict thresholds on the 0..=100 score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntropyConfig {
    /// Scores strictly below this are "consolidated"
    #[serde(default = "default_consolidated_below")]
    pub consolidated_below: u32,
    /// Scores strictly above this are "fragmented"
    #[serde(default = "default_fragmented_above")]
    pub fragmented_above: u32,
}

fn default_consolidated_below() -> u32 {
    30
}
fn default_fragmented_above() -> u32 {
    75
}

impl Default for EntropyConfig {
    fn default() -> Self {
        Self {
            consolidated_below: default_consolidated_below(),
            fragmented_above: default_fragmented_above(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntropyVerdict {
    Normal,
    Fragmented,
    Consolidated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntropyReport {
    pub mint: String,
    pub unique_addresses: usize,
    pub total_events: u64,
    /// Raw Shannon entropy in bits
    pub entropy_bits: f64,
    pub tx_entropy_score: u32,
    pub verdict: EntropyVerdict,
}

/// Tally how often each address appears.
pub fn count_by_address<'a, I>(addresses: I) -> HashMap<String, u64>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = HashMap::new();
    for addr in addresses {
        *counts.entry(addr.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Per-sender counts from a transfer list.
pub fn count_senders(transfers: &[TransferEvent]) -> HashMap<String, u64> {
    count_by_address(transfers.iter().map(|t| t.sender.as_str()))
}

/// `-Σ p·log2(p)` over the count distribution. Zero counts are ignored.
pub fn shannon_entropy<'a, I>(counts: I) -> f64
where
    I: IntoIterator<Item = &'a u64> + Clone,
{
    let total: u64 = counts.clone().into_iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    counts
        .into_iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum()
}

#[derive(Debug, Clone, Default)]
pub struct EntropyAnalyzer {
    config: EntropyConfig,
}

impl EntropyAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EntropyConfig) -> Self {
        Self { config }
    }

    /// Normalized entropy score in `0..=100`.
    ///
    /// With fewer than two addresses the maximum entropy `log2(k)` is zero and
    /// the ratio is undefined; that case scores 0, i.e. fully concentrated.
    pub fn score(&self, counts: &HashMap<String, u64>) -> u32 {
        let unique = counts.values().filter(|&&c| c > 0).count();
        if unique < 2 {
            return 0;
        }
        let h = shannon_entropy(counts.values());
        let max_h = (unique as f64).log2();
        (100.0 * h / max_h).round().clamp(0.0, 100.0) as u32
    }

    pub fn verdict(&self, score: u32) -> EntropyVerdict {
        if score < self.config.consolidated_below {
            EntropyVerdict::Consolidated
        } else if score > self.config.fragmented_above {
            EntropyVerdict::Fragmented
        } else {
            EntropyVerdict::Normal
        }
    }

    pub fn analyze(&self, mint: &str, counts: &HashMap<String, u64>) -> EntropyReport {
        let score = self.score(counts);
        EntropyReport {
            mint: mint.to_string(),
            unique_addresses: counts.values().filter(|&&c| c > 0).count(),
            total_events: counts.values().sum(),
            entropy_bits: shannon_entropy(counts.values()),
            tx_entropy_score: score,
            verdict: self.verdict(score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn counts(pairs: &[(&str, u64)]) -> HashMap<String, u64> {
        pairs.iter().map(|(a, c)| (a.to_string(), *c)).collect()
    }

    #[test]
    fn test_uniform_distribution_scores_100() {
        let analyzer = EntropyAnalyzer::new();
        for k in 2..8 {
            let c: HashMap<String, u64> = (0..k).map(|i| (format!("addr{}", i), 7)).collect();
            assert_eq!(analyzer.score(&c), 100, "k = {}", k);
        }
    }

    #[test]
    fn test_single_address_scores_zero() {
        let analyzer = EntropyAnalyzer::new();
        let report = analyzer.analyze("mint", &counts(&[("whale", 250)]));
        assert_eq!(report.tx_entropy_score, 0);
        assert_eq!(report.entropy_bits, 0.0);
        assert_eq!(report.unique_addresses, 1);
        assert_matches!(report.verdict, EntropyVerdict::Consolidated);
    }

    #[test]
    fn test_empty_counts() {
        let report = EntropyAnalyzer::new().analyze("mint", &HashMap::new());
        assert_eq!(report.tx_entropy_score, 0);
        assert_eq!(report.total_events, 0);
        assert_eq!(report.verdict, EntropyVerdict::Consolidated);
    }

    #[test]
    fn test_skewed_distribution() {
        // p = [0.9, 0.1]: H ≈ 0.469 bits, max 1 bit
        let analyzer = EntropyAnalyzer::new();
        let c = counts(&[("a", 90), ("b", 10)]);
        assert_eq!(analyzer.score(&c), 47);
        assert_eq!(analyzer.verdict(47), EntropyVerdict::Normal);
    }

    #[test]
    fn test_verdict_thresholds() {
        let analyzer = EntropyAnalyzer::new();
        assert_eq!(analyzer.verdict(29), EntropyVerdict::Consolidated);
        assert_eq!(analyzer.verdict(30), EntropyVerdict::Normal);
        assert_eq!(analyzer.verdict(75), EntropyVerdict::Normal);
        assert_eq!(analyzer.verdict(76), EntropyVerdict::Fragmented);

        let strict = EntropyAnalyzer::with_config(EntropyConfig { consolidated_below: 50, fragmented_above: 90 });
        assert_eq!(strict.verdict(49), EntropyVerdict::Consolidated);
        assert_eq!(strict.verdict(80), EntropyVerdict::Normal);
    }

    #[test]
    fn test_count_senders() {
        let t = |s: &str| TransferEvent {
            signature: String::new(),
            timestamp: 0,
            sender: s.to_string(),
            recipient: "r".to_string(),
            amount: 1.0,
        };
        let c = count_senders(&[t("a"), t("b"), t("a")]);
        assert_eq!(c["a"], 2);
        assert_eq!(c["b"], 1);
    }
}
