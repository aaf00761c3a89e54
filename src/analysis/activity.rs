//! Transfer-level activity heuristics: totals, sender concentration flags,
//! rapid-fire transfer detection and a coarse activity score.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::utils::types::TransferEvent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityConfig {
    /// A sender is "repeated" above this many transfers
    #[serde(default = "default_repeated_sender_min_transfers")]
    pub repeated_sender_min_transfers: usize,
    /// Flag when more than this many senders are repeated
    #[serde(default = "default_repeated_sender_min_senders")]
    pub repeated_sender_min_senders: usize,
    /// Number of most recent transfers checked for volume bursts
    #[serde(default = "default_recent_window")]
    pub recent_window: usize,
    /// Volume over the recent window that raises `HighRecentVolume`
    #[serde(default = "default_high_volume_threshold")]
    pub high_volume_threshold: f64,
    /// Consecutive transfers closer than this are "rapid"
    #[serde(default = "default_rapid_gap_ms")]
    pub rapid_gap_ms: i64,
    /// Rapid gaps needed before the pattern is reported
    #[serde(default = "default_rapid_min_count")]
    pub rapid_min_count: usize,
}

fn default_repeated_sender_min_transfers() -> usize {
    5
}
fn default_repeated_sender_min_senders() -> usize {
    3
}
fn default_recent_window() -> usize {
    10
}
fn default_high_volume_threshold() -> f64 {
    1_000_000.0
}
fn default_rapid_gap_ms() -> i64 {
    2_000
}
fn default_rapid_min_count() -> usize {
    5
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            repeated_sender_min_transfers: default_repeated_sender_min_transfers(),
            repeated_sender_min_senders: default_repeated_sender_min_senders(),
            recent_window: default_recent_window(),
            high_volume_threshold: default_high_volume_threshold(),
            rapid_gap_ms: default_rapid_gap_ms(),
            rapid_min_count: default_rapid_min_count(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnomalyFlag {
    RepeatedSenders,
    HighRecentVolume,
    RapidTransfers,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetrics {
    pub total_volume: f64,
    pub unique_senders: usize,
    pub transaction_count: usize,
    pub activity_score: i64,
    pub anomaly_flags: Vec<AnomalyFlag>,
}

/// Weighted activity estimate capped at 100.
pub fn estimate_activity_score(transfers_24h: f64, mints: f64, unique_wallets: f64) -> f64 {
    (transfers_24h * 0.4 + mints * 0.3 + unique_wallets * 0.3).min(100.0)
}

#[derive(Debug, Clone, Default)]
pub struct ActivityAnalyzer {
    config: ActivityConfig,
}

impl ActivityAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ActivityConfig) -> Self {
        Self { config }
    }

    /// Flags for a chronologically ordered transfer list (oldest first).
    pub fn detect_suspicious_patterns(&self, transfers: &[TransferEvent]) -> Vec<AnomalyFlag> {
        let mut flags = Vec::new();

        let mut per_sender: HashMap<&str, usize> = HashMap::new();
        for t in transfers {
            *per_sender.entry(t.sender.as_str()).or_insert(0) += 1;
        }
        let repeated = per_sender
            .values()
            .filter(|&&n| n > self.config.repeated_sender_min_transfers)
            .count();
        if repeated > self.config.repeated_sender_min_senders {
            flags.push(AnomalyFlag::RepeatedSenders);
        }

        let start = transfers.len().saturating_sub(self.config.recent_window);
        let recent_volume: f64 = transfers[start..].iter().map(|t| t.amount).sum();
        if recent_volume > self.config.high_volume_threshold {
            flags.push(AnomalyFlag::HighRecentVolume);
        }

        let block_times: Vec<i64> = transfers.iter().map(|t| t.timestamp).collect();
        if self.rapid_transfer_count(&block_times) >= self.config.rapid_min_count {
            flags.push(AnomalyFlag::RapidTransfers);
        }

        flags
    }

    /// Count consecutive gaps no longer than `rapid_gap_ms`.
    ///
    /// `block_times_secs` may be in either order; gaps are absolute.
    pub fn rapid_transfer_count(&self, block_times_secs: &[i64]) -> usize {
        block_times_secs
            .windows(2)
            .map(|w| i64::try_from(w[1].abs_diff(w[0])).unwrap_or(i64::MAX).saturating_mul(1000))
            .filter(|&gap_ms| gap_ms <= self.config.rapid_gap_ms)
            .count()
    }

    pub fn has_rapid_transfer_pattern(&self, block_times_secs: &[i64]) -> bool {
        self.rapid_transfer_count(block_times_secs) >= self.config.rapid_min_count
    }

    pub fn calculate_token_metrics(&self, transfers: &[TransferEvent]) -> TokenMetrics {
        let total_volume: f64 = transfers.iter().map(|t| t.amount).sum();
        let unique_senders = transfers
            .iter()
            .map(|t| t.sender.as_str())
            .collect::<std::collections::HashSet<_>>()
            .len();
        let activity_score = ((total_volume * 0.4 + unique_senders as f64 * 0.6) / 100.0).round() as i64;

        TokenMetrics {
            total_volume,
            unique_senders,
            transaction_count: transfers.len(),
            activity_score,
            anomaly_flags: self.detect_suspicious_patterns(transfers),
        }
    }
}
