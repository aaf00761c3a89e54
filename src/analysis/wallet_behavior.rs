//! Rule-based wallet behaviour scoring.

use serde::{Deserialize, Serialize};

const DAY_MS: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletBehaviorConfig {
    #[serde(default = "default_new_wallet_days")]
    pub new_wallet_days: f64,
    #[serde(default = "default_high_activity_tx")]
    pub high_activity_tx: u64,
    #[serde(default = "default_high_value_usd")]
    pub high_value_usd: f64,
    #[serde(default = "default_multi_token_count")]
    pub multi_token_count: u64,
    #[serde(default = "default_suspicious_above")]
    pub suspicious_above: u32,
    #[serde(default = "default_caution_above")]
    pub caution_above: u32,
}

fn default_new_wallet_days() -> f64 {
    3.0
}
fn default_high_activity_tx() -> u64 {
    50
}
fn default_high_value_usd() -> f64 {
    5_000.0
}
fn default_multi_token_count() -> u64 {
    10
}
fn default_suspicious_above() -> u32 {
    70
}
fn default_caution_above() -> u32 {
    40
}

impl Default for WalletBehaviorConfig {
    fn default() -> Self {
        Self {
            new_wallet_days: default_new_wallet_days(),
            high_activity_tx: default_high_activity_tx(),
            high_value_usd: default_high_value_usd(),
            multi_token_count: default_multi_token_count(),
            suspicious_above: default_suspicious_above(),
            caution_above: default_caution_above(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBehaviorInput {
    pub tx_count_24h: u64,
    pub avg_tx_value: f64,
    pub distinct_tokens_interacted: u64,
    /// Unix epoch, milliseconds
    pub creation_timestamp: i64,
}

/// Individual behaviour flags and their score weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehaviorFlag {
    NewWallet,
    HighActivity,
    HighValueTx,
    MultiTokenInteractions,
}

impl BehaviorFlag {
    pub fn weight(&self) -> u32 {
        match self {
            | BehaviorFlag::NewWallet => 30,
            | BehaviorFlag::HighActivity => 25,
            | BehaviorFlag::HighValueTx => 20,
            | BehaviorFlag::MultiTokenInteractions => 15,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            | BehaviorFlag::NewWallet => "New wallet",
            | BehaviorFlag::HighActivity => "High activity",
            | BehaviorFlag::HighValueTx => "High value transactions",
            | BehaviorFlag::MultiTokenInteractions => "Multi-token interactions",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehaviorLabel {
    Normal,
    Caution,
    Suspicious,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletBehaviorResult {
    pub label: BehaviorLabel,
    pub score: u32,
    pub flags: Vec<BehaviorFlag>,
}

#[derive(Debug, Clone, Default)]
pub struct WalletBehaviorAnalyzer {
    config: WalletBehaviorConfig,
}

impl WalletBehaviorAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: WalletBehaviorConfig) -> Self {
        Self { config }
    }

    /// Score `input` as of `now_ms`.
    pub fn analyze(&self, input: &WalletBehaviorInput, now_ms: i64) -> WalletBehaviorResult {
        let age_days = now_ms.saturating_sub(input.creation_timestamp) as f64 / DAY_MS;

        let mut flags = Vec::new();
        if age_days < self.config.new_wallet_days {
            flags.push(BehaviorFlag::NewWallet);
        }
        if input.tx_count_24h > self.config.high_activity_tx {
            flags.push(BehaviorFlag::HighActivity);
        }
        if input.avg_tx_value > self.config.high_value_usd {
            flags.push(BehaviorFlag::HighValueTx);
        }
        if input.distinct_tokens_interacted > self.config.multi_token_count {
            flags.push(BehaviorFlag::MultiTokenInteractions);
        }

        let score: u32 = flags.iter().map(BehaviorFlag::weight).sum();
        let label = if score > self.config.suspicious_above {
            BehaviorLabel::Suspicious
        } else if score > self.config.caution_above {
            BehaviorLabel::Caution
        } else {
            BehaviorLabel::Normal
        };

        WalletBehaviorResult { label, score, flags }
    }
}
