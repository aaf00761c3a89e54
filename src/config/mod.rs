//! Configuration module for the analytics toolkit
//!
//! Every scoring policy (window sizes, weights, tier thresholds) is a named
//! field here with a documented default, so deployments and tests can tune
//! them without touching code.

pub mod template;

use crate::analysis::{ActivityConfig, DistributionConfig, EntropyConfig, HeatmapConfig, WalletBehaviorConfig};
use crate::features::FeatureConfig;
use crate::indicators::SignalConfig;
use crate::market_data::MarketConfig;
use crate::risk::RiskConfig;
use crate::utils::error::{Error, Result};
use crate::utils::fs::user_config_path;
use log::debug;
use serde::{Deserialize, Serialize};
use std::env;

pub use template::{generate_commented_config_template, generate_config_template};

/// Default file name looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "tokenpulse.toml";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Configuration file version
    pub version: String,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Feature extraction windows
    #[serde(default)]
    pub features: FeatureConfig,

    /// Entropy verdict thresholds
    #[serde(default)]
    pub entropy: EntropyConfig,

    /// Risk weights and tiers
    #[serde(default)]
    pub risk: RiskConfig,

    /// Heatmap cutoff
    #[serde(default)]
    pub heatmap: HeatmapConfig,

    /// Order book / trade metrics
    #[serde(default)]
    pub market: MarketConfig,

    /// Transfer activity heuristics
    #[serde(default)]
    pub activity: ActivityConfig,

    /// Holder concentration tiers
    #[serde(default)]
    pub distribution: DistributionConfig,

    /// Wallet behaviour rules
    #[serde(default)]
    pub wallet: WalletBehaviorConfig,

    /// Rolling spike detection
    #[serde(default)]
    pub signal: SignalConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `TOKENPULSE_LOG` is unset (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Prefix each line with a UTC RFC 3339 timestamp
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_timestamps() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), timestamps: default_log_timestamps() }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            logging: LoggingConfig::default(),
            features: FeatureConfig::default(),
            entropy: EntropyConfig::default(),
            risk: RiskConfig::default(),
            heatmap: HeatmapConfig::default(),
            market: MarketConfig::default(),
            activity: ActivityConfig::default(),
            distribution: DistributionConfig::default(),
            wallet: WalletBehaviorConfig::default(),
            signal: SignalConfig::default(),
        }
    }
}

impl Config {
    /// Serialize default config to TOML string
    pub fn default_toml() -> Result<String> {
        Ok(toml::to_string_pretty(&Self::default())?)
    }

    /// Load configuration from a specific file path
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Error::ConfigError(format!("Failed to read config file {:?}: {}", path.as_ref(), e))
        })?;
        let mut cfg: Self = toml::from_str(&content)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config file: {}", e)))?;
        cfg.merge_env()?;
        Ok(cfg)
    }

    /// Save the configuration to a file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {}", e)))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::ConfigError(format!("Failed to create directory {:?}: {}", parent, e))
            })?;
        }
        std::fs::write(path, content).map_err(|e| {
            Error::ConfigError(format!("Failed to write config file {:?}: {}", path, e))
        })?;
        Ok(())
    }

    /// Validate the configuration for required fields and reasonable values
    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(Error::ConfigError("Config version must be set (e.g., '0.1.0')".to_string()));
        }
        if log_level_is_unknown(&self.logging.level) {
            return Err(Error::ConfigError(format!("Unknown log level '{}'", self.logging.level)));
        }

        // Feature windows
        let f = &self.features;
        if f.short_window == 0 || f.medium_window == 0 || f.long_window == 0 {
            return Err(Error::ConfigError("features windows must be > 0".to_string()));
        }
        if f.volatility_lookback_ms < 0 {
            return Err(Error::ConfigError("features.volatility_lookback_ms must be >= 0".to_string()));
        }

        // Entropy
        if self.entropy.fragmented_above > 100 {
            return Err(Error::ConfigError("entropy.fragmented_above cannot exceed 100".to_string()));
        }
        if self.entropy.consolidated_below > self.entropy.fragmented_above {
            return Err(Error::ConfigError(
                "entropy.consolidated_below must not exceed entropy.fragmented_above".to_string(),
            ));
        }

        // Risk
        let w = &self.risk.weights;
        for (name, value) in [
            ("volume_change", w.volume_change),
            ("flashloan", w.flashloan),
            ("smart_wallet", w.smart_wallet),
            ("sybil_overlap", w.sybil_overlap),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::ConfigError(format!(
                    "risk.weights.{} must be a finite, non-negative number",
                    name
                )));
            }
        }
        let t = &self.risk.thresholds;
        if !(t.elevated <= t.high && t.high <= t.severe) {
            return Err(Error::ConfigError(
                "risk thresholds must satisfy elevated <= high <= severe".to_string(),
            ));
        }

        // Distribution
        let d = &self.distribution;
        if d.top_n == 0 {
            return Err(Error::ConfigError("distribution.top_n must be > 0".to_string()));
        }
        if d.moderate_above > d.high_above || d.high_above > 100.0 {
            return Err(Error::ConfigError(
                "distribution thresholds must satisfy moderate_above <= high_above <= 100".to_string(),
            ));
        }

        // Wallet behaviour
        if self.wallet.caution_above > self.wallet.suspicious_above {
            return Err(Error::ConfigError(
                "wallet.caution_above must not exceed wallet.suspicious_above".to_string(),
            ));
        }

        if self.activity.high_volume_threshold < 0.0 {
            return Err(Error::ConfigError("activity.high_volume_threshold must be >= 0".to_string()));
        }

        self.signal.validate()
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        if std::path::Path::new(DEFAULT_CONFIG_FILE).exists() {
            return Self::from_file(DEFAULT_CONFIG_FILE);
        }

        if let Some(path) = user_config_path() {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        debug!("no config file found, using defaults");
        let mut config = Self::default();
        config.merge_env()?;
        Ok(config)
    }

    /// Merge environment variables into the configuration
    pub fn merge_env(&mut self) -> Result<()> {
        if let Ok(level) = env::var("TOKENPULSE_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(levels) = env::var("TOKENPULSE_DEPTH_LEVELS") {
            self.market.depth_levels = levels.parse().map_err(|e| {
                Error::ConfigError(format!("Invalid TOKENPULSE_DEPTH_LEVELS '{}': {}", levels, e))
            })?;
        }

        if let Ok(lookback) = env::var("TOKENPULSE_VOLATILITY_LOOKBACK_MS") {
            self.features.volatility_lookback_ms = lookback.parse().map_err(|e| {
                Error::ConfigError(format!(
                    "Invalid TOKENPULSE_VOLATILITY_LOOKBACK_MS '{}': {}",
                    lookback, e
                ))
            })?;
        }

        Ok(())
    }
}

fn log_level_is_unknown(level: &str) -> bool {
    !matches!(
        level.to_ascii_lowercase().as_str(),
        "error" | "warn" | "info" | "debug" | "trace" | "off"
    )
}
