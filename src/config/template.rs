//! Configuration template generation

use crate::config::Config;
use crate::utils::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Generate a default configuration file at the specified path
pub fn generate_config_template<P: AsRef<Path>>(path: P) -> Result<()> {
    let config = Config::default();
    config.save(path).map_err(|e| Error::ConfigError(e.to_string()))
}

/// Generate a configuration file with comments explaining each field
pub fn generate_commented_config_template<P: AsRef<Path>>(path: P) -> std::io::Result<()> {
    let toml_str = r#"# TokenPulse Configuration
# Every value below is the built-in default. Remove a line to keep the default.

version = "0.1.0"

[logging]
# Filter used when TOKENPULSE_LOG is not set (error, warn, info, debug, trace)
level = "info"

# Prefix each log line with a UTC timestamp
timestamps = true

[features]
# Trailing windows (in ticks) for the three moving averages
short_window = 5
medium_window = 15
long_window = 60

# Price history (ms) included in the volatility of each feature row
volatility_lookback_ms = 3600000

[entropy]
# Scores below this are "consolidated" (few addresses dominate)
consolidated_below = 30

# Scores above this are "fragmented" (activity spread over many addresses)
fragmented_above = 75

[risk.weights]
volume_change = 0.25
flashloan = 0.35
smart_wallet = 0.2
sybil_overlap = 0.2

[risk.thresholds]
# Inclusive lower bounds on the 0..100 score
severe = 85.0
high = 60.0
elevated = 35.0

[heatmap]
# Only count activity newer than this many hours (unset = all history)
# hours_back = 24

[market]
# Levels per side summed into the order book depth
depth_levels = 10

# Ticks in the trailing simple moving average
sma_window = 20

[activity]
# A sender counts as repeated when it has more than this many transfers
repeated_sender_min_transfers = 5

# Flag when more than this many senders are repeated
repeated_sender_min_senders = 3

# Number of most recent transfers checked for high volume
recent_window = 10
high_volume_threshold = 1000000.0

# Consecutive transfers closer than this (ms) count as rapid
rapid_gap_ms = 2000
rapid_min_count = 5

[distribution]
# Largest holders considered when summarizing
holder_limit = 50
top_n = 10

# Top-N share (percent) above which concentration is high / moderate
high_above = 80.0
moderate_above = 50.0

[wallet]
new_wallet_days = 3.0
high_activity_tx = 50
high_value_usd = 5000.0
multi_token_count = 10

# Behaviour score tiers
suspicious_above = 70
caution_above = 40

[signal]
# Samples kept in the rolling spike-detection window
window = 50

# Normalized level (0..1) a sample must exceed to count as a spike
peak_threshold = 0.85

# Samples required before the window is analyzed
min_samples = 10
"#;

    // Create parent directories if they don't exist
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, toml_str)?;
    Ok(())
}
