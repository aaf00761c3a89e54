//! Market micro-metrics over trade ticks, order book snapshots and OHLC bars

pub mod candles;
pub mod order_book;
pub mod trades;

use serde::{Deserialize, Serialize};

pub use candles::{detect_patterns, CandlestickPattern, PatternSignal};
pub use order_book::{BookSummary, OrderBook};
pub use trades::{simple_moving_average, vwap, vwap_spread};

/// Depth and smoothing parameters for market summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Levels per side counted in depth
    #[serde(default = "default_depth_levels")]
    pub depth_levels: usize,
    /// Ticks in the trailing SMA
    #[serde(default = "default_sma_window")]
    pub sma_window: usize,
}

fn default_depth_levels() -> usize {
    10
}
fn default_sma_window() -> usize {
    20
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self { depth_levels: default_depth_levels(), sma_window: default_sma_window() }
    }
}
