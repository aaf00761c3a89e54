//! Input records shared by the analyzers.
//!
//! These are plain snapshots produced by an upstream fetch layer (RPC, REST).
//! Field names are camelCase on the wire so request bundles written by the
//! dashboard deserialize without a mapping layer.

use serde::{Deserialize, Serialize};

/// One market tick for a token: price, traded volume and pool liquidity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePoint {
    /// Unix epoch, milliseconds
    pub timestamp: i64,
    pub volume: f64,
    pub price: f64,
    pub liquidity: f64,
}

impl TimePoint {
    pub fn new(timestamp: i64, price: f64, volume: f64, liquidity: f64) -> Self {
        Self { timestamp, volume, price, liquidity }
    }
}

/// Aggregated on-chain metrics for one sampling interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnChainMetric {
    pub timestamp: i64,
    pub volume: f64,
    pub liquidity: f64,
    pub active_addresses: f64,
}

/// A single SPL token transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferEvent {
    pub signature: String,
    /// Unix epoch, seconds (block time)
    pub timestamp: i64,
    pub sender: String,
    pub recipient: String,
    pub amount: f64,
}

/// Token balance held by one wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolderInfo {
    pub wallet: String,
    pub amount: f64,
}

/// A wallet position valued in USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenHolding {
    pub symbol: String,
    pub amount: f64,
    pub price_usd: f64,
}

/// Event count observed at a point in time (heatmap input).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPoint {
    /// Unix epoch, milliseconds
    pub timestamp: i64,
    pub count: u64,
}

/// Aggressor side of a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

/// An executed trade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeTick {
    #[serde(default)]
    pub timestamp: i64,
    pub price: f64,
    pub size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<TradeSide>,
}

impl TradeTick {
    pub fn new(price: f64, size: f64) -> Self {
        Self { timestamp: 0, price, size, side: None }
    }
}

/// One OHLC bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candle {
    /// Bar open time, Unix epoch milliseconds
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self { timestamp, open, high, low, close }
    }

    /// `|close - open|`
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// `high - low`
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}

/// Side of a resting order book level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookSide {
    Bid,
    Ask,
}

/// One price level of an order book.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderLevel {
    pub price: f64,
    pub size: f64,
}

impl OrderLevel {
    pub fn new(price: f64, size: f64) -> Self {
        Self { price, size }
    }
}

/// Flat order book record, as some venues publish them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BookEntry {
    pub side: BookSide,
    pub price: f64,
    pub size: f64,
}
