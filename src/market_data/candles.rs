//! Candlestick pattern detection over OHLC bars.
//!
//! Each detector scores one bar (or a bar and its predecessor) with a
//! confidence in `[0, 1]`; zero means the pattern is absent. Bars with a
//! zero range score zero instead of dividing by it.

use serde::{Deserialize, Serialize};

use crate::utils::types::Candle;

/// Wick must be more than this multiple of the body
const WICK_TO_BODY: f64 = 2.0;
/// Body must stay under this share of the range for a hammer or shooting star
const MAX_BODY_SHARE: f64 = 0.3;
/// Doji body must stay under this share of the range
const DOJI_BODY_SHARE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandlestickPattern {
    Hammer,
    ShootingStar,
    BullishEngulfing,
    BearishEngulfing,
    Doji,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternSignal {
    /// Timestamp of the bar that completes the pattern
    pub timestamp: i64,
    pub pattern: CandlestickPattern,
    pub confidence: f64,
}

fn long_wick(candle: &Candle, wick: f64) -> f64 {
    let body = candle.body();
    let range = candle.range();
    if body <= 0.0 || range <= 0.0 {
        return 0.0;
    }
    let ratio = wick / body;
    if ratio > WICK_TO_BODY && body / range < MAX_BODY_SHARE {
        (ratio / 3.0).min(1.0)
    } else {
        0.0
    }
}

/// Long lower wick under a small body.
pub fn hammer(candle: &Candle) -> f64 {
    long_wick(candle, candle.open.min(candle.close) - candle.low)
}

/// Long upper wick over a small body.
pub fn shooting_star(candle: &Candle) -> f64 {
    long_wick(candle, candle.high - candle.open.max(candle.close))
}

/// A bullish bar whose body covers the previous bearish body.
pub fn bullish_engulfing(prev: &Candle, curr: &Candle) -> f64 {
    let engulfs = curr.is_bullish()
        && prev.is_bearish()
        && curr.close > prev.open
        && curr.open < prev.close;
    if engulfs {
        (curr.body() / prev.body()).min(1.0)
    } else {
        0.0
    }
}

/// A bearish bar whose body covers the previous bullish body.
pub fn bearish_engulfing(prev: &Candle, curr: &Candle) -> f64 {
    let engulfs = curr.is_bearish()
        && prev.is_bullish()
        && curr.open > prev.close
        && curr.close < prev.open;
    if engulfs {
        (curr.body() / prev.body()).min(1.0)
    } else {
        0.0
    }
}

/// Open and close nearly equal relative to the range.
pub fn doji(candle: &Candle) -> f64 {
    let range = candle.range();
    if range <= 0.0 {
        return 0.0;
    }
    let share = candle.body() / range;
    if share < DOJI_BODY_SHARE {
        1.0 - share / DOJI_BODY_SHARE
    } else {
        0.0
    }
}

/// Every pattern with a positive confidence, bar by bar in input order.
///
/// Two-bar patterns compare each bar with the one before it, so the first
/// bar can only match single-bar patterns.
pub fn detect_patterns(candles: &[Candle]) -> Vec<PatternSignal> {
    let mut signals = Vec::new();
    for (i, curr) in candles.iter().enumerate() {
        let prev = i.checked_sub(1).and_then(|j| candles.get(j));
        let scores = [
            (CandlestickPattern::Hammer, hammer(curr)),
            (CandlestickPattern::ShootingStar, shooting_star(curr)),
            (CandlestickPattern::BullishEngulfing, prev.map_or(0.0, |p| bullish_engulfing(p, curr))),
            (CandlestickPattern::BearishEngulfing, prev.map_or(0.0, |p| bearish_engulfing(p, curr))),
            (CandlestickPattern::Doji, doji(curr)),
        ];
        signals.extend(scores.into_iter().filter(|&(_, c)| c > 0.0).map(|(pattern, confidence)| {
            PatternSignal { timestamp: curr.timestamp, pattern, confidence }
        }));
    }
    signals
}
