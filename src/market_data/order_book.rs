//! Level-2 order book metrics.

use serde::{Deserialize, Serialize};

use crate::utils::types::{BookEntry, BookSide, OrderLevel};

/// Order book snapshot. Levels are expected best-first (bids descending,
/// asks ascending); the metrics read the first level as the top of book.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    #[serde(default)]
    pub bids: Vec<OrderLevel>,
    #[serde(default)]
    pub asks: Vec<OrderLevel>,
    #[serde(default)]
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    pub mid_price: f64,
    pub spread_percent: f64,
    pub imbalance: f64,
    #[serde(rename = "totalDepthUSD")]
    pub total_depth_usd: f64,
    pub timestamp: i64,
}

impl OrderBook {
    pub fn new(bids: Vec<OrderLevel>, asks: Vec<OrderLevel>, timestamp: i64) -> Self {
        Self { bids, asks, timestamp }
    }

    /// Split flat `{side, price, size}` records into a book, keeping input order.
    pub fn from_entries(entries: &[BookEntry], timestamp: i64) -> Self {
        let mut book = Self { timestamp, ..Default::default() };
        for e in entries {
            let level = OrderLevel::new(e.price, e.size);
            match e.side {
                | BookSide::Bid => book.bids.push(level),
                | BookSide::Ask => book.asks.push(level),
            }
        }
        book
    }

    pub fn best_bid(&self) -> Option<f64> {
        self.bids.first().map(|l| l.price)
    }

    pub fn best_ask(&self) -> Option<f64> {
        self.asks.first().map(|l| l.price)
    }

    /// Average of best bid and best ask, an empty side counting as `0.0`.
    pub fn mid_price(&self) -> f64 {
        (self.best_bid().unwrap_or(0.0) + self.best_ask().unwrap_or(0.0)) / 2.0
    }

    /// `(ask - bid) / mid * 100`; `0.0` if either side is missing or mid is 0.
    pub fn spread_pct(&self) -> f64 {
        match (self.best_bid(), self.best_ask()) {
            | (Some(bid), Some(ask)) if bid != 0.0 && ask != 0.0 => {
                let mid = (bid + ask) / 2.0;
                if mid == 0.0 {
                    0.0
                } else {
                    (ask - bid) / mid * 100.0
                }
            }
            | _ => 0.0,
        }
    }

    /// `(bidVol - askVol) / (bidVol + askVol)` over all levels, in `[-1, 1]`.
    pub fn imbalance(&self) -> f64 {
        let bid_vol: f64 = self.bids.iter().map(|l| l.size).sum();
        let ask_vol: f64 = self.asks.iter().map(|l| l.size).sum();
        let total = bid_vol + ask_vol;
        if total == 0.0 {
            0.0
        } else {
            (bid_vol - ask_vol) / total
        }
    }

    /// Notional (`price * size`) of the top `levels` levels on both sides.
    pub fn depth_usd(&self, levels: usize) -> f64 {
        let side = |book_side: &[OrderLevel]| -> f64 {
            book_side.iter().take(levels).map(|l| l.price * l.size).sum()
        };
        side(&self.bids) + side(&self.asks)
    }

    pub fn summarize(&self, depth_levels: usize) -> BookSummary {
        BookSummary {
            mid_price: self.mid_price(),
            spread_percent: self.spread_pct(),
            imbalance: self.imbalance(),
            total_depth_usd: self.depth_usd(depth_levels),
            timestamp: self.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> OrderBook {
        OrderBook::new(
            vec![OrderLevel::new(99.0, 3.0), OrderLevel::new(98.0, 1.0)],
            vec![OrderLevel::new(101.0, 1.0), OrderLevel::new(102.0, 1.0)],
            42,
        )
    }

    #[test]
    fn test_mid_and_spread() {
        let b = book();
        assert_eq!(b.mid_price(), 100.0);
        assert!((b.spread_pct() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_side() {
        let b = OrderBook::new(vec![OrderLevel::new(99.0, 1.0)], vec![], 0);
        assert_eq!(b.mid_price(), 49.5);
        assert_eq!(b.spread_pct(), 0.0);
        assert_eq!(b.imbalance(), 1.0);

        let asks_only = OrderBook::new(vec![], vec![OrderLevel::new(101.0, 2.0)], 0);
        assert_eq!(asks_only.mid_price(), 50.5);
        assert_eq!(asks_only.spread_pct(), 0.0);

        let empty = OrderBook::default();
        assert_eq!(empty.mid_price(), 0.0);
        assert_eq!(empty.imbalance(), 0.0);
        assert_eq!(empty.depth_usd(10), 0.0);
    }

    #[test]
    fn test_imbalance_range() {
        let b = book();
        // (4 - 2) / 6
        assert!((b.imbalance() - 1.0 / 3.0).abs() < 1e-12);
        let asks_only = OrderBook::new(vec![], vec![OrderLevel::new(1.0, 5.0)], 0);
        assert_eq!(asks_only.imbalance(), -1.0);
    }

    #[test]
    fn test_depth_respects_levels() {
        let b = book();
        assert_eq!(b.depth_usd(1), 99.0 * 3.0 + 101.0);
        assert_eq!(b.depth_usd(10), 297.0 + 98.0 + 101.0 + 102.0);
        assert_eq!(b.depth_usd(0), 0.0);
    }

    #[test]
    fn test_from_entries_and_summary() {
        let entries = [
            BookEntry { side: BookSide::Ask, price: 11.0, size: 2.0 },
            BookEntry { side: BookSide::Bid, price: 9.0, size: 2.0 },
            BookEntry { side: BookSide::Bid, price: 8.0, size: 4.0 },
        ];
        let b = OrderBook::from_entries(&entries, 7);
        assert_eq!(b.bids.len(), 2);
        assert_eq!(b.asks.len(), 1);

        let s = b.summarize(1);
        assert_eq!(s.mid_price, 10.0);
        assert!((s.spread_percent - 20.0).abs() < 1e-12);
        assert!((s.imbalance - 0.5).abs() < 1e-12);
        assert_eq!(s.total_depth_usd, 18.0 + 22.0);
        assert_eq!(s.timestamp, 7);

        let json = serde_json::to_value(s).unwrap();
        assert!(json.get("totalDepthUSD").is_some());
    }
}
