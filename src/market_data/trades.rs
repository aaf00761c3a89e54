//! Trade-tick reductions: VWAP, tail SMA and cross-market VWAP spread.

use crate::utils::types::TradeTick;

/// Volume-weighted average price; `0.0` when total size is zero.
pub fn vwap(ticks: &[TradeTick]) -> f64 {
    let (pv_sum, vol_sum) = ticks
        .iter()
        .fold((0.0, 0.0), |(pv, vol), t| (pv + t.price * t.size, vol + t.size));
    if vol_sum > 0.0 {
        pv_sum / vol_sum
    } else {
        0.0
    }
}

/// Mean price of the last `window` ticks; `0.0` for no ticks or a zero window.
pub fn simple_moving_average(ticks: &[TradeTick], window: usize) -> f64 {
    let start = ticks.len().saturating_sub(window);
    let tail = &ticks[start..];
    if tail.is_empty() {
        return 0.0;
    }
    tail.iter().map(|t| t.price).sum::<f64>() / tail.len() as f64
}

/// `vwap(a) - vwap(b)` rounded to six decimals.
///
/// Positive means market A trades above market B.
pub fn vwap_spread(a: &[TradeTick], b: &[TradeTick]) -> f64 {
    let delta = vwap(a) - vwap(b);
    (delta * 1e6).round() / 1e6
}
