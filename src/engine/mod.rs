//! AnalysisEngine: validates a request bundle and runs every analyzer it has input for.
//!
//! A request is one JSON document holding whatever series the caller already
//! fetched. Each section present in the request produces the matching section
//! of the [`AnalysisReport`]; absent sections are skipped.

use std::collections::HashMap;

use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::analysis::entropy::{count_by_address, count_senders};
use crate::analysis::{
    ActivityAnalyzer, CorrelationAnalyzer, CorrelationResult, DistributionAnalyzer,
    DistributionSummary, EntropyAnalyzer, EntropyReport, HeatmapBuilder, HeatmapReport,
    TokenDistribution, TokenMetrics, WalletBehaviorAnalyzer, WalletBehaviorInput,
    WalletBehaviorResult,
};
use crate::config::Config;
use crate::features::{FeatureExtractor, FeatureVector};
use crate::indicators::{SignalProcessor, SignalReading};
use crate::market_data::{
    detect_patterns, simple_moving_average, vwap, vwap_spread, BookSummary, OrderBook, PatternSignal,
};
use crate::risk::{RiskAssessment, RiskInput, RiskScorer};
use crate::utils::error::{Error, Result};
use crate::utils::types::{
    ActivityPoint, BookEntry, Candle, HolderInfo, OnChainMetric, TimePoint, TokenHolding, TradeTick,
    TransferEvent,
};

/// Input bundle. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisRequest {
    /// Token mint / contract the data belongs to
    pub mint: Option<String>,
    /// Reference clock (ms) for heatmap cutoff and wallet age; wall clock when absent
    pub now_ms: Option<i64>,

    pub time_points: Vec<TimePoint>,
    /// Timestamps to emit feature rows for (empty = every point)
    pub timestamps: Vec<i64>,

    pub on_chain_metrics: Vec<OnChainMetric>,

    /// Pre-aggregated per-address event counts
    pub address_counts: Option<HashMap<String, u64>>,
    /// Raw address list, one entry per event
    pub addresses: Vec<String>,
    pub transfers: Vec<TransferEvent>,

    pub risk_input: Option<RiskInput>,

    pub activity_points: Vec<ActivityPoint>,
    /// Signature block times (seconds), one event each
    pub block_times: Vec<i64>,

    pub trades: Vec<TradeTick>,
    /// Second market used for the VWAP spread
    pub reference_trades: Vec<TradeTick>,
    pub order_book: Option<OrderBook>,
    pub book_entries: Vec<BookEntry>,
    /// OHLC bars, oldest first
    pub candles: Vec<Candle>,

    /// Raw samples for rolling spike detection, oldest first
    pub signal_values: Vec<f64>,

    pub holders: Vec<HolderInfo>,
    pub holdings: Vec<TokenHolding>,

    pub wallet_behavior: Option<WalletBehaviorInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vwap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vwap_spread: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_book: Option<BookSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<PatternSignal>>,
}

impl MarketReport {
    fn is_empty(&self) -> bool {
        self.vwap.is_none()
            && self.sma.is_none()
            && self.vwap_spread.is_none()
            && self.order_book.is_none()
            && self.patterns.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mint: Option<String>,
    pub generated_at_ms: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<FeatureVector>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlations: Option<Vec<CorrelationResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entropy: Option<EntropyReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk: Option<RiskAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heatmap: Option<HeatmapReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<MarketReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_metrics: Option<TokenMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holder_distribution: Option<DistributionSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holdings: Option<Vec<TokenDistribution>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_behavior: Option<WalletBehaviorResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<SignalReading>,
}

/// Runs the analyzers configured by a [`Config`].
#[derive(Debug, Clone, Default)]
pub struct AnalysisEngine {
    config: Config,
}

impl AnalysisEngine {
    /// Build an engine; rejects an invalid configuration.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse a JSON request bundle.
    pub fn parse_request(raw: &str) -> Result<AnalysisRequest> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Parse, validate and run a JSON request in one step.
    pub fn run_json(&self, raw: &str) -> Result<AnalysisReport> {
        let request = Self::parse_request(raw)?;
        self.run(&request)
    }

    pub fn run(&self, request: &AnalysisRequest) -> Result<AnalysisReport> {
        validate_request(request)?;

        let now_ms = request.now_ms.unwrap_or_else(|| Utc::now().timestamp_millis());
        info!(
            "analyzing {} ({} time points, {} metrics, {} transfers, {} trades)",
            request.mint.as_deref().unwrap_or("<unnamed>"),
            request.time_points.len(),
            request.on_chain_metrics.len(),
            request.transfers.len(),
            request.trades.len()
        );

        let mut report = AnalysisReport {
            mint: request.mint.clone(),
            generated_at_ms: now_ms,
            ..Default::default()
        };

        if !request.time_points.is_empty() {
            let extractor = FeatureExtractor::with_config(self.config.features.clone())?;
            let rows = extractor.compute_features(&request.time_points, &request.timestamps)?;
            debug!("features: {} rows", rows.len());
            report.features = Some(rows);
        }

        if !request.on_chain_metrics.is_empty() {
            let results = CorrelationAnalyzer::new().analyze(&request.on_chain_metrics);
            debug!("correlation: {} pairs", results.len());
            report.correlations = Some(results);
        }

        if let Some(counts) = entropy_counts(request) {
            let mint = request.mint.as_deref().unwrap_or_default();
            let entropy = EntropyAnalyzer::with_config(self.config.entropy.clone()).analyze(mint, &counts);
            debug!("entropy: score {} ({:?})", entropy.tx_entropy_score, entropy.verdict);
            report.entropy = Some(entropy);
        }

        if let Some(input) = &request.risk_input {
            let assessment = RiskScorer::with_config(self.config.risk.clone()).assess(input);
            debug!("risk: {} ({})", assessment.score, assessment.label);
            report.risk = Some(assessment);
        }

        report.heatmap = self.heatmap(request, now_ms);
        report.market = self.market(request, now_ms);

        if !request.transfers.is_empty() {
            let metrics = ActivityAnalyzer::with_config(self.config.activity.clone())
                .calculate_token_metrics(&request.transfers);
            debug!("activity: flags {:?}", metrics.anomaly_flags);
            report.token_metrics = Some(metrics);
        }

        let distribution = DistributionAnalyzer::with_config(self.config.distribution.clone());
        if !request.holders.is_empty() {
            report.holder_distribution = Some(distribution.summarize_holders(&request.holders));
        }
        if !request.holdings.is_empty() {
            report.holdings = Some(distribution.token_value_distribution(&request.holdings));
        }

        if let Some(input) = &request.wallet_behavior {
            let result = WalletBehaviorAnalyzer::with_config(self.config.wallet.clone()).analyze(input, now_ms);
            debug!("wallet behaviour: {:?} ({})", result.label, result.score);
            report.wallet_behavior = Some(result);
        }

        if !request.signal_values.is_empty() {
            let mut processor = SignalProcessor::with_config(self.config.signal.clone())?;
            for &value in &request.signal_values {
                processor.feed(value);
            }
            let reading = processor.analyze();
            debug!("signal: {:?}", reading);
            report.signal = Some(reading);
        }

        Ok(report)
    }

    fn heatmap(&self, request: &AnalysisRequest, now_ms: i64) -> Option<HeatmapReport> {
        let builder = HeatmapBuilder::with_config(self.config.heatmap.clone());
        match (request.activity_points.is_empty(), request.block_times.is_empty()) {
            | (true, true) => None,
            | (false, true) => Some(builder.build(&request.activity_points, now_ms)),
            | (true, false) => Some(builder.build_from_block_times(&request.block_times, now_ms)),
            | (false, false) => {
                let mut points = request.activity_points.clone();
                points.extend(
                    request
                        .block_times
                        .iter()
                        .map(|&t| ActivityPoint { timestamp: t.saturating_mul(1000), count: 1 }),
                );
                Some(builder.build(&points, now_ms))
            }
        }
    }

    fn market(&self, request: &AnalysisRequest, now_ms: i64) -> Option<MarketReport> {
        let mut market = MarketReport::default();

        if !request.trades.is_empty() {
            if request.trades.iter().all(|t| t.size == 0.0) {
                warn!("all trades have zero size; VWAP falls back to 0");
            }
            market.vwap = Some(vwap(&request.trades));
            market.sma = Some(simple_moving_average(&request.trades, self.config.market.sma_window));
            if !request.reference_trades.is_empty() {
                market.vwap_spread = Some(vwap_spread(&request.trades, &request.reference_trades));
            }
        }

        let book = match &request.order_book {
            | Some(book) => Some(book.clone()),
            | None if !request.book_entries.is_empty() => {
                Some(OrderBook::from_entries(&request.book_entries, now_ms))
            }
            | None => None,
        };
        if let Some(book) = book {
            if book.bids.is_empty() || book.asks.is_empty() {
                warn!("order book has an empty side; mid price uses 0 for it and spread falls back to 0");
            }
            market.order_book = Some(book.summarize(self.config.market.depth_levels));
        }

        if !request.candles.is_empty() {
            market.patterns = Some(detect_patterns(&request.candles));
        }

        if market.is_empty() {
            None
        } else {
            debug!("market: {:?}", market);
            Some(market)
        }
    }
}

/// Counts from the most aggregated source available.
fn entropy_counts(request: &AnalysisRequest) -> Option<HashMap<String, u64>> {
    if let Some(counts) = &request.address_counts {
        return Some(counts.clone());
    }
    if !request.addresses.is_empty() {
        return Some(count_by_address(request.addresses.iter().map(String::as_str)));
    }
    if !request.transfers.is_empty() {
        return Some(count_senders(&request.transfers));
    }
    None
}

fn ensure_finite(section: &str, index: usize, field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::DataError(format!("{}[{}].{} is not a finite number: {}", section, index, field, value)))
    }
}

/// Reject NaN and infinities before they reach the numeric core.
pub fn validate_request(request: &AnalysisRequest) -> Result<()> {
    for (i, p) in request.time_points.iter().enumerate() {
        ensure_finite("timePoints", i, "price", p.price)?;
        ensure_finite("timePoints", i, "volume", p.volume)?;
        ensure_finite("timePoints", i, "liquidity", p.liquidity)?;
    }
    for (i, m) in request.on_chain_metrics.iter().enumerate() {
        ensure_finite("onChainMetrics", i, "volume", m.volume)?;
        ensure_finite("onChainMetrics", i, "liquidity", m.liquidity)?;
        ensure_finite("onChainMetrics", i, "activeAddresses", m.active_addresses)?;
    }
    for (i, t) in request.transfers.iter().enumerate() {
        ensure_finite("transfers", i, "amount", t.amount)?;
    }
    if let Some(r) = &request.risk_input {
        ensure_finite("riskInput", 0, "volumeChangeRatio", r.volume_change_ratio)?;
        ensure_finite("riskInput", 0, "smartWalletDensity", r.smart_wallet_density)?;
        ensure_finite("riskInput", 0, "sybilOverlapScore", r.sybil_overlap_score)?;
    }
    for (section, ticks) in [("trades", &request.trades), ("referenceTrades", &request.reference_trades)] {
        for (i, t) in ticks.iter().enumerate() {
            ensure_finite(section, i, "price", t.price)?;
            ensure_finite(section, i, "size", t.size)?;
        }
    }
    if let Some(book) = &request.order_book {
        for (section, levels) in [("orderBook.bids", &book.bids), ("orderBook.asks", &book.asks)] {
            for (i, l) in levels.iter().enumerate() {
                ensure_finite(section, i, "price", l.price)?;
                ensure_finite(section, i, "size", l.size)?;
            }
        }
    }
    for (i, e) in request.book_entries.iter().enumerate() {
        ensure_finite("bookEntries", i, "price", e.price)?;
        ensure_finite("bookEntries", i, "size", e.size)?;
    }
    for (i, c) in request.candles.iter().enumerate() {
        ensure_finite("candles", i, "open", c.open)?;
        ensure_finite("candles", i, "high", c.high)?;
        ensure_finite("candles", i, "low", c.low)?;
        ensure_finite("candles", i, "close", c.close)?;
    }
    for (i, &v) in request.signal_values.iter().enumerate() {
        ensure_finite("signalValues", i, "value", v)?;
    }
    for (i, h) in request.holders.iter().enumerate() {
        ensure_finite("holders", i, "amount", h.amount)?;
    }
    for (i, h) in request.holdings.iter().enumerate() {
        ensure_finite("holdings", i, "amount", h.amount)?;
        ensure_finite("holdings", i, "priceUsd", h.price_usd)?;
    }
    if let Some(w) = &request.wallet_behavior {
        ensure_finite("walletBehavior", 0, "avgTxValue", w.avg_tx_value)?;
    }
    Ok(())
}
