//! JSON request bundles through the engine, the way the CLI feeds them.

use std::io::Write;

use serde_json::{json, Value};
use tempfile::NamedTempFile;
use tokenpulse::config::Config;
use tokenpulse::engine::{AnalysisEngine, AnalysisRequest};
use tokenpulse::utils::fs::read_json;
use tokenpulse::Error;

const NOW_MS: i64 = 1_700_000_000_000;
const DAY_MS: i64 = 86_400_000;

fn bundle() -> Value {
    json!({
        "mint": "So11111111111111111111111111111111111111112",
        "nowMs": NOW_MS,
        "timePoints": [
            { "timestamp": 0,      "price": 1.00, "volume": 500.0, "liquidity": 10000.0 },
            { "timestamp": 60000,  "price": 1.10, "volume": 800.0, "liquidity": 10000.0 },
            { "timestamp": 120000, "price": 0.99, "volume": 900.0, "liquidity": 0.0 }
        ],
        "onChainMetrics": [
            { "timestamp": 0, "volume": 1.0, "liquidity": 2.0, "activeAddresses": 3.0 },
            { "timestamp": 1, "volume": 2.0, "liquidity": 4.0, "activeAddresses": 3.0 },
            { "timestamp": 2, "volume": 3.0, "liquidity": 6.0, "activeAddresses": 3.0 }
        ],
        "riskInput": {
            "volumeChangeRatio": 0.4,
            "flashloanDetected": false,
            "smartWalletDensity": 0.1,
            "sybilOverlapScore": 0.2
        },
        "activityPoints": [
            { "timestamp": NOW_MS, "count": 7 },
            { "timestamp": NOW_MS - DAY_MS, "count": 2 }
        ],
        "trades": [
            { "price": 1.0, "size": 100.0, "side": "buy" },
            { "price": 1.2, "size": 300.0, "side": "sell" }
        ],
        "referenceTrades": [ { "price": 1.1, "size": 1.0 } ],
        "orderBook": {
            "bids": [ { "price": 0.99, "size": 1000.0 } ],
            "asks": [ { "price": 1.01, "size": 500.0 } ],
            "timestamp": NOW_MS
        },
        "holders": [
            { "wallet": "a", "amount": 900.0 },
            { "wallet": "b", "amount": 100.0 },
            { "wallet": "c", "amount": 0.0 }
        ],
        "holdings": [
            { "symbol": "SOL", "amount": 2.0, "priceUsd": 150.0 },
            { "symbol": "USDC", "amount": 100.0, "priceUsd": 1.0 }
        ],
        "walletBehavior": {
            "txCount24h": 120,
            "avgTxValue": 9000.0,
            "distinctTokensInteracted": 3,
            "creationTimestamp": NOW_MS - DAY_MS
        }
    })
}

#[test]
fn full_bundle_from_disk() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", bundle()).unwrap();

    let request: AnalysisRequest = read_json(file.path()).unwrap();
    let report = AnalysisEngine::default().run(&request).unwrap();
    let out = serde_json::to_value(&report).unwrap();

    assert_eq!(out["generatedAtMs"], json!(NOW_MS));
    assert_eq!(out["features"].as_array().unwrap().len(), 3);
    assert_eq!(out["features"][2]["liquidityRatio"], json!(0.0));

    // constant activeAddresses series has zero variance
    let correlations = out["correlations"].as_array().unwrap();
    assert_eq!(correlations[0]["pair"], json!(["volume", "liquidity"]));
    assert!((correlations[0]["coefficient"].as_f64().unwrap() - 1.0).abs() < 1e-9);
    assert_eq!(correlations[1]["coefficient"], json!(0.0));

    // 0.1 + 0.02 + 0.04
    assert_eq!(out["risk"]["score"], json!(16.0));
    assert_eq!(out["risk"]["label"], json!("Low"));

    assert_eq!(out["heatmap"]["total"], json!(9));
    assert_eq!(out["heatmap"]["mostActiveHourUtc"], json!(22));

    let market = &out["market"];
    assert!((market["vwap"].as_f64().unwrap() - 1.15).abs() < 1e-9);
    assert!((market["vwapSpread"].as_f64().unwrap() - 0.05).abs() < 1e-9);
    assert!((market["orderBook"]["midPrice"].as_f64().unwrap() - 1.0).abs() < 1e-12);
    assert!(market["orderBook"].get("totalDepthUSD").is_some());

    assert_eq!(out["holderDistribution"]["totalHolders"], json!(2));
    assert_eq!(out["holderDistribution"]["concentrationLevel"], json!("High"));
    assert_eq!(out["holdings"][0]["percentage"], json!(75.0));

    // new wallet + high activity + high value
    assert_eq!(out["walletBehavior"]["score"], json!(75));
    assert_eq!(out["walletBehavior"]["label"], json!("Suspicious"));

    assert!(out.get("entropy").is_none());
    assert!(out.get("tokenMetrics").is_none());
}

#[test]
fn heatmap_cutoff_comes_from_config() {
    let mut config = Config::default();
    config.heatmap.hours_back = Some(12);
    let engine = AnalysisEngine::new(config).unwrap();

    let report = engine.run_json(&bundle().to_string()).unwrap();
    let heatmap = report.heatmap.unwrap();
    // the point one day back is outside the twelve hour window
    assert_eq!(heatmap.total, 7);
}

#[test]
fn depth_levels_come_from_config() {
    let mut raw = bundle();
    raw["orderBook"]["bids"] = json!([
        { "price": 0.99, "size": 10.0 },
        { "price": 0.98, "size": 10.0 }
    ]);
    raw["orderBook"]["asks"] = json!([]);

    let mut config = Config::default();
    config.market.depth_levels = 1;
    let report = AnalysisEngine::new(config).unwrap().run_json(&raw.to_string()).unwrap();
    let book = report.market.unwrap().order_book.unwrap();
    assert!((book.total_depth_usd - 9.9).abs() < 1e-9);
    assert!((book.mid_price - 0.495).abs() < 1e-12);
    assert_eq!(book.spread_percent, 0.0);
    assert_eq!(book.imbalance, 1.0);
}

#[test]
fn malformed_and_non_finite_requests_fail() {
    let err = AnalysisEngine::default().run_json(r#"{ "timePoints": [ { "timestamp": 0 } ] }"#).unwrap_err();
    assert!(matches!(err, Error::JsonError(_)));

    let mut request: AnalysisRequest = serde_json::from_value(bundle()).unwrap();
    request.holdings[1].price_usd = f64::NEG_INFINITY;
    let err = AnalysisEngine::default().run(&request).unwrap_err();
    match err {
        | Error::DataError(msg) => assert!(msg.contains("holdings[1].priceUsd")),
        | other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn candles_and_signal_values_in_json() {
    let mut raw = bundle();
    raw["candles"] = json!([
        { "timestamp": 1000, "open": 10.0, "high": 10.1, "low": 8.9, "close": 9.0 },
        { "timestamp": 2000, "open": 8.8, "high": 10.6, "low": 8.7, "close": 10.5 },
        { "timestamp": 3000, "open": 10.0, "high": 10.5, "low": 9.5, "close": 10.0 }
    ]);
    raw["signalValues"] = json!([1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 6.0]);

    let report = AnalysisEngine::default().run_json(&raw.to_string()).unwrap();
    let out = serde_json::to_value(&report).unwrap();

    assert_eq!(
        out["market"]["patterns"],
        json!([
            { "timestamp": 2000, "pattern": "BullishEngulfing", "confidence": 1.0 },
            { "timestamp": 3000, "pattern": "Doji", "confidence": 1.0 }
        ])
    );
    assert_eq!(out["signal"]["status"], "ready");
    assert_eq!(out["signal"]["samples"], 11);
    assert_eq!(out["signal"]["peaks"], json!([10]));
    assert_eq!(out["signal"]["latest"], 1.0);
}
