//! # TokenPulse Rust
//! Feature extraction and anomaly scoring for on-chain token activity.
//!
//! Everything here works on data the caller already fetched: price/volume
//! series, on-chain metric samples, transfer lists, trades and order books.
//! The analyzers are synchronous and side-effect free; [`engine::AnalysisEngine`]
//! ties them together behind one JSON request/report pair.

pub use crate::utils::error::{Error, Result};

pub mod analysis;
pub mod config;
pub mod engine;
pub mod features;
pub mod indicators;
pub mod market_data;
pub mod risk;
pub mod utils;

pub use crate::config::Config;
pub use crate::engine::{AnalysisEngine, AnalysisReport, AnalysisRequest};
