//! Stateless analyzers over already-fetched on-chain data

pub mod activity;
pub mod correlation;
pub mod distribution;
pub mod entropy;
pub mod heatmap;
pub mod wallet_behavior;

pub use activity::{ActivityAnalyzer, ActivityConfig, AnomalyFlag, TokenMetrics};
pub use correlation::{pearson_correlation, CorrelationAnalyzer, CorrelationResult, MetricField, MetricsSource};
pub use distribution::{DistributionAnalyzer, DistributionConfig, DistributionSummary, TokenDistribution};
pub use entropy::{EntropyAnalyzer, EntropyConfig, EntropyReport, EntropyVerdict};
pub use heatmap::{HeatmapBuilder, HeatmapConfig, HeatmapReport};
pub use wallet_behavior::{WalletBehaviorAnalyzer, WalletBehaviorConfig, WalletBehaviorInput, WalletBehaviorResult};
