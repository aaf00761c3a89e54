//! Hour-of-day activity heatmap.
//!
//! Counts are summed per UTC hour across all days in the input; there is no
//! per-day separation, so the result is an aggregate profile rather than a
//! day-by-hour grid.

use chrono::{TimeZone, Timelike, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::utils::types::ActivityPoint;

pub const HOURS_PER_DAY: usize = 24;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeatmapConfig {
    /// Ignore points older than this many hours before the reference time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_back: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapReport {
    /// Summed counts per UTC hour, index = hour
    pub distribution: [u64; HOURS_PER_DAY],
    pub total: u64,
    /// `total / 24`
    pub hourly_average: f64,
    /// Every hour whose bucket equals the maximum, ascending; all 24 hours when no activity
    pub peak_hours: Vec<u32>,
    /// Lowest of the peak hours
    pub most_active_hour_utc: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct HeatmapBuilder {
    config: HeatmapConfig,
}

impl HeatmapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HeatmapConfig) -> Self {
        Self { config }
    }

    /// Build the heatmap. `now_ms` anchors the optional `hours_back` cutoff.
    pub fn build(&self, points: &[ActivityPoint], now_ms: i64) -> HeatmapReport {
        let since = self
            .config
            .hours_back
            .map(|h| now_ms.saturating_sub((h as i64).saturating_mul(3_600_000)));

        let mut distribution = [0u64; HOURS_PER_DAY];
        let mut skipped = 0usize;
        for point in points {
            if since.map_or(false, |s| point.timestamp < s) {
                continue;
            }
            match hour_of_day(point.timestamp) {
                | Some(hour) => {
                    distribution[hour] = distribution[hour].saturating_add(point.count)
                }
                | None => skipped += 1,
            }
        }
        if skipped > 0 {
            warn!("heatmap skipped {} points with out-of-range timestamps", skipped);
        }

        summarize(distribution)
    }

    /// Treat each block time (seconds) as a single event.
    pub fn build_from_block_times(&self, block_times_secs: &[i64], now_ms: i64) -> HeatmapReport {
        let points: Vec<ActivityPoint> = block_times_secs
            .iter()
            .map(|&t| ActivityPoint { timestamp: t.saturating_mul(1000), count: 1 })
            .collect();
        self.build(&points, now_ms)
    }
}

fn hour_of_day(timestamp_ms: i64) -> Option<usize> {
    Utc.timestamp_millis_opt(timestamp_ms).single().map(|dt| dt.hour() as usize)
}

fn summarize(distribution: [u64; HOURS_PER_DAY]) -> HeatmapReport {
    let total = distribution.iter().fold(0u64, |acc, &c| acc.saturating_add(c));
    let peak = distribution.iter().copied().max().unwrap_or(0);
    let peak_hours: Vec<u32> = distribution
        .iter()
        .enumerate()
        .filter(|(_, &c)| c == peak)
        .map(|(h, _)| h as u32)
        .collect();

    HeatmapReport {
        distribution,
        total,
        hourly_average: total as f64 / HOURS_PER_DAY as f64,
        most_active_hour_utc: peak_hours.first().copied(),
        peak_hours,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR_MS: i64 = 3_600_000;
    const DAY_MS: i64 = 24 * HOUR_MS;

    fn at(day: i64, hour: i64, count: u64) -> ActivityPoint {
        ActivityPoint { timestamp: day * DAY_MS + hour * HOUR_MS + 1234, count }
    }

    #[test]
    fn test_single_hour_peak() {
        let points: Vec<ActivityPoint> = (0..100).map(|d| at(d, 5, 1)).collect();
        let report = HeatmapBuilder::new().build(&points, 0);
        assert_eq!(report.peak_hours, vec![5]);
        assert_eq!(report.distribution[5], 100);
        assert_eq!(report.total, 100);
        assert_eq!(report.most_active_hour_utc, Some(5));
    }

    #[test]
    fn test_ties_are_all_reported() {
        let points = [at(0, 3, 4), at(1, 17, 2), at(2, 17, 2), at(0, 9, 1)];
        let report = HeatmapBuilder::new().build(&points, 0);
        assert_eq!(report.peak_hours, vec![3, 17]);
        assert_eq!(report.most_active_hour_utc, Some(3));
        assert!((report.hourly_average - 9.0 / 24.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_input() {
        let report = HeatmapBuilder::new().build(&[], 0);
        assert_eq!(report.peak_hours, (0..24).collect::<Vec<u32>>());
        assert_eq!(report.most_active_hour_utc, Some(0));
        assert_eq!(report.total, 0);
        assert_eq!(report.hourly_average, 0.0);
    }

    #[test]
    fn test_huge_counts_saturate() {
        let points = [at(0, 4, u64::MAX), at(1, 4, 1), at(0, 9, u64::MAX)];
        let report = HeatmapBuilder::new().build(&points, 0);
        assert_eq!(report.distribution[4], u64::MAX);
        assert_eq!(report.distribution[9], u64::MAX);
        assert_eq!(report.total, u64::MAX);
        assert_eq!(report.peak_hours, vec![4, 9]);
        assert!(report.hourly_average.is_finite());
    }

    #[test]
    fn test_hours_back_cutoff() {
        let now = 10 * DAY_MS;
        let builder = HeatmapBuilder::with_config(HeatmapConfig { hours_back: Some(24) });
        let points = [at(9, 12, 5), at(2, 1, 50)];
        let report = builder.build(&points, now);
        assert_eq!(report.total, 5);
        assert_eq!(report.peak_hours, vec![12]);
    }

    #[test]
    fn test_from_block_times() {
        let secs = [3 * 3600 + 5, 3 * 3600 + 60, 86_400 + 3 * 3600, 7 * 3600];
        let report = HeatmapBuilder::new().build_from_block_times(&secs, 0);
        assert_eq!(report.distribution[3], 3);
        assert_eq!(report.distribution[7], 1);
        assert_eq!(report.peak_hours, vec![3]);
    }
}
