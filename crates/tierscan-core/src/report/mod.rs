//! Aggregation of per-item results into the run report.
//!
//! The reduction happens once, after every worker has finished, on a single
//! owner: no shared counters exist while items are in flight.

mod render;
mod writer;

pub use render::{registered_reporters, CsvReporter, JsonReporter, Reporter};
pub use writer::{Artifact, ArtifactWriter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::classify::ResolutionTier;
use crate::types::{round2, ClassificationResult};

/// Summary plus full per-item listing for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    /// Identifies the run; derived from `generated_at`
    pub run_id: String,

    pub generated_at: DateTime<Utc>,

    pub total_items: usize,

    pub succeeded_count: usize,

    pub failed_count: usize,

    /// Succeeded items per tier; every tier is listed
    pub per_tier_counts: BTreeMap<ResolutionTier, usize>,

    /// Share of succeeded items per tier, in percent, two decimals
    pub per_tier_percentage: BTreeMap<ResolutionTier, f64>,

    pub statistics: ReportStatistics,

    /// Every result, sorted by item id
    pub individual_results: Vec<ClassificationResult>,
}

/// Size and shape statistics over succeeded items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportStatistics {
    pub total_size_bytes: u64,
    pub total_size_mb: f64,
    pub avg_file_size_mb: f64,
    pub avg_aspect_ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_summary: Option<ResolutionSummary>,
}

/// Smallest, largest and mean dimensions, formatted `WxH`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionSummary {
    pub min_resolution: String,
    pub max_resolution: String,
    pub avg_resolution: String,
}

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

impl AggregateReport {
    /// Reduce a complete result set, in any arrival order, into a report.
    pub fn build(mut results: Vec<ClassificationResult>, generated_at: DateTime<Utc>) -> Self {
        results.sort_by(|a, b| a.item_id.cmp(&b.item_id));

        let mut per_tier_counts: BTreeMap<ResolutionTier, usize> =
            ResolutionTier::ALL.iter().map(|&tier| (tier, 0)).collect();
        for tier in results.iter().filter_map(|r| r.resolution_tier) {
            *per_tier_counts.entry(tier).or_default() += 1;
        }

        let succeeded_count: usize = per_tier_counts.values().sum();
        let total_items = results.len();

        let per_tier_percentage = per_tier_counts
            .iter()
            .map(|(&tier, &count)| (tier, percentage(count, succeeded_count)))
            .collect();

        Self {
            run_id: run_id(&generated_at),
            generated_at,
            total_items,
            succeeded_count,
            failed_count: total_items - succeeded_count,
            per_tier_counts,
            per_tier_percentage,
            statistics: ReportStatistics::from_results(&results),
            individual_results: results,
        }
    }

    /// Failed results only, in report order.
    pub fn failures(&self) -> impl Iterator<Item = &ClassificationResult> {
        self.individual_results.iter().filter(|r| !r.is_ok())
    }
}

impl ReportStatistics {
    fn from_results(results: &[ClassificationResult]) -> Self {
        let ok: Vec<&ClassificationResult> = results.iter().filter(|r| r.is_ok()).collect();
        if ok.is_empty() {
            return Self::default();
        }
        let n = ok.len() as f64;

        let total_size_bytes: u64 = ok.iter().map(|r| r.size_bytes).sum();
        let ratios: Vec<f64> = ok.iter().filter_map(|r| r.aspect_ratio).collect();
        let avg_aspect_ratio = if ratios.is_empty() {
            0.0
        } else {
            round2(ratios.iter().sum::<f64>() / ratios.len() as f64)
        };

        let min_w = ok.iter().map(|r| r.width).min().unwrap_or(0);
        let min_h = ok.iter().map(|r| r.height).min().unwrap_or(0);
        let max_w = ok.iter().map(|r| r.width).max().unwrap_or(0);
        let max_h = ok.iter().map(|r| r.height).max().unwrap_or(0);
        let avg_w = ok.iter().map(|r| u64::from(r.width)).sum::<u64>() as f64 / n;
        let avg_h = ok.iter().map(|r| u64::from(r.height)).sum::<u64>() as f64 / n;

        Self {
            total_size_bytes,
            total_size_mb: round2(total_size_bytes as f64 / BYTES_PER_MB),
            avg_file_size_mb: round2(total_size_bytes as f64 / BYTES_PER_MB / n),
            avg_aspect_ratio,
            resolution_summary: Some(ResolutionSummary {
                min_resolution: format!("{min_w}x{min_h}"),
                max_resolution: format!("{max_w}x{max_h}"),
                avg_resolution: format!("{}x{}", avg_w as u64, avg_h as u64),
            }),
        }
    }
}

/// `count / total * 100`, two decimals, 0 when nothing succeeded.
fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round2(count as f64 / total as f64 * 100.0)
    }
}

/// Timestamp run id, millisecond resolution: `20261017_142501_093`.
pub fn run_id(at: &DateTime<Utc>) -> String {
    at.format("%Y%m%d_%H%M%S_%3f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WorkItem;
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn item(id: &str, size: u64) -> WorkItem {
        WorkItem {
            id: id.to_string(),
            source_path: PathBuf::from("/in").join(id),
            size_bytes: size,
        }
    }

    fn ok(id: &str, w: u32, h: u32) -> ClassificationResult {
        ClassificationResult::succeeded(&item(id, 1024 * 1024), w, h, "png", 1)
    }

    fn failed(id: &str) -> ClassificationResult {
        ClassificationResult::failed(&item(id, 0), "File is empty", 1)
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 14, 25, 1).unwrap()
    }

    #[test]
    fn test_three_tiers_even_split() {
        let report = AggregateReport::build(
            vec![ok("a", 320, 240), ok("b", 1920, 1080), ok("c", 4000, 3000)],
            at(),
        );

        assert_eq!(report.total_items, 3);
        assert_eq!(report.succeeded_count, 3);
        assert_eq!(report.failed_count, 0);
        assert_eq!(report.per_tier_counts[&ResolutionTier::Tier240p], 1);
        assert_eq!(report.per_tier_counts[&ResolutionTier::Tier480p], 0);
        assert_eq!(report.per_tier_counts[&ResolutionTier::Tier1080p], 1);
        assert_eq!(report.per_tier_counts[&ResolutionTier::Tier4K], 1);
        assert_eq!(report.per_tier_percentage[&ResolutionTier::Tier240p], 33.33);
        assert_eq!(report.per_tier_percentage[&ResolutionTier::Tier1080p], 33.33);
        assert_eq!(report.per_tier_percentage[&ResolutionTier::Tier4K], 33.33);
        assert_eq!(report.per_tier_percentage[&ResolutionTier::Tier720p], 0.0);
    }

    #[test]
    fn test_failures_excluded_from_tiers() {
        let report = AggregateReport::build(vec![ok("a", 854, 480), failed("b")], at());

        assert_eq!(report.succeeded_count, 1);
        assert_eq!(report.failed_count, 1);
        assert_eq!(report.per_tier_counts[&ResolutionTier::Tier480p], 1);
        assert_eq!(report.per_tier_percentage[&ResolutionTier::Tier480p], 100.0);
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].item_id, "b");
    }

    #[test]
    fn test_counts_invariants_hold() {
        let results = vec![
            ok("1", 10, 10),
            failed("2"),
            ok("3", 1280, 720),
            ok("4", 1281, 720),
            failed("5"),
            ok("6", 3840, 2160),
        ];
        let report = AggregateReport::build(results, at());

        assert_eq!(
            report.succeeded_count + report.failed_count,
            report.total_items
        );
        assert_eq!(report.total_items, report.individual_results.len());
        assert_eq!(
            report.per_tier_counts.values().sum::<usize>(),
            report.succeeded_count
        );
        assert_eq!(report.per_tier_counts.len(), 5);
        assert_eq!(report.per_tier_percentage.len(), 5);
    }

    #[test]
    fn test_all_failed_yields_zero_percentages() {
        let report = AggregateReport::build(vec![failed("a"), failed("b")], at());
        assert_eq!(report.succeeded_count, 0);
        assert!(report.per_tier_percentage.values().all(|&p| p == 0.0));
        assert!(report.statistics.resolution_summary.is_none());
        assert_eq!(report.statistics.total_size_bytes, 0);
    }

    #[test]
    fn test_empty_run() {
        let report = AggregateReport::build(Vec::new(), at());
        assert_eq!(report.total_items, 0);
        assert_eq!(report.failed_count, 0);
    }

    #[test]
    fn test_arrival_order_does_not_matter() {
        let forward = AggregateReport::build(
            vec![ok("a", 320, 240), failed("b"), ok("c", 1920, 1080)],
            at(),
        );
        let shuffled = AggregateReport::build(
            vec![ok("c", 1920, 1080), ok("a", 320, 240), failed("b")],
            at(),
        );
        assert_eq!(forward, shuffled);
        let ids: Vec<&str> = forward
            .individual_results
            .iter()
            .map(|r| r.item_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_statistics() {
        let report = AggregateReport::build(
            vec![ok("a", 100, 50), ok("b", 300, 150), failed("c")],
            at(),
        );
        let stats = &report.statistics;
        assert_eq!(stats.total_size_bytes, 2 * 1024 * 1024);
        assert_eq!(stats.total_size_mb, 2.0);
        assert_eq!(stats.avg_file_size_mb, 1.0);
        assert_eq!(stats.avg_aspect_ratio, 2.0);
        let summary = stats.resolution_summary.as_ref().unwrap();
        assert_eq!(summary.min_resolution, "100x50");
        assert_eq!(summary.max_resolution, "300x150");
        assert_eq!(summary.avg_resolution, "200x100");
    }

    #[test]
    fn test_run_id_format() {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap()
            + chrono::Duration::milliseconds(67);
        assert_eq!(run_id(&at), "20260102_030405_067");
    }

    #[test]
    fn test_tier_keys_serialize_as_labels() {
        let report = AggregateReport::build(vec![ok("a", 320, 240)], at());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["per_tier_counts"]["240p"], 1);
        assert_eq!(json["per_tier_counts"]["4K"], 0);
        assert_eq!(json["per_tier_percentage"]["240p"], 100.0);
        assert_eq!(json["run_id"], "20261017_142501_000");
    }
}
