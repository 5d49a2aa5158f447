//! Nearest-neighbor search in z-scored feature space

use super::stats::FeatureStats;
use super::{HistoricalRecord, QueryPoint};

/// One historical point ranked against the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Euclidean distance in normalized space
    pub distance: f64,
    pub duration_ms: f64,
}

/// Normalization statistics for the three workload features
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureSpace {
    pub items: FeatureStats,
    pub bytes: FeatureStats,
    pub depth: FeatureStats,
}

impl FeatureSpace {
    /// Fit the space to a historical batch
    pub fn fit(records: &[HistoricalRecord]) -> Self {
        Self {
            items: FeatureStats::from_values(records.iter().map(|r| r.items_scanned as f64)),
            bytes: FeatureStats::from_values(records.iter().map(|r| r.bytes_scanned as f64)),
            depth: FeatureStats::from_values(records.iter().map(|r| r.depth as f64)),
        }
    }

    /// Project a raw `(items, bytes, depth)` triple into the space
    pub fn project(&self, items: f64, bytes: f64, depth: f64) -> [f64; 3] {
        [
            self.items.normalize(items),
            self.bytes.normalize(bytes),
            self.depth.normalize(depth),
        ]
    }
}

fn euclidean_distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Rank every record by distance to the query and keep the `k` closest.
///
/// The query is normalized against the batch's statistics, never its own.
/// Exact distance ties keep batch order. Returns fewer than `k` neighbors
/// when the batch is smaller than `k`.
pub fn nearest_neighbors(
    records: &[HistoricalRecord],
    query: &QueryPoint,
    k: usize,
) -> Vec<Neighbor> {
    let space = FeatureSpace::fit(records);
    let target = space.project(query.items as f64, query.bytes as f64, query.depth as f64);

    let mut ranked: Vec<Neighbor> = records
        .iter()
        .map(|r| {
            let point = space.project(
                r.items_scanned as f64,
                r.bytes_scanned as f64,
                r.depth as f64,
            );
            Neighbor {
                distance: euclidean_distance(&target, &point),
                duration_ms: r.duration_ms,
            }
        })
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    ranked.truncate(k);
    ranked
}
