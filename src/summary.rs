//! Per-cluster statistics for map legends and charts

use std::collections::BTreeMap;

use crate::cluster::distance::distance_spherical;
use crate::cluster::{Cluster, Point, Position};

/// What the statistics view shows for one cluster
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSummary {
    pub index: usize,
    pub color: &'static str,
    pub count: usize,
    pub centroid: Position,
    /// Most frequent value of every categorical attribute, e.g. `cuisine`
    pub dominant: BTreeMap<String, String>,
    /// Largest centroid-to-member distance in kilometers
    pub radius_km: f64,
}

pub fn summarize(clusters: &[Cluster<Point>]) -> Vec<ClusterSummary> {
    clusters
        .iter()
        .map(|c| ClusterSummary {
            index: c.index,
            color: c.display_color,
            count: c.members.len(),
            centroid: c.centroid,
            dominant: dominant_attributes(&c.members),
            radius_km: c
                .members
                .iter()
                .map(|p| distance_spherical(&c.centroid, &p.position))
                .fold(0.0, f64::max),
        })
        .collect()
}

/// Picks the most frequent value per attribute
///
/// Ties go to the lexicographically smallest value.
pub fn dominant_attributes(members: &[Point]) -> BTreeMap<String, String> {
    let mut counts: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();
    for p in members {
        for (key, value) in &p.attributes {
            *counts.entry(key).or_default().entry(value).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .filter_map(|(key, values)| {
            let mut best: Option<(&str, usize)> = None;
            for (value, n) in values {
                if best.is_none_or(|(_, m)| n > m) {
                    best = Some((value, n));
                }
            }
            best.map(|(value, _)| (key.to_string(), value.to_string()))
        })
        .collect()
}

/// Mean member count over the returned clusters, 0.0 when there are none
pub fn average_cluster_size<P>(clusters: &[Cluster<P>]) -> f64 {
    if clusters.is_empty() {
        return 0.0;
    }
    let total: usize = clusters.iter().map(|c| c.members.len()).sum();
    total as f64 / clusters.len() as f64
}
